//! Error types for session, input and world operations.

use alloc::string::String;
use thiserror::Error;

use crate::body::BodyId;

/// Errors that can occur while starting or driving a worm session.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WormError {
    /// The host could not provide a drawing surface.
    #[error("rendering surface could not be acquired")]
    SurfaceUnavailable,
    /// Viewport minus the reserved input height leaves no drawable area.
    #[error("viewport {width}x{height} leaves no drawable area")]
    InvalidViewport { width: f32, height: f32 },
    /// Input token is neither a single displayable character nor a break key.
    #[error("unsupported input token {0:?}")]
    InvalidInput(String),
    /// Body handle does not refer to a body in this world.
    #[error("body {0:?} is not registered in the world")]
    UnknownBody(BodyId),
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
