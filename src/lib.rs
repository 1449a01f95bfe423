//! Physically-animated text entry: typed letters hang as a swaying bead worm.
//!
//! Every typed character becomes a circular body linked to the one typed before
//! it, the whole chain hanging from a fixed anchor. Space or Enter cuts the chain
//! loose so it drops to the ground as one rope, and a new chain starts. Chains are
//! drawn as smooth bordered tubes with their letters on top, and any bead can be
//! grabbed and dragged.
//!
//! # Features
//!
//! - **Verlet physics**: position-based integration, spring links with stiffness
//!   and damping, group-filtered circle and wall contacts
//! - **Chain state machine**: `ChainBuilder` grows, anchors and severs chains
//! - **Canvas-style rendering**: `WormRenderer` draws onto any `Surface`
//! - **Session lifecycle**: fixed timestep, pointer drag, deterministic teardown
//! - **Step hooks**: `StepObserver` sees every solver stage; `StepStats` counts them
//! - **`no_std`**: only `alloc` is needed, so the core builds for `wasm32` as is

#![no_std]

extern crate alloc;

pub mod vec;
pub mod body;
pub mod collision;
pub mod constraint;
pub mod world;
pub mod drag;
pub mod timestep;
pub mod chain;
pub mod render;
pub mod input;
pub mod session;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use vec::Vec2;
pub use body::{Body, BodyId, BodyKind, Shape};
pub use collision::{CollisionFilter, Contact, GroupCounter};
pub use constraint::{Constraint, ConstraintId, LinkRole, Tether};
pub use world::World;
pub use drag::DragController;
pub use timestep::FixedTimestep;
pub use chain::{Chain, ChainBuilder, ChainLayout, ChainState};
pub use render::{LineCap, LineJoin, Surface, SurfaceSize, TextAlign, TextBaseline, WormRenderer};
pub use input::Command;
pub use session::{Boundaries, FrameOutcome, Session, Viewport};
pub use observer::{NoOpStepObserver, StepObserver, StepStats};
pub use config::{BodyMaterial, LinkConfig, SolverConfig, SolverIterations, WormConfig, WormStyle};
pub use error::WormError;
