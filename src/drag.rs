//! Pointer dragging of movable bodies.

use crate::body::BodyId;
use crate::constraint::Tether;
use crate::vec::Vec2;
use crate::world::World;

#[derive(Copy, Clone, Debug, PartialEq)]
struct Grab {
    body: BodyId,
    offset: Vec2,
    pointer: Vec2,
}

/// Lets the user grab a movable body and pull it around with an elastic tether.
///
/// The controller never touches the world's constraint list: while a body is held
/// it yields a [`Tether`] that the world solves for the current step only.
#[derive(Clone, Debug)]
pub struct DragController {
    stiffness: f32,
    grab: Option<Grab>,
}

impl DragController {
    pub fn new(stiffness: f32) -> Self {
        DragController { stiffness, grab: None }
    }

    /// Grab the topmost movable body under `pointer`. Returns the grabbed body.
    pub fn press(&mut self, world: &World, pointer: Vec2) -> Option<BodyId> {
        let body = world.body_at(pointer)?;
        let center = world.position(body)?;
        self.grab = Some(Grab { body, offset: pointer - center, pointer });
        tracing::debug!(?body, "drag started");
        Some(body)
    }

    pub fn move_to(&mut self, pointer: Vec2) {
        if let Some(grab) = self.grab.as_mut() {
            grab.pointer = pointer;
        }
    }

    pub fn release(&mut self) {
        if let Some(grab) = self.grab.take() {
            tracing::debug!(body = ?grab.body, "drag released");
        }
    }

    pub fn held(&self) -> Option<BodyId> {
        self.grab.map(|g| g.body)
    }

    /// The pull to apply this step, if something is held.
    pub fn tether(&self) -> Option<Tether> {
        self.grab.map(|g| Tether {
            body: g.body,
            offset: g.offset,
            target: g.pointer,
            stiffness: self.stiffness,
        })
    }
}
