//! Spring constraints between bodies, and one-sided tethers to a world point.

use crate::body::{Body, BodyId};
use crate::config::LinkConfig;
use crate::vec::Vec2;

/// Handle to a constraint registered in a [`World`](crate::world::World).
///
/// Ids are never reused within a world, even after the constraint is removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintId(pub(crate) u32);

/// Why a constraint exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LinkRole {
    /// Joins a letter to the one typed before it.
    InterLetter,
    /// Holds a chain up by the anchor.
    Anchor,
}

/// A spring-like link between attachment points on two bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct Constraint {
    pub body_a: BodyId,
    pub body_b: BodyId,
    /// Attachment point relative to `body_a`'s center.
    pub point_a: Vec2,
    /// Attachment point relative to `body_b`'s center.
    pub point_b: Vec2,
    pub rest_length: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub role: LinkRole,
}

impl Constraint {
    pub fn new(
        body_a: BodyId,
        body_b: BodyId,
        point_a: Vec2,
        point_b: Vec2,
        rest_length: f32,
        link: LinkConfig,
        role: LinkRole,
    ) -> Self {
        Constraint {
            body_a,
            body_b,
            point_a,
            point_b,
            rest_length,
            stiffness: link.stiffness,
            damping: link.damping,
            role,
        }
    }

    /// Create a constraint whose rest length is the current attachment distance.
    pub fn from_bodies(
        body_a: BodyId,
        body_b: BodyId,
        bodies: &[Body],
        point_a: Vec2,
        point_b: Vec2,
        link: LinkConfig,
        role: LinkRole,
    ) -> Self {
        let world_a = bodies[body_a.index()].pos + point_a;
        let world_b = bodies[body_b.index()].pos + point_b;
        let rest_length = world_a.distance(world_b);
        Self::new(body_a, body_b, point_a, point_b, rest_length, link, role)
    }

    pub fn involves(&self, body: BodyId) -> bool {
        self.body_a == body || self.body_b == body
    }

    /// Current distance between the two attachment points.
    pub fn current_length(&self, bodies: &[Body]) -> f32 {
        let a = &bodies[self.body_a.index()];
        let b = &bodies[self.body_b.index()];
        (a.pos + self.point_a).distance(b.pos + self.point_b)
    }

    pub fn solve(&self, bodies: &mut [Body]) {
        let (ia, ib) = (self.body_a.index(), self.body_b.index());
        if ia == ib {
            return;
        }
        let a_inv = bodies[ia].inv_mass;
        let b_inv = bodies[ib].inv_mass;

        let w_total = a_inv + b_inv;
        if w_total <= 1e-12 {
            return; // both static
        }

        let delta = (bodies[ib].pos + self.point_b) - (bodies[ia].pos + self.point_a);
        let dist = delta.length();
        if dist < 1e-6 {
            return; // degenerate
        }

        let normal = delta * (1.0 / dist);
        let error = dist - self.rest_length;
        let correction = normal * (error * self.stiffness);

        let relative = bodies[ib].velocity_raw() - bodies[ia].velocity_raw();
        let normal_speed = relative.dot(normal);
        let damping = normal * (normal_speed * self.damping);

        if a_inv > 0.0 {
            let share = a_inv / w_total;
            let a = &mut bodies[ia];
            a.pos += correction * share;
            a.prev_pos -= damping * share;
        }
        if b_inv > 0.0 {
            let share = b_inv / w_total;
            let b = &mut bodies[ib];
            b.pos -= correction * share;
            b.prev_pos += damping * share;
        }
    }
}

/// Pulls one attachment point of a body towards a fixed world position.
///
/// Tethers are solved alongside the world's constraints for one step but are
/// never stored in it; pointer dragging uses them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tether {
    pub body: BodyId,
    /// Grab point relative to the body's center.
    pub offset: Vec2,
    pub target: Vec2,
    pub stiffness: f32,
}

impl Tether {
    pub fn solve(&self, bodies: &mut [Body]) {
        let Some(body) = bodies.get_mut(self.body.index()) else {
            return;
        };
        if body.is_static() {
            return;
        }
        let correction = self.target - (body.pos + self.offset);
        body.pos += correction * self.stiffness;
    }
}
