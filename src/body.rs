//! Rigid bodies integrated with position-based (Verlet) dynamics.

use core::f32::consts::PI;

use crate::collision::CollisionFilter;
use crate::config::BodyMaterial;
use crate::vec::Vec2;

/// Handle to a body registered in a [`World`](crate::world::World).
///
/// Handles are arena indices: stable for the lifetime of the world and never reused
/// until the world is cleared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyId(pub(crate) u32);

impl BodyId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Collision shape. Bodies carry no angular state, so shapes never rotate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// What a body stands for in the scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// A typed character bead.
    Letter(char),
    /// The fixed point the active chain hangs from.
    Anchor,
    /// Ground or wall.
    Boundary,
}

/// A simulated body. Velocity is implicit in `pos - prev_pos`.
#[derive(Clone, Debug)]
pub struct Body {
    pub(crate) pos: Vec2,
    pub(crate) prev_pos: Vec2,
    pub(crate) acceleration: Vec2,
    pub(crate) inv_mass: f32,
    pub(crate) shape: Shape,
    pub(crate) material: BodyMaterial,
    pub(crate) filter: CollisionFilter,
    pub(crate) kind: BodyKind,
}

impl Body {
    /// A dynamic circle whose mass is `density * area`.
    pub fn circle(pos: Vec2, radius: f32, material: BodyMaterial, kind: BodyKind) -> Self {
        let mass = material.density * PI * radius * radius;
        let inv_mass = if mass > 1e-10 { 1.0 / mass } else { 0.0 };
        Body {
            pos,
            prev_pos: pos,
            acceleration: Vec2::ZERO,
            inv_mass,
            shape: Shape::Circle { radius },
            material,
            filter: CollisionFilter::default(),
            kind,
        }
    }

    /// An immovable circle.
    pub fn fixed_circle(pos: Vec2, radius: f32, kind: BodyKind) -> Self {
        Body {
            pos,
            prev_pos: pos,
            acceleration: Vec2::ZERO,
            inv_mass: 0.0,
            shape: Shape::Circle { radius },
            material: BodyMaterial::STATIC,
            filter: CollisionFilter::default(),
            kind,
        }
    }

    /// An immovable axis-aligned rectangle centered on `center`.
    pub fn fixed_rect(center: Vec2, width: f32, height: f32, kind: BodyKind) -> Self {
        Body {
            pos: center,
            prev_pos: center,
            acceleration: Vec2::ZERO,
            inv_mass: 0.0,
            shape: Shape::Rect { half_extents: Vec2::new(width * 0.5, height * 0.5) },
            material: BodyMaterial::STATIC,
            filter: CollisionFilter::default(),
            kind,
        }
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Start moving at `velocity` px per step.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        if !self.is_static() {
            self.prev_pos = self.pos - velocity;
        }
        self
    }

    pub fn position(&self) -> Vec2 {
        self.pos
    }

    /// Displacement over the last step.
    pub fn velocity_raw(&self) -> Vec2 {
        self.pos - self.prev_pos
    }

    pub fn is_static(&self) -> bool {
        self.inv_mass == 0.0
    }

    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn material(&self) -> BodyMaterial {
        self.material
    }

    pub fn filter(&self) -> CollisionFilter {
        self.filter
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    /// The character this body displays, if it is a letter.
    pub fn letter(&self) -> Option<char> {
        match self.kind {
            BodyKind::Letter(c) => Some(c),
            _ => None,
        }
    }

    /// Whether `point` lies inside the body's shape.
    pub fn contains(&self, point: Vec2) -> bool {
        match self.shape {
            Shape::Circle { radius } => self.pos.distance_sq(point) <= radius * radius,
            Shape::Rect { half_extents } => {
                let d = point - self.pos;
                libm::fabsf(d.x) <= half_extents.x && libm::fabsf(d.y) <= half_extents.y
            }
        }
    }

    pub fn apply_acceleration(&mut self, accel: Vec2) {
        if !self.is_static() {
            self.acceleration += accel;
        }
    }

    /// Advance one Verlet step; `air_friction` is the velocity fraction lost.
    pub fn integrate(&mut self, dt: f32, air_friction: f32) {
        if self.is_static() {
            self.acceleration = Vec2::ZERO;
            return;
        }
        let velocity = (self.pos - self.prev_pos) * (1.0 - air_friction);
        let new_pos = self.pos + velocity + self.acceleration * (dt * dt);
        self.prev_pos = self.pos;
        self.pos = new_pos;
        self.acceleration = Vec2::ZERO;
    }

    /// Move by `delta` without changing the implicit velocity.
    pub(crate) fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
        self.prev_pos += delta;
    }
}
