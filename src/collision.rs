//! Collision filtering, contact detection and contact response.
//!
//! Contacts are found pairwise between circles and between circles and
//! axis-aligned rectangles. Penetration is removed by translating bodies (no
//! velocity is injected); bounce and friction are then applied to the implicit
//! Verlet velocity.

use alloc::vec::Vec;

use crate::body::{Body, BodyId, Shape};
use crate::vec::Vec2;

/// Collision filter.
///
/// Two bodies sharing the same non-zero `group` always collide when the group is
/// positive and never collide when it is negative. Otherwise they collide when each
/// one's `mask` includes the other's `category`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    pub group: i32,
    pub category: u32,
    pub mask: u32,
}

impl CollisionFilter {
    pub const DEFAULT_CATEGORY: u32 = 0x0001;

    /// Collides with nothing.
    pub const NONE: CollisionFilter = CollisionFilter { group: 0, category: Self::DEFAULT_CATEGORY, mask: 0 };

    pub const fn new(group: i32) -> Self {
        CollisionFilter { group, category: Self::DEFAULT_CATEGORY, mask: u32::MAX }
    }

    pub fn can_collide(self, other: CollisionFilter) -> bool {
        if self.group == other.group && self.group != 0 {
            return self.group > 0;
        }
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Hands out fresh collision groups, never repeating one.
#[derive(Clone, Debug, Default)]
pub struct GroupCounter {
    last: i32,
}

impl GroupCounter {
    /// A new group whose members never collide with each other.
    pub fn next_exclusive(&mut self) -> CollisionFilter {
        self.last += 1;
        CollisionFilter::new(-self.last)
    }
}

/// A touching pair. `normal` points from `a` towards `b`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
    pub normal: Vec2,
    pub depth: f32,
}

fn circle_circle(pa: Vec2, ra: f32, pb: Vec2, rb: f32) -> Option<(Vec2, f32)> {
    let delta = pb - pa;
    let min_distance = ra + rb;
    let dist_sq = delta.length_sq();
    if dist_sq >= min_distance * min_distance {
        return None;
    }
    let dist = libm::sqrtf(dist_sq);
    // Coincident centers: push straight up.
    let normal = if dist > 1e-4 { delta * (1.0 / dist) } else { Vec2::new(0.0, -1.0) };
    Some((normal, min_distance - dist))
}

/// Normal points from the circle towards the rectangle.
fn circle_rect(center: Vec2, radius: f32, rect: Vec2, half: Vec2) -> Option<(Vec2, f32)> {
    let local = center - rect;
    let closest = local.clamp(-half, half);
    let inside = closest == local;

    if !inside {
        let delta = closest - local;
        let dist_sq = delta.length_sq();
        if dist_sq >= radius * radius {
            return None;
        }
        let dist = libm::sqrtf(dist_sq);
        let normal = if dist > 1e-4 { delta * (1.0 / dist) } else { Vec2::new(0.0, 1.0) };
        return Some((normal, radius - dist));
    }

    // Center inside the rectangle: leave through the nearest face.
    let dx = half.x - libm::fabsf(local.x);
    let dy = half.y - libm::fabsf(local.y);
    if dx < dy {
        let sign = if local.x > 0.0 { -1.0 } else { 1.0 };
        Some((Vec2::new(sign, 0.0), dx + radius))
    } else {
        let sign = if local.y > 0.0 { -1.0 } else { 1.0 };
        Some((Vec2::new(0.0, sign), dy + radius))
    }
}

/// Overlap between two bodies, normal pointing from `a` to `b`.
pub fn overlap(a: &Body, b: &Body) -> Option<(Vec2, f32)> {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.pos, ra, b.pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect(a.pos, radius, b.pos, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            circle_rect(b.pos, radius, a.pos, half_extents).map(|(n, d)| (-n, d))
        }
        (Shape::Rect { .. }, Shape::Rect { .. }) => None,
    }
}

/// All overlapping pairs that the filters allow and that have a movable member.
pub fn detect(bodies: &[Body]) -> Vec<Contact> {
    let mut contacts = Vec::new();
    for i in 0..bodies.len() {
        for j in (i + 1)..bodies.len() {
            let (a, b) = (&bodies[i], &bodies[j]);
            if a.is_static() && b.is_static() {
                continue;
            }
            if !a.filter.can_collide(b.filter) {
                continue;
            }
            if let Some((normal, depth)) = overlap(a, b) {
                contacts.push(Contact {
                    a: BodyId(i as u32),
                    b: BodyId(j as u32),
                    normal,
                    depth,
                });
            }
        }
    }
    contacts
}

fn pair_mut(bodies: &mut [Body], a: usize, b: usize) -> (&mut Body, &mut Body) {
    debug_assert!(a < b);
    let (head, tail) = bodies.split_at_mut(b);
    (&mut head[a], &mut tail[0])
}

/// Translate the pair apart along the contact normal, weighted by inverse mass.
pub fn separate(bodies: &mut [Body], contact: &Contact) {
    let (a, b) = pair_mut(bodies, contact.a.index(), contact.b.index());
    let Some((normal, depth)) = overlap(a, b) else {
        return;
    };
    let w_total = a.inv_mass + b.inv_mass;
    if w_total <= 0.0 {
        return;
    }
    let correction = normal * depth;
    a.translate(-(correction * (a.inv_mass / w_total)));
    b.translate(correction * (b.inv_mass / w_total));
}

/// Apply restitution and friction to an approaching pair.
pub fn respond(bodies: &mut [Body], contact: &Contact) {
    let (a, b) = pair_mut(bodies, contact.a.index(), contact.b.index());
    let w_total = a.inv_mass + b.inv_mass;
    if w_total <= 0.0 {
        return;
    }

    let n = contact.normal;
    let relative = b.velocity_raw() - a.velocity_raw();
    let normal_speed = relative.dot(n);
    if normal_speed >= 0.0 {
        return; // separating
    }

    let restitution = a.material.restitution.max(b.material.restitution);
    let friction = a.material.friction.max(b.material.friction);

    let tangent = relative - n * normal_speed;
    let change = n * (-(1.0 + restitution) * normal_speed) - tangent * friction;

    // Velocity is implicit: shifting prev_pos by -dv changes velocity by dv.
    a.prev_pos += change * (a.inv_mass / w_total);
    b.prev_pos -= change * (b.inv_mass / w_total);
}
