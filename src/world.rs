//! Body arena, constraint registry and the fixed-step solver loop.

use alloc::vec::Vec;

use crate::body::{Body, BodyId};
use crate::collision::{self, CollisionFilter, GroupCounter};
use crate::config::{LinkConfig, SolverConfig};
use crate::constraint::{Constraint, ConstraintId, LinkRole, Tether};
use crate::error::WormError;
use crate::observer::StepObserver;
use crate::vec::Vec2;

/// Owns every body and constraint of a simulation.
///
/// Bodies live in an arena and are referred to by [`BodyId`]; they are only
/// released all at once by [`World::clear`]. Constraints can be removed
/// individually.
#[derive(Default)]
pub struct World {
    bodies: Vec<Body>,
    constraints: Vec<(ConstraintId, Constraint)>,
    next_constraint: u32,
    groups: GroupCounter,
    steps: u64,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_body(&mut self, body: Body) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(body);
        id
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.index())
    }

    pub fn try_body(&self, id: BodyId) -> Result<&Body, WormError> {
        self.body(id).ok_or(WormError::UnknownBody(id))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Position of a body, if it exists.
    pub fn position(&self, id: BodyId) -> Option<Vec2> {
        self.body(id).map(Body::position)
    }

    pub fn add_constraint(&mut self, constraint: Constraint) -> ConstraintId {
        let id = ConstraintId(self.next_constraint);
        self.next_constraint += 1;
        self.constraints.push((id, constraint));
        id
    }

    /// Build a constraint whose rest length is the current attachment distance.
    pub fn link_at_current_distance(
        &mut self,
        body_a: BodyId,
        body_b: BodyId,
        point_a: Vec2,
        point_b: Vec2,
        link: LinkConfig,
        role: LinkRole,
    ) -> Result<ConstraintId, WormError> {
        self.try_body(body_a)?;
        self.try_body(body_b)?;
        let c = Constraint::from_bodies(body_a, body_b, &self.bodies, point_a, point_b, link, role);
        Ok(self.add_constraint(c))
    }

    pub fn remove_constraint(&mut self, id: ConstraintId) -> Option<Constraint> {
        let idx = self.constraints.iter().position(|(cid, _)| *cid == id)?;
        Some(self.constraints.remove(idx).1)
    }

    /// Remove every constraint attached to `body`, returning how many were removed.
    pub fn remove_constraints_involving(&mut self, body: BodyId) -> usize {
        let before = self.constraints.len();
        self.constraints.retain(|(_, c)| !c.involves(body));
        before - self.constraints.len()
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|(cid, _)| *cid == id).map(|(_, c)| c)
    }

    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> + '_ {
        self.constraints.iter().map(|(_, c)| c)
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints_with_role(&self, role: LinkRole) -> usize {
        self.constraints().filter(|c| c.role == role).count()
    }

    /// A collision group no other group handed out by this world shares.
    pub fn next_exclusive_group(&mut self) -> CollisionFilter {
        self.groups.next_exclusive()
    }

    /// The most recently added movable body containing `point`.
    pub fn body_at(&self, point: Vec2) -> Option<BodyId> {
        self.bodies
            .iter()
            .enumerate()
            .rev()
            .find(|(_, b)| !b.is_static() && b.contains(point))
            .map(|(i, _)| BodyId(i as u32))
    }

    /// Number of steps taken since creation or the last clear.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    /// Advance the simulation by one fixed step of `config.timestep` seconds.
    pub fn step<O: StepObserver>(
        &mut self,
        config: &SolverConfig,
        tether: Option<&Tether>,
        observer: &mut O,
    ) {
        let dt = config.timestep;

        for b in self.bodies.iter_mut() {
            b.apply_acceleration(config.gravity);
            b.integrate(dt, config.air_friction);
        }
        observer.on_integrate(self.bodies.len());

        for i in 0..config.iterations.constraint {
            for (_, c) in self.constraints.iter() {
                c.solve(&mut self.bodies);
            }
            if let Some(t) = tether {
                t.solve(&mut self.bodies);
            }
            observer.on_constraint_iteration(i);
        }

        let contacts = collision::detect(&self.bodies);
        for _ in 0..config.iterations.position {
            for contact in contacts.iter() {
                collision::separate(&mut self.bodies, contact);
            }
        }
        for _ in 0..config.iterations.velocity {
            for contact in contacts.iter() {
                collision::respond(&mut self.bodies, contact);
            }
        }
        observer.on_contacts(contacts.len());

        self.steps += 1;
        tracing::trace!(step = self.steps, contacts = contacts.len(), "world stepped");
        observer.on_step_complete(self.steps);
    }

    /// Release every body and constraint.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.constraints.clear();
        self.steps = 0;
    }
}
