//! Letter chains: the typed worm and its anchor/sever state machine.

use alloc::string::String;
use alloc::vec::Vec;

use crate::body::{Body, BodyId, BodyKind};
use crate::collision::CollisionFilter;
use crate::config::{BodyMaterial, LinkConfig, WormConfig};
use crate::constraint::{Constraint, LinkRole};
use crate::error::WormError;
use crate::vec::Vec2;
use crate::world::World;

/// Whether a chain still accepts letters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChainState {
    /// Hanging from the anchor; new letters join at the head.
    Building,
    /// Cut loose. Membership is frozen but the bodies keep simulating.
    Severed,
}

/// An ordered run of letter bodies, newest first.
#[derive(Clone, Debug, PartialEq)]
pub struct Chain {
    bodies: Vec<BodyId>,
    state: ChainState,
    filter: Option<CollisionFilter>,
}

impl Chain {
    fn building() -> Self {
        Chain { bodies: Vec::new(), state: ChainState::Building, filter: None }
    }

    /// Body handles, most recently typed first.
    pub fn bodies(&self) -> &[BodyId] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// The most recently typed letter.
    pub fn head(&self) -> Option<BodyId> {
        self.bodies.first().copied()
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Collision group shared by every body of the chain, once it has one.
    pub fn filter(&self) -> Option<CollisionFilter> {
        self.filter
    }

    /// The chain's letters in typing order.
    pub fn text(&self, world: &World) -> String {
        self.bodies
            .iter()
            .rev()
            .filter_map(|id| world.body(*id).and_then(Body::letter))
            .collect()
    }
}

/// Placement and link parameters for new letters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChainLayout {
    /// x coordinate every letter is dropped at.
    pub column: f32,
    /// Vertical step between letters and rest length of inter-letter links.
    pub spacing: f32,
    pub radius: f32,
    pub material: BodyMaterial,
    pub link: LinkConfig,
    pub anchor_link: LinkConfig,
    /// Sideways velocity (px per step) a new letter starts with.
    pub drift: f32,
}

impl ChainLayout {
    /// Layout for a surface `surface_width` pixels wide.
    pub fn from_config(config: &WormConfig, surface_width: f32) -> Self {
        ChainLayout {
            column: config.letter_column.unwrap_or(surface_width * 0.5),
            spacing: config.letter_spacing,
            radius: config.letter_radius,
            material: config.letter_material,
            link: config.link,
            anchor_link: config.anchor_link,
            drift: config.letter_drift,
        }
    }
}

/// Turns typed characters into bodies and links hanging from the anchor.
///
/// Exactly one chain is active at a time. Breaking cuts every link to the anchor,
/// files the active chain under `finished` and starts a new, empty one. Links
/// between letters are never removed, so a severed chain falls as one rope.
#[derive(Clone, Debug)]
pub struct ChainBuilder {
    anchor: BodyId,
    layout: ChainLayout,
    active: Chain,
    finished: Vec<Chain>,
}

impl ChainBuilder {
    pub fn new(anchor: BodyId, layout: ChainLayout) -> Self {
        ChainBuilder { anchor, layout, active: Chain::building(), finished: Vec::new() }
    }

    pub fn anchor(&self) -> BodyId {
        self.anchor
    }

    pub fn layout(&self) -> &ChainLayout {
        &self.layout
    }

    /// Append a letter above the current head (or below the anchor when the chain
    /// is empty) and link it in.
    pub fn add_letter(&mut self, world: &mut World, letter: char) -> Result<BodyId, WormError> {
        debug_assert_eq!(self.active.state, ChainState::Building);
        let layout = self.layout;
        let previous = self.active.head();

        let y = match previous {
            Some(head) => world.try_body(head)?.position().y - layout.spacing,
            None => world.try_body(self.anchor)?.position().y + layout.spacing,
        };

        let filter = match self.active.filter {
            Some(filter) => filter,
            None => {
                let filter = world.next_exclusive_group();
                self.active.filter = Some(filter);
                filter
            }
        };

        let body = Body::circle(
            Vec2::new(layout.column, y),
            layout.radius,
            layout.material,
            BodyKind::Letter(letter),
        )
        .with_filter(filter)
        .with_velocity(Vec2::new(layout.drift, 0.0));
        let id = world.add_body(body);
        self.active.bodies.insert(0, id);

        match previous {
            // Bodies never rotate, so letters link center to center.
            Some(head) => {
                world.add_constraint(Constraint::new(
                    head,
                    id,
                    Vec2::ZERO,
                    Vec2::ZERO,
                    layout.spacing,
                    layout.link,
                    LinkRole::InterLetter,
                ));
            }
            None => {
                world.link_at_current_distance(
                    self.anchor,
                    id,
                    Vec2::ZERO,
                    Vec2::new(0.0, -layout.spacing * 0.5),
                    layout.anchor_link,
                    LinkRole::Anchor,
                )?;
            }
        }

        tracing::debug!(?letter, body = ?id, len = self.active.len(), "letter added");
        Ok(id)
    }

    /// Cut the active chain loose from the anchor.
    ///
    /// Every constraint touching the anchor is removed. An empty active chain is
    /// left in place, so repeated breaks never add empty entries to `finished`.
    pub fn break_chain(&mut self, world: &mut World) {
        let removed = world.remove_constraints_involving(self.anchor);
        if self.active.is_empty() {
            tracing::trace!(removed, "break on empty chain");
            return;
        }
        let mut severed = core::mem::replace(&mut self.active, Chain::building());
        severed.state = ChainState::Severed;
        tracing::debug!(len = severed.len(), removed, "chain severed");
        self.finished.push(severed);
    }

    pub fn active(&self) -> &Chain {
        &self.active
    }

    /// Severed chains, oldest first.
    pub fn finished(&self) -> &[Chain] {
        &self.finished
    }

    /// Finished chains followed by the active one.
    pub fn chains(&self) -> impl Iterator<Item = &Chain> + '_ {
        self.finished.iter().chain(core::iter::once(&self.active))
    }

    /// Letter bodies across every chain.
    pub fn letter_count(&self) -> usize {
        self.chains().map(Chain::len).sum()
    }

    /// Forget every chain. The bodies themselves belong to the world.
    pub fn clear(&mut self) {
        self.active = Chain::building();
        self.finished.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (World, ChainBuilder) {
        let mut world = World::new();
        let anchor = world.add_body(Body::fixed_circle(Vec2::new(200.0, 20.0), 6.0, BodyKind::Anchor));
        let layout = ChainLayout::from_config(&WormConfig::default(), 400.0);
        (world, ChainBuilder::new(anchor, layout))
    }

    #[test]
    fn first_letter_hangs_below_anchor() {
        let (mut world, mut builder) = setup();
        let id = builder.add_letter(&mut world, 'h').unwrap();
        assert_eq!(world.position(id), Some(Vec2::new(200.0, 45.0)));
        assert_eq!(world.constraints_with_role(LinkRole::Anchor), 1);
        assert_eq!(world.constraints_with_role(LinkRole::InterLetter), 0);
    }

    #[test]
    fn later_letters_stack_upwards() {
        let (mut world, mut builder) = setup();
        builder.add_letter(&mut world, 'h').unwrap();
        let second = builder.add_letter(&mut world, 'i').unwrap();
        assert_eq!(world.position(second), Some(Vec2::new(200.0, 20.0)));
        assert_eq!(world.constraints_with_role(LinkRole::Anchor), 1);
        assert_eq!(world.constraints_with_role(LinkRole::InterLetter), 1);
        assert_eq!(builder.active().head(), Some(second));
    }

    #[test]
    fn chain_members_share_one_exclusive_group() {
        let (mut world, mut builder) = setup();
        let a = builder.add_letter(&mut world, 'a').unwrap();
        let b = builder.add_letter(&mut world, 'b').unwrap();
        builder.break_chain(&mut world);
        let c = builder.add_letter(&mut world, 'c').unwrap();

        let fa = world.body(a).unwrap().filter();
        let fb = world.body(b).unwrap().filter();
        let fc = world.body(c).unwrap().filter();
        assert_eq!(fa, fb);
        assert!(!fa.can_collide(fb));
        assert!(fa.can_collide(fc));
    }

    #[test]
    fn severed_chain_keeps_text_and_state() {
        let (mut world, mut builder) = setup();
        for c in "worm".chars() {
            builder.add_letter(&mut world, c).unwrap();
        }
        builder.break_chain(&mut world);
        let finished = &builder.finished()[0];
        assert_eq!(finished.state(), ChainState::Severed);
        assert_eq!(finished.text(&world), "worm");
        assert_eq!(builder.active().state(), ChainState::Building);
        assert!(builder.active().is_empty());
    }
}
