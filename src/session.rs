//! Session lifecycle: building the world, driving frames and tearing down.

use alloc::string::ToString;

use crate::body::{Body, BodyId, BodyKind};
use crate::chain::{ChainBuilder, ChainLayout};
use crate::collision::CollisionFilter;
use crate::config::WormConfig;
use crate::drag::DragController;
use crate::error::WormError;
use crate::input::Command;
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::render::{Surface, SurfaceSize, WormRenderer};
use crate::timestep::FixedTimestep;
use crate::vec::Vec2;
use crate::world::World;

/// Size of the host's view the session lives in.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Viewport { width, height }
    }

    /// The drawable area once `reserved` pixels are kept free at the bottom.
    pub fn surface_size(&self, reserved: f32) -> Result<SurfaceSize, WormError> {
        let width = self.width;
        let height = self.height - reserved;
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(WormError::InvalidViewport { width: self.width, height: self.height });
        }
        Ok(SurfaceSize { width, height })
    }
}

/// The fixed bodies every session creates.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Boundaries {
    pub ground: BodyId,
    pub left_wall: BodyId,
    pub right_wall: BodyId,
}

impl Boundaries {
    pub const COUNT: usize = 3;
}

/// What a call to [`Session::frame`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// `steps` fixed steps were taken, then the chains were drawn.
    Rendered { steps: u32 },
    /// The session has been torn down; nothing happened.
    Stopped,
}

/// One run of the worm text input: world, chains, drag and drawing surface.
///
/// A session is single-threaded. The host calls [`frame`](Session::frame) from its
/// frame loop and forwards input in delivery order; every operation borrows the
/// session mutably, so input, stepping and drawing never overlap.
///
/// [`teardown`](Session::teardown) (or dropping the session) releases everything.
pub struct Session<S: Surface> {
    config: WormConfig,
    size: SurfaceSize,
    world: World,
    chains: ChainBuilder,
    anchor: BodyId,
    boundaries: Boundaries,
    drag: DragController,
    clock: FixedTimestep,
    renderer: WormRenderer,
    surface: Option<S>,
    running: bool,
}

impl<S: Surface> Session<S> {
    /// Build the world and take ownership of a drawing surface.
    ///
    /// `acquire` receives the surface size (viewport minus the reserved input
    /// height). If it returns `None` the session is not started.
    pub fn start<F>(config: WormConfig, viewport: Viewport, acquire: F) -> Result<Self, WormError>
    where
        F: FnOnce(SurfaceSize) -> Option<S>,
    {
        config.validate()?;
        let size = viewport.surface_size(config.reserved_input_height)?;
        let surface = acquire(size).ok_or(WormError::SurfaceUnavailable)?;

        let mut world = World::new();
        let (w, h, t) = (size.width, size.height, config.boundary_thickness);

        let anchor = world.add_body(Body::fixed_circle(
            Vec2::new(w * 0.5, config.anchor_top),
            config.anchor_radius,
            BodyKind::Anchor,
        )
        .with_filter(CollisionFilter::NONE));
        let boundaries = Boundaries {
            ground: world.add_body(Body::fixed_rect(
                Vec2::new(w * 0.5, h - t * 0.5),
                w,
                t,
                BodyKind::Boundary,
            )),
            left_wall: world.add_body(Body::fixed_rect(
                Vec2::new(-t * 0.5, h * 0.5),
                t,
                h,
                BodyKind::Boundary,
            )),
            right_wall: world.add_body(Body::fixed_rect(
                Vec2::new(w + t * 0.5, h * 0.5),
                t,
                h,
                BodyKind::Boundary,
            )),
        };

        let chains = ChainBuilder::new(anchor, ChainLayout::from_config(&config, w));
        let drag = DragController::new(config.drag_stiffness);
        let clock = FixedTimestep::new(config.solver.timestep, config.solver.max_steps_per_frame);
        let renderer = WormRenderer::new(config.letter_radius, config.style.clone());

        tracing::info!(width = w, height = h, "worm session started");

        Ok(Session {
            config,
            size,
            world,
            chains,
            anchor,
            boundaries,
            drag,
            clock,
            renderer,
            surface: Some(surface),
            running: true,
        })
    }

    /// Hang a new letter on the active chain.
    ///
    /// Returns `Ok(None)` once the session is stopped. Whitespace and control
    /// characters are rejected.
    pub fn add_letter(&mut self, letter: char) -> Result<Option<BodyId>, WormError> {
        match Command::from_char(letter)? {
            Command::Letter(c) => self.push_letter(c),
            Command::Break(c) => Err(WormError::InvalidInput(c.to_string())),
        }
    }

    fn push_letter(&mut self, letter: char) -> Result<Option<BodyId>, WormError> {
        if !self.running {
            return Ok(None);
        }
        self.chains.add_letter(&mut self.world, letter).map(Some)
    }

    /// Sever the active chain from the anchor. No-op when it is empty.
    pub fn break_chain(&mut self) {
        if self.running {
            self.chains.break_chain(&mut self.world);
        }
    }

    /// Apply a command. Returns it back if it reached the chains, or `None` once the
    /// session is stopped.
    pub fn apply(&mut self, command: Command) -> Result<Option<Command>, WormError> {
        if !self.running {
            return Ok(None);
        }
        match command {
            Command::Letter(c) => {
                self.push_letter(c)?;
            }
            Command::Break(_) => self.break_chain(),
        }
        Ok(Some(command))
    }

    /// Feed a physical keyboard key name. Returns the command it applied, if any.
    pub fn handle_key(&mut self, key: &str) -> Result<Option<Command>, WormError> {
        match Command::from_key(key)? {
            Some(command) => self.apply(command),
            None => Ok(None),
        }
    }

    /// Feed a tap from the on-screen keyboard. `None` once the session is stopped.
    pub fn handle_virtual_key(&mut self, key: &str) -> Result<Option<Command>, WormError> {
        let command = Command::from_virtual_key(key)?;
        self.apply(command)
    }

    /// Start dragging the movable body under `point`, if any.
    pub fn pointer_down(&mut self, point: Vec2) -> Option<BodyId> {
        if !self.running {
            return None;
        }
        self.drag.press(&self.world, point)
    }

    pub fn pointer_move(&mut self, point: Vec2) {
        self.drag.move_to(point);
    }

    pub fn pointer_up(&mut self) {
        self.drag.release();
    }

    /// Take exactly one fixed step. Returns `false` once stopped.
    pub fn step(&mut self) -> bool {
        self.step_with(&mut NoOpStepObserver)
    }

    pub fn step_with<O: StepObserver>(&mut self, observer: &mut O) -> bool {
        if !self.running {
            return false;
        }
        let tether = self.drag.tether();
        self.world.step(&self.config.solver, tether.as_ref(), observer);
        true
    }

    /// Draw the current state. Returns `false` once stopped.
    pub fn render(&mut self) -> bool {
        if !self.running {
            return false;
        }
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        surface.clear();
        self.renderer.render(surface, &self.world, self.chains.chains());
        true
    }

    /// Advance by `elapsed` seconds of wall time, then draw once.
    pub fn frame(&mut self, elapsed: f32) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Stopped;
        }
        let steps = self.clock.advance(elapsed);
        for _ in 0..steps {
            self.step();
        }
        self.render();
        FrameOutcome::Rendered { steps }
    }

    /// Stop stepping and drawing, release every body and constraint and detach the
    /// surface, handing it back. Safe to call more than once.
    pub fn teardown(&mut self) -> Option<S> {
        if !self.running {
            return None;
        }
        self.running = false;
        self.drag.release();
        self.chains.clear();
        self.world.clear();
        self.clock.reset();
        let mut surface = self.surface.take();
        if let Some(s) = surface.as_mut() {
            s.detach();
        }
        tracing::info!("worm session torn down");
        surface
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn chains(&self) -> &ChainBuilder {
        &self.chains
    }

    pub fn anchor(&self) -> BodyId {
        self.anchor
    }

    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    pub fn surface_size(&self) -> SurfaceSize {
        self.size
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn config(&self) -> &WormConfig {
        &self.config
    }

    /// Body currently held by the pointer.
    pub fn dragged(&self) -> Option<BodyId> {
        self.drag.held()
    }
}

impl<S: Surface> Drop for Session<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
