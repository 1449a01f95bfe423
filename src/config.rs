//! Tuning values for the solver, the letter beads and the worm's look.
//!
//! Only the relative roles matter for the intended "heavy rope" feel: the anchor
//! link is softer than the links between letters, and dragging is elastic.

use alloc::string::String;

use crate::error::WormError;
use crate::vec::Vec2;

/// Physical material of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyMaterial {
    pub density: f32,
    /// Tangential velocity fraction removed on contact, in [0, 1].
    pub friction: f32,
    /// Normal velocity fraction kept on contact, in [0, 1].
    pub restitution: f32,
}

impl BodyMaterial {
    pub const STATIC: BodyMaterial = BodyMaterial { density: 0.0, friction: 0.1, restitution: 0.0 };
}

impl Default for BodyMaterial {
    fn default() -> Self {
        BodyMaterial { density: 0.5, friction: 0.01, restitution: 0.2 }
    }
}

/// Spring parameters for a link between two bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkConfig {
    /// Fraction of the length error corrected per constraint iteration, in [0, 1].
    pub stiffness: f32,
    /// Fraction of the relative normal velocity removed per iteration, in [0, 1].
    pub damping: f32,
}

impl LinkConfig {
    pub const fn new(stiffness: f32, damping: f32) -> Self {
        LinkConfig { stiffness, damping }
    }
}

/// Solver pass counts per fixed step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SolverIterations {
    /// Passes over all spring constraints.
    pub constraint: usize,
    /// Passes applying restitution and friction to contacts.
    pub velocity: usize,
    /// Passes separating overlapping bodies.
    pub position: usize,
}

impl Default for SolverIterations {
    fn default() -> Self {
        SolverIterations { constraint: 10, velocity: 8, position: 6 }
    }
}

/// Configuration for the physics world.
///
/// # Builder Pattern
/// ```
/// use wormtype::config::SolverConfig;
/// use wormtype::vec::Vec2;
///
/// let config = SolverConfig::new()
///     .with_gravity(Vec2::new(0.0, 600.0))
///     .with_timestep(1.0 / 60.0)
///     .with_max_steps_per_frame(4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolverConfig {
    pub iterations: SolverIterations,
    /// Gravity acceleration in px/s². Default: 980 downward.
    pub gravity: Vec2,
    /// Fixed simulation step in seconds, independent of the display rate.
    /// Default: 1/120.
    pub timestep: f32,
    /// Upper bound on fixed steps taken for one rendered frame. Default: 8.
    pub max_steps_per_frame: u32,
    /// Velocity fraction lost to the air every step. Default: 0.01.
    pub air_friction: f32,
}

impl SolverConfig {
    pub fn new() -> Self {
        SolverConfig {
            iterations: SolverIterations::default(),
            gravity: Vec2::new(0.0, 980.0),
            timestep: 1.0 / 120.0,
            max_steps_per_frame: 8,
            air_friction: 0.01,
        }
    }

    pub fn with_iterations(mut self, iterations: SolverIterations) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_timestep(mut self, timestep: f32) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps.max(1);
        self
    }

    pub fn with_air_friction(mut self, air_friction: f32) -> Self {
        self.air_friction = air_friction;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Colours, widths and font used to draw a worm.
#[derive(Clone, Debug, PartialEq)]
pub struct WormStyle {
    pub border_color: String,
    pub fill_color: String,
    /// Outline drawn on each side of the tube, in px.
    pub border_width: f32,
    pub font: String,
    pub glyph_fill: String,
    pub glyph_outline: String,
    pub glyph_outline_width: f32,
}

impl Default for WormStyle {
    fn default() -> Self {
        WormStyle {
            border_color: String::from("#000"),
            fill_color: String::from("#7b5c00"),
            border_width: 4.0,
            font: String::from("30px Arial"),
            glyph_fill: String::from("#000"),
            glyph_outline: String::from("#fff"),
            glyph_outline_width: 1.0,
        }
    }
}

/// Everything a session needs to build and drive its world.
#[derive(Clone, Debug, PartialEq)]
pub struct WormConfig {
    pub solver: SolverConfig,
    /// Radius of every letter bead, in px.
    pub letter_radius: f32,
    pub letter_material: BodyMaterial,
    /// Vertical distance between consecutive letters, also the link rest length.
    pub letter_spacing: f32,
    /// Column new letters are dropped in. `None` means the surface's center.
    pub letter_column: Option<f32>,
    /// Sideways velocity new letters start with, in px per step. Tips a freshly
    /// stacked column over so it swings down into a hang.
    pub letter_drift: f32,
    pub link: LinkConfig,
    pub anchor_link: LinkConfig,
    pub anchor_radius: f32,
    /// Distance from the top of the surface to the anchor's center.
    pub anchor_top: f32,
    pub boundary_thickness: f32,
    /// Pull strength of the pointer drag, in (0, 1].
    pub drag_stiffness: f32,
    /// Height kept free below the surface for the on-screen keyboard.
    pub reserved_input_height: f32,
    pub style: WormStyle,
}

impl WormConfig {
    pub fn new() -> Self {
        WormConfig {
            solver: SolverConfig::new(),
            letter_radius: 20.0,
            letter_material: BodyMaterial::default(),
            letter_spacing: 25.0,
            letter_column: None,
            letter_drift: 0.5,
            link: LinkConfig::new(0.6, 0.3),
            anchor_link: LinkConfig::new(0.2, 0.3),
            anchor_radius: 6.0,
            anchor_top: 20.0,
            boundary_thickness: 20.0,
            drag_stiffness: 0.2,
            reserved_input_height: 206.0,
            style: WormStyle::default(),
        }
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_letter_radius(mut self, radius: f32) -> Self {
        self.letter_radius = radius;
        self
    }

    pub fn with_letter_material(mut self, material: BodyMaterial) -> Self {
        self.letter_material = material;
        self
    }

    pub fn with_letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn with_letter_column(mut self, x: f32) -> Self {
        self.letter_column = Some(x);
        self
    }

    pub fn with_letter_drift(mut self, drift: f32) -> Self {
        self.letter_drift = drift;
        self
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }

    pub fn with_anchor_link(mut self, link: LinkConfig) -> Self {
        self.anchor_link = link;
        self
    }

    pub fn with_drag_stiffness(mut self, stiffness: f32) -> Self {
        self.drag_stiffness = stiffness;
        self
    }

    pub fn with_reserved_input_height(mut self, height: f32) -> Self {
        self.reserved_input_height = height;
        self
    }

    pub fn with_style(mut self, style: WormStyle) -> Self {
        self.style = style;
        self
    }

    /// Check every value that the solver or the builder relies on.
    pub fn validate(&self) -> Result<(), WormError> {
        fn unit(v: f32) -> bool {
            (0.0..=1.0).contains(&v)
        }

        if !(self.letter_radius > 0.0) {
            return Err(WormError::InvalidConfig("letter radius must be positive"));
        }
        if !(self.letter_spacing > 0.0) {
            return Err(WormError::InvalidConfig("letter spacing must be positive"));
        }
        if !(self.letter_material.density > 0.0) {
            return Err(WormError::InvalidConfig("letter density must be positive"));
        }
        if !unit(self.letter_material.friction) || !unit(self.letter_material.restitution) {
            return Err(WormError::InvalidConfig("friction and restitution must be in [0, 1]"));
        }
        if !self.letter_drift.is_finite() {
            return Err(WormError::InvalidConfig("letter drift must be finite"));
        }
        for link in [self.link, self.anchor_link] {
            if !unit(link.stiffness) || !unit(link.damping) {
                return Err(WormError::InvalidConfig("link stiffness and damping must be in [0, 1]"));
            }
        }
        if !(self.drag_stiffness > 0.0 && self.drag_stiffness <= 1.0) {
            return Err(WormError::InvalidConfig("drag stiffness must be in (0, 1]"));
        }
        if !(self.solver.timestep > 0.0) {
            return Err(WormError::InvalidConfig("timestep must be positive"));
        }
        if !unit(self.solver.air_friction) {
            return Err(WormError::InvalidConfig("air friction must be in [0, 1]"));
        }
        let it = self.solver.iterations;
        if it.constraint == 0 || it.velocity == 0 || it.position == 0 {
            return Err(WormError::InvalidConfig("iteration counts must be non-zero"));
        }
        if !(self.anchor_radius > 0.0) || !(self.boundary_thickness > 0.0) {
            return Err(WormError::InvalidConfig("anchor radius and boundary thickness must be positive"));
        }
        if !(self.reserved_input_height >= 0.0) {
            return Err(WormError::InvalidConfig("reserved input height must not be negative"));
        }
        Ok(())
    }
}

impl Default for WormConfig {
    fn default() -> Self {
        Self::new()
    }
}
