//! Drawing chains as smooth bordered tubes with their letters on top.
//!
//! The renderer only reads body positions; it never mutates the world. It talks to
//! the host through [`Surface`], a small subset of a 2D canvas context.

use alloc::vec::Vec;

use crate::chain::Chain;
use crate::config::WormStyle;
use crate::vec::Vec2;
use crate::world::World;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    Alphabetic,
    Bottom,
}

/// Pixel size of a drawing surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

/// A 2D drawing target, modelled on the canvas 2D context.
pub trait Surface {
    /// Erase the previous frame.
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn quadratic_curve_to(&mut self, control: Vec2, end: Vec2);
    fn close_path(&mut self);

    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_stroke_style(&mut self, color: &str);
    fn set_fill_style(&mut self, color: &str);
    fn stroke(&mut self);

    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn stroke_text(&mut self, text: &str, at: Vec2);
    fn fill_text(&mut self, text: &str, at: Vec2);

    /// Remove the surface from the host's view. Called once, on teardown.
    fn detach(&mut self) {}
}

/// Draws every chain as one continuous worm.
#[derive(Clone, Debug, PartialEq)]
pub struct WormRenderer {
    /// Physical radius of the letter bodies; the tube is this thick on each side.
    radius: f32,
    style: WormStyle,
}

impl WormRenderer {
    pub fn new(radius: f32, style: WormStyle) -> Self {
        WormRenderer { radius, style }
    }

    pub fn style(&self) -> &WormStyle {
        &self.style
    }

    /// Draw `chains` in order, so later chains end up on top.
    pub fn render<'a, S, I>(&self, surface: &mut S, world: &World, chains: I)
    where
        S: Surface + ?Sized,
        I: IntoIterator<Item = &'a Chain>,
    {
        surface.save();
        for chain in chains {
            self.render_chain(surface, world, chain);
        }
        surface.restore();
    }

    /// Draw one chain. Returns `false` (and draws nothing) for an empty chain.
    pub fn render_chain<S: Surface + ?Sized>(&self, surface: &mut S, world: &World, chain: &Chain) -> bool {
        let points: Vec<(Vec2, Option<char>)> = chain
            .bodies()
            .iter()
            .filter_map(|id| world.body(*id))
            .map(|b| (b.position(), b.letter()))
            .collect();
        if points.is_empty() {
            return false;
        }

        self.trace_tube(surface, &points);

        surface.set_line_width(self.radius * 2.0 + self.style.border_width * 2.0);
        surface.set_stroke_style(&self.style.border_color);
        surface.set_line_cap(LineCap::Round);
        surface.set_line_join(LineJoin::Round);
        surface.stroke();

        surface.set_line_width(self.radius * 2.0);
        surface.set_stroke_style(&self.style.fill_color);
        surface.stroke();
        surface.close_path();

        surface.set_text_align(TextAlign::Center);
        surface.set_text_baseline(TextBaseline::Middle);
        surface.set_font(&self.style.font);
        surface.set_fill_style(&self.style.glyph_fill);
        surface.set_stroke_style(&self.style.glyph_outline);
        surface.set_line_width(self.style.glyph_outline_width);
        let mut buf = [0u8; 4];
        for (pos, letter) in points.iter() {
            let Some(letter) = letter else { continue };
            let glyph = letter.encode_utf8(&mut buf);
            surface.stroke_text(glyph, *pos);
            surface.fill_text(glyph, *pos);
        }
        true
    }

    /// Quadratic curve through the midpoints between bodies, ending on the last one.
    fn trace_tube<S: Surface + ?Sized>(&self, surface: &mut S, points: &[(Vec2, Option<char>)]) {
        let last = points.len() - 1;
        surface.begin_path();
        surface.move_to(points[0].0);
        for i in 1..last {
            let control = points[i].0;
            surface.quadratic_curve_to(control, control.midpoint(points[i + 1].0));
        }
        surface.quadratic_curve_to(points[last].0, points[last].0);
    }
}
