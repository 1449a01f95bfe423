#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use wormtype::{LineCap, LineJoin, Surface, SurfaceSize, TextAlign, TextBaseline, Vec2};

/// Every call a renderer made, in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Clear,
    Save,
    Restore,
    BeginPath,
    MoveTo(Vec2),
    QuadraticCurveTo(Vec2, Vec2),
    ClosePath,
    LineWidth(f32),
    LineCap(LineCap),
    LineJoin(LineJoin),
    StrokeStyle(String),
    FillStyle(String),
    Stroke,
    Font(String),
    TextAlign(TextAlign),
    TextBaseline(TextBaseline),
    StrokeText(String, Vec2),
    FillText(String, Vec2),
    Detach,
}

/// Route library logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<Call>,
    pub size: Option<SurfaceSize>,
    /// Shared with the test so detaches stay observable after the surface is dropped.
    pub detach_count: Rc<Cell<u32>>,
}

impl RecordingSurface {
    pub fn sized(size: SurfaceSize) -> Self {
        RecordingSurface { size: Some(size), ..Default::default() }
    }

    pub fn counting_detach(mut self, counter: Rc<Cell<u32>>) -> Self {
        self.detach_count = counter;
        self
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::FillText(t, _) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) { self.calls.push(Call::Clear); }
    fn save(&mut self) { self.calls.push(Call::Save); }
    fn restore(&mut self) { self.calls.push(Call::Restore); }
    fn begin_path(&mut self) { self.calls.push(Call::BeginPath); }
    fn move_to(&mut self, point: Vec2) { self.calls.push(Call::MoveTo(point)); }
    fn quadratic_curve_to(&mut self, control: Vec2, end: Vec2) {
        self.calls.push(Call::QuadraticCurveTo(control, end));
    }
    fn close_path(&mut self) { self.calls.push(Call::ClosePath); }
    fn set_line_width(&mut self, width: f32) { self.calls.push(Call::LineWidth(width)); }
    fn set_line_cap(&mut self, cap: LineCap) { self.calls.push(Call::LineCap(cap)); }
    fn set_line_join(&mut self, join: LineJoin) { self.calls.push(Call::LineJoin(join)); }
    fn set_stroke_style(&mut self, color: &str) { self.calls.push(Call::StrokeStyle(color.to_string())); }
    fn set_fill_style(&mut self, color: &str) { self.calls.push(Call::FillStyle(color.to_string())); }
    fn stroke(&mut self) { self.calls.push(Call::Stroke); }
    fn set_font(&mut self, font: &str) { self.calls.push(Call::Font(font.to_string())); }
    fn set_text_align(&mut self, align: TextAlign) { self.calls.push(Call::TextAlign(align)); }
    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.calls.push(Call::TextBaseline(baseline));
    }
    fn stroke_text(&mut self, text: &str, at: Vec2) {
        self.calls.push(Call::StrokeText(text.to_string(), at));
    }
    fn fill_text(&mut self, text: &str, at: Vec2) {
        self.calls.push(Call::FillText(text.to_string(), at));
    }
    fn detach(&mut self) {
        self.detach_count.set(self.detach_count.get() + 1);
        self.calls.push(Call::Detach);
    }
}
