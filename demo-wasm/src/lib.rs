use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, KeyboardEvent};
use wormtype::{
    Command, FrameOutcome, LineCap, LineJoin, Session, Surface, SurfaceSize, TextAlign, TextBaseline, Vec2,
    Viewport, WormConfig, WormError,
};

// ---- Canvas surface ----

/// A `<canvas>` element appended to the page body.
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn create(document: &Document, size: SurfaceSize) -> Option<Self> {
        let canvas: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        canvas.set_width(size.width as u32);
        canvas.set_height(size.height as u32);
        let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
        document.body()?.append_child(&canvas).ok()?;
        Some(CanvasSurface { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x as f64, p.y as f64);
    }

    fn quadratic_curve_to(&mut self, c: Vec2, p: Vec2) {
        self.ctx.quadratic_curve_to(c.x as f64, c.y as f64, p.x as f64, p.y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn set_line_width(&mut self, width: f32) {
        self.ctx.set_line_width(width as f64);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(match cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        });
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.ctx.set_line_join(match join {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        });
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ctx.set_text_baseline(match baseline {
            TextBaseline::Top => "top",
            TextBaseline::Middle => "middle",
            TextBaseline::Alphabetic => "alphabetic",
            TextBaseline::Bottom => "bottom",
        });
    }

    fn stroke_text(&mut self, text: &str, at: Vec2) {
        if let Err(e) = self.ctx.stroke_text(text, at.x as f64, at.y as f64) {
            web_sys::console::warn_1(&e);
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2) {
        if let Err(e) = self.ctx.fill_text(text, at.x as f64, at.y as f64) {
            web_sys::console::warn_1(&e);
        }
    }

    fn detach(&mut self) {
        self.canvas.remove();
    }
}

fn js_error(err: WormError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// ---- Input queue ----

/// Input waiting for the next frame, in arrival order.
#[derive(Clone, Debug, PartialEq)]
enum Pending {
    /// A DOM key name from `keyup`, parsed when applied.
    Key(String),
    /// An on-screen tap, already validated.
    Tap(Command),
}

/// Apply queued input in order and append what the session accepted to `text`.
fn apply_pending<S: Surface>(
    session: &mut Session<S>,
    pending: impl IntoIterator<Item = Pending>,
    text: &mut String,
    mut warn: impl FnMut(WormError),
) {
    for input in pending {
        let applied = match input {
            Pending::Key(key) => session.handle_key(&key),
            Pending::Tap(command) => session.apply(command),
        };
        match applied {
            Ok(Some(command)) => text.push(command.literal()),
            Ok(None) => {}
            Err(e) => warn(e),
        }
    }
}

// ---- Worm Demo ----

type KeyListener = Closure<dyn FnMut(KeyboardEvent)>;

/// The worm text input wired to the page: a canvas, a window `keyup` listener and
/// the transcript of accepted keystrokes.
#[wasm_bindgen]
pub struct WormDemo {
    session: Session<CanvasSurface>,
    text: String,
    pending: Rc<RefCell<Vec<Pending>>>,
    keyup: Option<KeyListener>,
}

#[wasm_bindgen]
impl WormDemo {
    /// Start a session filling a `width` x `height` viewport.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> Result<WormDemo, JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window.document().ok_or_else(|| JsValue::from_str("no document"))?;

        let session = Session::start(WormConfig::default(), Viewport::new(width, height), |size| {
            CanvasSurface::create(&document, size)
        })
        .map_err(js_error)?;

        // Keys and taps share one queue, applied on the next frame.
        let pending = Rc::new(RefCell::new(Vec::new()));
        let queue = Rc::clone(&pending);
        let keyup = KeyListener::wrap(Box::new(move |e: KeyboardEvent| {
            queue.borrow_mut().push(Pending::Key(e.key()));
        }));
        window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;

        Ok(WormDemo { session, text: String::new(), pending, keyup: Some(keyup) })
    }

    /// Apply queued input, advance by `dt` seconds and redraw. Returns `false` once
    /// torn down.
    pub fn frame(&mut self, dt: f32) -> bool {
        let pending: Vec<Pending> = self.pending.borrow_mut().drain(..).collect();
        apply_pending(&mut self.session, pending, &mut self.text, |e| {
            web_sys::console::warn_1(&js_error(e))
        });
        matches!(self.session.frame(dt), FrameOutcome::Rendered { .. })
    }

    /// A tap on the on-screen keyboard: a single character, `" "` or `"ENTER"`.
    ///
    /// Unknown tokens fail here. Valid taps are queued behind any keys already
    /// waiting and take effect on the next frame.
    pub fn virtual_key(&mut self, key: &str) -> Result<(), JsValue> {
        let command = Command::from_virtual_key(key).map_err(js_error)?;
        if self.session.is_running() {
            self.pending.borrow_mut().push(Pending::Tap(command));
        }
        Ok(())
    }

    /// Everything typed so far, including the spaces and newlines that broke chains.
    pub fn text(&self) -> String {
        self.text.clone()
    }

    /// Hand the transcript to the host and start a fresh one.
    pub fn submit(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        self.session.pointer_down(Vec2::new(x, y)).is_some()
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.session.pointer_move(Vec2::new(x, y));
    }

    pub fn pointer_up(&mut self) {
        self.session.pointer_up();
    }

    pub fn letter_count(&self) -> usize {
        self.session.chains().letter_count()
    }

    /// Remove the key listener and the canvas. Safe to call twice.
    pub fn teardown(&mut self) {
        if let Some(keyup) = self.keyup.take() {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .remove_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref());
            }
        }
        self.pending.borrow_mut().clear();
        self.session.teardown();
    }
}

impl Drop for WormDemo {
    fn drop(&mut self) {
        self.teardown();
    }
}
