#![deny(unsafe_code)]
//! Browser host for the constellation backdrop.
//!
//! [`CanvasSurface`] implements `Surface` over a `CanvasRenderingContext2d`
//! and [`AnimationFrameScheduler`] implements `FrameScheduler` over
//! `requestAnimationFrame`. [`ConstellationBackdrop`] wires both to a
//! `Simulation` and is what page scripts construct:
//!
//! ```js
//! const backdrop = new ConstellationBackdrop(
//!     canvas, window.innerWidth, window.innerHeight, '{"density_divisor": 15000}');
//! backdrop.start();
//! window.addEventListener('resize', () =>
//!     backdrop.notify_resize(window.innerWidth, window.innerHeight));
//! ```

use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;

use constellation_core::{
    FrameHandle, FrameScheduler, Rgba, SimError, Srgb, Surface, Xorshift64,
};
use constellation_network::{NetworkConfig, Simulation};
use tracing::{error, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

/// A `<canvas>` and its 2d context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquires the 2d context, failing with `SimError::SurfaceUnavailable`
    /// when the canvas cannot provide one.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SimError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| SimError::SurfaceUnavailable(format!("getContext failed: {e:?}")))?
            .ok_or_else(|| SimError::SurfaceUnavailable("canvas has no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SimError::SurfaceUnavailable("context is not 2d".into()))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(to_canvas_px(width));
        self.canvas.set_height(to_canvas_px(height));
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Srgb) {
        self.ctx.begin_path();
        if self.ctx.arc(cx, cy, radius, 0.0, TAU).is_err() {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_hex());
        self.ctx.fill();
    }

    fn stroke_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Rgba, width: f64) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width);
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        self.ctx.line_to(x1, y1);
        self.ctx.stroke();
    }
}

fn to_canvas_px(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// `requestAnimationFrame` behind the `FrameScheduler` trait.
///
/// One JS closure is registered for every frame; the id of the latest
/// request is kept in `pending` so the closure can hand it back.
pub struct AnimationFrameScheduler {
    window: Window,
    callback: Option<Closure<dyn FnMut(f64)>>,
    pending: Rc<Cell<i32>>,
}

impl AnimationFrameScheduler {
    fn new(window: Window) -> Self {
        Self {
            window,
            callback: None,
            pending: Rc::new(Cell::new(0)),
        }
    }
}

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, SimError> {
        let Some(callback) = &self.callback else {
            error!("frame requested before the callback was installed");
            return Err(SimError::SchedulerUnavailable(
                "frame callback not installed".into(),
            ));
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => {
                self.pending.set(id);
                Ok(FrameHandle(id as u64))
            }
            Err(e) => {
                error!(error = ?e, "requestAnimationFrame failed");
                Err(SimError::SchedulerUnavailable(format!(
                    "requestAnimationFrame failed: {e:?}"
                )))
            }
        }
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0 as i32) {
            warn!(error = ?e, "cancelAnimationFrame failed");
        }
    }
}

struct Host {
    sim: Simulation<CanvasSurface>,
    scheduler: AnimationFrameScheduler,
}

/// Particle-network backdrop bound to a canvas.
#[wasm_bindgen]
pub struct ConstellationBackdrop {
    host: Rc<RefCell<Host>>,
}

#[wasm_bindgen]
impl ConstellationBackdrop {
    /// Binds to `canvas`, sizes it to `width` x `height`, and seeds the
    /// field for that viewport. `params_json` is `"{}"` for defaults.
    ///
    /// Throws if the params are invalid or the canvas has no 2d context.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        width: f64,
        height: f64,
        params_json: &str,
    ) -> Result<ConstellationBackdrop, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let params: serde_json::Value = serde_json::from_str(params_json)
            .map_err(|e| JsValue::from_str(&format!("invalid params JSON: {e}")))?;
        let config = NetworkConfig::from_json(&params).map_err(to_js)?;
        let surface = CanvasSurface::new(canvas).map_err(to_js)?;
        let sim = Simulation::new(surface, width, height, &config, Xorshift64::new(js_seed()))
            .map_err(to_js)?;

        let host = Rc::new(RefCell::new(Host {
            sim,
            scheduler: AnimationFrameScheduler::new(window),
        }));

        let weak = Rc::downgrade(&host);
        let pending = Rc::clone(&host.borrow().scheduler.pending);
        let callback = Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
            let Some(host) = weak.upgrade() else {
                return;
            };
            let handle = FrameHandle(pending.get() as u64);
            let mut guard = host.borrow_mut();
            let Host { sim, scheduler } = &mut *guard;
            sim.on_frame(handle, scheduler);
        });
        host.borrow_mut().scheduler.callback = Some(callback);

        Ok(ConstellationBackdrop { host })
    }

    /// Throws if the browser refuses to schedule the first frame.
    pub fn start(&self) -> Result<(), JsValue> {
        let mut guard = self.host.borrow_mut();
        let Host { sim, scheduler } = &mut *guard;
        sim.start(scheduler).map_err(to_js)
    }

    pub fn stop(&self) {
        let mut guard = self.host.borrow_mut();
        let Host { sim, scheduler } = &mut *guard;
        sim.stop(scheduler);
    }

    pub fn notify_resize(&self, width: f64, height: f64) {
        self.host.borrow_mut().sim.notify_resize(width, height);
    }

    pub fn is_running(&self) -> bool {
        self.host.borrow().sim.is_running()
    }

    pub fn particle_count(&self) -> usize {
        self.host.borrow().sim.field().len()
    }
}

impl Drop for ConstellationBackdrop {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.host.try_borrow_mut() {
            let Host { sim, scheduler } = &mut *guard;
            sim.stop(scheduler);
        }
    }
}

fn to_js(e: SimError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// `SystemTime` is unavailable on wasm32-unknown-unknown, so seed from
/// `Math.random()` instead.
fn js_seed() -> u64 {
    let hi = (js_sys::Math::random() * u32::MAX as f64) as u64;
    let lo = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (hi << 32) | lo
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_px_rounds_and_clamps() {
        assert_eq!(to_canvas_px(1399.6), 1400);
        assert_eq!(to_canvas_px(-20.0), 0);
        assert_eq!(to_canvas_px(f64::NAN), 0);
        assert_eq!(to_canvas_px(f64::INFINITY), 0);
    }
}
