//! Canvas2D surface.
//!
//! Wraps the page's `<canvas>` as both the [`DrawingSurface`] the grid is
//! sized against and the [`Renderer`] the stage paints through.

use kurbo::Point;
use std::f64::consts::TAU;
use swash_core::{CanvasSize, Color, DrawingSurface, Renderer};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: Option<CanvasRenderingContext2d>,
    /// Last fill and its CSS string, so a frame of same-colored circles
    /// formats the color once.
    fill_css: Option<(Color, String)>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if context.is_none() {
            log::warn!("canvas has no 2d context");
        }
        Self {
            canvas,
            context,
            fill_css: None,
        }
    }

    fn css_for(&mut self, fill: Color) -> &str {
        let stale = !matches!(&self.fill_css, Some((cached, _)) if *cached == fill);
        if stale {
            self.fill_css = Some((fill, fill.to_css()));
        }
        self.fill_css.as_ref().map_or("", |(_, css)| css.as_str())
    }
}

impl DrawingSurface for CanvasSurface {
    fn size(&self) -> CanvasSize {
        CanvasSize::new(self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn set_width(&mut self, width: f64) {
        self.canvas.set_width(width.max(0.0).round() as u32);
    }

    fn is_attached(&self) -> bool {
        self.context.is_some() && self.canvas.is_connected()
    }
}

impl Renderer for CanvasSurface {
    fn clear(&mut self, size: CanvasSize) {
        if let Some(ctx) = &self.context {
            ctx.clear_rect(0.0, 0.0, size.width, size.height);
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, fill: Color) {
        let Some(ctx) = self.context.clone() else {
            return;
        };
        let css = self.css_for(fill);
        ctx.set_fill_style_str(css);
        ctx.begin_path();
        if ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
            ctx.fill();
        }
    }
}
