//! WASM bridge for swash: runs the circle background and the page-ready
//! helpers in the browser.
//!
//! Compiled via `wasm-pack build --target web` and loaded by the site's
//! pages. Everything runs on the page's single UI thread; listeners and the
//! animation-frame loop live as long as the page.

mod page;
mod render2d;

use render2d::CanvasSurface;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use swash_core::{
    CanvasSize, DrawingSurface, GridAnimator, GridConfig, PageInitializer, PatternLayout, Stage,
    SwashError,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, DocumentReadyState, HtmlCanvasElement, Window};

/// Id of the element the background is drawn on.
const CANVAS_ID: &str = "canvas";

thread_local! {
    static READY: RefCell<PageInitializer<Document>> = RefCell::new(PageInitializer::new());
    static LOADED: Cell<bool> = const { Cell::new(false) };
}

type FrameCallback = Closure<dyn FnMut(f64)>;

// ─── Entry points ────────────────────────────────────────────────────────

/// Module start: logging, built-in ready callbacks, and the `load` hook.
/// A module instantiated after `load` already fired runs the hook at once.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook_setup();
    console_log::init_with_level(log::Level::Info).ok();

    READY.with(|ready| {
        let mut ready = ready.borrow_mut();
        ready.register(|doc: &mut Document| {
            page::color_featured_projects(doc);
        });
        ready.register(|doc: &mut Document| {
            page::fix_targets(doc);
        });
    });

    let window = web_sys::window().ok_or_else(|| to_js(missing("window")))?;
    let document = window.document().ok_or_else(|| to_js(missing("document")))?;
    if already_loaded(document.ready_state()) {
        return on_load();
    }

    let load_cb = Closure::once(on_load);
    window.add_event_listener_with_callback("load", load_cb.as_ref().unchecked_ref())?;
    load_cb.forget();
    Ok(())
}

/// Register a JS callback to run once the page has loaded. After the load
/// step it runs immediately.
#[wasm_bindgen]
pub fn on_ready(callback: js_sys::Function) {
    let run = move || {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            log::error!("ready callback threw: {e:?}");
        }
    };
    if LOADED.with(Cell::get) {
        run();
        return;
    }
    READY.with(|ready| {
        ready.borrow_mut().register(move |_doc: &mut Document| run());
    });
}

/// Start the circle background on `#canvas`.
#[wasm_bindgen]
pub fn init_grid() -> Result<(), JsValue> {
    install_grid().map_err(to_js)
}

/// JSON summary of the pattern for a given canvas size.
#[wasm_bindgen]
pub fn describe_pattern(width: f64, height: f64) -> Result<String, JsValue> {
    let summary = PatternSummary::new(CanvasSize::new(width, height), &GridConfig::default());
    serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ─── Load ────────────────────────────────────────────────────────────────

/// `load` has fired once the document reports `complete`.
fn already_loaded(state: DocumentReadyState) -> bool {
    state == DocumentReadyState::Complete
}

fn on_load() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| to_js(missing("document")))?;

    LOADED.with(|loaded| loaded.set(true));
    // Taken out so a callback registering another callback does not
    // re-enter the borrow.
    let mut ready = READY.with(|ready| std::mem::take(&mut *ready.borrow_mut()));
    let mut doc = document.clone();
    ready.run_all(&mut doc);

    if document.get_element_by_id(CANVAS_ID).is_some() {
        init_grid()?;
    }
    Ok(())
}

fn install_grid() -> swash_core::Result<()> {
    let window = web_sys::window().ok_or(missing("window"))?;
    let document = window.document().ok_or(missing("document"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or(missing("#canvas"))?;

    let mut surface = CanvasSurface::new(canvas);
    let mut stage = Stage::new(surface.size());
    let animator = GridAnimator::initialize(&mut surface, viewport_width(&window), Some(&mut stage))?;
    stage.set_size(surface.size());

    let surface = Rc::new(RefCell::new(surface));
    let stage = Rc::new(RefCell::new(stage));

    install_resize(&window, animator, surface.clone(), stage.clone())?;
    install_visibility(&document, stage.clone())?;
    install_frames(&window, surface, stage)
}

// ─── Listeners ───────────────────────────────────────────────────────────

fn install_resize(
    window: &Window,
    animator: GridAnimator,
    surface: Rc<RefCell<CanvasSurface>>,
    stage: Rc<RefCell<Stage>>,
) -> swash_core::Result<()> {
    let win = window.clone();
    let on_resize = Closure::wrap(Box::new(move || {
        let mut surface = surface.borrow_mut();
        animator.resize(&mut *surface, viewport_width(&win));
        stage.borrow_mut().set_size(surface.size());
    }) as Box<dyn FnMut()>);
    window
        .add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())
        .map_err(dom)?;
    on_resize.forget();
    Ok(())
}

/// Hidden tabs pause the ticker so the tween does not jump on return.
fn install_visibility(document: &Document, stage: Rc<RefCell<Stage>>) -> swash_core::Result<()> {
    let doc = document.clone();
    let on_visibility = Closure::wrap(Box::new(move || {
        let hidden = doc.hidden();
        log::debug!("page hidden: {hidden}");
        stage.borrow_mut().ticker.set_paused(hidden);
    }) as Box<dyn FnMut()>);
    document
        .add_event_listener_with_callback("visibilitychange", on_visibility.as_ref().unchecked_ref())
        .map_err(dom)?;
    on_visibility.forget();
    Ok(())
}

/// Animation-frame loop. The stage's ticker decides which frames
/// actually advance and redraw.
fn install_frames(
    window: &Window,
    surface: Rc<RefCell<CanvasSurface>>,
    stage: Rc<RefCell<Stage>>,
) -> swash_core::Result<()> {
    let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let win = window.clone();

    *slot.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
        stage.borrow_mut().frame(now, &mut *surface.borrow_mut());
        if let Some(cb) = next.borrow().as_ref()
            && let Err(e) = request_frame(&win, cb)
        {
            log::error!("animation frame not scheduled: {e:?}");
        }
    }) as Box<dyn FnMut(f64)>));

    match slot.borrow().as_ref() {
        Some(cb) => request_frame(window, cb).map(|_| ()).map_err(dom),
        None => Ok(()),
    }
}

fn request_frame(window: &Window, cb: &FrameCallback) -> Result<i32, JsValue> {
    window.request_animation_frame(cb.as_ref().unchecked_ref())
}

// ─── Helpers ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct PatternSummary {
    rows: usize,
    circles_per_row: usize,
    circles: usize,
    width: f64,
    height: f64,
    origin: (f64, f64),
}

impl PatternSummary {
    fn new(canvas: CanvasSize, config: &GridConfig) -> Self {
        let layout = PatternLayout::for_canvas(canvas, config);
        Self {
            rows: layout.rows,
            circles_per_row: layout.circles_per_row,
            circles: layout.circle_count(),
            width: canvas.width,
            height: canvas.height,
            origin: (layout.origin.x, layout.origin.y),
        }
    }
}

fn viewport_width(window: &Window) -> f64 {
    window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or_default()
}

fn missing(name: &'static str) -> SwashError {
    SwashError::MissingRuntimeDependency { name }
}

fn dom(e: JsValue) -> SwashError {
    SwashError::Dom(format!("{e:?}"))
}

fn to_js(err: SwashError) -> JsValue {
    log::error!("{err}");
    js_sys::Error::new(&err.to_string()).into()
}

/// Set up a panic hook that logs to the browser console.
fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("swash panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_matches_layout() {
        let summary = PatternSummary::new(CanvasSize::new(800.0, 400.0), &GridConfig::default());
        assert_eq!(summary.rows, 14);
        assert_eq!(summary.circles_per_row, 27);
        assert_eq!(summary.circles, 378);
        assert_eq!(summary.origin, (-400.0, -200.0));
    }

    #[test]
    fn only_a_complete_document_counts_as_loaded() {
        assert!(already_loaded(DocumentReadyState::Complete));
        assert!(!already_loaded(DocumentReadyState::Interactive));
        assert!(!already_loaded(DocumentReadyState::Loading));
    }

    #[test]
    fn summary_serializes() {
        let summary = PatternSummary::new(CanvasSize::new(60.0, 30.0), &GridConfig::default());
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(
            json,
            r#"{"rows":1,"circles_per_row":2,"circles":2,"width":60.0,"height":30.0,"origin":[-30.0,-15.0]}"#
        );
    }
}
