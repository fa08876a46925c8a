//! Browser host
//!
//! `GridRunner` is the handle the page holds. Mounting attaches to a canvas,
//! loads the high score and settings from LocalStorage and paints the START
//! screen. The animation-frame loop only runs while a run is PLAYING;
//! unmounting cancels the pending frame and removes every listener.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, HtmlCanvasElement, HtmlElement, KeyboardEvent, PointerEvent};

use super::{FrameLoop, MountError};
use crate::input::{is_steering_pointer, is_text_entry};
use crate::persistence::LocalStore;
use crate::renderer::{CanvasSurface, FrameRenderer, FrameView, Palette};
use crate::screen::{FrameOutcome, Screen, ScreenController};
use crate::settings::Settings;
use crate::sim::Viewport;
use crate::tuning::Tuning;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Everything the frame and input callbacks share
struct Host {
    controller: ScreenController<LocalStore>,
    renderer: FrameRenderer,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
    settings: Settings,
    frames: FrameLoop,
    on_run_ended: Option<js_sys::Function>,
}

impl Host {
    /// Re-derive the viewport from the live canvas size
    fn sync_viewport(&mut self) -> Viewport {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let css_w = self.canvas.client_width().max(1);
        let css_h = self.canvas.client_height().max(1);
        let px_w = (css_w as f64 * dpr) as u32;
        let px_h = (css_h as f64 * dpr) as u32;
        if self.canvas.width() != px_w || self.canvas.height() != px_h {
            self.canvas.set_width(px_w);
            self.canvas.set_height(px_h);
        }
        self.surface.set_scale(dpr);
        Viewport::new(css_w as f32, css_h as f32)
    }

    fn paint(&mut self, viewport: Viewport, time: f64) {
        let lane_count = self.controller.tuning().lane_count;
        let view = FrameView::from_controller(&self.controller, lane_count, &self.settings);
        self.renderer
            .draw(&mut self.surface, &view, viewport, &self.settings, time);
    }

    fn paint_idle(&mut self) {
        let viewport = self.sync_viewport();
        let now = js_sys::Date::now();
        self.paint(viewport, now);
    }

    /// One animation frame
    fn on_frame(&mut self, time: f64) -> FrameOutcome {
        let Some(token) = self.frames.token() else {
            return FrameOutcome::Stale;
        };
        let viewport = self.sync_viewport();
        let outcome = self.controller.frame(token, time, viewport);
        self.paint(viewport, time);

        match outcome {
            FrameOutcome::Continue => {}
            FrameOutcome::Ended {
                final_score,
                new_record,
            } => {
                self.frames.finish();
                if new_record {
                    log::info!("Run over with a new record: {}", final_score);
                }
            }
            FrameOutcome::Stale => self.frames.finish(),
        }
        outcome
    }

}

fn cancel_frame(id: i32) {
    if let Some(window) = web_sys::window() {
        let _ = window.cancel_animation_frame(id);
    }
}

/// Key events aimed at a form field on the page
fn targets_text_entry(event: &web_sys::Event) -> bool {
    let Some(target) = event.target() else {
        return false;
    };
    let Some(element) = target.dyn_ref::<Element>() else {
        return false;
    };
    let editable = element
        .dyn_ref::<HtmlElement>()
        .is_some_and(|el| el.is_content_editable());
    is_text_entry(&element.tag_name(), editable)
}

/// A DOM listener removed when dropped
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl Listener {
    fn attach(
        target: EventTarget,
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target,
            event,
            closure,
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

fn request_frame(frame_cb: &FrameCallback) -> Option<i32> {
    let window = web_sys::window()?;
    let cb = frame_cb.borrow();
    let closure = cb.as_ref()?;
    window
        .request_animation_frame(closure.as_ref().unchecked_ref())
        .ok()
}

fn start_run(host: &Rc<RefCell<Host>>, frame_cb: &FrameCallback) {
    let started = {
        let mut guard = host.borrow_mut();
        let h = &mut *guard;
        let seed = js_sys::Date::now() as u64;
        h.frames.begin(&mut h.controller, seed, cancel_frame)
    };
    if started {
        let id = request_frame(frame_cb);
        host.borrow_mut().frames.scheduled(id);
    }
}

/// Mounted game instance
#[wasm_bindgen]
pub struct GridRunner {
    host: Rc<RefCell<Host>>,
    frame_cb: FrameCallback,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl GridRunner {
    /// Attach to the canvas with id `canvas_id` and paint the START screen
    pub fn mount(canvas_id: &str) -> Result<GridRunner, JsValue> {
        console_error_panic_hook::set_once();
        // A second mount on the same page keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);

        Self::try_mount(canvas_id, Tuning::default()).map_err(mount_failed)
    }

    /// Mount with a (possibly partial) JSON tuning document
    pub fn mount_with_tuning(canvas_id: &str, tuning_json: &str) -> Result<GridRunner, JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        Tuning::from_json(tuning_json)
            .map_err(MountError::from)
            .and_then(|tuning| Self::try_mount(canvas_id, tuning))
            .map_err(mount_failed)
    }

    /// Start or restart a run (no-op while one is playing or after unmount)
    pub fn start(&self) {
        start_run(&self.host, &self.frame_cb);
    }

    pub fn high_score(&self) -> f64 {
        self.host.borrow().controller.high_score() as f64
    }

    /// Final score of the last finished run
    pub fn last_score(&self) -> Option<f64> {
        match self.host.borrow().controller.screen() {
            Screen::GameOver { final_score } => Some(final_score as f64),
            _ => None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.host.borrow().controller.is_playing()
    }

    /// Register `callback(final_score)` for the end of every run
    pub fn on_run_ended(&self, callback: js_sys::Function) {
        self.host.borrow_mut().on_run_ended = Some(callback);
    }

    /// Start runs from a button
    pub fn bind_start_button(&mut self, button_id: &str) -> bool {
        let Some(button) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(button_id))
        else {
            log::warn!("Start button `{}` not found", button_id);
            return false;
        };
        let host = self.host.clone();
        let frame_cb = self.frame_cb.clone();
        self.listeners.push(Listener::attach(button.into(), "click", move |_| {
            start_run(&host, &frame_cb);
        }));
        true
    }

    /// Replace settings and persist them
    pub fn set_settings(&self, particles: bool, reduced_motion: bool, show_fps: bool) {
        let mut h = self.host.borrow_mut();
        h.settings = Settings {
            particles,
            reduced_motion,
            show_fps,
        };
        let settings = h.settings.clone();
        settings.save(h.controller.store_mut());
        if !h.controller.is_playing() {
            h.paint_idle();
        }
    }

    /// Stop the loop and remove all listeners
    pub fn unmount(&mut self) {
        {
            let mut h = self.host.borrow_mut();
            h.frames.detach(cancel_frame);
            h.controller.stop();
        }
        self.listeners.clear();
        // Breaks the host <-> frame closure cycle
        self.frame_cb.borrow_mut().take();
        log::info!("Grid Runner unmounted");
    }
}

impl GridRunner {
    fn try_mount(canvas_id: &str, tuning: Tuning) -> Result<Self, MountError> {
        let window = web_sys::window().ok_or(MountError::NoWindow)?;
        let document = window.document().ok_or(MountError::NoWindow)?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| MountError::ElementNotFound(canvas_id.to_string()))?
            .dyn_into()
            .map_err(|_| MountError::NotACanvas(canvas_id.to_string()))?;
        let surface = CanvasSurface::from_canvas(&canvas).ok_or(MountError::NoContext)?;

        let store = LocalStore::open();
        let settings = Settings::load(&store);
        let host = Rc::new(RefCell::new(Host {
            controller: ScreenController::new(store, tuning),
            renderer: FrameRenderer::new(Palette::default()),
            surface,
            canvas: canvas.clone(),
            settings,
            frames: FrameLoop::new(),
            on_run_ended: None,
        }));

        let frame_cb: FrameCallback = Rc::new(RefCell::new(None));
        {
            let host = host.clone();
            let next = frame_cb.clone();
            *frame_cb.borrow_mut() = Some(Closure::new(move |time: f64| {
                let outcome = host.borrow_mut().on_frame(time);
                let id = match outcome {
                    FrameOutcome::Continue => request_frame(&next),
                    _ => None,
                };
                host.borrow_mut().frames.scheduled(id);

                // Called with no borrow held so the page may restart or unmount
                if let FrameOutcome::Ended { final_score, .. } = outcome {
                    let callback = host.borrow().on_run_ended.clone();
                    if let Some(callback) = callback {
                        let _ = callback.call1(&JsValue::NULL, &JsValue::from_f64(final_score as f64));
                    }
                }
            }));
        }

        let mut listeners = Vec::new();

        // Keyboard: lane shifts while playing, Space/Enter to (re)start otherwise
        {
            let host = host.clone();
            let frame_cb = frame_cb.clone();
            listeners.push(Listener::attach(window.clone().into(), "keydown", move |event| {
                if targets_text_entry(&event) {
                    return;
                }
                let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                let key = event.key();
                let playing = host.borrow().controller.is_playing();
                if playing {
                    if host.borrow_mut().controller.on_key(&key, event.repeat()) {
                        event.prevent_default();
                    }
                } else if matches!(key.as_str(), " " | "Enter") && !event.repeat() {
                    event.prevent_default();
                    start_run(&host, &frame_cb);
                }
            }));
        }

        // Pointer (mouse, touch, pen): bisect at the canvas midpoint
        {
            let host = host.clone();
            listeners.push(Listener::attach(canvas.clone().into(), "pointerdown", move |event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                if !is_steering_pointer(event.is_primary(), event.button()) {
                    return;
                }
                let mut h = host.borrow_mut();
                let viewport = Viewport::new(h.canvas.client_width() as f32, h.canvas.client_height() as f32);
                if h.controller.on_pointer(event.offset_x() as f32, &viewport) {
                    event.prevent_default();
                }
            }));
        }

        // Idle screens need a repaint when the layout changes
        {
            let host = host.clone();
            listeners.push(Listener::attach(window.into(), "resize", move |_| {
                let mut h = host.borrow_mut();
                if !h.controller.is_playing() {
                    h.paint_idle();
                }
            }));
        }

        host.borrow_mut().paint_idle();
        log::info!("Grid Runner mounted on #{}", canvas_id);

        Ok(Self {
            host,
            frame_cb,
            listeners,
        })
    }
}

impl Drop for GridRunner {
    fn drop(&mut self) {
        if !self.host.borrow().frames.is_detached() {
            self.unmount();
        }
    }
}

fn mount_failed(e: MountError) -> JsValue {
    log::error!("Grid Runner failed to mount: {}", e);
    JsValue::from_str(&e.to_string())
}
