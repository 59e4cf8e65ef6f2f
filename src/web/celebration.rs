//! Drives the celebration sequencer from animation frames and hands each
//! burst to `window.confetti` (canvas-confetti).

use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{AnimationFrame, request_animation_frame};
use js_sys::{Array, Object, Reflect};
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::celebration::{Burst, CelebrationSequencer, Shape};

/// Receives every burst the sequencer releases.
pub type BurstSink = Box<dyn FnMut(&Burst)>;

struct Run {
    sequencer: CelebrationSequencer,
    sink: BurstSink,
    frame: Option<AnimationFrame>,
}

/// Running celebration. All pending work is cancelled when this is dropped,
/// so nothing fires after the view that owns it goes away.
pub struct CelebrationEffects {
    run: Rc<RefCell<Run>>,
}

impl CelebrationEffects {
    /// Start against the page's confetti library.
    pub fn start() -> Self {
        Self::start_with(Box::new(fire_confetti))
    }

    /// Start with a custom sink. Nothing is emitted before the first
    /// animation frame.
    pub fn start_with(sink: BurstSink) -> Self {
        let run = Rc::new(RefCell::new(Run {
            sequencer: CelebrationSequencer::new(),
            sink,
            frame: None,
        }));
        schedule(&run);
        Self { run }
    }

    pub fn is_finished(&self) -> bool {
        self.run.borrow().sequencer.is_finished()
    }
}

impl Drop for CelebrationEffects {
    fn drop(&mut self) {
        if let Ok(mut run) = self.run.try_borrow_mut() {
            run.sequencer.cancel();
            run.frame.take();
            debug!("celebration effects torn down");
        }
    }
}

fn schedule(run: &Rc<RefCell<Run>>) {
    let weak = Rc::downgrade(run);
    let handle = request_animation_frame(move |ts| {
        let Some(run) = weak.upgrade() else { return };
        let finished = {
            let mut guard = run.borrow_mut();
            let r = &mut *guard;
            r.frame.take();
            for burst in r.sequencer.advance(ts) {
                (r.sink)(&burst);
            }
            r.sequencer.is_finished()
        };
        if !finished {
            schedule(&run);
        }
    });
    run.borrow_mut().frame = Some(handle);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window, js_name = confetti, catch)]
    fn confetti_js(options: &JsValue) -> Result<JsValue, JsValue>;
}

fn set(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

/// canvas-confetti option object for one burst.
fn burst_options(burst: &Burst) -> Object {
    let opts = Object::new();
    set(&opts, "particleCount", burst.particle_count.into());
    set(&opts, "angle", burst.angle.into());
    set(&opts, "spread", burst.spread.into());

    if burst.origin_x.is_some() || burst.origin_y.is_some() {
        let origin = Object::new();
        if let Some(x) = burst.origin_x {
            set(&origin, "x", x.into());
        }
        if let Some(y) = burst.origin_y {
            set(&origin, "y", y.into());
        }
        set(&opts, "origin", origin.into());
    }

    let colors: Array = burst.colors.iter().map(|c| JsValue::from_str(c)).collect();
    set(&opts, "colors", colors.into());
    if burst.shape == Shape::Heart {
        let shapes = Array::of1(&JsValue::from_str("heart"));
        set(&opts, "shapes", shapes.into());
    }
    opts
}

fn fire_confetti(burst: &Burst) {
    let present = web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str("confetti")).unwrap_or(false))
        .unwrap_or(false);
    if !present {
        return;
    }
    let opts = burst_options(burst);
    if let Err(err) = confetti_js(&opts) {
        debug!(?err, "confetti call failed");
    }
}
