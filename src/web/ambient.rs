//! Background layer: gradient, static ornaments and the particle canvas.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use rand::rngs::ThreadRng;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlImageElement};

use super::dom;
use crate::ambient::{ORNAMENTS, ParticleField, ParticleKind};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::proposal::Viewport;

struct Sprites {
    heart: HtmlImageElement,
    sparkle: HtmlImageElement,
    loaded: u8,
    failed: bool,
}

struct CanvasLoop {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    sprites: Sprites,
    field: ParticleField,
    viewport: Viewport,
    rng: ThreadRng,
    frame: Option<AnimationFrame>,
    spacing: f64,
    cap: usize,
}

/// Owns every resource of the background. Dropping it cancels the frame
/// loop, deregisters the resize listener and removes the DOM subtree.
pub struct AmbientLayer {
    root: HtmlElement,
    state: Rc<RefCell<CanvasLoop>>,
    _listeners: Vec<EventListener>,
}

impl AmbientLayer {
    pub fn mount(doc: &Document, parent: &HtmlElement, cfg: &AppConfig) -> Result<Self, AppError> {
        let root = dom::el(doc, "div", "vp-backdrop", None)?;
        let gradient = dom::el(doc, "div", "vp-backdrop-gradient", None)?;
        let glow = dom::el(doc, "div", "vp-backdrop-glow", None)?;
        let canvas: HtmlCanvasElement = doc
            .create_element("canvas")?
            .dyn_into()
            .map_err(|_| AppError::Dom("canvas element".to_string()))?;
        canvas.set_class_name("vp-canvas");
        dom::append(&root, &[&gradient, &glow])?;
        root.append_child(&canvas)?;

        for ornament in ORNAMENTS {
            let node = dom::img(doc, &cfg.asset(ornament.asset), "vp-ornament")?;
            node.set_id(ornament.id);
            node.set_attribute("style", &ornament.style())?;
            node.set_attribute("decoding", "async")?;
            root.append_child(&node)?;
        }
        parent.append_child(&root)?;

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| AppError::Dom("2d context unavailable".to_string()))?
            .dyn_into()
            .map_err(|_| AppError::Dom("2d context has unexpected type".to_string()))?;

        let heart = HtmlImageElement::new()?;
        let sparkle = HtmlImageElement::new()?;

        let state = Rc::new(RefCell::new(CanvasLoop {
            canvas,
            ctx,
            sprites: Sprites { heart: heart.clone(), sparkle: sparkle.clone(), loaded: 0, failed: false },
            field: ParticleField::default(),
            viewport: dom::viewport(),
            rng: rand::thread_rng(),
            frame: None,
            spacing: cfg.ambient_particle_spacing,
            cap: cfg.max_ambient_particles,
        }));
        state.borrow_mut().resize();

        let mut listeners = Vec::new();
        let window = dom::window()?;
        let weak = Rc::downgrade(&state);
        listeners.push(EventListener::new(&window, "resize", move |_| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().resize();
            }
        }));

        for image in [&heart, &sparkle] {
            let weak = Rc::downgrade(&state);
            listeners.push(EventListener::once(image, "load", move |_| on_sprite_loaded(&weak)));
            let weak = Rc::downgrade(&state);
            listeners.push(EventListener::once(image, "error", move |_| {
                if let Some(state) = weak.upgrade() {
                    warn!("particle sprite failed to load; background stays static");
                    state.borrow_mut().sprites.failed = true;
                }
            }));
        }
        // Listeners first so a cached image cannot load before we listen.
        heart.set_src(&cfg.asset(ParticleKind::Heart.asset()));
        sparkle.set_src(&cfg.asset(ParticleKind::Sparkle.asset()));

        Ok(Self { root, state, _listeners: listeners })
    }
}

impl Drop for AmbientLayer {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.try_borrow_mut() {
            state.frame.take();
        }
        self.root.remove();
    }
}

fn on_sprite_loaded(weak: &Weak<RefCell<CanvasLoop>>) {
    let Some(state) = weak.upgrade() else { return };
    let ready = {
        let mut st = state.borrow_mut();
        st.sprites.loaded += 1;
        st.sprites.loaded == 2 && !st.sprites.failed && st.frame.is_none()
    };
    if ready {
        {
            let mut st = state.borrow_mut();
            let (viewport, spacing, cap) = (st.viewport, st.spacing, st.cap);
            let field = ParticleField::generate(viewport, spacing, cap, &mut st.rng);
            st.field = field;
            debug!(particles = st.field.len(), "ambient particle loop starting");
        }
        schedule_frame(&state);
    }
}

fn schedule_frame(state: &Rc<RefCell<CanvasLoop>>) {
    let weak = Rc::downgrade(state);
    let handle = request_animation_frame(move |ts| {
        let Some(state) = weak.upgrade() else { return };
        state.borrow_mut().frame.take();
        state.borrow_mut().draw(ts);
        schedule_frame(&state);
    });
    state.borrow_mut().frame = Some(handle);
}

impl CanvasLoop {
    fn resize(&mut self) {
        let Some(win) = web_sys::window() else { return };
        let dpr = win.device_pixel_ratio().max(1.0);
        self.viewport = dom::viewport();
        self.canvas.set_width((self.viewport.width * dpr) as u32);
        self.canvas.set_height((self.viewport.height * dpr) as u32);
        let style = format!("width:{}px;height:{}px;", self.viewport.width, self.viewport.height);
        let _ = self.canvas.set_attribute("style", &style);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    fn draw(&mut self, now_ms: f64) {
        let vp = self.viewport;
        self.ctx.clear_rect(0.0, 0.0, vp.width, vp.height);
        self.field.step(now_ms, vp, &mut self.rng);

        for p in self.field.particles() {
            let image = match p.kind {
                ParticleKind::Heart => &self.sprites.heart,
                ParticleKind::Sparkle => &self.sprites.sparkle,
            };
            if !image.complete() || image.natural_width() == 0 {
                continue;
            }
            self.ctx.save();
            self.ctx.set_global_alpha(p.opacity);
            let drawn = self
                .ctx
                .translate(p.x, p.y)
                .and_then(|_| self.ctx.rotate(p.rotation))
                .and_then(|_| {
                    self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        -p.size / 2.0,
                        -p.size / 2.0,
                        p.size,
                        p.size,
                    )
                });
            self.ctx.restore();
            if drawn.is_err() {
                break;
            }
        }
    }
}
