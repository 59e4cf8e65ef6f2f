//! Browser glue: builds the page, wires listeners and swaps views.
//!
//! Everything mounted here hangs off one [`ValentineApp`] handle. Listener
//! closures only hold weak references, so dropping the handle (or calling
//! `unmount`) releases every timer, frame and listener and removes the DOM.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use rand::rngs::ThreadRng;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, UrlSearchParams};

mod ambient;
mod celebration;
mod dom;

pub use ambient::AmbientLayer;
pub use celebration::{BurstSink, CelebrationEffects};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::logging;
use crate::proposal::{Mood, ProposalState, Tuning};
use crate::recipient;

/// Handle returned to JS by `start_app`.
#[wasm_bindgen]
pub struct ValentineApp {
    inner: Option<Rc<RefCell<Inner>>>,
}

#[wasm_bindgen]
impl ValentineApp {
    /// Tear everything down. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.inner.take().is_some() {
            info!("valentine app unmounted");
        }
    }

    pub fn rejection_count(&self) -> u32 {
        self.inner.as_ref().map(|i| i.borrow().state.rejection_count()).unwrap_or(0)
    }

    pub fn accepted(&self) -> bool {
        self.inner.as_ref().map(|i| i.borrow().state.is_accepted()).unwrap_or(false)
    }

    pub fn recipient(&self) -> String {
        self.inner.as_ref().map(|i| i.borrow().name.clone()).unwrap_or_default()
    }
}

impl ValentineApp {
    pub fn mount(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        logging::init(config.tracing_level()?);

        let doc = dom::document()?;
        dom::ensure_stylesheet(&doc)?;
        let name = recipient::normalize_name(query_name().as_deref(), &config.default_name);

        let shell = Shell::mount(&doc)?;
        let ambient = match AmbientLayer::mount(&doc, &shell.root, &config) {
            Ok(layer) => Some(layer),
            Err(err) => {
                // decoration only; the card must still work
                warn!(%err, "ambient layer unavailable");
                None
            }
        };

        let inner = Rc::new_cyclic(|weak| {
            RefCell::new(Inner {
                this: weak.clone(),
                state: ProposalState::new(Tuning::from(&config)),
                config,
                name,
                hovered: false,
                rng: rand::thread_rng(),
                doc,
                view: None,
                pending_swap: None,
                _ambient: ambient,
                shell,
            })
        });
        {
            let mut guard = inner.borrow_mut();
            let view = ProposalView::mount(&guard)?;
            guard.view = Some(View::Proposal(view));
            guard.render();
            info!(recipient = %guard.name, "valentine app mounted");
        }
        Ok(Self { inner: Some(inner) })
    }
}

fn query_name() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    let raw = UrlSearchParams::new_with_str(&search).ok()?.get("name")?;
    // URLSearchParams already decoded once; a second pass handles double-encoded links.
    match js_sys::decode_uri_component(&raw) {
        Ok(decoded) => decoded.as_string(),
        Err(_) => Some(raw),
    }
}

/// Page root plus the shared stylesheet it depends on.
struct Shell {
    doc: Document,
    root: HtmlElement,
    main: HtmlElement,
}

impl Shell {
    fn mount(doc: &Document) -> Result<Self, AppError> {
        let root = dom::el(doc, "div", "vp-root", None)?;
        let main = dom::el(doc, "main", "vp-main", None)?;
        let footer = dom::el(doc, "div", "vp-footer", Some("Made with ❤️"))?;
        dom::append(&root, &[&main, &footer])?;
        dom::body(doc)?.append_child(&root)?;
        Ok(Self { doc: doc.clone(), root, main })
    }
}

impl Drop for Shell {
    fn drop(&mut self) {
        self.root.remove();
        dom::release_stylesheet(&self.doc);
    }
}

enum View {
    Proposal(ProposalView),
    Celebration { _view: CelebrationView },
}

struct Inner {
    this: Weak<RefCell<Inner>>,
    config: AppConfig,
    name: String,
    state: ProposalState,
    hovered: bool,
    rng: ThreadRng,
    doc: Document,
    // Dropped in declaration order: views and timers before the shell they live in.
    view: Option<View>,
    pending_swap: Option<Timeout>,
    _ambient: Option<AmbientLayer>,
    shell: Shell,
}

impl Inner {
    fn on_reject(&mut self) {
        if self.state.is_accepted() {
            return;
        }
        let reaction = self.state.reject(dom::viewport(), &mut self.rng);
        debug!(count = reaction.count, phrase = reaction.rejection_phrase, "rejected");
        if self.state.is_floating() {
            if let Err(err) = self.ensure_floating_control() {
                warn!(%err, "could not detach rejection control");
            }
        }
        self.render();
    }

    fn on_accept(&mut self) {
        if !self.state.accept() {
            return;
        }
        // Let the click handler unwind before its listener is dropped.
        let weak = self.this.clone();
        self.pending_swap = Some(Timeout::new(0, move || {
            let Some(inner) = weak.upgrade() else { return };
            let mut inner = inner.borrow_mut();
            inner.pending_swap.take();
            if let Err(err) = inner.show_celebration() {
                warn!(%err, "celebration view failed to mount");
            }
        }));
    }

    fn on_hover(&mut self, hovered: bool) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.render();
        }
    }

    fn ensure_floating_control(&mut self) -> Result<(), AppError> {
        let Some(View::Proposal(view)) = &self.view else { return Ok(()) };
        if view.floating.is_some() {
            return Ok(());
        }
        let floating = FloatingControl::mount(&self.doc, self.this.clone())?;
        view.no_inline.remove();
        if let Some(View::Proposal(view)) = &mut self.view {
            view.floating = Some(floating);
        }
        Ok(())
    }

    fn show_celebration(&mut self) -> Result<(), AppError> {
        if matches!(self.view, Some(View::Celebration { .. })) {
            return Ok(());
        }
        // On failure the card stays up and the page keeps working.
        let view = CelebrationView::mount(&self.doc, &self.shell.main, &self.config, &self.name)?;
        self.view = Some(View::Celebration { _view: view });
        info!("celebration started");
        Ok(())
    }

    /// Push derived values into the DOM. Pure reads of the state.
    fn render(&self) {
        let Some(View::Proposal(view)) = &self.view else { return };
        let st = &self.state;

        dom::set_text(&view.yes_label, st.acceptance_phrase());
        let _ = view
            .yes
            .set_attribute("style", &format!("transform:scale({:.3});", st.accept_scale()));

        let mood = st.mood(self.hovered);
        view.mascot.set_class_name(&format!("vp-mascot {}", mood.css_class()));
        let src = self.config.asset(mood.asset());
        if view.mascot_img.get_attribute("src").as_deref() != Some(src.as_str()) {
            let _ = view.mascot_img.set_attribute("src", &src);
        }
        let alt = match mood {
            Mood::Initial => "Shy teddy mascot",
            Mood::Encouraged => "Happy teddy mascot",
            Mood::Distressed => "Pleading teddy mascot",
        };
        let _ = view.mascot_img.set_attribute("alt", alt);

        match st.nag_message() {
            Some(msg) => {
                dom::set_text(&view.nag, msg);
                view.nag.set_hidden(false);
            }
            None => view.nag.set_hidden(true),
        }

        dom::set_text(&view.no_inline, st.rejection_phrase());
        if let Some(floating) = &view.floating {
            let pos = st.position();
            dom::set_text(&floating.label, st.rejection_phrase());
            dom::set_text(&floating.emoji, st.reject_emoji());
            let _ = floating
                .button
                .set_attribute("style", &format!("transform:translate({:.1}px,{:.1}px);", pos.x, pos.y));
        }
    }
}

fn listen(target: &HtmlElement, event: &'static str, weak: Weak<RefCell<Inner>>, f: fn(&mut Inner)) -> EventListener {
    EventListener::new(target, event, move |evt| {
        evt.stop_propagation();
        if let Some(inner) = weak.upgrade() {
            // A re-entrant event while borrowed is dropped rather than panicking.
            if let Ok(mut inner) = inner.try_borrow_mut() {
                f(&mut inner);
            }
        }
    })
}

struct ProposalView {
    card: HtmlElement,
    yes: HtmlElement,
    yes_label: HtmlElement,
    no_inline: HtmlElement,
    nag: HtmlElement,
    mascot: HtmlElement,
    mascot_img: HtmlElement,
    floating: Option<FloatingControl>,
    _listeners: Vec<EventListener>,
}

impl ProposalView {
    fn mount(inner: &Inner) -> Result<Self, AppError> {
        let doc = &inner.doc;
        let cfg = &inner.config;

        let card = dom::el(doc, "div", "vp-card", None)?;
        let stamp = dom::img(doc, &cfg.asset("deco_stamp.png"), "vp-ornament")?;
        stamp.set_attribute("style", "top:1rem;right:1rem;width:3rem;opacity:0.7;")?;
        let header = dom::el(doc, "div", "vp-header-emoji", Some("💝"))?;
        let title = dom::el(doc, "h2", "vp-title", Some("Will you be my Valentine?"))?;
        let name = dom::el(doc, "p", "vp-name", Some(&inner.name))?;
        let nag = dom::el(doc, "p", "vp-nag", None)?;
        nag.set_hidden(true);

        let mascot = dom::el(doc, "div", "vp-mascot mood-initial", None)?;
        let mascot_img = dom::img(doc, &cfg.asset(Mood::Initial.asset()), "vp-mascot-img")?;
        mascot_img.remove_attribute("loading")?;
        let heart_a = dom::img(doc, &cfg.asset("particle_heart.png"), "vp-mascot-heart")?;
        heart_a.set_attribute("style", "top:-0.5rem;left:-1rem;")?;
        let heart_b = dom::img(doc, &cfg.asset("particle_heart.png"), "vp-mascot-heart")?;
        heart_b.set_attribute("style", "top:-1rem;right:-0.5rem;animation-delay:0.3s;")?;
        let tear = dom::el(doc, "span", "vp-tear", Some("💔"))?;
        let rose = dom::el(doc, "span", "vp-rose", Some("🌹"))?;
        dom::append(&mascot, &[&mascot_img, &heart_a, &heart_b, &tear, &rose])?;

        let actions = dom::el(doc, "div", "vp-actions", None)?;
        let yes = dom::el(doc, "button", "vp-yes", None)?;
        let yes_icon = dom::el(doc, "span", "", Some("♥ "))?;
        let yes_label = dom::el(doc, "span", "", None)?;
        dom::append(&yes, &[&yes_icon, &yes_label])?;
        let no_inline = dom::el(doc, "button", "vp-no", None)?;
        dom::append(&actions, &[&yes, &no_inline])?;

        let cherries = dom::img(doc, &cfg.asset("deco_cherries.png"), "vp-ornament")?;
        cherries.set_attribute("style", "bottom:-1rem;left:-1.5rem;width:4rem;opacity:0.8;")?;

        dom::append(&card, &[&stamp, &header, &title, &name, &nag, &mascot, &actions, &cherries])?;
        inner.shell.main.append_child(&card)?;

        let weak = inner.this.clone();
        let listeners = vec![
            listen(&yes, "click", weak.clone(), Inner::on_accept),
            listen(&yes, "mouseenter", weak.clone(), |i| i.on_hover(true)),
            listen(&yes, "mouseleave", weak.clone(), |i| i.on_hover(false)),
            listen(&no_inline, "click", weak, Inner::on_reject),
        ];

        Ok(Self {
            card,
            yes,
            yes_label,
            no_inline,
            nag,
            mascot,
            mascot_img,
            floating: None,
            _listeners: listeners,
        })
    }
}

impl Drop for ProposalView {
    fn drop(&mut self) {
        self.card.remove();
    }
}

/// The detached rejection control, attached straight to `<body>` so it can
/// roam over the whole viewport.
struct FloatingControl {
    button: HtmlElement,
    label: HtmlElement,
    emoji: HtmlElement,
    _click: EventListener,
}

impl FloatingControl {
    fn mount(doc: &Document, weak: Weak<RefCell<Inner>>) -> Result<Self, AppError> {
        let button = dom::el(doc, "button", "vp-no vp-floating", None)?;
        let label = dom::el(doc, "span", "", None)?;
        let emoji = dom::el(doc, "span", "", None)?;
        dom::append(&button, &[&label, &emoji])?;
        dom::body(doc)?.append_child(&button)?;
        let click = listen(&button, "click", weak, Inner::on_reject);
        Ok(Self { button, label, emoji, _click: click })
    }
}

impl Drop for FloatingControl {
    fn drop(&mut self) {
        self.button.remove();
    }
}

struct CelebrationView {
    root: HtmlElement,
    _effects: CelebrationEffects,
}

impl CelebrationView {
    fn mount(doc: &Document, parent: &HtmlElement, cfg: &AppConfig, name: &str) -> Result<Self, AppError> {
        let root = dom::el(doc, "div", "vp-success", None)?;

        for (asset, style) in [
            ("deco_bow.png", "top:2.5rem;left:2.5rem;width:6rem;opacity:0.7;"),
            ("deco_cherries.png", "top:5rem;right:2.5rem;width:4rem;opacity:0.7;"),
            ("deco_envelope.png", "bottom:5rem;left:2.5rem;width:7rem;opacity:0.6;"),
        ] {
            let deco = dom::img(doc, &cfg.asset(asset), "vp-ornament")?;
            deco.set_attribute("style", style)?;
            root.append_child(&deco)?;
        }

        let mascot = dom::img(doc, &cfg.asset(Mood::Encouraged.asset()), "vp-success-mascot")?;
        mascot.set_attribute("alt", "Happy celebration teddy")?;

        let headline = dom::el(doc, "h1", "", Some("Yay!"))?;
        let sub = dom::el(doc, "span", "", Some("You said yes!"))?;
        headline.append_child(&sub)?;

        let message = dom::el(doc, "p", "", Some(&recipient::celebration_message(name)))?;
        let aside = dom::el(doc, "small", "", Some("(I knew you'd pick the right button 😉)"))?;
        message.append_child(&aside)?;

        let promise = dom::el(doc, "div", "vp-promise", None)?;
        let promise_title = dom::el(doc, "h3", "", Some("A Promise"))?;
        let promise_text = dom::el(
            doc,
            "p",
            "",
            Some("\"To lots of laughter, chocolate, and making beautiful memories together.\""),
        )?;
        dom::append(&promise, &[&promise_title, &promise_text])?;
        dom::append(&root, &[&mascot, &headline, &message, &promise])?;

        for i in 0..6u32 {
            let heart = dom::img(doc, &cfg.asset("particle_heart.png"), "vp-floating-heart")?;
            let style = format!(
                "left:{}%;top:{}%;animation-duration:{:.1}s;animation-delay:{:.1}s;",
                15 + i * 15,
                20 + (i % 3) * 25,
                3.0 + f64::from(i) * 0.5,
                f64::from(i) * 0.4,
            );
            heart.set_attribute("style", &style)?;
            root.append_child(&heart)?;
        }

        parent.append_child(&root)?;
        Ok(Self { root, _effects: CelebrationEffects::start() })
    }
}

impl Drop for CelebrationView {
    fn drop(&mut self) {
        self.root.remove();
    }
}
