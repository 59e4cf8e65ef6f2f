//! Small DOM helpers shared by the views.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::AppError;
use crate::proposal::Viewport;

pub fn window() -> Result<Window, AppError> {
    web_sys::window().ok_or(AppError::NoWindow)
}

pub fn document() -> Result<Document, AppError> {
    window()?.document().ok_or(AppError::NoDocument)
}

pub fn body(doc: &Document) -> Result<HtmlElement, AppError> {
    doc.body().ok_or(AppError::NoBody)
}

/// Current inner size of the window; an empty viewport if it cannot be read.
pub fn viewport() -> Viewport {
    let Some(win) = web_sys::window() else {
        return Viewport::new(0.0, 0.0);
    };
    let read = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport::new(read(win.inner_width()), read(win.inner_height()))
}

/// `<tag class="...">text</tag>`
pub fn el(doc: &Document, tag: &str, class: &str, text: Option<&str>) -> Result<HtmlElement, AppError> {
    let node: HtmlElement = doc.create_element(tag)?.dyn_into::<HtmlElement>().map_err(|_| {
        AppError::Dom(format!("<{tag}> is not an HtmlElement"))
    })?;
    if !class.is_empty() {
        node.set_class_name(class);
    }
    if let Some(text) = text {
        node.set_text_content(Some(text));
    }
    Ok(node)
}

/// Decorative `<img>`: empty alt, lazy loading.
pub fn img(doc: &Document, src: &str, class: &str) -> Result<HtmlElement, AppError> {
    let node = el(doc, "img", class, None)?;
    node.set_attribute("src", src)?;
    node.set_attribute("alt", "")?;
    node.set_attribute("loading", "lazy")?;
    Ok(node)
}

pub fn append(parent: &Element, children: &[&HtmlElement]) -> Result<(), AppError> {
    for child in children {
        parent.append_child(child)?;
    }
    Ok(())
}

/// Replace the text of an element only when it changed.
pub fn set_text(node: &Element, text: &str) {
    if node.text_content().as_deref() != Some(text) {
        node.set_text_content(Some(text));
    }
}

/// Inject the stylesheet once per document.
pub fn ensure_stylesheet(doc: &Document) -> Result<(), AppError> {
    if doc.get_element_by_id(STYLE_ID).is_some() {
        return Ok(());
    }
    let style = doc.create_element("style")?;
    style.set_id(STYLE_ID);
    style.set_text_content(Some(STYLESHEET));
    match doc.head() {
        Some(head) => {
            head.append_child(&style)?;
        }
        None => {
            body(doc)?.append_child(&style)?;
        }
    }
    Ok(())
}

/// Drop the injected stylesheet once the last app root has left the page.
pub fn release_stylesheet(doc: &Document) {
    if matches!(doc.query_selector(".vp-root"), Ok(Some(_))) {
        return;
    }
    if let Some(style) = doc.get_element_by_id(STYLE_ID) {
        style.remove();
    }
}

const STYLE_ID: &str = "vp-style";

// Looping decoration is pure CSS; the program only toggles classes.
const STYLESHEET: &str = r#"
.vp-root { position:relative; min-height:100vh; width:100%; display:flex; align-items:center; justify-content:center; background:#fff0f5; overflow:hidden; font-family:Georgia, serif; }
.vp-backdrop { position:fixed; inset:0; overflow:hidden; pointer-events:none; z-index:0; }
.vp-backdrop-gradient { position:absolute; inset:0; background:linear-gradient(135deg,#fce7f3,#fff,#fef2f2); opacity:0.9; }
.vp-backdrop-glow { position:absolute; inset:0; opacity:0.4; background:radial-gradient(circle at 50% 40%, rgba(255,182,193,0.6) 0%, transparent 50%); }
.vp-canvas { position:absolute; inset:0; contain:strict; }
.vp-main { position:relative; width:100%; max-width:56rem; padding:0 1rem; z-index:10; }
.vp-card { position:relative; max-width:28rem; margin:0 auto; background:rgba(255,255,255,0.95); padding:2.5rem; border-radius:2rem; box-shadow:0 25px 50px -12px rgba(0,0,0,0.25); display:flex; flex-direction:column; align-items:center; animation:vp-fade-in .6s ease-out; }
.vp-header-emoji { font-size:3.75rem; margin-bottom:1rem; }
.vp-title { font-size:2rem; font-weight:bold; color:#1f2937; text-align:center; margin:0; }
.vp-name { font-family:'Dancing Script','Pacifico',cursive; font-size:2.25rem; color:#db2777; transform:rotate(-2deg); margin:.5rem 0 1.5rem; }
.vp-nag { color:#ec4899; font-weight:500; text-align:center; animation:vp-pulse 2s ease-in-out infinite; }
.vp-mascot { position:relative; width:10rem; height:10rem; margin-bottom:1.5rem; }
.vp-mascot img.vp-mascot-img { width:100%; height:100%; object-fit:contain; }
.vp-mascot .vp-tear { display:none; position:absolute; bottom:-0.5rem; left:50%; font-size:1.5rem; animation:vp-broken-heart 1.5s ease-in-out infinite; }
.vp-mascot.mood-distressed .vp-tear { display:block; }
.vp-mascot .vp-mascot-heart { display:none; position:absolute; width:1.5rem; animation:vp-heart-float 2s ease-in-out infinite; }
.vp-mascot.mood-encouraged .vp-mascot-heart { display:block; }
.vp-rose { position:absolute; bottom:-0.5rem; right:-1.5rem; font-size:1.875rem; animation:vp-bob 2.5s ease-in-out infinite; }
.vp-actions { display:flex; flex-direction:column; align-items:center; gap:1rem; margin:.5rem 0 1.5rem; }
.vp-yes { background:linear-gradient(90deg,#ef4444,#ec4899); color:#fff; font-weight:bold; font-size:1.125rem; padding:1rem 2.5rem; border:none; border-radius:9999px; cursor:pointer; transition:transform .2s; touch-action:manipulation; white-space:nowrap; }
.vp-no { background:#f3f4f6; color:#4b5563; font-weight:600; padding:.75rem 1.5rem; border:1px solid #e5e7eb; border-radius:9999px; cursor:pointer; touch-action:manipulation; white-space:nowrap; user-select:none; }
.vp-no.vp-floating { position:fixed; top:0; left:0; z-index:9999; box-shadow:0 20px 25px -5px rgba(0,0,0,0.1); transition:transform .25s cubic-bezier(.2,1.4,.4,1); display:flex; gap:.5rem; }
.vp-ornament { position:absolute; }
.vp-success { position:relative; z-index:10; display:flex; flex-direction:column; align-items:center; justify-content:center; min-height:100vh; text-align:center; padding:2rem; gap:2rem; animation:vp-fade-in .5s ease-out; }
.vp-success-mascot { width:14rem; height:14rem; object-fit:contain; animation:vp-celebrate 2s ease-in-out infinite; }
.vp-success h1 { font-size:3rem; color:#dc2626; margin:0; }
.vp-success h1 span { display:block; font-size:2.25rem; color:#ec4899; }
.vp-success p { font-size:1.25rem; color:#374151; }
.vp-success small { display:block; color:#6b7280; margin-top:.5rem; }
.vp-promise { padding:1.5rem; background:rgba(255,255,255,0.8); border-radius:1rem; max-width:28rem; box-shadow:0 20px 25px -5px rgba(0,0,0,0.1); }
.vp-promise p { font-style:italic; color:#4b5563; }
.vp-floating-heart { position:absolute; width:1.5rem; opacity:0.4; pointer-events:none; animation:vp-heart-float 3s ease-in-out infinite; }
.vp-footer { position:fixed; bottom:1rem; left:0; right:0; text-align:center; pointer-events:none; opacity:0.4; font-size:.75rem; color:#831843; }
@keyframes vp-fade-in { from { opacity:0; transform:scale(0.9); } to { opacity:1; transform:scale(1); } }
@keyframes vp-pulse { 0%,100% { opacity:0.6; } 50% { opacity:1; } }
@keyframes vp-bob { 0%,100% { transform:translateY(0); } 50% { transform:translateY(-6px); } }
@keyframes vp-heart-float { 0%,100% { transform:translateY(-4px) rotate(-8deg); } 50% { transform:translateY(4px) rotate(8deg); } }
@keyframes vp-broken-heart { 0%,100% { transform:translateX(-50%) translateY(0); opacity:0.7; } 50% { transform:translateX(-50%) translateY(3px); opacity:1; } }
@keyframes vp-celebrate { 0%,100% { transform:scale(1) rotate(0); } 33% { transform:scale(1.05) rotate(3deg); } 66% { transform:scale(1.05) rotate(-3deg); } }
"#;
