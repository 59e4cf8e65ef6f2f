//! Valentine proposal core crate.
//!
//! A card asks the question, the "no" button runs away and begs harder each
//! time it is caught, and saying yes swaps in a confetti celebration. The
//! interaction logic (`proposal`, `celebration`, `ambient`, `recipient`) is
//! plain Rust and host-testable; `web` mounts it into the page through
//! `web-sys` and is what `start_app()` exposes to JS.

use wasm_bindgen::prelude::*;

pub mod ambient;
pub mod celebration;
pub mod config;
pub mod error;
pub mod logging;
pub mod proposal;
pub mod recipient;
pub mod web;

pub use config::AppConfig;
pub use error::AppError;
pub use proposal::{Mood, Phase, ProposalState};
pub use web::ValentineApp;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// Phrase tables
// Index = rejection count, saturating at the last entry.
// -----------------------------------------------------------------------------

pub const NO_PHRASES: &[&str] = &[
    "No",
    "Are you sure?",
    "Really sure?",
    "Think again!",
    "Last chance!",
    "Surely not?",
    "You might regret this!",
    "Give it another thought!",
    "Are you absolutely certain?",
    "This could be a mistake!",
    "Have a heart!",
    "Don't be so cold!",
    "Change of heart?",
    "Wouldn't you reconsider?",
    "Is that your final answer?",
    "You're breaking my heart ;(",
];

pub const YES_PHRASES: &[&str] = &[
    "Yes",
    "Yes, please!",
    "Okay, yes!",
    "Definitely yes!",
    "Yes, obviously!",
    "A thousand times yes!",
    "Yes yes yes!",
    "Just click me already!",
    "You know you want to!",
    "Pretty please? Yes!",
    "YES! 💖",
];

pub const NAG_HURT: &str = "Why are you doing this? 😭";
pub const NAG_FRANTIC: &str = "Say yes already! 🥺";

pub const REJECT_EMOJI_SAD: &str = "😢";
pub const REJECT_EMOJI_RUNNING: &str = "🏃";

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Mount the greeting with the default configuration. Keep the returned
/// handle alive; dropping it (or calling `unmount`) tears the page down.
#[wasm_bindgen]
pub fn start_app() -> Result<ValentineApp, JsValue> {
    ValentineApp::mount(AppConfig::default()).map_err(JsValue::from)
}

/// Mount with a JSON configuration object; unknown fields are rejected by
/// validation, missing ones keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_app_with_config(config_json: &str) -> Result<ValentineApp, JsValue> {
    let config = AppConfig::from_json(config_json)?;
    ValentineApp::mount(config).map_err(JsValue::from)
}
