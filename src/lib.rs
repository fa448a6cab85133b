//! Birthday deck core crate.
//!
//! A single-page slide presentation: eleven sections walked in order, some of
//! them gated behind a small interaction (quiz, fortune cookie, code run,
//! balloons, candle). All state lives in [`deck::Deck`]; drawing goes through
//! the [`surface::Surface`] trait so the whole presentation runs headless in
//! tests. The `web` module binds it to the browser document.

pub mod config;
pub mod content;
pub mod deck;
pub mod effects;
pub mod error;
pub mod games;
pub mod highlight;
pub mod navigator;
pub mod scheduler;
pub mod surface;
pub mod typewriter;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::DeckConfig;
pub use deck::{Deck, Input, Snapshot};
pub use error::DeckError;
pub use surface::{RecordingSurface, Surface};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // a second init (e.g. tests) leaves the first logger in place
    console_log::init_with_level(log::Level::Debug).ok();
}
