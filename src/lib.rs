//! Goblin Chase core crate.
//!
//! A small canvas arcade game: steer the hero with the arrow keys, touch the
//! goblin to score, Escape pauses. Gameplay (`session`), drawing decisions
//! (`render`) and frame sequencing (`game_loop`) are plain Rust and run under
//! `cargo test`; `web` binds them to the browser.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game_loop;
pub mod input;
pub mod render;
pub mod session;
pub mod web;

pub use config::{GameConfig, KeyBindings};
pub use error::GameError;
pub use game_loop::{GameLoop, Platform};
pub use input::InputState;
pub use render::{AssetState, AssetStates, Sprite, Surface, TextStyle};
pub use session::{Player, RunState, Session, Target, TickOutcome, Vec2};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) just keeps the existing logger.
    let _ = console_log::init_with_level(log::Level::Info);
}

// -----------------------------------------------------------------------------
// Unified entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GameConfig::default())?;
    Ok(())
}

/// Start with a JSON override of the default config, e.g.
/// `start_game_with_config('{"player_speed": 320}')`.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json)?;
    web::start(config)?;
    Ok(())
}
