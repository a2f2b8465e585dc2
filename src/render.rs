//! Frame drawing, independent of the actual canvas.
//!
//! `render` decides *what* goes on screen from a session snapshot and the
//! current asset states; a `Surface` implementation decides *how*.

use rand::Rng;

use crate::error::GameError;
use crate::session::Session;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sprite {
    Background,
    Player,
    Target,
}

impl Sprite {
    /// Flat fill used in place of an image that failed to load.
    fn placeholder_color(self) -> &'static str {
        match self {
            Sprite::Background => "#3c6e2f",
            Sprite::Player => "#2f5fd0",
            Sprite::Target => "#c0392b",
        }
    }
}

/// Load state of one image asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetState {
    #[default]
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssetStates {
    pub background: AssetState,
    pub player: AssetState,
    pub target: AssetState,
}

impl AssetStates {
    pub fn all(state: AssetState) -> Self {
        Self {
            background: state,
            player: state,
            target: state,
        }
    }

    pub fn get(&self, sprite: Sprite) -> AssetState {
        match sprite {
            Sprite::Background => self.background,
            Sprite::Player => self.player,
            Sprite::Target => self.target,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub fill: &'static str,
    pub font: &'static str,
    pub align: &'static str,
    pub baseline: &'static str,
}

pub const SCORE_STYLE: TextStyle = TextStyle {
    fill: "rgb(250, 250, 250)",
    font: "24px Helvetica",
    align: "left",
    baseline: "top",
};

pub const PAUSED_STYLE: TextStyle = TextStyle {
    fill: "#000000",
    ..SCORE_STYLE
};

/// Minimal 2d drawing surface.
pub trait Surface {
    fn draw_sprite(&mut self, sprite: Sprite, x: f64, y: f64) -> Result<(), GameError>;
    fn fill_rect(&mut self, color: &str, x: f64, y: f64, w: f64, h: f64) -> Result<(), GameError>;
    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        style: &TextStyle,
    ) -> Result<(), GameError>;
}

pub fn score_label(score: u32) -> String {
    format!("Goblins caught: {}", score)
}

pub const PAUSED_LABEL: &str = "PAUSED";

pub fn render<R: Rng, S: Surface + ?Sized>(
    session: &Session<R>,
    assets: &AssetStates,
    surface: &mut S,
) -> Result<(), GameError> {
    let cfg = session.config();
    let size = cfg.sprite_size;

    let layers = [
        (Sprite::Background, 0.0, 0.0, cfg.width, cfg.height),
        (Sprite::Player, session.player.pos.x, session.player.pos.y, size, size),
        (Sprite::Target, session.target.pos.x, session.target.pos.y, size, size),
    ];
    for (sprite, x, y, w, h) in layers {
        match assets.get(sprite) {
            AssetState::Ready => surface.draw_sprite(sprite, x, y)?,
            AssetState::Failed => surface.fill_rect(sprite.placeholder_color(), x, y, w, h)?,
            AssetState::Loading => {}
        }
    }

    surface.fill_text(&score_label(session.score()), 32.0, 32.0, &SCORE_STYLE)?;

    if session.is_paused() {
        surface.fill_text(
            PAUSED_LABEL,
            cfg.width / 2.0 - 32.0,
            cfg.height / 2.0,
            &PAUSED_STYLE,
        )?;
    }
    Ok(())
}
