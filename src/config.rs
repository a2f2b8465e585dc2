//! Game configuration.
//!
//! Defaults reproduce the classic layout: a 512x480 field, 32px sprites and a
//! hero running at 256 px/s. A page can override any subset of fields by
//! passing JSON to `start_game_with_config`.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

// DOM `keyCode` values.
pub const KEY_ESCAPE: u32 = 27;
pub const KEY_LEFT: u32 = 37;
pub const KEY_UP: u32 = 38;
pub const KEY_RIGHT: u32 = 39;
pub const KEY_DOWN: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: u32,
    pub down: u32,
    pub left: u32,
    pub right: u32,
    pub pause: u32,
}

impl KeyBindings {
    pub fn is_bound(&self, code: u32) -> bool {
        [self.up, self.down, self.left, self.right, self.pause].contains(&code)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: KEY_UP,
            down: KEY_DOWN,
            left: KEY_LEFT,
            right: KEY_RIGHT,
            pause: KEY_ESCAPE,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetPaths {
    pub background: String,
    pub player: String,
    pub target: String,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            background: "images/background.png".to_string(),
            player: "images/hero.png".to_string(),
            target: "images/monster.png".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_id: String,
    pub width: f64,
    pub height: f64,
    /// Edge length of the (square) hero and goblin bounding boxes.
    pub sprite_size: f64,
    /// Inset from every canvas edge the goblin is never placed inside.
    pub target_margin: f64,
    /// Hero speed in pixels per second.
    pub player_speed: f64,
    pub assets: AssetPaths,
    pub keys: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_id: "goblin-chase-canvas".to_string(),
            width: 512.0,
            height: 480.0,
            sprite_size: 32.0,
            target_margin: 32.0,
            player_speed: 256.0,
            assets: AssetPaths::default(),
            keys: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON override and validate the result.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let cfg: GameConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        let dims = [self.width, self.height, self.sprite_size, self.target_margin];
        if dims.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(GameError::InvalidConfig(
                "dimensions must be finite and non-negative".into(),
            ));
        }
        if self.width <= 2.0 * self.target_margin || self.height <= 2.0 * self.target_margin {
            return Err(GameError::InvalidConfig(format!(
                "canvas {}x{} leaves no room inside a {}px margin",
                self.width, self.height, self.target_margin
            )));
        }
        if self.sprite_size >= self.width || self.sprite_size >= self.height {
            return Err(GameError::InvalidConfig(format!(
                "sprite size {} does not fit a {}x{} canvas",
                self.sprite_size, self.width, self.height
            )));
        }
        if !self.player_speed.is_finite() || self.player_speed < 0.0 {
            return Err(GameError::InvalidConfig(format!(
                "player speed {} must be finite and non-negative",
                self.player_speed
            )));
        }
        Ok(())
    }

    /// Largest x the hero's top-left corner may take while fully on canvas.
    pub fn max_player_x(&self) -> f64 {
        self.width - self.sprite_size
    }

    pub fn max_player_y(&self) -> f64 {
        self.height - self.sprite_size
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}
