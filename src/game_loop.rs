//! Main loop: ties a `Session` to a host `Platform`.
//!
//! The platform owns the drawing surface, the image loads and the frame
//! scheduler. Tests drive `tick` by hand with a fake platform; the browser
//! build wires it to `requestAnimationFrame` in `web.rs`.

use log::{info, warn};
use rand::Rng;
use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::InputState;
use crate::render::{self, AssetStates, Sprite, Surface};
use crate::session::{RunState, Session, TickOutcome};

pub trait Platform {
    type Surface: Surface;

    /// Create the drawing surface and kick off asset loads.
    fn initialize(&mut self, config: &GameConfig) -> Result<(), GameError>;
    fn asset_state(&self, sprite: Sprite) -> render::AssetState;
    /// Only valid after a successful `initialize`.
    fn surface(&mut self) -> Result<&mut Self::Surface, GameError>;
    /// Ask the host to call `GameLoop::tick` once more on the next frame.
    fn schedule_next_frame(&mut self) -> Result<(), GameError>;
}

pub struct GameLoop<P: Platform, R: Rng = SmallRng> {
    platform: P,
    session: Session<R>,
    input: InputState,
    initialized: bool,
    last_refresh_ms: Option<f64>,
    frame_pending: bool,
}

impl<P: Platform> GameLoop<P, SmallRng> {
    pub fn new(config: GameConfig, platform: P) -> Self {
        Self::with_session(Session::with_entropy(config), platform)
    }
}

impl<P: Platform, R: Rng> GameLoop<P, R> {
    pub fn with_session(session: Session<R>, platform: P) -> Self {
        Self {
            platform,
            session,
            input: InputState::new(),
            initialized: false,
            last_refresh_ms: None,
            frame_pending: false,
        }
    }

    pub fn session(&self) -> &Session<R> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<R> {
        &mut self.session
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Schedule the very first frame.
    pub fn start(&mut self) -> Result<(), GameError> {
        info!("goblin chase starting");
        self.request_frame()
    }

    fn request_frame(&mut self) -> Result<(), GameError> {
        if self.frame_pending {
            return Ok(());
        }
        self.platform.schedule_next_frame()?;
        self.frame_pending = true;
        Ok(())
    }

    /// One frame: lazy init, update, render, reschedule.
    pub fn tick(&mut self, now_ms: f64) -> Result<TickOutcome, GameError> {
        self.frame_pending = false;

        if !self.initialized {
            self.platform.initialize(self.session.config())?;
            self.session.reset();
            self.initialized = true;
            info!("session initialized");
        }

        let delta = match self.last_refresh_ms {
            Some(prev) => ((now_ms - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_refresh_ms = Some(now_ms);

        let outcome = self.session.update(delta, &self.input);

        let assets = self.asset_states();
        let drawn = self
            .platform
            .surface()
            .and_then(|surface| render::render(&self.session, &assets, surface));

        // A bad frame must not end a running loop.
        if !self.session.is_paused() {
            self.request_frame()?;
        }
        drawn?;
        Ok(outcome)
    }

    pub fn asset_states(&self) -> AssetStates {
        AssetStates {
            background: self.platform.asset_state(Sprite::Background),
            player: self.platform.asset_state(Sprite::Player),
            target: self.platform.asset_state(Sprite::Target),
        }
    }

    pub fn key_down(&mut self, code: u32) -> Result<(), GameError> {
        if code == self.session.config().keys.pause {
            match self.session.toggle_pause() {
                RunState::Paused => info!("paused"),
                RunState::Running => {
                    info!("resumed");
                    // Time spent paused must not turn into one giant step.
                    self.last_refresh_ms = None;
                    self.request_frame()?;
                }
            }
            return Ok(());
        }
        if !self.session.is_paused() {
            self.input.press(code);
        }
        Ok(())
    }

    pub fn key_up(&mut self, code: u32) {
        self.input.release(code);
    }

    /// Run a tick, logging instead of propagating failures. Used by hosts
    /// whose frame callback has nowhere to return an error to.
    pub fn tick_logged(&mut self, now_ms: f64) {
        if let Err(e) = self.tick(now_ms) {
            warn!("frame failed: {}", e);
        }
    }
}
