//! Game session: hero, goblin, score and pause state.
//!
//! Everything here is plain data plus total functions over it, so the whole
//! catch loop can be driven from tests without a canvas. The browser host in
//! `web.rs` only feeds it timestamps and key codes.

use log::debug;
use rand::Rng;
use rand::SeedableRng;
use rand::distributions::Standard;
use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::input::InputState;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// Pixels per second.
    pub speed: f64,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub pos: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Paused,
}

/// What a single `update` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Hero was on or past an edge and got pushed back one pixel; nothing else ran.
    Nudged,
    Moved,
    Caught { score: u32 },
}

pub struct Session<R: Rng = SmallRng> {
    config: GameConfig,
    pub player: Player,
    pub target: Target,
    state: RunState,
    rng: R,
}

impl Session<SmallRng> {
    pub fn with_entropy(config: GameConfig) -> Self {
        Session::new(config, SmallRng::from_entropy())
    }
}

impl<R: Rng> Session<R> {
    /// Fresh session with both sprites at the origin; call `reset` to place them.
    pub fn new(config: GameConfig, rng: R) -> Self {
        let speed = config.player_speed;
        Self {
            config,
            player: Player {
                pos: Vec2::default(),
                speed,
                score: 0,
            },
            target: Target {
                pos: Vec2::default(),
            },
            state: RunState::Running,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == RunState::Paused
    }

    pub fn toggle_pause(&mut self) -> RunState {
        self.state = match self.state {
            RunState::Running => RunState::Paused,
            RunState::Paused => RunState::Running,
        };
        self.state
    }

    /// Centre the hero and throw the goblin somewhere inside the margin.
    pub fn reset(&mut self) {
        let (cx, cy) = self.config.center();
        self.player.pos = Vec2::new(cx, cy);

        let m = self.config.target_margin;
        let ux: f64 = self.rng.sample(Standard);
        let uy: f64 = self.rng.sample(Standard);
        self.target.pos = Vec2::new(
            m + ux * (self.config.width - 2.0 * m),
            m + uy * (self.config.height - 2.0 * m),
        );
    }

    pub fn update(&mut self, delta_seconds: f64, input: &InputState) -> TickOutcome {
        if self.nudge_into_bounds() {
            return TickOutcome::Nudged;
        }

        let step = self.player.speed * delta_seconds.max(0.0);
        for dir in input.directions(&self.config.keys) {
            let (ux, uy) = dir.unit();
            self.player.pos.x += ux * step;
            self.player.pos.y += uy * step;
        }
        let p = &mut self.player.pos;
        p.x = p.x.clamp(0.0, self.config.max_player_x());
        p.y = p.y.clamp(0.0, self.config.max_player_y());

        if self.touching() {
            self.player.score += 1;
            debug!("goblin caught, score {}", self.player.score);
            self.reset();
            return TickOutcome::Caught {
                score: self.player.score,
            };
        }
        TickOutcome::Moved
    }

    /// One pixel correction when the hero sits on or beyond an edge. Left,
    /// right, top, bottom are checked in that order and only the first hit
    /// is corrected.
    fn nudge_into_bounds(&mut self) -> bool {
        let max_x = self.config.max_player_x();
        let max_y = self.config.max_player_y();
        let p = &mut self.player.pos;
        if p.x <= 0.0 {
            p.x += 1.0;
        } else if p.x >= max_x {
            p.x -= 1.0;
        } else if p.y <= 0.0 {
            p.y += 1.0;
        } else if p.y >= max_y {
            p.y -= 1.0;
        } else {
            return false;
        }
        true
    }

    /// Axis-aligned overlap of the two sprite boxes, edges inclusive.
    pub fn touching(&self) -> bool {
        let s = self.config.sprite_size;
        let a = self.player.pos;
        let b = self.target.pos;
        a.x <= b.x + s && b.x <= a.x + s && a.y <= b.y + s && b.y <= a.y + s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KEY_DOWN, KEY_LEFT, KEY_RIGHT, KEY_UP};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    fn session() -> Session<StdRng> {
        Session::new(GameConfig::default(), StdRng::seed_from_u64(7))
    }

    fn held(codes: &[u32]) -> InputState {
        let mut input = InputState::new();
        for c in codes {
            input.press(*c);
        }
        input
    }

    #[test]
    fn test_reset_centres_player_and_bounds_target() {
        let mut s = session();
        for _ in 0..500 {
            s.reset();
            assert_eq!(s.player.pos, Vec2::new(256.0, 240.0));
            let t = s.target.pos;
            assert!((32.0..=480.0).contains(&t.x), "target x {} out of range", t.x);
            assert!((32.0..=448.0).contains(&t.y), "target y {} out of range", t.y);
        }
    }

    #[test]
    fn test_reset_with_zero_rng_hits_margin_corner() {
        let mut s = Session::new(GameConfig::default(), StepRng::new(0, 0));
        s.reset();
        assert_eq!(s.target.pos, Vec2::new(32.0, 32.0));
    }

    #[test]
    fn test_catch_at_same_spot_scores_once() {
        let mut s = session();
        s.player.pos = Vec2::new(100.0, 100.0);
        s.target.pos = Vec2::new(100.0, 100.0);
        let outcome = s.update(0.0, &InputState::new());
        assert_eq!(outcome, TickOutcome::Caught { score: 1 });
        assert_eq!(s.score(), 1);
        // reset ran: hero back in the middle, goblin inside the margin
        assert_eq!(s.player.pos, Vec2::new(256.0, 240.0));
        assert!(s.target.pos.x >= 32.0 && s.target.pos.x <= 480.0);
        assert!(s.target.pos.y >= 32.0 && s.target.pos.y <= 448.0);
    }

    #[test]
    fn test_touching_edges_inclusive() {
        let mut s = session();
        s.player.pos = Vec2::new(100.0, 100.0);
        s.target.pos = Vec2::new(132.0, 132.0);
        assert!(s.touching());
        s.target.pos = Vec2::new(132.5, 100.0);
        assert!(!s.touching());
    }

    #[test]
    fn test_no_keys_no_motion() {
        let mut s = session();
        s.player.pos = Vec2::new(100.0, 100.0);
        s.target.pos = Vec2::new(400.0, 400.0);
        let outcome = s.update(0.5, &InputState::new());
        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(s.player.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_directional_and_diagonal_motion() {
        let mut s = session();
        s.target.pos = Vec2::new(450.0, 420.0);
        s.player.pos = Vec2::new(200.0, 200.0);
        s.update(0.25, &held(&[KEY_RIGHT]));
        assert_relative_eq!(s.player.pos.x, 264.0);
        assert_relative_eq!(s.player.pos.y, 200.0);

        s.update(0.125, &held(&[KEY_UP, KEY_LEFT]));
        assert_relative_eq!(s.player.pos.x, 232.0);
        assert_relative_eq!(s.player.pos.y, 168.0);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut s = session();
        s.target.pos = Vec2::new(450.0, 420.0);
        s.player.pos = Vec2::new(200.0, 200.0);
        s.update(0.1, &held(&[KEY_LEFT, KEY_RIGHT, KEY_UP, KEY_DOWN]));
        assert_relative_eq!(s.player.pos.x, 200.0);
        assert_relative_eq!(s.player.pos.y, 200.0);
    }

    #[test]
    fn test_nudge_takes_precedence_over_movement() {
        let mut s = session();
        s.target.pos = Vec2::new(450.0, 420.0);
        s.player.pos = Vec2::new(0.0, 200.0);
        let outcome = s.update(0.5, &held(&[KEY_LEFT, KEY_DOWN]));
        assert_eq!(outcome, TickOutcome::Nudged);
        assert_eq!(s.player.pos, Vec2::new(1.0, 200.0));

        s.player.pos = Vec2::new(200.0, 448.0);
        assert_eq!(s.update(0.5, &held(&[KEY_DOWN])), TickOutcome::Nudged);
        assert_eq!(s.player.pos, Vec2::new(200.0, 447.0));
    }

    #[test]
    fn test_corner_nudges_one_edge_per_tick() {
        let mut s = session();
        s.target.pos = Vec2::new(400.0, 400.0);
        s.player.pos = Vec2::new(0.0, 0.0);
        // left edge wins over top edge
        assert_eq!(s.update(0.1, &InputState::new()), TickOutcome::Nudged);
        assert_eq!(s.player.pos, Vec2::new(1.0, 0.0));
        assert_eq!(s.update(0.1, &InputState::new()), TickOutcome::Nudged);
        assert_eq!(s.player.pos, Vec2::new(1.0, 1.0));
        // fully inside now, so the next tick is a normal one
        assert_eq!(s.update(0.1, &InputState::new()), TickOutcome::Moved);
        assert_eq!(s.player.pos, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_right_and_top_edges_nudge_inward() {
        let mut s = session();
        s.target.pos = Vec2::new(40.0, 400.0);
        s.player.pos = Vec2::new(480.0, 200.0);
        assert_eq!(s.update(0.5, &held(&[KEY_RIGHT])), TickOutcome::Nudged);
        assert_eq!(s.player.pos, Vec2::new(479.0, 200.0));

        s.player.pos = Vec2::new(200.0, 0.0);
        assert_eq!(s.update(0.5, &held(&[KEY_UP])), TickOutcome::Nudged);
        assert_eq!(s.player.pos, Vec2::new(200.0, 1.0));
    }

    #[test]
    fn test_nudge_skips_catch_test() {
        let mut s = session();
        s.player.pos = Vec2::new(0.0, 100.0);
        s.target.pos = Vec2::new(0.0, 100.0);
        assert_eq!(s.update(0.0, &InputState::new()), TickOutcome::Nudged);
        assert_eq!(s.score(), 0);
        // next tick is in bounds and the boxes still overlap
        assert_eq!(
            s.update(0.0, &InputState::new()),
            TickOutcome::Caught { score: 1 }
        );
    }

    #[test]
    fn test_large_step_is_clamped_to_canvas() {
        let mut s = session();
        s.target.pos = Vec2::new(40.0, 40.0);
        s.player.pos = Vec2::new(400.0, 400.0);
        s.update(10.0, &held(&[KEY_RIGHT, KEY_DOWN]));
        assert_eq!(s.player.pos, Vec2::new(480.0, 448.0));
    }

    #[test]
    fn test_player_stays_on_canvas_for_random_ticks() {
        let mut driver = StdRng::seed_from_u64(42);
        let mut s = session();
        s.reset();
        let keys = [KEY_UP, KEY_DOWN, KEY_LEFT, KEY_RIGHT];
        let mut last_score = 0;
        for _ in 0..5_000 {
            let mut input = InputState::new();
            for k in keys {
                if driver.gen_bool(0.4) {
                    input.press(k);
                }
            }
            let delta = driver.gen_range(0.0..0.2);
            s.update(delta, &input);
            let p = s.player.pos;
            assert!(p.x >= 0.0 && p.x <= 512.0, "x {} escaped", p.x);
            assert!(p.y >= 0.0 && p.y <= 480.0, "y {} escaped", p.y);
            assert!(s.score() >= last_score);
            last_score = s.score();
        }
    }

    #[test]
    fn test_toggle_pause_twice_runs_again() {
        let mut s = session();
        assert_eq!(s.toggle_pause(), RunState::Paused);
        assert!(s.is_paused());
        assert_eq!(s.toggle_pause(), RunState::Running);
        assert_eq!(s.run_state(), RunState::Running);
    }

    #[test]
    fn test_negative_delta_does_not_move() {
        let mut s = session();
        s.target.pos = Vec2::new(450.0, 420.0);
        s.player.pos = Vec2::new(200.0, 200.0);
        s.update(-1.0, &held(&[KEY_RIGHT]));
        assert_eq!(s.player.pos, Vec2::new(200.0, 200.0));
    }
}
