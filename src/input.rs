//! Held-key tracking.

use std::collections::HashSet;

use crate::config::KeyBindings;

/// Set of key codes currently held down. Written by key events, only read by
/// the session update.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    held: HashSet<u32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: u32) {
        self.held.insert(code);
    }

    pub fn release(&mut self, code: u32) {
        self.held.remove(&code);
    }

    pub fn is_held(&self, code: u32) -> bool {
        self.held.contains(&code)
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Held directions in up, down, left, right order.
    pub fn directions<'a>(
        &'a self,
        keys: &'a KeyBindings,
    ) -> impl Iterator<Item = Direction> + 'a {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.is_held(d.key(keys)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn key(self, keys: &KeyBindings) -> u32 {
        match self {
            Direction::Up => keys.up,
            Direction::Down => keys.down,
            Direction::Left => keys.left,
            Direction::Right => keys.right,
        }
    }

    /// Unit step in canvas space (y grows downward).
    pub fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}
