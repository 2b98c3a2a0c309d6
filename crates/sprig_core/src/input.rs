//! Keyboard state with level-triggered and edge-triggered queries.
//!
//! Edges are computed against the snapshot taken at the end of the previous
//! tick rather than from individual events:
//!
//! - **Held:** `is_held(key)` is true every tick the key is physically down.
//! - **Just pressed / just released:** true only on the tick where the current
//!   snapshot differs from the previous one.
//!
//! The host calls `end_tick()` after each fixed simulation step. A frame that
//! runs zero steps leaves the previous snapshot untouched, so a press that
//! arrives between ticks is still reported by the next step.

use std::collections::HashSet;
use std::hash::Hash;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    Enter,
    W,
    A,
    S,
    D,
}

#[derive(Debug, Clone)]
pub struct InputState<K = Key> {
    current: HashSet<K>,
    previous: HashSet<K>,
}

impl<K: Copy + Eq + Hash> InputState<K> {
    pub fn new() -> Self {
        Self {
            current: HashSet::new(),
            previous: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: K) {
        self.current.insert(key);
    }

    pub fn key_up(&mut self, key: K) {
        self.current.remove(&key);
    }

    /// Replace the whole current snapshot, e.g. from a scripted input frame.
    pub fn set_held<I: IntoIterator<Item = K>>(&mut self, keys: I) {
        self.current.clear();
        self.current.extend(keys);
    }

    pub fn is_held(&self, key: K) -> bool {
        self.current.contains(&key)
    }

    pub fn is_just_pressed(&self, key: K) -> bool {
        self.current.contains(&key) && !self.previous.contains(&key)
    }

    pub fn is_just_released(&self, key: K) -> bool {
        !self.current.contains(&key) && self.previous.contains(&key)
    }

    pub fn end_tick(&mut self) {
        self.previous.clone_from(&self.current);
    }
}

impl<K: Copy + Eq + Hash> Default for InputState<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
        assert!(!input.is_just_released(Key::A));
    }

    #[test]
    fn press_is_an_edge_for_one_tick_only() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.is_just_pressed(Key::Space));
        input.end_tick();
        assert!(input.is_held(Key::Space));
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn release_is_reported_against_previous_tick() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.end_tick();
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
        input.end_tick();
        assert!(!input.is_just_released(Key::A));
    }

    #[test]
    fn press_and_release_within_one_tick_leaves_no_edge() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        input.key_up(Key::D);
        assert!(!input.is_just_pressed(Key::D));
        assert!(!input.is_just_released(Key::D));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::A);
        assert!(!input.is_just_released(Key::A));
        assert!(!input.is_held(Key::A));
    }

    #[test]
    fn set_held_replaces_snapshot() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.end_tick();
        input.set_held([Key::D]);
        assert!(input.is_just_released(Key::A));
        assert!(input.is_just_pressed(Key::D));
    }

    #[test]
    fn generic_key_type() {
        let mut input: InputState<u32> = InputState::new();
        input.key_down(7);
        assert!(input.is_just_pressed(7));
        assert!(!input.is_held(8));
    }
}
