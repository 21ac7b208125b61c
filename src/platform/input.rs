//! Keyboard polling and press-edge detection

use std::collections::HashSet;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Confirm,
    Restart,
    Quit,
}

impl Key {
    pub const ALL: [Key; 7] = [
        Key::Left,
        Key::Right,
        Key::Fire,
        Key::Pause,
        Key::Confirm,
        Key::Restart,
        Key::Quit,
    ];
}

/// Anything that can report whether a key is held right now
pub trait InputSource {
    fn is_key_down(&self, key: Key) -> bool;
}

/// Turns held-key polling into a [`TickInput`]
///
/// Movement and fire follow the held state; pause, confirm and restart only
/// fire on the frame the key goes down.
#[derive(Debug, Default)]
pub struct KeyEdgeTracker {
    previous: HashSet<Key>,
}

impl KeyEdgeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample every key and build this frame's input
    pub fn poll(&mut self, source: &dyn InputSource) -> TickInput {
        let down: HashSet<Key> = Key::ALL
            .into_iter()
            .filter(|&key| source.is_key_down(key))
            .collect();
        let pressed = |key: Key| down.contains(&key) && !self.previous.contains(&key);

        let input = TickInput {
            left: down.contains(&Key::Left),
            right: down.contains(&Key::Right),
            fire: down.contains(&Key::Fire),
            pause: pressed(Key::Pause),
            confirm: pressed(Key::Confirm),
            restart: pressed(Key::Restart),
            idle_mode: false,
        };
        self.previous = down;
        input
    }

    /// Quit is checked by the host loop, not the simulation
    pub fn quit_held(&self) -> bool {
        self.previous.contains(&Key::Quit)
    }
}

/// Input source backed by a set the caller edits (tests, scripted hosts)
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    pub held: HashSet<Key>,
}

impl ScriptedInput {
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }
}

impl InputSource for ScriptedInput {
    fn is_key_down(&self, key: Key) -> bool {
        self.held.contains(&key)
    }
}
