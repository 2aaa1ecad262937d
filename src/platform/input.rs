//! Keyboard input collection
//!
//! Key events arrive between ticks. They only touch the held-key set and the
//! action queue; the tick reads a snapshot of both once per frame.

use std::collections::HashSet;

use crate::settings::{Binding, KeyBindings};
use crate::sim::{Action, MoveIntent};

/// Held keys plus the queue of discrete actions
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Lowercase keys currently held down
    pressed: HashSet<String>,
    /// Actions waiting for the next tick, oldest first
    actions: Vec<Action>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns the action queued by it, if any.
    ///
    /// While the frame loop is `halted` only revive is queued; a fire press
    /// would otherwise go off right after the restart.
    pub fn key_down(&mut self, key: &str, bindings: &KeyBindings, halted: bool) -> Option<Action> {
        let key = key.to_lowercase();
        let action = match bindings.binding_for(&key) {
            Some(Binding::Fire) if !halted => Some(Action::Fire),
            Some(Binding::Revive) => Some(Action::Revive),
            _ => None,
        };
        self.pressed.insert(key);
        if let Some(action) = action {
            self.actions.push(action);
        }
        action
    }

    /// Record a key release
    pub fn key_up(&mut self, key: &str) {
        self.pressed.remove(&key.to_lowercase());
    }

    /// Movement directions for the held keys
    pub fn movement(&self, bindings: &KeyBindings) -> MoveIntent {
        bindings.movement(self.pressed.iter().map(String::as_str))
    }

    /// Take every queued action, leaving the queue empty
    pub fn drain_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    /// Forget held keys (focus loss means key-ups may never arrive)
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}
