//! Player settings and preferences
//!
//! Persisted separately from the history under its own storage key.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};
use crate::sim::MoveIntent;
use crate::tuning::Tuning;

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Revive,
}

/// Keys (lowercase `KeyboardEvent.key` values) bound to each control
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub fire: Vec<String>,
    pub revive: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|k| k.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: keys(&["w", "arrowup"]),
            down: keys(&["s", "arrowdown"]),
            left: keys(&["a", "arrowleft"]),
            right: keys(&["d", "arrowright"]),
            fire: keys(&[" "]),
            revive: keys(&["r"]),
        }
    }
}

impl KeyBindings {
    /// Look up a lowercase key
    pub fn binding_for(&self, key: &str) -> Option<Binding> {
        let table = [
            (&self.up, Binding::Up),
            (&self.down, Binding::Down),
            (&self.left, Binding::Left),
            (&self.right, Binding::Right),
            (&self.fire, Binding::Fire),
            (&self.revive, Binding::Revive),
        ];
        table
            .into_iter()
            .find(|(bound, _)| bound.iter().any(|k| k == key))
            .map(|(_, binding)| binding)
    }

    /// Collapse a set of held keys into movement directions
    pub fn movement<'a>(&self, held: impl IntoIterator<Item = &'a str>) -> MoveIntent {
        let mut intent = MoveIntent::default();
        for key in held {
            match self.binding_for(key) {
                Some(Binding::Up) => intent.up = true,
                Some(Binding::Down) => intent.down = true,
                Some(Binding::Left) => intent.left = true,
                Some(Binding::Right) => intent.right = true,
                _ => {}
            }
        }
        intent
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub tuning: Tuning,
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "canvas_adventure_settings";

    /// Load settings from the store, falling back to defaults
    pub fn load(store: &impl KeyValueStore) -> Self {
        if let Some(json) = store.get(Self::STORAGE_KEY) {
            match serde_json::from_str::<Settings>(&json) {
                Ok(mut settings) => {
                    if !settings.tuning.is_valid() {
                        log::warn!("Ignoring unusable tuning {:?}, using defaults", settings.tuning);
                        settings.tuning = Tuning::default();
                    }
                    log::info!("Loaded settings from storage");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to the store
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
