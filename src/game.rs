//! Platform-neutral game driver
//!
//! Owns the session state, input, settings, history and store. The browser
//! entry point forwards key events and animation frames here and keeps
//! requesting frames while [`Flow::Continue`] comes back.

use crate::history::{History, format_date};
use crate::persistence::KeyValueStore;
use crate::platform::InputState;
use crate::renderer::{Hud, Surface, draw_frame};
use crate::settings::Settings;
use crate::sim::{Action, GameEvent, GameState, TickInput, tick};

pub use crate::sim::Flow;

/// What the frame loop needs to know after a frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub flow: Flow,
    pub hud: Hud,
    /// A run was just recorded; the history display should refresh
    pub history_updated: bool,
}

pub struct Game<S: KeyValueStore> {
    pub state: GameState,
    pub settings: Settings,
    pub history: History,
    input: InputState,
    store: S,
    /// Whether the frame loop is currently scheduled
    running: bool,
}

impl<S: KeyValueStore> Game<S> {
    /// Start a session at level 1, loading settings and history from `store`
    pub fn new(seed: u64, now_ms: f64, mut store: S) -> Self {
        let settings = Settings::load(&store);
        if store.get(Settings::STORAGE_KEY).is_none() {
            // Write the defaults out so there is something to edit
            if let Err(e) = settings.save(&mut store) {
                log::warn!("Could not save default settings: {}", e);
            }
        }
        let history = History::load(&store);
        let state = GameState::with_tuning(seed, now_ms, settings.tuning.clone());
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            settings,
            history,
            input: InputState::new(),
            store,
            running: true,
        }
    }

    /// Handle a key press.
    ///
    /// Returns true when the frame loop was halted and a revive/restart has
    /// been queued; the caller must schedule a frame to pick it up.
    pub fn key_down(&mut self, key: &str) -> bool {
        let halted = !self.state.phase.is_playing();
        let action = self.input.key_down(key, &self.settings.keys, halted);
        if action == Some(Action::Revive) && !self.running {
            self.running = true;
            return true;
        }
        false
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// The platform could not schedule the next frame.
    ///
    /// Marks the loop as stopped so the next revive press restarts it.
    pub fn loop_stopped(&mut self) {
        self.running = false;
    }

    /// Window lost focus; key-ups will not arrive
    pub fn blur(&mut self) {
        self.input.release_all();
    }

    /// Run one tick and draw the result
    pub fn frame(&mut self, now_ms: f64, surface: &mut impl Surface) -> FrameOutcome {
        let input = TickInput {
            movement: self.input.movement(&self.settings.keys),
            actions: self.input.drain_actions(),
            now_ms,
        };
        let report = tick(&mut self.state, &input);

        let mut history_updated = false;
        for event in &report.events {
            if let GameEvent::Won { seconds, .. } = event {
                self.record_win(*seconds, now_ms);
                history_updated = true;
            }
        }

        let revive_key = self.revive_key();
        draw_frame(&self.state, surface, &revive_key);

        self.running = report.flow == Flow::Continue;
        FrameOutcome {
            flow: report.flow,
            hud: Hud::from_state(&self.state, now_ms),
            history_updated,
        }
    }

    /// Label for the revive/restart key in prompts
    pub fn revive_key(&self) -> String {
        self.settings
            .keys
            .revive
            .first()
            .cloned()
            .unwrap_or_else(|| "r".to_string())
    }

    fn record_win(&mut self, seconds: f64, now_ms: f64) {
        self.history
            .record(format_date(now_ms), seconds, self.state.tuning.max_history);
        if let Err(e) = self.history.save(&mut self.store) {
            log::warn!("Could not save history: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, StoreError};
    use crate::renderer::tests::Recorder;
    use crate::sim::SessionPhase;

    fn clear_level<S: KeyValueStore>(game: &mut Game<S>, now_ms: f64) -> FrameOutcome {
        game.state.enemies.clear();
        let at = game.state.player.pos;
        for c in &mut game.state.coins {
            c.pos = at;
        }
        game.frame(now_ms, &mut Recorder::default())
    }

    fn win_run<S: KeyValueStore>(game: &mut Game<S>, start_ms: f64) -> FrameOutcome {
        clear_level(game, start_ms + 10_000.0);
        clear_level(game, start_ms + 20_000.0);
        clear_level(game, start_ms + 30_050.0)
    }

    #[test]
    fn test_death_and_revive() {
        let mut game = Game::new(9, 0.0, MemoryStore::new());
        game.state.score = 40;
        game.state.enemies[0].pos = game.state.player.pos;
        game.state.enemies[0].vel = glam::Vec2::ZERO;

        let out = game.frame(16.0, &mut Recorder::default());
        assert_eq!(out.flow, Flow::Halt);
        assert_eq!(game.state.phase, SessionPhase::Dead);
        assert!(!game.running);

        // Fire while dead queues nothing useful and doesn't restart the loop
        assert!(!game.key_down(" "));
        // Revive restarts the loop exactly once
        assert!(game.key_down("R"));
        assert!(!game.key_down("r"));

        let mut rec = Recorder::default();
        let out = game.frame(5000.0, &mut rec);
        assert_eq!(out.flow, Flow::Continue);
        assert_eq!(game.state.phase, SessionPhase::Playing);
        assert_eq!(game.state.level, 1);
        assert_eq!(game.state.score, 0);
        assert_eq!(game.state.total_ms, 0.0);
        assert!(game.state.bullets.is_empty());
        assert!(rec.texts().is_empty());
    }

    #[test]
    fn test_fire_before_revive_is_dropped() {
        let mut game = Game::new(9, 0.0, MemoryStore::new());
        game.state.enemies[0].pos = game.state.player.pos;
        game.state.enemies[0].vel = glam::Vec2::ZERO;
        game.frame(16.0, &mut Recorder::default());
        assert_eq!(game.state.phase, SessionPhase::Dead);

        // Revive, then fire before the next frame runs
        assert!(game.key_down("r"));
        assert!(!game.key_down(" "));
        game.frame(32.0, &mut Recorder::default());
        assert_eq!(game.state.phase, SessionPhase::Playing);
        assert!(game.state.bullets.is_empty());
    }

    #[test]
    fn test_revive_restarts_loop_after_scheduling_failure() {
        let mut game = Game::new(9, 0.0, MemoryStore::new());
        assert!(!game.key_down("r"));
        game.loop_stopped();
        assert!(game.key_down("r"));
        assert!(game.running);
    }

    #[test]
    fn test_default_settings_written_once() {
        let game = Game::new(1, 0.0, MemoryStore::new());
        assert_eq!(Settings::load(&game.store), Settings::default());

        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"keys": {"revive": ["enter"]}}"#)
            .unwrap();
        let game = Game::new(1, 0.0, store);
        assert_eq!(
            game.store.get(Settings::STORAGE_KEY).as_deref(),
            Some(r#"{"keys": {"revive": ["enter"]}}"#)
        );
    }

    #[test]
    fn test_unusable_saved_tuning_still_plays() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"tuning": {"field_width": 20.0}}"#)
            .unwrap();
        let mut game = Game::new(4, 0.0, store);
        assert_eq!(game.state.tuning, crate::tuning::Tuning::default());

        game.key_down("a");
        let out = game.frame(16.0, &mut Recorder::default());
        assert_eq!(out.hud.level, 1);
        assert!(game.state.player.pos.x >= 0.0);
    }

    #[test]
    fn test_revive_key_while_running_does_nothing() {
        let mut game = Game::new(9, 0.0, MemoryStore::new());
        assert!(!game.key_down("r"));
        game.frame(16.0, &mut Recorder::default());
        assert_eq!(game.state.phase, SessionPhase::Playing);
    }

    #[test]
    fn test_held_keys_move_player() {
        let mut game = Game::new(9, 0.0, MemoryStore::new());
        game.state.enemies.iter_mut().for_each(|e| {
            e.pos = glam::Vec2::new(0.0, 0.0);
            e.vel = glam::Vec2::ZERO;
        });
        game.key_down("A");
        game.frame(16.0, &mut Recorder::default());
        game.frame(32.0, &mut Recorder::default());
        assert_eq!(game.state.player.pos.x, 292.0);

        game.key_up("a");
        game.frame(48.0, &mut Recorder::default());
        assert_eq!(game.state.player.pos.x, 292.0);

        game.key_down("d");
        game.blur();
        game.frame(64.0, &mut Recorder::default());
        assert_eq!(game.state.player.pos.x, 292.0);
    }

    #[test]
    fn test_fire_key_spawns_bullet() {
        let mut game = Game::new(9, 0.0, MemoryStore::new());
        game.state.enemies.iter_mut().for_each(|e| {
            e.pos = glam::Vec2::new(0.0, 0.0);
            e.vel = glam::Vec2::ZERO;
        });
        game.key_down(" ");
        game.frame(16.0, &mut Recorder::default());
        assert_eq!(game.state.bullets.len(), 1);
        // Holding the key doesn't keep firing
        game.frame(32.0, &mut Recorder::default());
        assert_eq!(game.state.bullets.len(), 1);
    }

    #[test]
    fn test_win_records_history() {
        let mut game = Game::new(11, 0.0, MemoryStore::new());
        let out = win_run(&mut game, 0.0);

        assert_eq!(out.flow, Flow::Halt);
        assert!(out.history_updated);
        assert_eq!(game.state.phase, SessionPhase::Won);
        assert_eq!(game.history.len(), 1);
        assert_eq!(game.history.entries[0].time, 30.1);

        // Persisted and readable by a fresh session
        let reloaded = History::load(&game.store);
        assert_eq!(reloaded, game.history);

        // Restart goes back to level 1 cleanly
        assert!(game.key_down("r"));
        let out = game.frame(40_000.0, &mut Recorder::default());
        assert_eq!(out.flow, Flow::Continue);
        assert!(!out.history_updated);
        assert_eq!(game.state.level, 1);
        assert_eq!(game.state.enemies.len(), 2);
        assert_eq!(game.state.coins.len(), 4);
        assert_eq!(out.hud.score, 0);
        assert_eq!(out.hud.level_seconds, 0.0);
    }

    #[test]
    fn test_history_capped_across_many_wins() {
        let mut game = Game::new(11, 0.0, MemoryStore::new());
        for i in 0..7 {
            let start = i as f64 * 100_000.0;
            if i > 0 {
                assert!(game.key_down("r"));
                game.frame(start, &mut Recorder::default());
            }
            win_run(&mut game, start);
            assert!(game.history.len() <= 5);
        }
        assert_eq!(History::load(&game.store).len(), 5);
    }

    #[test]
    fn test_history_loaded_at_startup() {
        let mut store = MemoryStore::new();
        store
            .set(History::STORAGE_KEY, r#"[{"date":"then","time":"44.0"}]"#)
            .unwrap();
        let game = Game::new(1, 0.0, store);
        assert_eq!(game.history.lines(), vec!["1. then – 44.0s"]);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::WriteRejected {
                key: key.to_string(),
                reason: "read only".into(),
            })
        }
    }

    #[test]
    fn test_failed_save_is_not_fatal() {
        let mut game = Game::new(3, 0.0, ReadOnlyStore);
        let out = win_run(&mut game, 0.0);
        assert_eq!(out.flow, Flow::Halt);
        assert_eq!(game.history.len(), 1);
    }

    #[test]
    fn test_settings_drive_bindings() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"keys": {"revive": ["enter"]}}"#)
            .unwrap();
        let mut game = Game::new(2, 0.0, store);
        assert_eq!(game.revive_key(), "enter");

        game.state.enemies[0].pos = game.state.player.pos;
        game.frame(16.0, &mut Recorder::default());
        assert!(!game.key_down("r"));
        assert!(game.key_down("Enter"));
    }
}
