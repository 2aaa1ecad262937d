//! Canvas Adventure - a single-screen arcade game
//!
//! Core modules:
//! - `sim`: Level state, per-tick movement, collisions and progression
//! - `renderer`: Drawing onto a 2D surface (canvas in the browser)
//! - `platform`: Keyboard input collection
//! - `persistence`: Key/value string storage (LocalStorage on web)
//! - `history`: Persisted list of completion times
//! - `settings` / `tuning`: Key bindings and data-driven game balance
//! - `game`: Platform-neutral driver tying the above together

pub mod game;
pub mod history;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use game::{Flow, Game};
pub use history::History;
pub use settings::{KeyBindings, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 30.0;
    /// Pixels per tick while a direction key is held
    pub const PLAYER_SPEED: f32 = 4.0;
    pub const PLAYER_START_X: f32 = 300.0;
    pub const PLAYER_START_Y: f32 = 350.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 25.0;
    /// Horizontal speed is this plus the level number
    pub const ENEMY_BASE_SPEED: f32 = 1.5;
    /// Minimum vertical speed; up to `level` more is added at random
    pub const ENEMY_BASE_DY: f32 = 1.0;
    /// Enemies spawn with y in [0, band) (upper half of the field)
    pub const ENEMY_SPAWN_BAND: f32 = 200.0;

    /// Coin defaults (radius when drawn, side of the pickup square)
    pub const COIN_SIZE: f32 = 10.0;
    pub const COIN_BASE_POINTS: u32 = 5;
    pub const COIN_POINTS_PER_LEVEL: u32 = 3;
    /// Coins keep this far from the side walls
    pub const COIN_MARGIN_X: f32 = 10.0;
    pub const COIN_MARGIN_TOP: f32 = 50.0;
    pub const COIN_MARGIN_BOTTOM: f32 = 100.0;

    /// Bullet defaults (negative = upward)
    pub const BULLET_SPEED: f32 = -6.0;
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;

    /// Score awarded per enemy shot down
    pub const KILL_BONUS: u32 = 10;

    /// Levels are numbered 1..=LAST_LEVEL
    pub const LAST_LEVEL: u32 = 3;

    /// Completion times kept in the history list
    pub const MAX_HISTORY: usize = 5;
}

/// Round milliseconds to seconds with 0.1s resolution
#[inline]
pub fn ms_to_tenths(ms: f64) -> f64 {
    (ms / 100.0).round() / 10.0
}
