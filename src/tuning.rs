//! Data-driven game balance
//!
//! Every gameplay number lives here so a JSON override can rebalance the
//! game without a rebuild. Missing fields fall back to [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field_width: f32,
    pub field_height: f32,

    pub player_size: f32,
    pub player_speed: f32,
    pub player_start: Vec2,

    pub enemy_size: f32,
    pub enemy_base_speed: f32,
    pub enemy_base_dy: f32,
    pub enemy_spawn_band: f32,

    pub coin_size: f32,
    pub coin_base_points: u32,
    pub coin_points_per_level: u32,
    pub coin_margin_x: f32,
    pub coin_margin_top: f32,
    pub coin_margin_bottom: f32,

    pub bullet_speed: f32,
    pub bullet_size: Vec2,
    pub kill_bonus: u32,

    pub last_level: u32,
    pub max_history: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_start: Vec2::new(PLAYER_START_X, PLAYER_START_Y),

            enemy_size: ENEMY_SIZE,
            enemy_base_speed: ENEMY_BASE_SPEED,
            enemy_base_dy: ENEMY_BASE_DY,
            enemy_spawn_band: ENEMY_SPAWN_BAND,

            coin_size: COIN_SIZE,
            coin_base_points: COIN_BASE_POINTS,
            coin_points_per_level: COIN_POINTS_PER_LEVEL,
            coin_margin_x: COIN_MARGIN_X,
            coin_margin_top: COIN_MARGIN_TOP,
            coin_margin_bottom: COIN_MARGIN_BOTTOM,

            bullet_speed: BULLET_SPEED,
            bullet_size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            kill_bonus: KILL_BONUS,

            last_level: LAST_LEVEL,
            max_history: MAX_HISTORY,
        }
    }
}

impl Tuning {
    /// Whether these numbers can run a session without breaking the physics.
    ///
    /// Every value must be finite, every entity must fit inside the field,
    /// and there must be at least one level and one history slot.
    pub fn is_valid(&self) -> bool {
        let numbers = [
            self.field_width,
            self.field_height,
            self.player_size,
            self.player_speed,
            self.player_start.x,
            self.player_start.y,
            self.enemy_size,
            self.enemy_base_speed,
            self.enemy_base_dy,
            self.enemy_spawn_band,
            self.coin_size,
            self.coin_margin_x,
            self.coin_margin_top,
            self.coin_margin_bottom,
            self.bullet_speed,
            self.bullet_size.x,
            self.bullet_size.y,
        ];
        if !numbers.iter().all(|n| n.is_finite()) {
            return false;
        }

        let fits = |size: f32| size > 0.0 && size < self.field_width && size < self.field_height;
        fits(self.player_size)
            && fits(self.enemy_size)
            && fits(self.coin_size)
            && self.last_level >= 1
            && self.max_history >= 1
    }

    /// Number of enemies spawned on `level`
    pub fn enemy_count(&self, level: u32) -> usize {
        (level + 1) as usize
    }

    /// Number of coins spawned on `level`
    pub fn coin_count(&self, level: u32) -> usize {
        (level * 2 + 2) as usize
    }

    /// Points a coin is worth on `level`
    pub fn coin_points(&self, level: u32) -> u32 {
        self.coin_base_points + self.coin_points_per_level * level
    }

    /// Horizontal enemy speed on `level`
    pub fn enemy_speed(&self, level: u32) -> f32 {
        self.enemy_base_speed + level as f32
    }

    /// Field size as a vector
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }
}
