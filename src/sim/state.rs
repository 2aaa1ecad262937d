//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Aabb;
use crate::tuning::Tuning;

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Active gameplay
    Playing,
    /// Touched an enemy, waiting for revive
    Dead,
    /// Cleared the last level, waiting for restart
    Won,
}

impl SessionPhase {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionPhase::Playing)
    }
}

/// The player's square
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player_start,
            size: tuning.player_size,
            speed: tuning.player_speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }

    /// Where a freshly fired bullet appears (top-center)
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size / 2.0, self.pos.y)
    }
}

/// A bouncing enemy square
#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Shot this tick; compacted out after the bullet pass
    pub dead: bool,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// A coin waiting to be picked up
#[derive(Debug, Clone)]
pub struct Coin {
    /// Center when drawn; top-left of the pickup square
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
    pub points: u32,
}

impl Coin {
    pub fn bounds(&self) -> Aabb {
        Aabb::square(self.pos, self.size)
    }
}

/// A projectile travelling straight up
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    /// Hit an enemy this tick; compacted out after the bullet pass
    pub spent: bool,
}

impl Bullet {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance numbers in effect for this session
    pub tuning: Tuning,
    /// Current level, 1-based
    pub level: u32,
    pub score: u64,
    pub phase: SessionPhase,
    /// Timestamp (ms) at which the current level began
    pub level_start_ms: f64,
    /// Time spent on already-cleared levels (ms)
    pub total_ms: f64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub coins: Vec<Coin>,
    pub bullets: Vec<Bullet>,
    rng: Pcg32,
}

impl GameState {
    /// Create a session at level 1 with default tuning
    pub fn new(seed: u64, now_ms: f64) -> Self {
        Self::with_tuning(seed, now_ms, Tuning::default())
    }

    pub fn with_tuning(seed: u64, now_ms: f64, tuning: Tuning) -> Self {
        let mut state = Self {
            player: Player::new(&tuning),
            tuning,
            level: 1,
            score: 0,
            phase: SessionPhase::Playing,
            level_start_ms: now_ms,
            total_ms: 0.0,
            enemies: Vec::new(),
            coins: Vec::new(),
            bullets: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        };
        state.init_level(now_ms);
        state
    }

    /// Populate enemies and coins for the current level.
    ///
    /// Replaces every level-scoped collection, returns the phase to
    /// `Playing`, puts the player back at the start and restarts the level
    /// clock.
    pub fn init_level(&mut self, now_ms: f64) {
        let level = self.level;
        let t = &self.tuning;

        self.bullets.clear();
        self.enemies.clear();
        self.coins.clear();
        self.phase = SessionPhase::Playing;

        let enemy_count = t.enemy_count(level);
        let coin_count = t.coin_count(level);
        let speed = t.enemy_speed(level);

        for _ in 0..enemy_count {
            let x = self.rng.random::<f32>() * (t.field_width - t.enemy_size);
            let y = self.rng.random::<f32>() * t.enemy_spawn_band;
            let dy = t.enemy_base_dy + self.rng.random::<f32>() * level as f32;
            self.enemies.push(Enemy {
                pos: Vec2::new(x, y),
                vel: Vec2::new(speed, dy),
                size: t.enemy_size,
                dead: false,
            });
        }

        let points = t.coin_points(level);
        let coin_w = t.field_width - 2.0 * t.coin_margin_x;
        let coin_h = t.field_height - t.coin_margin_top - t.coin_margin_bottom;
        for _ in 0..coin_count {
            let x = self.rng.random::<f32>() * coin_w + t.coin_margin_x;
            let y = self.rng.random::<f32>() * coin_h + t.coin_margin_top;
            self.coins.push(Coin {
                pos: Vec2::new(x, y),
                size: t.coin_size,
                collected: false,
                points,
            });
        }

        self.player.pos = t.player_start;
        self.level_start_ms = now_ms;

        log::info!(
            "Level {} ready: {} enemies, {} coins worth {} each",
            level,
            enemy_count,
            coin_count,
            points
        );
    }

    /// Reset the whole session back to a clean level 1
    pub fn restart(&mut self, now_ms: f64) {
        self.level = 1;
        self.score = 0;
        self.total_ms = 0.0;
        self.init_level(now_ms);
    }

    /// Spawn a bullet at the player's muzzle
    pub fn fire(&mut self) {
        self.bullets.push(Bullet {
            pos: self.player.muzzle(),
            vel_y: self.tuning.bullet_speed,
            size: self.tuning.bullet_size,
            spent: false,
        });
    }

    /// True once every coin is picked up and every enemy is gone
    pub fn level_cleared(&self) -> bool {
        self.enemies.is_empty() && self.coins.iter().all(|c| c.collected)
    }

    /// Milliseconds spent on the current level so far
    pub fn level_elapsed_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.level_start_ms).max(0.0)
    }

    pub fn is_last_level(&self) -> bool {
        self.level >= self.tuning.last_level
    }
}
