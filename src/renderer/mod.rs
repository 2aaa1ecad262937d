//! Rendering module
//!
//! Draws a [`GameState`] onto any [`Surface`]. The browser implementation
//! wraps a canvas 2D context; tests use a recorder.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

use std::fmt;

use glam::Vec2;

use crate::ms_to_tenths;
use crate::sim::{GameState, SessionPhase};

/// Colours, as CSS strings
pub mod palette {
    pub const PLAYER: &str = "cyan";
    pub const ENEMY: &str = "red";
    pub const COIN: &str = "gold";
    pub const BULLET: &str = "lime";
    pub const OVERLAY: &str = "rgba(0,0,0,0.8)";
    pub const TEXT: &str = "white";
    pub const DIM_TEXT: &str = "#ccc";
}

/// The drawing primitives the game needs
pub trait Surface {
    /// Clear the whole surface
    fn clear(&mut self);
    fn set_fill(&mut self, color: &str);
    fn fill_rect(&mut self, pos: Vec2, size: Vec2);
    fn fill_circle(&mut self, center: Vec2, radius: f32);
    /// Select a font by pixel size
    fn set_font_size(&mut self, px: f32);
    /// Width of `text` in the current font
    fn measure_text(&self, text: &str) -> f32;
    /// Draw text with its left baseline at `pos`
    fn fill_text(&mut self, text: &str, pos: Vec2);
}

/// Heads-up display block: level, score and time on the current level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub level: u32,
    pub score: u64,
    /// Seconds on this level, 0.1s resolution
    pub level_seconds: f64,
}

impl Hud {
    pub fn from_state(state: &GameState, now_ms: f64) -> Self {
        Self {
            level: state.level,
            score: state.score,
            level_seconds: ms_to_tenths(state.level_elapsed_ms(now_ms)),
        }
    }

    /// One label per HUD row
    pub fn rows(&self) -> [String; 3] {
        [
            format!("Level: {}", self.level),
            format!("Score: {}", self.score),
            format!("Time: {:.1}s", self.level_seconds),
        ]
    }
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rows().join("\n"))
    }
}

/// Draw `text` horizontally centered on a field of width `field_width`
pub fn draw_centered_text(
    surface: &mut impl Surface,
    field_width: f32,
    text: &str,
    y: f32,
    size: f32,
    color: &str,
) {
    surface.set_fill(color);
    surface.set_font_size(size);
    let width = surface.measure_text(text);
    surface.fill_text(text, Vec2::new((field_width - width) / 2.0, y));
}

/// Draw a full frame: entities, then the death or win overlay if any.
///
/// `revive_key` is shown in the overlay prompts.
pub fn draw_frame(state: &GameState, surface: &mut impl Surface, revive_key: &str) {
    surface.clear();

    surface.set_fill(palette::COIN);
    for coin in state.coins.iter().filter(|c| !c.collected) {
        surface.fill_circle(coin.pos, coin.size);
    }

    surface.set_fill(palette::ENEMY);
    for enemy in &state.enemies {
        surface.fill_rect(enemy.pos, Vec2::splat(enemy.size));
    }

    surface.set_fill(palette::BULLET);
    for bullet in &state.bullets {
        surface.fill_rect(bullet.pos, bullet.size);
    }

    surface.set_fill(palette::PLAYER);
    surface.fill_rect(state.player.pos, Vec2::splat(state.player.size));

    match state.phase {
        SessionPhase::Playing => {}
        SessionPhase::Dead => draw_death_screen(state, surface, revive_key),
        SessionPhase::Won => draw_win_screen(state, surface, revive_key),
    }
}

fn draw_overlay(state: &GameState, surface: &mut impl Surface) {
    surface.set_fill(palette::OVERLAY);
    surface.fill_rect(Vec2::ZERO, state.tuning.field());
}

fn draw_death_screen(state: &GameState, surface: &mut impl Surface, revive_key: &str) {
    let w = state.tuning.field_width;
    draw_overlay(state, surface);
    draw_centered_text(surface, w, "💀 YOU DIED 💀", 180.0, 40.0, palette::ENEMY);
    let prompt = format!("Press {} to Revive", revive_key.to_uppercase());
    draw_centered_text(surface, w, &prompt, 250.0, 26.0, palette::TEXT);
}

fn draw_win_screen(state: &GameState, surface: &mut impl Surface, revive_key: &str) {
    let w = state.tuning.field_width;
    draw_overlay(state, surface);
    draw_centered_text(surface, w, "🏆 YOU WIN! 🏆", 170.0, 40.0, palette::COIN);
    let total = format!("Total Time: {:.1}s", ms_to_tenths(state.total_ms));
    draw_centered_text(surface, w, &total, 230.0, 24.0, palette::TEXT);
    let score = format!("Final Score: {}", state.score);
    draw_centered_text(surface, w, &score, 270.0, 24.0, palette::TEXT);
    let prompt = format!("Press {} to Restart", revive_key.to_uppercase());
    draw_centered_text(surface, w, &prompt, 320.0, 22.0, palette::DIM_TEXT);
}
