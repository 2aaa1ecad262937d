//! Per-frame simulation tick
//!
//! One call advances the game by one display refresh. Movement is a constant
//! step per tick, not scaled by elapsed time.

use glam::Vec2;

use super::collision::{bounce_off_walls, clamp_to_field};
use super::state::{GameState, SessionPhase};
use crate::ms_to_tenths;

/// Directions held down at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Discrete actions queued by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shoot a bullet (ignored unless playing)
    Fire,
    /// Revive after death or restart after a win (ignored while playing)
    Revive,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Actions queued since the previous tick, in arrival order
    pub actions: Vec<Action>,
    /// Wall-clock timestamp of this tick (ms)
    pub now_ms: f64,
}

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CoinCollected { points: u32 },
    EnemyKilled,
    PlayerDied,
    Revived,
    LevelCleared { level: u32, elapsed_ms: f64 },
    /// Last level cleared; `seconds` is the run total with 0.1s resolution
    Won { seconds: f64, score: u64 },
}

/// Whether the frame loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Halt,
}

/// Result of a tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub flow: Flow,
    pub events: Vec<GameEvent>,
}

/// Apply one queued action to the session
pub fn apply_action(state: &mut GameState, action: Action, now_ms: f64, events: &mut Vec<GameEvent>) {
    match action {
        Action::Fire => {
            if state.phase.is_playing() {
                state.fire();
            }
        }
        Action::Revive => {
            if !state.phase.is_playing() {
                log::info!("Restarting from {:?} at level {}", state.phase, state.level);
                state.restart(now_ms);
                events.push(GameEvent::Revived);
            }
        }
    }
}

/// Advance the game by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> TickReport {
    let mut events = Vec::new();
    let now_ms = input.now_ms;

    for &action in &input.actions {
        apply_action(state, action, now_ms, &mut events);
    }

    // Halted sessions only wake up through a revive
    if !state.phase.is_playing() {
        return TickReport {
            flow: Flow::Halt,
            events,
        };
    }

    move_player(state, input.movement);
    move_enemies(state);
    move_bullets(state);

    collect_coins(state, &mut events);
    check_enemy_contact(state, &mut events);
    resolve_bullet_hits(state, &mut events);

    check_level_complete(state, now_ms, &mut events);

    let flow = if state.phase.is_playing() {
        Flow::Continue
    } else {
        Flow::Halt
    };
    TickReport { flow, events }
}

fn move_player(state: &mut GameState, movement: MoveIntent) {
    let player = &mut state.player;
    let mut delta = Vec2::ZERO;
    if movement.up {
        delta.y -= player.speed;
    }
    if movement.down {
        delta.y += player.speed;
    }
    if movement.left {
        delta.x -= player.speed;
    }
    if movement.right {
        delta.x += player.speed;
    }
    player.pos = clamp_to_field(player.pos + delta, player.size, state.tuning.field());
}

fn move_enemies(state: &mut GameState) {
    let field = state.tuning.field();
    for enemy in &mut state.enemies {
        enemy.pos += enemy.vel;
        enemy.vel = bounce_off_walls(enemy.pos, enemy.vel, enemy.size, field);
    }
}

fn move_bullets(state: &mut GameState) {
    for bullet in &mut state.bullets {
        bullet.pos.y += bullet.vel_y;
    }
    state.bullets.retain(|b| b.pos.y > 0.0);
}

fn collect_coins(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.bounds();
    for coin in state.coins.iter_mut().filter(|c| !c.collected) {
        if coin.bounds().overlaps(&player) {
            coin.collected = true;
            state.score += coin.points as u64;
            events.push(GameEvent::CoinCollected {
                points: coin.points,
            });
        }
    }
}

fn check_enemy_contact(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player = state.player.bounds();
    let touched = state.enemies.iter().any(|e| e.bounds().overlaps(&player));
    if touched && state.phase != SessionPhase::Dead {
        log::info!("Player died on level {} with score {}", state.level, state.score);
        state.phase = SessionPhase::Dead;
        events.push(GameEvent::PlayerDied);
    }
}

/// Each bullet can take out at most one enemy; the first enemy it overlaps
/// (in storage order) wins.
fn resolve_bullet_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let kill_bonus = state.tuning.kill_bonus as u64;
    for bullet in &mut state.bullets {
        let bounds = bullet.bounds();
        let target = state
            .enemies
            .iter_mut()
            .find(|e| !e.dead && bounds.overlaps(&e.bounds()));
        if let Some(enemy) = target {
            enemy.dead = true;
            bullet.spent = true;
            state.score += kill_bonus;
            log::debug!("Enemy down at ({:.0}, {:.0})", enemy.pos.x, enemy.pos.y);
            events.push(GameEvent::EnemyKilled);
        }
    }
    state.enemies.retain(|e| !e.dead);
    state.bullets.retain(|b| !b.spent);
}

fn check_level_complete(state: &mut GameState, now_ms: f64, events: &mut Vec<GameEvent>) {
    if !state.level_cleared() {
        return;
    }

    let elapsed_ms = state.level_elapsed_ms(now_ms);
    state.total_ms += elapsed_ms;
    events.push(GameEvent::LevelCleared {
        level: state.level,
        elapsed_ms,
    });
    log::info!(
        "Level {} cleared in {:.1}s",
        state.level,
        ms_to_tenths(elapsed_ms)
    );

    if state.is_last_level() {
        let seconds = ms_to_tenths(state.total_ms);
        state.phase = SessionPhase::Won;
        log::info!("Run complete in {:.1}s, final score {}", seconds, state.score);
        events.push(GameEvent::Won {
            seconds,
            score: state.score,
        });
    } else {
        state.level += 1;
        state.init_level(now_ms);
    }
}
