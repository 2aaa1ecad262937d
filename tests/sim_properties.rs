use canvas_adventure::History;
use canvas_adventure::sim::{Action, GameState, MoveIntent, SessionPhase, TickInput, tick};
use glam::Vec2;
use proptest::prelude::*;

fn move_intent() -> impl Strategy<Value = MoveIntent> {
    (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
        |(up, down, left, right)| MoveIntent {
            up,
            down,
            left,
            right,
        },
    )
}

/// Completion times as the game records them, whole tenths of a second
fn run_seconds() -> impl Strategy<Value = f64> {
    (0u32..10_000).prop_map(|t| t as f64 / 10.0)
}

/// Keep the session alive: one stationary enemy parked in a corner
fn sandbox(seed: u64) -> GameState {
    let mut state = GameState::new(seed, 0.0);
    state.enemies.truncate(1);
    state.enemies[0].pos = Vec2::ZERO;
    state.enemies[0].vel = Vec2::ZERO;
    state.coins.clear();
    state
}

proptest! {
    #[test]
    fn player_stays_in_field(seed in any::<u64>(), moves in prop::collection::vec(move_intent(), 1..400)) {
        let mut state = sandbox(seed);
        for movement in moves {
            let input = TickInput { movement, ..Default::default() };
            tick(&mut state, &input);
            let p = state.player.pos;
            prop_assert!(p.x >= 0.0 && p.x <= 570.0, "x out of range: {}", p.x);
            prop_assert!(p.y >= 0.0 && p.y <= 370.0, "y out of range: {}", p.y);
        }
    }

    #[test]
    fn enemies_bounce_within_one_step(seed in any::<u64>(), level in 1u32..=3, ticks in 1usize..600) {
        let mut state = GameState::new(seed, 0.0);
        state.level = level;
        state.init_level(0.0);
        // Move the player out of harm's way so the run doesn't halt
        state.player.pos = Vec2::new(0.0, 370.0);
        state.coins.clear();

        for _ in 0..ticks {
            let before: Vec<(Vec2, Vec2)> = state.enemies.iter().map(|e| (e.pos, e.vel)).collect();
            tick(&mut state, &TickInput::default());
            if state.phase != SessionPhase::Playing {
                break;
            }
            for (enemy, (pos, vel)) in state.enemies.iter().zip(before) {
                let advanced = pos + vel;
                prop_assert_eq!(enemy.pos, advanced);
                let out_x = advanced.x < 0.0 || advanced.x > 600.0 - enemy.size;
                let out_y = advanced.y < 0.0 || advanced.y > 400.0 - enemy.size;
                prop_assert_eq!(enemy.vel.x == -vel.x, out_x);
                prop_assert_eq!(enemy.vel.y == -vel.y, out_y);
                prop_assert!(enemy.pos.x >= -vel.x.abs() && enemy.pos.x <= 575.0 + vel.x.abs());
                prop_assert!(enemy.pos.y >= -vel.y.abs() && enemy.pos.y <= 375.0 + vel.y.abs());
            }
        }
    }

    #[test]
    fn level_sizes_scale(seed in any::<u64>(), level in 1u32..=3) {
        let mut state = GameState::new(seed, 0.0);
        state.level = level;
        state.init_level(0.0);
        prop_assert_eq!(state.enemies.len(), level as usize + 1);
        prop_assert_eq!(state.coins.len(), level as usize * 2 + 2);
    }

    #[test]
    fn score_never_decreases(seed in any::<u64>(), steps in prop::collection::vec((move_intent(), any::<bool>()), 1..300)) {
        let mut state = GameState::new(seed, 0.0);
        let mut last = state.score;
        let mut collected: Vec<bool> = state.coins.iter().map(|c| c.collected).collect();
        for (i, (movement, fire)) in steps.into_iter().enumerate() {
            let actions = if fire { vec![Action::Fire] } else { Vec::new() };
            let level = state.level;
            tick(&mut state, &TickInput { movement, actions, now_ms: i as f64 * 16.0 });
            prop_assert!(state.score >= last);
            if state.level == level {
                // Collected flags only ever go false -> true
                for (was, coin) in collected.iter().zip(&state.coins) {
                    prop_assert!(!*was || coin.collected);
                }
            }
            collected = state.coins.iter().map(|c| c.collected).collect();
            last = state.score;
            if !state.phase.is_playing() {
                break;
            }
        }
    }

    #[test]
    fn history_never_exceeds_cap(wins in prop::collection::vec(run_seconds(), 0..30)) {
        let mut history = History::new();
        for (i, seconds) in wins.iter().enumerate() {
            history.record(format!("run {}", i), *seconds, 5);
            prop_assert!(history.len() <= 5);
        }
        let expected: Vec<f64> = wins.iter().rev().take(5).rev().copied().collect();
        let got: Vec<f64> = history.entries.iter().map(|r| r.time).collect();
        prop_assert_eq!(got, expected);

        let json = serde_json::to_string(&history).unwrap();
        prop_assert_eq!(History::from_json(&json), history);
    }
}

#[test]
fn level_completion_requires_both_conditions() {
    // Coins done, one enemy left
    let mut state = sandbox(1);
    tick(&mut state, &TickInput::default());
    assert_eq!(state.level, 1);

    // Enemies done, one coin left
    let mut state = GameState::new(1, 0.0);
    state.enemies.clear();
    state.coins.truncate(1);
    state.coins[0].pos = Vec2::new(20.0, 60.0);
    tick(&mut state, &TickInput::default());
    assert_eq!(state.level, 1);

    // Both done
    state.coins.clear();
    tick(&mut state, &TickInput::default());
    assert_eq!(state.level, 2);
}
