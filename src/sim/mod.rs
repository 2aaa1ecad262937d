//! Game simulation module
//!
//! All gameplay logic lives here:
//! - Constant per-tick movement (no time scaling)
//! - Seeded RNG only, so a seed reproduces level layouts
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, bounce_off_walls, clamp_to_field};
pub use state::{Bullet, Coin, Enemy, GameState, Player, SessionPhase};
pub use tick::{Action, Flow, GameEvent, MoveIntent, TickInput, TickReport, apply_action, tick};
