//! Platform abstraction layer
//!
//! Browser event plumbing lives in the binary; this module holds the
//! platform-neutral half:
//! - Input events (held keys, queued actions)

pub mod input;

pub use input::InputState;
