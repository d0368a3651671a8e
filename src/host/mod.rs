//! Boundary between the game and the platform hosting it
//!
//! The host feeds direction, restart and exit events in, and receives the
//! final score as a small JSON document when the player exits.

pub mod bridge;

pub use bridge::{ExitPayload, HostEvent};
