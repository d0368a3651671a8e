//! Mini Snake - single-player grid Snake for embedding in a host shell
//!
//! This library provides:
//! - Core game logic (game module), free of I/O
//! - Host boundary types: direction/restart/exit events and the exit score payload (host module)
//! - Terminal front-end: key mapping (input), ratatui drawing (render) and the play loop (modes)

pub mod error;
pub mod game;
pub mod host;
pub mod input;
pub mod modes;
pub mod render;
