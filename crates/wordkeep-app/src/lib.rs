//! WORDKEEP terminal application.
//!
//! This crate wires the headless simulation to a crossterm frontend:
//! keyboard input in, rendered frames and terminal bells out.

pub mod args;
pub mod audio;
pub mod game_loop;
pub mod keymap;
pub mod logging;
pub mod render;
pub mod terminal;

pub use wordkeep_core as core;
