//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background load result processing
//! - `render` - Header, body and overlay dispatch
//! - `screen` - Row layout of the home screen and of each frame
//! - `helpers` - Background task spawning
//! - `list` - Row list widget
//! - `reader` - Article reader widget
//! - `status` - Status bar widget

mod events;
mod helpers;
mod input;
mod list;
mod loop_runner;
pub mod reader;
mod render;
pub mod screen;
mod status;

pub use loop_runner::{run, Action};
