//! Platform abstraction layer
//!
//! Terminal frontend built on crossterm:
//! - Keyboard input (held keys from press/repeat/release events)
//! - Software rasterizer for the logical 800x600 canvas
//! - Raw mode session and frame output

pub mod input;
pub mod raster;
pub mod terminal;

pub use input::KeyTracker;
pub use raster::{Framebuffer, RasterCanvas};
pub use terminal::{TerminalSession, present, spawn_event_reader};
