//! Headless host for `flock-core`: paces ticks, owns the tuning state and
//! streams frames as JSON lines for an external renderer.

pub mod driver;
pub mod settings;

pub use driver::{run, RunOptions, Simulation};
