//! Headless driver for the boid simulation: owns the flock, paces frames and
//! applies control commands between them.

mod driver;
mod run;
mod settings;

pub use driver::Driver;
pub use run::{run, spawn_command_reader, RunOptions, RunSummary};
pub use settings::{boid_config, load_settings};
