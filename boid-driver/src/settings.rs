use std::path::Path;

use anyhow::{Context, Result};
use boid_core::BoidConfig;
use boid_shared::SimulationSettings;

/// Reads settings from a JSON file, or the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<SimulationSettings> {
    let Some(path) = path else {
        return Ok(SimulationSettings::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = SimulationSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;

    log::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

pub fn boid_config(settings: &SimulationSettings) -> BoidConfig {
    BoidConfig {
        width: settings.width,
        height: settings.height,
        num_boids: settings.num_boids,
        num_obstacles: settings.num_obstacles,
        max_speed: settings.max_speed,
        max_force: settings.max_force,
        perception: settings.perception,
        separation: settings.separation,
        obstacle_margin: settings.obstacle_margin,
        obstacle_radius: settings.obstacle_radius,
    }
}
