#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a 2D position in plane coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
}

impl Velocity {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One boid as seen by a renderer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoidState {
    pub position: Position,
    pub velocity: Velocity,
    /// Direction of travel in degrees; 0 when the boid is not moving.
    pub heading: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ObstacleState {
    pub position: Position,
    pub radius: f32,
}

/// Everything needed to draw one frame, emitted by the driver whether or not
/// the flock advanced during it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub running: bool,
    pub boids: Vec<BoidState>,
    pub obstacles: Vec<ObstacleState>,
}

#[cfg(feature = "std")]
impl FrameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Control messages accepted by the driver between ticks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum ControlCommand {
    /// Resume stepping the flock.
    Start,
    /// Pause; frames keep being produced from the last state.
    Stop,
    /// Scatter the flock again and pause.
    Reset,
    /// Leave the driver loop.
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCommandError {
    input: String,
}

impl fmt::Display for ParseCommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown command {:?}, expected start, stop, reset or exit",
            self.input
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseCommandError {}

impl FromStr for ControlCommand {
    type Err = ParseCommandError;

    /// Accepts a bare word (`start`) or, with `std`, a JSON object
    /// (`{"command":"start"}`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        #[cfg(feature = "std")]
        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).map_err(|_| ParseCommandError {
                input: trimmed.to_string(),
            });
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "start" => Ok(ControlCommand::Start),
            "stop" => Ok(ControlCommand::Stop),
            "reset" => Ok(ControlCommand::Reset),
            "exit" | "quit" => Ok(ControlCommand::Exit),
            _ => Err(ParseCommandError {
                input: trimmed.to_string(),
            }),
        }
    }
}

/// Boid simulation configuration as read from a settings file. Missing
/// fields take the default scene values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationSettings {
    pub width: f32,
    pub height: f32,
    pub num_boids: usize,
    pub num_obstacles: usize,
    pub max_speed: f32,
    pub max_force: f32,
    pub perception: f32,
    pub separation: f32,
    pub obstacle_margin: f32,
    pub obstacle_radius: f32,
    /// Seed for boid and obstacle placement; random when absent.
    pub seed: Option<u64>,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            num_boids: 20,
            num_obstacles: 10,
            max_speed: 3.0,
            max_force: 0.05,
            perception: 50.0,
            separation: 20.0,
            obstacle_margin: 10.0,
            obstacle_radius: 15.0,
            seed: None,
        }
    }
}

#[cfg(feature = "std")]
impl SimulationSettings {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
