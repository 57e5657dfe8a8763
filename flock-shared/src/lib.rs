use serde::{Deserialize, Serialize};

mod config;

pub use config::{ConfigError, LifeConfig, SimulationConfig};

/// Represents a 2D position in play-area coordinates
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// The three flocking weights produced by the slider widgets, each in `[0, 1]`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Weights {
    pub alignment: f32,
    pub separation: f32,
    pub cohesion: f32,
}

impl Weights {
    /// Builds a weight triple, clamping every component into `[0, 1]`.
    pub fn new(alignment: f32, separation: f32, cohesion: f32) -> Self {
        Self {
            alignment: clamp_unit(alignment),
            separation: clamp_unit(separation),
            cohesion: clamp_unit(cohesion),
        }
    }

    pub fn uniform(weight: f32) -> Self {
        Self::new(weight, weight, weight)
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Pressed state of the four directional keys steering the player
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PlayerInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl PlayerInput {
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses held keys from a WASD string such as `"wd"`. Unknown characters are ignored.
    pub fn from_keys(keys: &str) -> Self {
        let mut input = Self::none();
        for key in keys.chars() {
            match key.to_ascii_lowercase() {
                'w' => input.up = true,
                's' => input.down = true,
                'a' => input.left = true,
                'd' => input.right = true,
                _ => {}
            }
        }
        input
    }

    /// Horizontal axis value: `right - left`
    pub fn axis_x(&self) -> f32 {
        self.right as i8 as f32 - self.left as i8 as f32
    }

    /// Vertical axis value: `down - up` (screen y grows downwards)
    pub fn axis_y(&self) -> f32 {
        self.down as i8 as f32 - self.up as i8 as f32
    }
}

/// RGB colour used only for drawing
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Gradient across the population: red rises, green falls, blue stays full.
    pub fn gradient(index: usize, count: usize) -> Self {
        if count == 0 {
            return Self::new(0, 255, 255);
        }
        let channel = |numerator: usize| -> u8 {
            let value = (numerator as f64 * 255.0 / count as f64).round_ties_even();
            value.clamp(0.0, 255.0) as u8
        };
        Self::new(channel(index), channel(count.saturating_sub(index)), 255)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Boid,
    Player,
}

/// Everything the rendering layer needs to draw one agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AgentView {
    pub kind: AgentKind,
    pub position: Position,
    /// Radians, `atan2(vy, vx)`
    pub heading: f32,
    pub color: Color,
}

/// State of the whole population after a tick
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub agents: Vec<AgentView>,
}

impl FrameSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
