use flock_shared::{AgentKind, AgentView, Color, PlayerInput, SimulationConfig};

use crate::vector::Vector2D;

/// Upper bound on the player's input-driven acceleration
pub const PLAYER_MAX_ACCELERATION: f32 = 1.0;

/// Persistent random-walk state behind the wander behaviour
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WanderState {
    /// Point the boid is currently arriving at
    pub target: Vector2D,
    /// Drifts a little every tick and is never reset
    pub angle: f32,
    /// Look-ahead offset used for the last target update
    pub extent: Vector2D,
}

/// Selects which force generation runs before integration
#[derive(Debug, Clone, PartialEq)]
pub enum Role {
    Boid { color: Color, wander: WanderState },
    Player,
}

/// The rectangle agents live in. Leaving one edge re-enters from the opposite one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<&SimulationConfig> for Bounds {
    fn from(config: &SimulationConfig) -> Self {
        Self::new(config.width, config.height)
    }
}

/// A physics body: either a boid or the player
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub acceleration: Vector2D,
    /// Multiplier applied to velocity when moving
    pub speed: f32,
    /// Velocity damping per tick; smaller means more drag
    pub friction: f32,
    pub max_force: f32,
    /// Visual extent, used to hide the wrap-around jump off screen
    pub size: f32,
    pub role: Role,
}

impl Agent {
    pub fn boid(position: Vector2D, speed: f32, color: Color, config: &SimulationConfig) -> Self {
        Self {
            position,
            velocity: Vector2D::zero(),
            acceleration: Vector2D::zero(),
            speed,
            friction: config.boid_friction,
            max_force: config.max_force,
            size: config.boid_size,
            role: Role::Boid {
                color,
                wander: WanderState::default(),
            },
        }
    }

    pub fn player(config: &SimulationConfig) -> Self {
        Self {
            position: config.player_start.into(),
            velocity: Vector2D::zero(),
            acceleration: Vector2D::zero(),
            speed: config.player_speed,
            friction: config.player_friction,
            max_force: PLAYER_MAX_ACCELERATION,
            size: config.player_size,
            role: Role::Player,
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player)
    }

    pub fn wander_state(&self) -> Option<&WanderState> {
        match &self.role {
            Role::Boid { wander, .. } => Some(wander),
            Role::Player => None,
        }
    }

    pub fn apply_force(&mut self, force: Vector2D) {
        self.acceleration += force;
    }

    /// Replaces the acceleration with the direction held on the keys.
    pub fn steer_by_input(&mut self, input: &PlayerInput) {
        self.acceleration =
            Vector2D::new(input.axis_x(), input.axis_y()).limit(PLAYER_MAX_ACCELERATION);
    }

    pub fn view(&self) -> AgentView {
        let (kind, color) = match &self.role {
            Role::Boid { color, .. } => (AgentKind::Boid, *color),
            Role::Player => (AgentKind::Player, Color::RED),
        };
        AgentView {
            kind,
            position: self.position.into(),
            heading: self.velocity.heading(),
            color,
        }
    }
}

/// Advances one agent by a single tick.
///
/// The displacement uses the velocity before friction is applied, and the
/// acceleration is consumed so forces never carry over to the next tick.
pub fn integrate(agent: &mut Agent, bounds: &Bounds) {
    agent.velocity += agent.acceleration;
    agent.position += agent.velocity * agent.speed;
    agent.acceleration = Vector2D::zero();
    agent.velocity *= agent.friction;
    wrap_edges(agent, bounds);
}

/// Moves an agent that left the play area to just outside the opposite edge.
pub fn wrap_edges(agent: &mut Agent, bounds: &Bounds) {
    let size = agent.size;
    let position = &mut agent.position;

    if position.x > bounds.width {
        position.x = -size;
    } else if position.x < -size {
        position.x = bounds.width;
    }

    if position.y > bounds.height {
        position.y = -size;
    } else if position.y < -size {
        position.y = bounds.height;
    }
}
