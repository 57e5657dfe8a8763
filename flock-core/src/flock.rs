use std::iter;

use flock_shared::{Color, ConfigError, FrameSnapshot, PlayerInput, SimulationConfig, Weights};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::agent::{integrate, Agent, Bounds, Role};
use crate::behavior::{self, SteeringParams};
use crate::vector::Vector2D;

/// Supplies the slider weights, read once at the start of every tick
pub trait WeightSource {
    fn weights(&mut self, tick: u64) -> Weights;
}

impl WeightSource for Weights {
    fn weights(&mut self, _tick: u64) -> Weights {
        *self
    }
}

/// Weighted sum of alignment, separation and cohesion for one agent.
///
/// Each behaviour is already capped at `max_force`; the sum is not capped again.
pub fn flocking_force(
    focal: usize,
    population: &[Agent],
    weights: &Weights,
    params: &SteeringParams,
) -> Vector2D {
    behavior::alignment(focal, population, params.alignment_radius) * weights.alignment
        + behavior::separation(focal, population, params.separation_radius) * weights.separation
        + behavior::cohesion(focal, population, params.cohesion_radius) * weights.cohesion
}

/// The boid population plus the player, advanced one tick at a time
pub struct Flock {
    pub boids: Vec<Agent>,
    pub player: Agent,
    config: SimulationConfig,
    params: SteeringParams,
    bounds: Bounds,
    rng: StdRng,
    tick: u64,
}

impl Flock {
    /// Spawns `config.boid_count` boids at random positions inside the play area.
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let count = config.boid_count;

        let boids = (0..count)
            .map(|index| {
                let position = Vector2D::new(
                    rng.gen_range(0..=config.width as u32) as f32,
                    rng.gen_range(0..=config.height as u32) as f32,
                );
                let speed = rng.gen_range(config.boid_speed_min..=config.boid_speed_max) as f32;
                Agent::boid(position, speed, Color::gradient(index, count), &config)
            })
            .collect();
        let player = Agent::player(&config);

        log::debug!(
            "Created flock of {} boids in a {}x{} area (seed {})",
            count,
            config.width,
            config.height,
            seed
        );

        Ok(Self::assemble(config, boids, player, rng))
    }

    /// Builds a flock from hand-placed agents.
    pub fn from_agents(
        config: SimulationConfig,
        boids: Vec<Agent>,
        player: Agent,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if let Some(index) = boids.iter().position(Agent::is_player) {
            return Err(ConfigError::NotABoid { index });
        }
        if !player.is_player() {
            return Err(ConfigError::NotAPlayer);
        }
        Ok(Self::assemble(config, boids, player, StdRng::seed_from_u64(seed)))
    }

    fn assemble(config: SimulationConfig, boids: Vec<Agent>, player: Agent, rng: StdRng) -> Self {
        Self {
            params: SteeringParams::from(&config),
            bounds: Bounds::from(&config),
            boids,
            player,
            config,
            rng,
            tick: 0,
        }
    }

    /// Advances every agent by one step.
    ///
    /// All forces are computed against the population as it stood when the
    /// tick began; integration only starts once every force is known, so the
    /// result does not depend on iteration order.
    pub fn tick(&mut self, weights: Weights, input: &PlayerInput) {
        let snapshot: Vec<Agent> = self
            .boids
            .iter()
            .cloned()
            .chain(iter::once(self.player.clone()))
            .collect();

        for (index, boid) in self.boids.iter_mut().enumerate() {
            let Role::Boid { wander, .. } = &mut boid.role else {
                continue;
            };
            let focal = &snapshot[index];
            let force = behavior::wander(focal, wander, &self.params, &mut self.rng)
                + flocking_force(index, &snapshot, &weights, &self.params);
            boid.apply_force(force);
        }
        self.player.steer_by_input(input);

        for boid in self.boids.iter_mut() {
            integrate(boid, &self.bounds);
        }
        integrate(&mut self.player, &self.bounds);

        self.tick += 1;
        self.debug_validate_state();
        log::trace!(
            "tick {}: mean boid speed {:.3}",
            self.tick,
            self.mean_speed()
        );
    }

    /// Reads this tick's weights from `source`, then ticks.
    pub fn tick_with<S: WeightSource + ?Sized>(&mut self, source: &mut S, input: &PlayerInput) {
        let weights = source.weights(self.tick);
        self.tick(weights, input);
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Mean boid velocity magnitude, `0` for an empty flock
    pub fn mean_speed(&self) -> f32 {
        if self.boids.is_empty() {
            return 0.0;
        }
        let total: f32 = self.boids.iter().map(|b| b.velocity.magnitude()).sum();
        total / self.boids.len() as f32
    }

    /// Boids first, player last
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.tick,
            agents: self
                .boids
                .iter()
                .chain(iter::once(&self.player))
                .map(Agent::view)
                .collect(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Swaps in new tunables; radii, wander geometry and bounds apply from the next tick.
    ///
    /// Already spawned agents keep their own speed, friction and size.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.params = SteeringParams::from(&config);
        self.bounds = Bounds::from(&config);
        self.config = config;
        Ok(())
    }

    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), ConfigError> {
        self.set_config(SimulationConfig {
            width,
            height,
            ..self.config.clone()
        })
    }

    fn debug_validate_state(&self) {
        for agent in self.boids.iter().chain(iter::once(&self.player)) {
            debug_assert!(
                agent.position.is_finite() && agent.velocity.is_finite(),
                "non-finite agent state: {:?}",
                agent
            );
        }
    }
}
