//! Steering behaviours.
//!
//! Every behaviour reads a frozen snapshot of the population and the index of
//! the focal agent inside it. The focal agent never counts as its own
//! neighbour, and each result is capped at the agent's `max_force`.

use flock_shared::SimulationConfig;
use rand::Rng;

use crate::agent::{Agent, WanderState};
use crate::vector::{remap, Vector2D, EPSILON};

/// Perception radii and wander geometry shared by all boids
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringParams {
    pub alignment_radius: f32,
    pub separation_radius: f32,
    pub cohesion_radius: f32,
    pub wander_distance: f32,
    pub wander_radius: f32,
    pub wander_drift: f32,
    pub slowing_radius: f32,
}

impl From<&SimulationConfig> for SteeringParams {
    fn from(config: &SimulationConfig) -> Self {
        Self {
            alignment_radius: config.alignment_radius,
            separation_radius: config.separation_radius,
            cohesion_radius: config.cohesion_radius,
            wander_distance: config.wander_distance,
            wander_radius: config.wander_radius,
            wander_drift: config.wander_drift,
            slowing_radius: config.slowing_radius,
        }
    }
}

/// Other agents strictly closer than `radius`, with their distance.
pub fn neighbors<'a>(
    focal: usize,
    population: &'a [Agent],
    radius: f32,
) -> impl Iterator<Item = (&'a Agent, f32)> + 'a {
    let center = population[focal].position;
    population
        .iter()
        .enumerate()
        .filter(move |(index, _)| *index != focal)
        .map(move |(_, other)| (other, other.position.distance(&center)))
        .filter(move |(_, distance)| *distance < radius)
}

/// Steers towards the average velocity of nearby agents.
pub fn alignment(focal: usize, population: &[Agent], radius: f32) -> Vector2D {
    let agent = &population[focal];
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for (other, _) in neighbors(focal, population, radius) {
        sum += other.velocity;
        count += 1;
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let steering = sum / count as f32 - agent.velocity;
    steering.limit(agent.max_force)
}

/// Steers away from nearby agents, closer ones pushing with inverse-square strength.
pub fn separation(focal: usize, population: &[Agent], radius: f32) -> Vector2D {
    let agent = &population[focal];
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for (other, distance) in neighbors(focal, population, radius) {
        // coincident agents have no direction to push along
        if distance <= EPSILON {
            continue;
        }
        sum += (agent.position - other.position) / (distance * distance);
        count += 1;
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let desired = (sum / count as f32).with_magnitude(agent.speed);
    (desired - agent.velocity).limit(agent.max_force)
}

/// Steers towards the centre of mass of nearby agents.
pub fn cohesion(focal: usize, population: &[Agent], radius: f32) -> Vector2D {
    let agent = &population[focal];
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for (other, _) in neighbors(focal, population, radius) {
        sum += other.position;
        count += 1;
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let desired = (sum / count as f32 - agent.position).with_magnitude(agent.speed);
    (desired - agent.velocity).limit(agent.max_force)
}

/// Seeks `target` at full speed, slowing down linearly inside `slowing_radius`.
pub fn arrive(agent: &Agent, target: Vector2D, slowing_radius: f32) -> Vector2D {
    let offset = target - agent.position;
    let distance = offset.magnitude();

    let desired_speed = if distance < slowing_radius {
        remap(distance, 0.0, slowing_radius, 0.0, agent.speed)
    } else {
        agent.speed
    };
    let desired = offset.normalize() * desired_speed;

    (desired - agent.velocity).limit(agent.max_force)
}

/// Arrives at a target that drifts smoothly around a circle projected ahead of the agent.
///
/// The drift is a fixed amount per tick, so the wander pattern depends on the
/// tick rate. A resting agent has no heading and keeps its previous target.
pub fn wander<R: Rng>(
    agent: &Agent,
    state: &mut WanderState,
    params: &SteeringParams,
    rng: &mut R,
) -> Vector2D {
    if agent.velocity.magnitude_squared() != 0.0 {
        state.extent = agent.velocity.normalize() * params.wander_distance;
        state.angle += rng.gen_range(-1.0f32..=1.0) * params.wander_drift;
        state.target =
            agent.position + state.extent + Vector2D::from_angle(state.angle) * params.wander_radius;
    }

    arrive(agent, state.target, params.slowing_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flock_shared::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn approx(a: Vector2D, b: Vector2D) -> bool {
        (a.x - b.x).abs() < 1.0e-4 && (a.y - b.y).abs() < 1.0e-4
    }

    fn boid_at(x: f32, y: f32) -> Agent {
        Agent::boid(Vector2D::new(x, y), 2.0, Color::RED, &SimulationConfig::default())
    }

    fn params() -> SteeringParams {
        SteeringParams::from(&SimulationConfig::default())
    }

    #[test]
    fn test_neighbors_skip_self_and_far_agents() {
        let population = vec![boid_at(0.0, 0.0), boid_at(10.0, 0.0), boid_at(100.0, 0.0)];
        let found: Vec<f32> = neighbors(0, &population, 40.0).map(|(_, d)| d).collect();
        assert_eq!(found, vec![10.0]);
    }

    #[test]
    fn test_behaviours_without_neighbors_are_zero() {
        let mut population = vec![boid_at(0.0, 0.0), boid_at(300.0, 300.0)];
        population[0].velocity = Vector2D::new(1.0, 1.0);

        assert_eq!(alignment(0, &population, 40.0), Vector2D::zero());
        assert_eq!(separation(0, &population, 40.0), Vector2D::zero());
        assert_eq!(cohesion(0, &population, 80.0), Vector2D::zero());
    }

    #[test]
    fn test_alone_is_zero() {
        let population = vec![boid_at(5.0, 5.0)];
        assert_eq!(alignment(0, &population, 40.0), Vector2D::zero());
        assert_eq!(separation(0, &population, 40.0), Vector2D::zero());
        assert_eq!(cohesion(0, &population, 80.0), Vector2D::zero());
    }

    #[test]
    fn test_radius_is_exclusive() {
        let population = vec![boid_at(0.0, 0.0), boid_at(40.0, 0.0)];
        assert_eq!(cohesion(0, &population, 40.0), Vector2D::zero());
    }

    #[test]
    fn test_alignment_matches_neighbor_velocity() {
        let mut population = vec![boid_at(0.0, 0.0), boid_at(10.0, 0.0), boid_at(0.0, 10.0)];
        population[1].velocity = Vector2D::new(0.2, 0.0);
        population[2].velocity = Vector2D::new(0.0, 0.2);

        let steering = alignment(0, &population, 40.0);
        assert!(approx(steering, Vector2D::new(0.1, 0.1)));
    }

    #[test]
    fn test_alignment_is_limited() {
        let mut population = vec![boid_at(0.0, 0.0), boid_at(10.0, 0.0)];
        population[1].velocity = Vector2D::new(0.0, 5.0);
        let steering = alignment(0, &population, 40.0);
        assert!(approx(steering, Vector2D::new(0.0, 0.3)));
    }

    #[test]
    fn test_separation_pushes_away() {
        let population = vec![boid_at(0.0, 0.0), boid_at(1.0, 0.0)];
        let steering = separation(0, &population, 40.0);
        assert!(steering.x < 0.0);
        assert!(approx(steering, Vector2D::new(-0.3, 0.0)));

        let other = separation(1, &population, 40.0);
        assert!(other.x > 0.0);
    }

    #[test]
    fn test_separation_ignores_coincident_agents() {
        let population = vec![boid_at(5.0, 5.0), boid_at(5.0, 5.0)];
        let steering = separation(0, &population, 40.0);
        assert_eq!(steering, Vector2D::zero());
        assert!(steering.is_finite());
    }

    #[test]
    fn test_cohesion_pulls_toward_center() {
        let population = vec![boid_at(0.0, 0.0), boid_at(20.0, 0.0), boid_at(0.0, 20.0)];
        let steering = cohesion(0, &population, 80.0);
        let expected = Vector2D::new(1.0, 1.0).normalize() * 0.3;
        assert!(approx(steering, expected));
    }

    #[test]
    fn test_arrive_far_target_full_force() {
        let boid = boid_at(0.0, 0.0);
        let steering = arrive(&boid, Vector2D::new(500.0, 0.0), 100.0);
        assert!(approx(steering, Vector2D::new(0.3, 0.0)));
    }

    #[test]
    fn test_arrive_slows_inside_radius() {
        let mut boid = boid_at(0.0, 0.0);
        boid.velocity = Vector2D::new(0.9, 0.0);
        // desired speed is remap(50, 0, 100, 0, 2) = 1.0
        let steering = arrive(&boid, Vector2D::new(50.0, 0.0), 100.0);
        assert!(approx(steering, Vector2D::new(0.1, 0.0)));
    }

    #[test]
    fn test_arrive_at_own_position_brakes() {
        let mut boid = boid_at(10.0, 10.0);
        boid.velocity = Vector2D::new(0.1, 0.0);
        let steering = arrive(&boid, Vector2D::new(10.0, 10.0), 100.0);
        assert!(approx(steering, Vector2D::new(-0.1, 0.0)));
        assert!(steering.is_finite());
    }

    #[test]
    fn test_wander_keeps_target_when_resting() {
        let boid = boid_at(10.0, 10.0);
        let mut state = WanderState {
            target: Vector2D::new(300.0, 10.0),
            angle: 0.5,
            extent: Vector2D::zero(),
        };
        let mut rng = StdRng::seed_from_u64(7);

        let steering = wander(&boid, &mut state, &params(), &mut rng);

        assert_eq!(state.target, Vector2D::new(300.0, 10.0));
        assert_eq!(state.angle, 0.5);
        assert!(approx(steering, Vector2D::new(0.3, 0.0)));
    }

    #[test]
    fn test_wander_target_ahead_of_heading() {
        let mut boid = boid_at(100.0, 100.0);
        boid.velocity = Vector2D::new(1.0, 0.0);
        let mut state = WanderState::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let previous = state.angle;
            wander(&boid, &mut state, &params(), &mut rng);
            assert!((state.angle - previous).abs() <= 1.0 / 16.0 + 1.0e-6);
            assert_eq!(state.extent, Vector2D::new(80.0, 0.0));
            let center = Vector2D::new(180.0, 100.0);
            assert!((state.target.distance(&center) - 30.0).abs() < 1.0e-3);
        }
    }

    #[test]
    fn test_wander_follows_a_very_slow_heading() {
        let mut boid = boid_at(100.0, 100.0);
        boid.velocity = Vector2D::new(1.0e-7, 0.0);
        let config = SimulationConfig {
            wander_drift: 0.0,
            ..Default::default()
        };
        let params = SteeringParams::from(&config);
        let mut state = WanderState::default();
        let mut rng = StdRng::seed_from_u64(7);

        wander(&boid, &mut state, &params, &mut rng);

        assert!(approx(state.extent, Vector2D::new(80.0, 0.0)));
        assert!(approx(state.target, Vector2D::new(210.0, 100.0)));
    }

    #[test]
    fn test_wander_is_reproducible() {
        let mut boid = boid_at(100.0, 100.0);
        boid.velocity = Vector2D::new(0.5, -0.5);
        let run = |seed: u64| {
            let mut state = WanderState::default();
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20)
                .map(|_| {
                    wander(&boid, &mut state, &params(), &mut rng);
                    state.target
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }
}
