use std::fs;
use std::io::Write;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use flock_core::{Flock, Grid, WeightSource};
use flock_shared::{LifeConfig, PlayerInput, SimulationConfig, Weights};
use serde::Serialize;

/// Reads a JSON config file, falling back to defaults for missing fields.
pub fn load_config<T>(path: Option<&Path>) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Moves every weight linearly from its start value to 1.0 over the run,
/// like a user slowly dragging all three sliders to the right.
pub struct WeightRamp {
    start: Weights,
    ticks: u64,
}

impl WeightRamp {
    pub fn new(start: Weights, ticks: u64) -> Self {
        Self { start, ticks }
    }
}

impl WeightSource for WeightRamp {
    fn weights(&mut self, tick: u64) -> Weights {
        let t = if self.ticks <= 1 {
            1.0
        } else {
            (tick as f32 / (self.ticks - 1) as f32).min(1.0)
        };
        let lerp = |from: f32| from + (1.0 - from) * t;
        Weights::new(
            lerp(self.start.alignment),
            lerp(self.start.separation),
            lerp(self.start.cohesion),
        )
    }
}

/// Sleeps so that successive frames are `1 / fps` apart.
pub struct FramePacer {
    frame: Duration,
    next: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        let frame = Duration::from_secs_f64(1.0 / f64::from(fps.max(1)));
        Self {
            frame,
            next: Instant::now() + frame,
        }
    }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            thread::sleep(self.next - now);
        } else {
            // running behind: don't try to catch up with a burst of frames
            self.next = now;
        }
        self.next += self.frame;
    }
}

/// Parameters of one headless flocking run
#[derive(Debug, Clone)]
pub struct FlockRun {
    pub config: SimulationConfig,
    pub seed: u64,
    pub ticks: u64,
    /// Write a snapshot every this many ticks; `0` writes none
    pub every: u64,
    pub weights: Weights,
    pub ramp: bool,
    pub input: PlayerInput,
    pub realtime: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub frames_written: u64,
    pub boids: usize,
    pub mean_speed: f32,
}

/// Runs the flock and writes JSON-lines snapshots to `out`.
pub fn run_flock<W: Write>(run: &FlockRun, out: &mut W) -> Result<RunSummary> {
    let mut flock =
        Flock::new(run.config.clone(), run.seed).context("Invalid simulation config")?;
    let mut source: Box<dyn WeightSource> = if run.ramp {
        Box::new(WeightRamp::new(run.weights, run.ticks))
    } else {
        Box::new(run.weights)
    };
    let mut pacer = run.realtime.then(|| FramePacer::new(run.config.fps));

    log::info!(
        "Running {} boids for {} ticks (seed {}, weights {:?}, ramp {})",
        flock.boids.len(),
        run.ticks,
        run.seed,
        run.weights,
        run.ramp
    );

    let started = Instant::now();
    let mut last_report = Instant::now();
    let mut frames_written = 0;

    for _ in 0..run.ticks {
        flock.tick_with(source.as_mut(), &run.input);

        if run.every > 0 && flock.tick_count() % run.every == 0 {
            let line = flock
                .snapshot()
                .to_json()
                .context("Failed to encode snapshot")?;
            writeln!(out, "{}", line).context("Failed to write snapshot")?;
            frames_written += 1;
        }

        if last_report.elapsed().as_secs() >= 1 {
            log::debug!(
                "tick {}: {:.1} ticks/s, mean speed {:.3}",
                flock.tick_count(),
                flock.tick_count() as f64 / started.elapsed().as_secs_f64(),
                flock.mean_speed()
            );
            last_report = Instant::now();
        }

        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
    }
    out.flush().context("Failed to flush output")?;

    let summary = RunSummary {
        ticks: flock.tick_count(),
        frames_written,
        boids: flock.boids.len(),
        mean_speed: flock.mean_speed(),
    };
    log::info!(
        "Finished {} ticks in {:.2?}, mean speed {:.3}",
        summary.ticks,
        started.elapsed(),
        summary.mean_speed
    );
    Ok(summary)
}

/// Parameters of one Game of Life run
#[derive(Debug, Clone)]
pub struct LifeRun {
    pub config: LifeConfig,
    pub seed: u64,
    pub generations: u64,
    pub realtime: bool,
}

/// Runs the automaton, printing every generation as text. Returns the final population.
pub fn run_life<W: Write>(run: &LifeRun, out: &mut W) -> Result<usize> {
    use rand::SeedableRng;

    let mut rng = rand::rngs::StdRng::seed_from_u64(run.seed);
    let mut grid = Grid::random(&run.config, &mut rng).context("Invalid life config")?;
    let mut pacer = run.realtime.then(|| FramePacer::new(run.config.fps));

    log::info!(
        "Running {}x{} life grid for {} generations (seed {})",
        grid.columns(),
        grid.rows(),
        run.generations,
        run.seed
    );

    for _ in 0..run.generations {
        writeln!(out, "generation {} population {}", grid.generation(), grid.population())?;
        write!(out, "{}", grid)?;
        grid.step();
        if let Some(pacer) = pacer.as_mut() {
            pacer.wait();
        }
    }
    out.flush().context("Failed to flush output")?;

    Ok(grid.population())
}
