use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use flock_core::{Flock, Vector2D, Weights};
use flock_shared::{
    BoidSettings, BoidState, FrameSnapshot, Position, RuleWeights, StatusResponse, TargetUpdate,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::settings;

/// How a run is driven
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub count: usize,
    pub width: f32,
    pub height: f32,
    pub ticks: u64,
    /// Fixed seed for a reproducible flock
    pub seed: Option<u64>,
    /// Emit a snapshot every `every` ticks; 0 emits only the final frame
    pub every: u64,
    /// Pace ticks against the wall clock instead of running flat out
    pub realtime: bool,
    pub interval: Duration,
    /// Scale integration by the measured time between ticks
    pub time_scaled: bool,
    /// Max wander jitter in radians, applied between ticks
    pub wander: f32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            count: 40,
            width: 800.0,
            height: 600.0,
            ticks: 1000,
            seed: None,
            every: 0,
            realtime: false,
            interval: Duration::from_millis(10),
            time_scaled: false,
            wander: 0.0,
        }
    }
}

impl RunOptions {
    pub fn validate(&self) -> Result<()> {
        check_plane(self.width, self.height)?;
        if self.time_scaled && !self.realtime {
            bail!("--time-scaled needs --realtime");
        }
        if self.realtime && self.interval.is_zero() {
            bail!("--realtime needs a non-zero interval");
        }
        if !self.wander.is_finite() || self.wander < 0.0 {
            bail!("wander must be a non-negative number, got {}", self.wander);
        }
        Ok(())
    }
}

fn check_plane(width: f32, height: f32) -> Result<()> {
    if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
        bail!("Plane size must be positive, got {}x{}", width, height);
    }
    Ok(())
}

/// Headless host for a [`Flock`]: owns the plane size, the rule weights and
/// the optional attraction point, and feeds them to every tick.
pub struct Simulation {
    flock: Flock,
    weights: Weights,
    target: Option<Vector2D>,
    width: f32,
    height: f32,
    wander: f32,
    rng: StdRng,
}

impl Simulation {
    pub fn new(options: &RunOptions, settings: &BoidSettings) -> Result<Self> {
        options.validate()?;
        settings::validate(settings)?;

        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let flock = Flock::random(
            &mut rng,
            options.count,
            options.width,
            options.height,
            &settings::boid_config(settings),
        );

        log::info!(
            "Simulation ready: {} boids on {}x{}",
            flock.len(),
            options.width,
            options.height
        );

        Ok(Self {
            flock,
            weights: settings::weights(&settings.weights),
            target: settings::target_point(settings.target),
            width: options.width,
            height: options.height,
            wander: options.wander,
            rng,
        })
    }

    pub fn flock(&self) -> &Flock {
        &self.flock
    }

    pub fn flock_mut(&mut self) -> &mut Flock {
        &mut self.flock
    }

    pub fn set_weights(&mut self, weights: &RuleWeights) {
        self.weights = settings::weights(weights);
        log::debug!("Weights updated: {:?}", self.weights);
    }

    pub fn set_target(&mut self, update: &TargetUpdate) {
        self.target = settings::target_point(update.position);
        log::debug!("Target updated: {:?}", self.target);
    }

    /// New plane size, used from the next tick on.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        check_plane(width, height)?;
        self.width = width;
        self.height = height;
        log::info!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Advances one tick. `elapsed` is the time since the previous tick
    /// when integration is time-scaled.
    pub fn step(&mut self, elapsed: Option<Duration>, nominal: Duration) {
        if self.wander > 0.0 {
            self.flock.apply_wander(&mut self.rng, self.wander);
        }
        match elapsed {
            Some(elapsed) => self.flock.tick_scaled(
                self.width,
                self.height,
                &self.weights,
                self.target,
                elapsed.as_secs_f32(),
                nominal.as_secs_f32(),
            ),
            None => self
                .flock
                .tick(self.width, self.height, &self.weights, self.target),
        }
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.flock.ticks(),
            width: self.width,
            height: self.height,
            boids: self
                .flock
                .states()
                .map(|(position, heading)| BoidState {
                    position: Position::new(position.x, position.y),
                    heading,
                })
                .collect(),
        }
    }

    pub fn status(&self) -> StatusResponse {
        StatusResponse {
            boid_count: self.flock.len(),
            ticks: self.flock.ticks(),
            target_active: self.target.is_some(),
        }
    }
}

/// Runs `options.ticks` ticks, writing snapshots to `out` as JSON lines.
/// The final frame is always written.
pub fn run<W: Write>(
    simulation: &mut Simulation,
    options: &RunOptions,
    out: &mut W,
) -> Result<StatusResponse> {
    log::info!("Running {} ticks...", options.ticks);

    let started = Instant::now();
    let mut last_tick = started;
    let mut next_deadline = started + options.interval;
    let mut last_written = None;

    for tick in 1..=options.ticks {
        let elapsed = if options.realtime {
            let now = Instant::now();
            if next_deadline > now {
                thread::sleep(next_deadline - now);
            }
            // a late tick is not made up for
            next_deadline = next_deadline.max(Instant::now()) + options.interval;

            let now = Instant::now();
            let elapsed = now - last_tick;
            last_tick = now;
            options.time_scaled.then_some(elapsed)
        } else {
            None
        };

        simulation.step(elapsed, options.interval);

        if options.every > 0 && tick % options.every == 0 {
            write_snapshot(simulation, out)?;
            last_written = Some(tick);
        }
    }

    if last_written != Some(options.ticks) {
        write_snapshot(simulation, out)?;
    }
    out.flush().context("Failed to flush output")?;

    let status = simulation.status();
    let seconds = started.elapsed().as_secs_f64();
    if seconds > 0.0 {
        log::info!(
            "Finished {} ticks in {:.2}s ({:.1} ticks/s)",
            status.ticks,
            seconds,
            status.ticks as f64 / seconds
        );
    }
    Ok(status)
}

fn write_snapshot<W: Write>(simulation: &Simulation, out: &mut W) -> Result<()> {
    let snapshot = simulation.snapshot();
    serde_json::to_writer(&mut *out, &snapshot).context("Failed to encode snapshot")?;
    writeln!(out).context("Failed to write snapshot")?;
    log::debug!("Wrote snapshot for tick {}", snapshot.tick);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RunOptions {
        RunOptions {
            count: 5,
            width: 200.0,
            height: 100.0,
            ticks: 10,
            seed: Some(11),
            ..RunOptions::default()
        }
    }

    #[test]
    fn test_validate_rejects_bad_plane() {
        let mut opts = options();
        opts.width = 0.0;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn test_time_scaled_needs_realtime() {
        let mut opts = options();
        opts.time_scaled = true;
        assert!(opts.validate().is_err());
        opts.realtime = true;
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_status_tracks_target() {
        let mut sim = Simulation::new(&options(), &BoidSettings::default()).unwrap();
        assert!(!sim.status().target_active);

        sim.set_target(&TargetUpdate {
            position: Some(Position::new(50.0, 50.0)),
        });
        assert!(sim.status().target_active);

        sim.set_target(&TargetUpdate { position: None });
        assert!(!sim.status().target_active);
    }

    #[test]
    fn test_resize_rejects_empty_plane() {
        let mut sim = Simulation::new(&options(), &BoidSettings::default()).unwrap();
        assert!(sim.resize(-1.0, 10.0).is_err());
        sim.resize(50.0, 40.0).unwrap();
        sim.step(None, Duration::from_millis(10));

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.width, 50.0);
        assert!(snapshot
            .boids
            .iter()
            .all(|b| b.position.x < 50.0 && b.position.y < 40.0));
    }
}
