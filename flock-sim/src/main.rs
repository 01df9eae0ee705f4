use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use flock_shared::{BoidSettings, Position};
use flock_sim::settings::{load_settings, parse_point, validate};
use flock_sim::{run, RunOptions, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boids flocking simulation", long_about = None)]
struct Args {
    /// Number of boids
    #[arg(short = 'n', long, default_value_t = 40)]
    count: usize,

    /// Plane width
    #[arg(long, default_value_t = 800.0)]
    width: f32,

    /// Plane height
    #[arg(long, default_value_t = 600.0)]
    height: f32,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Seed for a reproducible initial flock
    #[arg(long)]
    seed: Option<u64>,

    /// JSON settings file (weights, radii, limits, target)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Separation weight, overrides the settings file
    #[arg(long)]
    separation: Option<f32>,

    /// Alignment weight, overrides the settings file
    #[arg(long)]
    alignment: Option<f32>,

    /// Cohesion weight, overrides the settings file
    #[arg(long)]
    cohesion: Option<f32>,

    /// Target attraction weight, overrides the settings file
    #[arg(long)]
    attraction: Option<f32>,

    /// Attraction point as X,Y
    #[arg(long, value_parser = parse_target)]
    target: Option<Position>,

    /// Print a snapshot every N ticks (0 prints only the final frame)
    #[arg(short, long, default_value_t = 0)]
    every: u64,

    /// Pace ticks against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Tick interval in milliseconds for --realtime
    #[arg(long, default_value_t = 10)]
    interval_ms: u64,

    /// Scale motion by the measured time between ticks (needs --realtime)
    #[arg(long)]
    time_scaled: bool,

    /// Max random heading jitter in radians applied between ticks
    #[arg(long, default_value_t = 0.0)]
    wander: f32,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn parse_target(text: &str) -> Result<Position, String> {
    parse_point(text).map_err(|e| e.to_string())
}

impl Args {
    fn settings(&self) -> Result<BoidSettings> {
        let mut settings = match &self.settings {
            Some(path) => load_settings(path)?,
            None => BoidSettings::default(),
        };

        if let Some(weight) = self.separation {
            settings.weights.separation = weight;
        }
        if let Some(weight) = self.alignment {
            settings.weights.alignment = weight;
        }
        if let Some(weight) = self.cohesion {
            settings.weights.cohesion = weight;
        }
        if let Some(weight) = self.attraction {
            settings.weights.attraction = weight;
        }
        if self.target.is_some() {
            settings.target = self.target;
        }

        validate(&settings)?;
        Ok(settings)
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            count: self.count,
            width: self.width,
            height: self.height,
            ticks: self.ticks,
            seed: self.seed,
            every: self.every,
            realtime: self.realtime,
            interval: Duration::from_millis(self.interval_ms),
            time_scaled: self.time_scaled,
            wander: self.wander,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    log::info!("Flock simulation starting...");
    log::info!("Boids: {}, plane: {}x{}", args.count, args.width, args.height);

    let settings = args.settings().context("Failed to load settings")?;
    let options = args.run_options();

    let mut simulation =
        Simulation::new(&options, &settings).context("Failed to initialize simulation")?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let status = run(&mut simulation, &options, &mut out).context("Simulation error")?;

    log::info!(
        "Done: {} boids after {} ticks (target active: {})",
        status.boid_count,
        status.ticks,
        status.target_active
    );

    Ok(())
}
