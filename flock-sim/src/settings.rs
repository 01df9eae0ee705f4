use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use flock_core::{BoidConfig, Vector2D, Weights};
use flock_shared::{BoidSettings, Position, RuleWeights};

/// Reads a JSON settings file. Absent fields keep their defaults.
pub fn load_settings(path: &Path) -> Result<BoidSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = parse_settings(&text)
        .with_context(|| format!("Invalid settings in {}", path.display()))?;
    log::info!("Loaded settings from {}", path.display());
    Ok(settings)
}

pub fn parse_settings(json: &str) -> Result<BoidSettings> {
    let settings: BoidSettings = serde_json::from_str(json).context("Malformed settings JSON")?;
    validate(&settings)?;
    Ok(settings)
}

pub fn validate(settings: &BoidSettings) -> Result<()> {
    let RuleWeights {
        separation,
        alignment,
        cohesion,
        attraction,
    } = settings.weights;
    for (name, weight) in [
        ("separation", separation),
        ("alignment", alignment),
        ("cohesion", cohesion),
        ("attraction", attraction),
    ] {
        if !weight.is_finite() {
            bail!("{} weight must be finite, got {}", name, weight);
        }
    }

    for (name, value) in [
        ("view_radius", settings.view_radius),
        ("separation_distance", settings.separation_distance),
        ("max_speed", settings.max_speed),
        ("max_steer_force", settings.max_steer_force),
    ] {
        if !value.is_finite() || value < 0.0 {
            bail!("{} must be a non-negative number, got {}", name, value);
        }
    }

    if let Some(target) = settings.target {
        if !target.x.is_finite() || !target.y.is_finite() {
            bail!("target must be finite, got {:?}", target);
        }
    }

    Ok(())
}

pub fn boid_config(settings: &BoidSettings) -> BoidConfig {
    BoidConfig {
        view_radius: settings.view_radius,
        separation_distance: settings.separation_distance,
        max_speed: settings.max_speed,
        max_steer_force: settings.max_steer_force,
    }
}

pub fn weights(rule_weights: &RuleWeights) -> Weights {
    Weights {
        separation: rule_weights.separation,
        alignment: rule_weights.alignment,
        cohesion: rule_weights.cohesion,
        attraction: rule_weights.attraction,
    }
}

pub fn target_point(position: Option<Position>) -> Option<Vector2D> {
    position.map(|p| Vector2D::new(p.x, p.y))
}

/// Parses `X,Y` as given on the command line.
pub fn parse_point(text: &str) -> Result<Position> {
    let (x, y) = text
        .split_once(',')
        .with_context(|| format!("Expected X,Y but got '{}'", text))?;
    let x: f32 = x.trim().parse().with_context(|| format!("Bad x in '{}'", text))?;
    let y: f32 = y.trim().parse().with_context(|| format!("Bad y in '{}'", text))?;
    Ok(Position::new(x, y))
}
