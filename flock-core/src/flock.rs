use alloc::vec::Vec;

use crate::boid::Boid;
use crate::config::Weights;
#[cfg(feature = "std")]
use crate::config::BoidConfig;
use crate::rules::{self, SteeringRule};
use crate::vector::Vector2D;

#[cfg(feature = "std")]
use rand::Rng;

/// Upper bound on the step scale used by [`Flock::tick_scaled`], so that a
/// long stall does not launch the flock across the plane.
pub const MAX_STEP_SCALE: f32 = 4.0;

/// A collection of boids sharing one wrapping plane.
///
/// Each tick runs in two passes: every force is computed against the
/// pre-tick state, then every boid is integrated. Membership changes queued
/// with [`Flock::queue_spawn`] / [`Flock::queue_despawn`] land after the
/// integration pass.
#[derive(Debug, Clone, Default)]
pub struct Flock {
    pub boids: Vec<Boid>,
    pending_spawns: Vec<Boid>,
    pending_despawns: Vec<usize>,
    ticks: u64,
}

impl Flock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_boids(boids: Vec<Boid>) -> Self {
        Self {
            boids,
            ..Self::default()
        }
    }

    /// `count` boids at uniformly random positions inside the plane.
    #[cfg(feature = "std")]
    pub fn random<R: Rng + ?Sized>(
        rng: &mut R,
        count: usize,
        width: f32,
        height: f32,
        config: &BoidConfig,
    ) -> Self {
        let boids = (0..count)
            .map(|_| Boid::random(rng, width, height, config))
            .collect();
        log::debug!("Created flock of {} boids on {}x{}", count, width, height);
        Self::from_boids(boids)
    }

    #[cfg(feature = "std")]
    pub fn create(count: usize, width: f32, height: f32) -> Self {
        Self::random(
            &mut rand::thread_rng(),
            count,
            width,
            height,
            &BoidConfig::default(),
        )
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }

    /// Number of ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn add_boid(&mut self, boid: Boid) {
        self.boids.push(boid);
    }

    /// Removes the boid at `index`, shifting later boids down.
    pub fn remove_boid(&mut self, index: usize) -> Option<Boid> {
        if index < self.boids.len() {
            Some(self.boids.remove(index))
        } else {
            None
        }
    }

    /// Adds `boid` once the next tick has integrated.
    pub fn queue_spawn(&mut self, boid: Boid) {
        self.pending_spawns.push(boid);
    }

    /// Removes the boid at `index` (as numbered during the next tick) once
    /// that tick has integrated.
    pub fn queue_despawn(&mut self, index: usize) {
        self.pending_despawns.push(index);
    }

    /// Position and heading of every boid, for drawing.
    pub fn states(&self) -> impl Iterator<Item = (Vector2D, f32)> + '_ {
        self.boids.iter().map(|boid| (boid.position, boid.heading()))
    }

    /// First pass: accumulate separation, alignment and cohesion into every
    /// boid's acceleration, all computed from the same snapshot.
    pub fn apply_rules(&mut self, weights: &Weights) {
        let forces: Vec<Vector2D> = (0..self.boids.len())
            .map(|index| rules::flocking(index, &self.boids, weights))
            .collect();
        self.apply_forces(forces);
    }

    /// Like [`Flock::apply_rules`] for an arbitrary weighted rule set.
    pub fn apply_rule_set(&mut self, rule_set: &[(&dyn SteeringRule, f32)]) {
        let forces: Vec<Vector2D> = (0..self.boids.len())
            .map(|index| {
                rule_set
                    .iter()
                    .fold(Vector2D::zero(), |sum, (rule, weight)| {
                        sum + rule.steer(index, &self.boids) * *weight
                    })
            })
            .collect();
        self.apply_forces(forces);
    }

    /// Adds a weighted seek towards `target` to every boid.
    pub fn attract(&mut self, target: Vector2D, weight: f32) {
        for boid in self.boids.iter_mut() {
            let force = boid.seek(target) * weight;
            boid.apply_force(force);
        }
    }

    /// Wander jitter for every boid. Kept out of [`Flock::tick`] so ticks
    /// stay deterministic.
    #[cfg(feature = "std")]
    pub fn apply_wander<R: Rng + ?Sized>(&mut self, rng: &mut R, randomness: f32) {
        for boid in self.boids.iter_mut() {
            let force = boid.randomize(rng, randomness);
            boid.apply_force(force);
        }
    }

    /// Second pass: integrate and wrap every boid.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.advance_scaled(width, height, 1.0);
    }

    pub fn advance_scaled(&mut self, width: f32, height: f32, scale: f32) {
        for boid in self.boids.iter_mut() {
            boid.advance_scaled(width, height, scale);
        }
        self.ticks += 1;
        self.apply_pending();
    }

    /// Advances the whole flock by one fixed step.
    ///
    /// `width` and `height` are the current plane size; they are read fresh
    /// on every call. With a `target`, each boid also seeks it with
    /// `weights.attraction`.
    pub fn tick(&mut self, width: f32, height: f32, weights: &Weights, target: Option<Vector2D>) {
        self.tick_scaled(width, height, weights, target, 1.0, 1.0);
    }

    /// [`Flock::tick`] with integration scaled by `elapsed / nominal`.
    ///
    /// The scale is clamped to `[0, MAX_STEP_SCALE]`; a non-positive
    /// `nominal` falls back to a fixed step.
    pub fn tick_scaled(
        &mut self,
        width: f32,
        height: f32,
        weights: &Weights,
        target: Option<Vector2D>,
        elapsed: f32,
        nominal: f32,
    ) {
        log::trace!(
            "tick {}: {} boids on {}x{}",
            self.ticks,
            self.boids.len(),
            width,
            height
        );
        self.apply_rules(weights);
        if let Some(point) = target {
            self.attract(point, weights.attraction);
        }
        self.advance_scaled(width, height, step_scale(elapsed, nominal));
    }

    /// One fixed step driven by a caller-chosen rule set. `target` carries
    /// the attraction point and its weight.
    pub fn tick_with_rules(
        &mut self,
        width: f32,
        height: f32,
        rule_set: &[(&dyn SteeringRule, f32)],
        target: Option<(Vector2D, f32)>,
    ) {
        self.apply_rule_set(rule_set);
        if let Some((point, weight)) = target {
            self.attract(point, weight);
        }
        self.advance(width, height);
    }

    fn apply_forces(&mut self, forces: Vec<Vector2D>) {
        for (boid, force) in self.boids.iter_mut().zip(forces) {
            boid.apply_force(force);
        }
    }

    fn apply_pending(&mut self) {
        if !self.pending_despawns.is_empty() {
            let mut despawns = core::mem::take(&mut self.pending_despawns);
            despawns.sort_unstable_by(|a, b| b.cmp(a));
            despawns.dedup();
            for index in despawns {
                if self.remove_boid(index).is_none() {
                    log::warn!("Ignoring despawn of missing boid {}", index);
                }
            }
            log::debug!("Flock size after despawn: {}", self.boids.len());
        }

        if !self.pending_spawns.is_empty() {
            let spawned = self.pending_spawns.len();
            self.boids.append(&mut self.pending_spawns);
            log::debug!("Spawned {} boids, flock size {}", spawned, self.boids.len());
        }
    }
}

fn step_scale(elapsed: f32, nominal: f32) -> f32 {
    if nominal > 0.0 && elapsed.is_finite() {
        (elapsed / nominal).clamp(0.0, MAX_STEP_SCALE)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoidConfig;
    use crate::rules::{Alignment, Cohesion, Separation, TurnAlignment};
    use alloc::vec;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn still(x: f32, y: f32) -> Boid {
        Boid::new(Vector2D::new(x, y), Vector2D::zero())
    }

    #[test]
    fn test_flock_creation() {
        let mut rng = StdRng::seed_from_u64(1);
        let flock = Flock::random(&mut rng, 50, 800.0, 600.0, &BoidConfig::default());
        assert_eq!(flock.len(), 50);
        assert_eq!(flock.ticks(), 0);
        assert!(flock
            .boids
            .iter()
            .all(|b| b.position.x < 800.0 && b.position.y < 600.0));
    }

    #[test]
    fn test_flock_create_with_thread_rng() {
        let flock = Flock::create(10, 100.0, 100.0);
        assert_eq!(flock.len(), 10);
    }

    #[test]
    fn test_empty_flock_ticks() {
        let mut flock = Flock::new();
        flock.tick(100.0, 100.0, &Weights::default(), Some(Vector2D::new(1.0, 1.0)));
        assert!(flock.is_empty());
        assert_eq!(flock.ticks(), 1);
    }

    #[test]
    fn test_flock_update() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut flock = Flock::random(&mut rng, 10, 800.0, 600.0, &BoidConfig::default());
        let initial_positions: Vec<_> = flock.boids.iter().map(|b| b.position).collect();

        flock.tick(800.0, 600.0, &Weights::default(), None);

        let changed = flock
            .boids
            .iter()
            .zip(initial_positions.iter())
            .any(|(b, &initial)| b.position != initial);

        assert!(changed);
    }

    #[test]
    fn test_lone_boid_moves_by_velocity_and_wraps() {
        let config = BoidConfig {
            max_speed: 5.0,
            ..BoidConfig::default()
        };
        let mut flock = Flock::from_boids(vec![Boid::with_config(
            Vector2D::new(99.0, 30.0),
            Vector2D::new(5.0, 0.0),
            &config,
        )]);

        flock.tick(100.0, 100.0, &Weights::default(), None);

        assert_eq!(flock.boids[0].position, Vector2D::new(4.0, 30.0));
        assert_eq!(flock.boids[0].velocity, Vector2D::new(5.0, 0.0));
    }

    #[test]
    fn test_forces_use_pre_tick_snapshot() {
        let boids = vec![
            Boid::new(Vector2D::new(10.0, 10.0), Vector2D::new(1.0, 0.0)),
            Boid::new(Vector2D::new(40.0, 20.0), Vector2D::new(0.0, 1.0)),
            Boid::new(Vector2D::new(70.0, 5.0), Vector2D::new(-1.0, 0.5)),
        ];
        let weights = Weights::new(1.5, 1.0, 1.0);

        // integrate by hand from forces taken on the untouched snapshot
        let mut expected = boids.clone();
        for (index, boid) in expected.iter_mut().enumerate() {
            boid.apply_force(rules::flocking(index, &boids, &weights));
            boid.advance(300.0, 300.0);
        }

        let mut flock = Flock::from_boids(boids);
        flock.tick(300.0, 300.0, &weights, None);

        assert_eq!(flock.boids, expected);
    }

    #[test]
    fn test_tick_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(99);
        let start = Flock::random(&mut rng, 30, 400.0, 300.0, &BoidConfig::default());
        let weights = Weights::new(1.5, 1.0, 1.2);
        let target = Some(Vector2D::new(200.0, 150.0));

        let mut a = start.clone();
        let mut b = start;
        for _ in 0..20 {
            a.tick(400.0, 300.0, &weights, target);
            b.tick(400.0, 300.0, &weights, target);
        }

        assert_eq!(a.boids, b.boids);
    }

    #[test]
    fn test_target_attracts() {
        let mut flock = Flock::from_boids(vec![still(10.0, 10.0)]);
        let weights = Weights::default().with_attraction(2.0);

        flock.tick(100.0, 100.0, &weights, Some(Vector2D::new(50.0, 10.0)));

        assert!((flock.boids[0].velocity.x - 0.1).abs() < 1e-6);
        assert!((flock.boids[0].position.x - 10.1).abs() < 1e-5);
    }

    #[test]
    fn test_no_target_no_attraction() {
        let mut flock = Flock::from_boids(vec![still(10.0, 10.0)]);
        flock.tick(100.0, 100.0, &Weights::default(), None);
        assert_eq!(flock.boids[0].position, Vector2D::new(10.0, 10.0));
    }

    #[test]
    fn test_three_boid_scenario() {
        let boids = vec![still(0.0, 0.0), still(50.0, 0.0), still(200.0, 200.0)];

        // the far boid sees nobody
        assert_eq!(rules::alignment(2, &boids), Vector2D::zero());
        assert_eq!(rules::cohesion(2, &boids), Vector2D::zero());
        assert_eq!(rules::separation(2, &boids), Vector2D::zero());

        // the near pair see each other through every rule radius
        assert!(rules::separation(0, &boids).x < 0.0);
        assert!(rules::separation(1, &boids).x > 0.0);
        assert!(rules::cohesion(0, &boids).x > 0.0);
        assert!(rules::cohesion(1, &boids).x < 0.0);

        let mut flock = Flock::from_boids(boids);
        flock.tick(300.0, 300.0, &Weights::new(2.0, 1.0, 1.0), None);

        assert_eq!(flock.boids[2].position, Vector2D::new(200.0, 200.0));
        assert!(flock.boids[0].velocity.x < 0.0);
        assert!(flock.boids[1].velocity.x > 0.0);
    }

    #[test]
    fn test_tick_with_rules_matches_tick() {
        let boids = vec![
            Boid::new(Vector2D::new(10.0, 10.0), Vector2D::new(1.0, 0.0)),
            Boid::new(Vector2D::new(40.0, 20.0), Vector2D::new(0.0, 1.0)),
        ];
        let weights = Weights::new(1.5, 1.0, 1.0);
        let target = Vector2D::new(5.0, 80.0);

        let mut classic = Flock::from_boids(boids.clone());
        classic.tick(300.0, 300.0, &weights, Some(target));

        let rule_set: [(&dyn SteeringRule, f32); 3] =
            [(&Separation, 1.5), (&Alignment, 1.0), (&Cohesion, 1.0)];
        let mut composed = Flock::from_boids(boids);
        composed.tick_with_rules(300.0, 300.0, &rule_set, Some((target, 1.0)));

        for (a, b) in classic.boids.iter().zip(composed.boids.iter()) {
            assert!((a.position.x - b.position.x).abs() < 1e-5);
            assert!((a.position.y - b.position.y).abs() < 1e-5);
        }
    }

    #[test]
    fn test_tick_with_turn_rule() {
        let boids = vec![
            Boid::new(Vector2D::new(0.0, 0.0), Vector2D::new(2.0, 0.0)),
            Boid::new(Vector2D::new(20.0, 0.0), Vector2D::new(0.0, 2.0)),
        ];
        let rule_set: [(&dyn SteeringRule, f32); 1] = [(&TurnAlignment { max_turn: 0.05 }, 1.0)];
        let mut flock = Flock::from_boids(boids);
        flock.tick_with_rules(100.0, 100.0, &rule_set, None);

        assert!((flock.boids[0].heading() - 0.05).abs() < 1e-4);
    }

    #[test]
    fn test_tick_scaled() {
        let boids = vec![Boid::new(Vector2D::new(10.0, 10.0), Vector2D::new(2.0, 0.0))];

        let mut half = Flock::from_boids(boids.clone());
        half.tick_scaled(100.0, 100.0, &Weights::default(), None, 5.0, 10.0);
        assert_eq!(half.boids[0].position, Vector2D::new(11.0, 10.0));

        // a long stall is clamped
        let mut stalled = Flock::from_boids(boids);
        stalled.tick_scaled(100.0, 100.0, &Weights::default(), None, 1000.0, 10.0);
        assert_eq!(stalled.boids[0].position, Vector2D::new(18.0, 10.0));
    }

    #[test]
    fn test_step_scale() {
        assert_eq!(step_scale(10.0, 10.0), 1.0);
        assert_eq!(step_scale(-5.0, 10.0), 0.0);
        assert_eq!(step_scale(5.0, 0.0), 1.0);
        assert_eq!(step_scale(f32::NAN, 10.0), 1.0);
    }

    #[test]
    fn test_flock_add_and_remove_boid() {
        let mut flock = Flock::from_boids(vec![still(1.0, 1.0), still(2.0, 2.0)]);
        flock.add_boid(still(3.0, 3.0));
        assert_eq!(flock.len(), 3);

        let removed = flock.remove_boid(0);
        assert_eq!(removed.map(|b| b.position), Some(Vector2D::new(1.0, 1.0)));
        assert_eq!(flock.boids[0].position, Vector2D::new(2.0, 2.0));
        assert!(flock.remove_boid(5).is_none());
    }

    #[test]
    fn test_queued_membership_applies_after_tick() {
        let mut flock =
            Flock::from_boids(vec![still(0.0, 0.0), still(50.0, 0.0), still(90.0, 90.0)]);
        flock.queue_despawn(0);
        flock.queue_despawn(2);
        flock.queue_despawn(7);
        flock.queue_spawn(still(10.0, 10.0));
        assert_eq!(flock.len(), 3);

        flock.tick(100.0, 100.0, &Weights::default(), None);

        assert_eq!(flock.len(), 2);
        // survivor was integrated with its neighbours still present
        assert_ne!(flock.boids[0].velocity, Vector2D::zero());
        assert_eq!(flock.boids[1].position, Vector2D::new(10.0, 10.0));

        flock.tick(100.0, 100.0, &Weights::default(), None);
        assert_eq!(flock.len(), 2);
    }

    #[test]
    fn test_states_report_heading() {
        let flock = Flock::from_boids(vec![Boid::new(
            Vector2D::new(4.0, 5.0),
            Vector2D::new(0.0, 1.0),
        )]);
        let states: Vec<_> = flock.states().collect();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].0, Vector2D::new(4.0, 5.0));
        assert!((states[0].1 - core::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_wander_changes_velocity() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut flock =
            Flock::from_boids(vec![Boid::new(Vector2D::zero(), Vector2D::new(2.0, 0.0))]);
        flock.apply_wander(&mut rng, 0.5);
        assert!(flock.boids[0].acceleration.magnitude() <= 0.05 + 1e-6);
    }
}
