#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting creature spawn
//! commands during minion waves.

use std::time::Duration;

use face_arena_core::{Command, CreatureKind, Event, Phase, PlayArea};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Cumulative thresholds over a uniform `[0, 1)` draw; rolls past the last
/// entry spawn a dragon.
const SPAWN_TABLE: [(f32, CreatureKind); 6] = [
    (0.40, CreatureKind::Plain),
    (0.60, CreatureKind::Snowie),
    (0.75, CreatureKind::FireSpinner),
    (0.85, CreatureKind::Ghost),
    (0.92, CreatureKind::Skeleton),
    (0.98, CreatureKind::Caster),
];

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits spawn commands while minions are
/// active.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the active phase to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: Phase,
        area: PlayArea,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Minions {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.spawn_interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let spawn_attempts = self.resolve_spawn_attempts();

        for _ in 0..spawn_attempts {
            let kind = kind_for_roll(self.rng.gen::<f32>());
            let position = area.border_point(&mut self.rng, kind.radius());
            out.push(Command::SpawnCreature { kind, position });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }
}

/// Maps a uniform `[0, 1)` roll onto the weighted creature distribution.
#[must_use]
pub fn kind_for_roll(roll: f32) -> CreatureKind {
    SPAWN_TABLE
        .iter()
        .find(|(threshold, _)| roll < *threshold)
        .map_or(CreatureKind::Dragon, |(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_interval_never_spawns() {
        let mut spawning = Spawning::new(Config::new(Duration::ZERO, 1));
        let mut commands = Vec::new();
        spawning.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(10),
            }],
            Phase::Minions,
            PlayArea::default(),
            &mut commands,
        );

        assert!(commands.is_empty());
        assert!(spawning.accumulator.is_zero());
    }

    #[test]
    fn spawn_attempts_keep_the_remainder() {
        let mut spawning = Spawning::new(Config::new(Duration::from_millis(1500), 1));
        spawning.accumulator = Duration::from_millis(3200);

        assert_eq!(spawning.resolve_spawn_attempts(), 2);
        assert_eq!(spawning.accumulator, Duration::from_millis(200));
    }

    #[test]
    fn rolls_follow_cumulative_weights() {
        assert_eq!(kind_for_roll(0.0), CreatureKind::Plain);
        assert_eq!(kind_for_roll(0.39), CreatureKind::Plain);
        assert_eq!(kind_for_roll(0.40), CreatureKind::Snowie);
        assert_eq!(kind_for_roll(0.74), CreatureKind::FireSpinner);
        assert_eq!(kind_for_roll(0.80), CreatureKind::Ghost);
        assert_eq!(kind_for_roll(0.91), CreatureKind::Skeleton);
        assert_eq!(kind_for_roll(0.95), CreatureKind::Caster);
        assert_eq!(kind_for_roll(0.99), CreatureKind::Dragon);
    }
}
