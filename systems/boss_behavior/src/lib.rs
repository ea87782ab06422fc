#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Boss behaviour engine.
//!
//! Every boss owns a set of ability timers. Each step the engine advances the
//! timers of the phase boss and of the eternal stalker, emitting the commands
//! their abilities trigger (minion spawns, volleys, pulls, gaze strikes) and a
//! final `Command::UpdateBoss` carrying the new position and ability flags.
//!
//! The two slots are driven separately so the host can keep the eternal boss
//! running while phase-scoped updates are paused.

mod brain;
mod silver;
mod timers;

use std::time::Duration;

use brain::BossBrain;
use face_arena_core::{
    BossSlot, BossSnapshot, Command, CreatureView, Event, PlayArea, PlayerView,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use silver::SilverBrain;

/// Configuration parameters required to construct the behaviour engine.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration seeding the engine's random choices.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Read-only state a boss reacts to.
pub(crate) struct Surroundings<'a> {
    pub(crate) players: &'a PlayerView,
    pub(crate) creatures: &'a CreatureView,
    pub(crate) area: PlayArea,
}

/// Pure system driving the phase boss and the eternal boss.
#[derive(Debug)]
pub struct BossBehavior {
    phase: Option<BossBrain>,
    eternal: SilverBrain,
    rng: ChaCha8Rng,
}

impl BossBehavior {
    /// Creates a new behaviour engine using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            phase: None,
            eternal: SilverBrain::new(),
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Advances the phase boss, if one is active.
    ///
    /// A fresh set of ability timers is created whenever a phase boss spawns.
    /// Bosses idle while no players are tracked.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_phase(
        &mut self,
        events: &[Event],
        boss: Option<&BossSnapshot>,
        players: &PlayerView,
        creatures: &CreatureView,
        area: PlayArea,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let Some(boss) = boss else {
            self.phase = None;
            return;
        };

        let spawned = events.iter().any(|event| {
            matches!(
                event,
                Event::BossSpawned {
                    slot: BossSlot::Phase,
                    ..
                }
            )
        });
        let brain = match self.phase.take() {
            Some(brain) if !spawned && brain.kind() == boss.kind => brain,
            _ => BossBrain::new(boss.kind),
        };
        let brain = self.phase.insert(brain);

        let Some(target) = players.nearest(boss.position).map(|player| player.anchor) else {
            return;
        };
        let surroundings = Surroundings {
            players,
            creatures,
            area,
        };
        brain.step(boss, target, &surroundings, dt, &mut self.rng, out);
    }

    /// Advances the eternal boss. Runs every step, paused or not.
    pub fn handle_eternal(
        &mut self,
        boss: &BossSnapshot,
        players: &PlayerView,
        creatures: &CreatureView,
        area: PlayArea,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let Some(target) = players.nearest(boss.position).map(|player| player.anchor) else {
            return;
        };
        let surroundings = Surroundings {
            players,
            creatures,
            area,
        };
        self.eternal
            .step(boss, target, &surroundings, dt, &mut self.rng, out);
    }
}
