#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver composing the world and its systems.
//!
//! Every frame runs the same fixed sequence: perception is mapped to player
//! actions, the phase clock ticks (moving entities and resolving combat),
//! minions spawn, the eternal boss and then the phase boss act, and finally
//! the encounter state machine decides whether the phase changes.
//!
//! Pausing gates everything except the eternal boss, which keeps acting and
//! colliding while the rest of the arena is frozen. A frame without any
//! detected face is skipped without touching the world.

mod config;
mod script;
mod services;
mod session;

use std::time::Duration;

use face_arena_core::{BossSlot, Command, Event, Phase, PerceptionFrame};
use face_arena_system_boss_behavior::{self as boss_behavior, BossBehavior};
use face_arena_system_encounter::Encounter;
use face_arena_system_gestures::Gestures;
use face_arena_system_spawning::{self as spawning, Spawning};
use face_arena_world::{self as world, query, World};
use tracing::{debug, info, trace};

pub use config::{ConfigError, GameConfig, PlayAreaConfig};
pub use script::{
    PerceptionScript, ScriptError, ScriptStep, ScriptedAudio, ScriptedPerception,
};
pub use services::{AudioService, PerceptionService, PhraseCycle, ServiceError, PHRASES};
pub use session::{OperatorInput, Session};

/// Salts mixed into the configured seed so the spawner and the boss engine
/// draw from streams independent of the world's.
const SPAWN_SEED_SALT: u64 = 0x6a09_e667_f3bc_c909;
const BOSS_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeds for the world, the spawner and the boss engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StreamSeeds {
    world: u64,
    spawning: u64,
    bosses: u64,
}

impl StreamSeeds {
    fn derive(seed: u64) -> Self {
        Self {
            world: seed,
            spawning: seed ^ SPAWN_SEED_SALT,
            bosses: seed ^ BOSS_SEED_SALT,
        }
    }
}

/// Readings and operator state for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepInput {
    /// Perception reading, or `None` when the sensor produced nothing.
    pub frame: Option<PerceptionFrame>,
    /// Normalised microphone amplitude.
    pub amplitude: f32,
    /// Wall-clock time since the previous frame.
    pub dt: Duration,
    /// Whether the phase-scoped simulation is frozen.
    pub paused: bool,
}

/// What a call to [`Simulation::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The full frame sequence ran.
    Advanced,
    /// Only the eternal boss advanced.
    Paused,
    /// No face was detected; nothing changed.
    Skipped,
}

/// Owns the world and every system, and advances them frame by frame.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    gestures: Gestures,
    spawning: Spawning,
    bosses: BossBehavior,
    encounter: Encounter,
    max_step: Duration,
    events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Builds a simulation from a validated configuration.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        let seeds = StreamSeeds::derive(config.seed);
        let mut world = World::with_seed(seeds.world);
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigurePlayArea {
                area: config.play_area(),
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::ConfigureWaves {
                kill_thresholds: config.kill_thresholds.clone(),
            },
            &mut events,
        );

        Self {
            world,
            gestures: Gestures::new(),
            spawning: Spawning::new(spawning::Config::new(
                config.spawn_interval(),
                seeds.spawning,
            )),
            bosses: BossBehavior::new(boss_behavior::Config::new(seeds.bosses)),
            encounter: Encounter::new(),
            max_step: config.max_step(),
            events,
            commands: Vec::new(),
        }
    }

    /// Read-only access to the world for rendering and inspection.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Events produced by the most recent step.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Advances the simulation by one frame.
    pub fn step(&mut self, input: &StepInput) -> StepOutcome {
        self.events.clear();
        let dt = input.dt.min(self.max_step);

        if input.paused {
            self.advance_eternal_boss(dt);
            self.log_events();
            return StepOutcome::Paused;
        }

        let Some(frame) = input.frame.as_ref().filter(|frame| !frame.faces.is_empty()) else {
            trace!(
                tick = query::tick_index(&self.world),
                "no face detected, skipping step"
            );
            return StepOutcome::Skipped;
        };
        let area = query::play_area(&self.world);

        self.gestures.handle(
            frame,
            input.amplitude,
            &query::player_view(&self.world),
            area,
            dt,
            &mut self.commands,
        );
        self.flush();

        self.commands.push(Command::Tick { dt });
        self.flush();

        self.spawning.handle(
            &self.events,
            query::phase(&self.world),
            area,
            &mut self.commands,
        );
        self.flush();

        self.advance_eternal_boss(dt);

        let phase_boss = query::phase_boss(&self.world);
        self.bosses.handle_phase(
            &self.events,
            phase_boss.as_ref(),
            &query::player_view(&self.world),
            &query::creature_view(&self.world),
            area,
            dt,
            &mut self.commands,
        );
        if phase_boss.is_some() {
            self.commands.push(Command::ResolveBossCombat {
                slot: BossSlot::Phase,
            });
        }
        self.flush();

        self.encounter
            .handle(&self.events, &query::wave(&self.world), &mut self.commands);
        self.flush();

        self.log_events();
        StepOutcome::Advanced
    }

    fn advance_eternal_boss(&mut self, dt: Duration) {
        self.bosses.handle_eternal(
            &query::eternal_boss(&self.world),
            &query::player_view(&self.world),
            &query::creature_view(&self.world),
            query::play_area(&self.world),
            dt,
            &mut self.commands,
        );
        self.commands.push(Command::ResolveBossCombat {
            slot: BossSlot::Eternal,
        });
        self.flush();
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn log_events(&self) {
        for event in &self.events {
            match event {
                Event::PhaseChanged {
                    phase: Phase::Victory,
                } => info!("every wave cleared, victory"),
                Event::PhaseChanged { phase } => {
                    let wave = query::wave(&self.world);
                    info!(%phase, wave = wave.wave_index, "phase changed");
                }
                Event::BossDefeated { kind } => info!(boss = %kind, "boss defeated"),
                Event::PlayerRespawned { player } => {
                    debug!(player = player.get(), "player out of lives, respawned");
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_system_draws_from_its_own_stream() {
        for seed in [0, 42, u64::MAX] {
            let seeds = StreamSeeds::derive(seed);
            assert_eq!(seeds.world, seed);
            assert_ne!(seeds.world, seeds.spawning);
            assert_ne!(seeds.world, seeds.bosses);
            assert_ne!(seeds.spawning, seeds.bosses);
        }
    }
}
