use std::time::Duration;

use face_arena_core::{
    BossAbilities, BossSnapshot, Command, CreatureId, CreatureKind, PlayerSlot, Point,
};
use rand::Rng;

use crate::{
    timers::{Cooldown, Orbit},
    Surroundings,
};

const DRAIN_INTERVAL: Duration = Duration::from_secs(5);
const DRAIN_DURATION: Duration = Duration::from_secs(4);
/// Saturation lost per second while the drain runs.
const DRAIN_RATE: f32 = 0.3;
const MIN_SATURATION: f32 = 0.1;

const GAZE_INTERVAL: Duration = Duration::from_secs(3);
const GAZE_DURATION: Duration = Duration::from_millis(1500);
/// Lives removed by an unanswered gaze.
const GAZE_DAMAGE: u32 = 2;

const CHAIN_INTERVAL: Duration = Duration::from_secs(2);
/// Speed at which a chained creature is reeled in.
const CHAIN_PULL_SPEED: f32 = 200.0;
/// Extra reach beyond the boss radius at which the chained creature is eaten.
const CHAIN_REACH: f32 = 20.0;

const MENCHUBA_INTERVAL: Duration = Duration::from_secs(3);

/// Ability state of the silver stalker.
///
/// Every timer accumulates independently; drain and gaze keep a single clock
/// that restarts when the ability begins and keeps running while it lasts.
#[derive(Clone, Debug)]
pub(crate) struct SilverBrain {
    orbit: Orbit,
    drain_timer: Duration,
    drain_active: bool,
    saturation: f32,
    gaze_timer: Duration,
    gaze_target: Option<PlayerSlot>,
    chain_timer: Duration,
    chain_target: Option<CreatureId>,
    menchuba: Cooldown,
}

impl SilverBrain {
    pub(crate) fn new() -> Self {
        Self {
            orbit: Orbit::default(),
            drain_timer: Duration::ZERO,
            drain_active: false,
            saturation: 1.0,
            gaze_timer: Duration::ZERO,
            gaze_target: None,
            chain_timer: Duration::ZERO,
            chain_target: None,
            menchuba: Cooldown::new(MENCHUBA_INTERVAL),
        }
    }

    pub(crate) fn step<R>(
        &mut self,
        boss: &BossSnapshot,
        target: Point,
        surroundings: &Surroundings<'_>,
        dt: Duration,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) where
        R: Rng + ?Sized,
    {
        let position = self.orbit.advance(dt, target);

        self.drain(dt);
        self.gaze(position, surroundings, dt, out);
        self.chain(boss, position, surroundings, dt, out);

        if self.menchuba.tick(dt) {
            let kind = CreatureKind::Menchuba;
            out.push(Command::SpawnCreature {
                kind,
                position: surroundings.area.border_point(rng, kind.radius()),
            });
        }

        out.push(Command::UpdateBoss {
            slot: boss.slot,
            position,
            heading: self.orbit.angle(),
            abilities: BossAbilities {
                gaze_target: self.gaze_target,
                chain_target: self.chain_target,
                drain_active: self.drain_active,
                saturation: self.saturation,
                ..BossAbilities::default()
            },
        });
    }

    fn drain(&mut self, dt: Duration) {
        self.drain_timer = self.drain_timer.saturating_add(dt);
        if self.drain_timer >= DRAIN_INTERVAL {
            self.drain_active = true;
            self.drain_timer = Duration::ZERO;
        }

        if self.drain_active {
            self.saturation =
                (self.saturation - DRAIN_RATE * dt.as_secs_f32()).max(MIN_SATURATION);
            if self.drain_timer >= DRAIN_DURATION {
                self.drain_active = false;
                self.saturation = 1.0;
            }
        }
    }

    fn gaze(
        &mut self,
        position: Point,
        surroundings: &Surroundings<'_>,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        self.gaze_timer = self.gaze_timer.saturating_add(dt);
        if self.gaze_timer >= GAZE_INTERVAL {
            if let Some(player) = surroundings.players.nearest(position) {
                self.gaze_target = Some(player.slot);
                self.gaze_timer = Duration::ZERO;
            }
        }

        if let Some(player) = self.gaze_target {
            if self.gaze_timer >= GAZE_DURATION {
                self.gaze_target = None;
                out.push(Command::GazeStrike {
                    player,
                    damage: GAZE_DAMAGE,
                });
            }
        }
    }

    fn chain(
        &mut self,
        boss: &BossSnapshot,
        position: Point,
        surroundings: &Surroundings<'_>,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        self.chain_timer = self.chain_timer.saturating_add(dt);
        if self.chain_timer >= CHAIN_INTERVAL {
            if let Some(creature) = surroundings.creatures.nearest(position) {
                self.chain_target = Some(creature.id);
                self.chain_timer = Duration::ZERO;
            }
        }

        let Some(id) = self.chain_target else {
            return;
        };
        let Some(creature) = surroundings.creatures.get(id) else {
            self.chain_target = None;
            return;
        };

        if creature.position.distance(position) > boss.radius + CHAIN_REACH {
            out.push(Command::DisplaceCreature {
                creature: id,
                offset: creature.position.direction_to(position)
                    * (CHAIN_PULL_SPEED * dt.as_secs_f32()),
            });
        } else {
            self.chain_target = None;
            out.push(Command::ConsumeCreature {
                slot: boss.slot,
                creature: id,
            });
        }
    }
}
