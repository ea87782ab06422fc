use std::time::Duration;

use face_arena_core::{
    BossAbilities, BossKind, BossSnapshot, Command, CreatureKind, PlayArea, PlayerView, Point,
    ProjectileKind, ProjectileOwner,
};
use rand::Rng;

use crate::{
    silver::SilverBrain,
    timers::{Cooldown, Orbit, Teleport},
    Surroundings,
};

const SNOW_KING_SUMMON: Duration = Duration::from_secs(3);
const FLAME_WARDEN_SUMMON: Duration = Duration::from_secs(2);

const VORTEX_PULSE: Duration = Duration::from_secs(3);
const VORTEX_RADIUS: f32 = 200.0;
/// Pull applied during the pulse step, in units per second.
const VORTEX_STRENGTH: f32 = 100.0;

const SPINNER_VOLLEY: Duration = Duration::from_millis(2500);
/// Spin rate in radians per second.
const SPINNER_SPIN: f32 = 6.0;
/// Height the spinner keeps above its target.
const SPINNER_HOVER: f32 = 150.0;
const SPINNER_SHOT_SPEED: f32 = 300.0;
const SPINNER_SHOTS: u16 = 8;

const RAM_COOLDOWN: Duration = Duration::from_secs(4);
const RAM_CHARGE: Duration = Duration::from_millis(500);
const RAM_SPEED: f32 = 400.0;

const TRACKER_COOLDOWN: Duration = Duration::from_secs(3);
const TRACKER_SHOT_SPEED: f32 = 200.0;

const ARTICAL_TELEPORT: Duration = Duration::from_secs(4);

const SHADOW_CLONE: Duration = Duration::from_secs(5);

const ALIEN_KING_VOLLEY: Duration = Duration::from_secs(4);
const ALIEN_KING_SHOTS: u16 = 12;
/// Maximum random deviation of each volley shot, in degrees.
const ALIEN_KING_JITTER: f32 = 15.0;
const ALIEN_KING_SHOT_SPEED: f32 = 350.0;

const MADACKEDA_SUMMON: Duration = Duration::from_millis(1500);
const MADACKEDA_TELEPORT: Duration = Duration::from_secs(5);
const MADACKEDA_SHIELD_INTERVAL: Duration = Duration::from_secs(4);
const MADACKEDA_SHIELD_DURATION: Duration = Duration::from_secs(2);
const MADACKEDA_VOLLEY: Duration = Duration::from_secs(3);
/// Directions of the V volley, in degrees (screen y grows downward).
const MADACKEDA_VOLLEY_ANGLES: [f32; 2] = [240.0, 300.0];
const MADACKEDA_SHOT_SPEED: f32 = 400.0;

/// Behaviour of a single boss instance.
#[derive(Clone, Debug)]
pub(crate) struct BossBrain {
    kind: BossKind,
    orbit: Orbit,
    ability: Ability,
}

#[derive(Clone, Debug)]
enum Ability {
    Summon { minion: CreatureKind, timer: Cooldown },
    Vortex { pulse: Cooldown },
    Spinner { spin: f32, volley: Cooldown },
    Ram { cooldown: Cooldown, charge: Option<Charge> },
    Tracker { shot: Cooldown },
    Artical { teleport: Teleport },
    Shadow { clone: Cooldown },
    AlienKing { volley: Cooldown },
    Madackeda(Madackeda),
    Silver(SilverBrain),
}

#[derive(Clone, Copy, Debug)]
struct Charge {
    velocity: Point,
    elapsed: Duration,
}

#[derive(Clone, Debug)]
struct Madackeda {
    summon: Cooldown,
    teleport: Teleport,
    shield_timer: Duration,
    shield_remaining: Option<Duration>,
    volley: Cooldown,
}

impl Madackeda {
    fn new() -> Self {
        Self {
            summon: Cooldown::new(MADACKEDA_SUMMON),
            teleport: Teleport::new(MADACKEDA_TELEPORT),
            shield_timer: Duration::ZERO,
            shield_remaining: None,
            volley: Cooldown::new(MADACKEDA_VOLLEY),
        }
    }

    /// The shield clock keeps running while the shield is up, so the shield
    /// rises every interval measured from the previous rise.
    fn update_shield(&mut self, dt: Duration) -> bool {
        self.shield_timer = self.shield_timer.saturating_add(dt);
        if self.shield_remaining.is_none() && self.shield_timer >= MADACKEDA_SHIELD_INTERVAL {
            self.shield_remaining = Some(MADACKEDA_SHIELD_DURATION);
            self.shield_timer = Duration::ZERO;
        }

        if let Some(remaining) = self.shield_remaining {
            let remaining = remaining.saturating_sub(dt);
            self.shield_remaining = (!remaining.is_zero()).then_some(remaining);
        }
        self.shield_remaining.is_some()
    }
}

impl BossBrain {
    pub(crate) fn new(kind: BossKind) -> Self {
        let ability = match kind {
            BossKind::SnowKing => Ability::Summon {
                minion: CreatureKind::Snowie,
                timer: Cooldown::new(SNOW_KING_SUMMON),
            },
            BossKind::FlameWarden => Ability::Summon {
                minion: CreatureKind::FireSpinner,
                timer: Cooldown::new(FLAME_WARDEN_SUMMON),
            },
            BossKind::Vortex => Ability::Vortex {
                pulse: Cooldown::new(VORTEX_PULSE),
            },
            BossKind::Spinner => Ability::Spinner {
                spin: 0.0,
                volley: Cooldown::new(SPINNER_VOLLEY),
            },
            BossKind::Ram => Ability::Ram {
                cooldown: Cooldown::new(RAM_COOLDOWN),
                charge: None,
            },
            BossKind::Tracker => Ability::Tracker {
                shot: Cooldown::new(TRACKER_COOLDOWN),
            },
            BossKind::Artical => Ability::Artical {
                teleport: Teleport::new(ARTICAL_TELEPORT),
            },
            BossKind::Shadow => Ability::Shadow {
                clone: Cooldown::new(SHADOW_CLONE),
            },
            BossKind::AlienKing => Ability::AlienKing {
                volley: Cooldown::new(ALIEN_KING_VOLLEY),
            },
            BossKind::Madackeda => Ability::Madackeda(Madackeda::new()),
            BossKind::Silver => Ability::Silver(SilverBrain::new()),
        };
        Self {
            kind,
            orbit: Orbit::default(),
            ability,
        }
    }

    pub(crate) fn kind(&self) -> BossKind {
        self.kind
    }

    /// Advances the boss by `dt`, pushing ability commands followed by the
    /// boss update.
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
        let seconds = dt.as_secs_f32();
        let mut abilities = BossAbilities::default();

        let position = match &mut self.ability {
            Ability::Silver(brain) => {
                brain.step(boss, target, surroundings, dt, rng, out);
                return;
            }
            Ability::Summon { minion, timer } => {
                let position = self.orbit.advance(dt, target);
                if timer.tick(dt) {
                    summon(*minion, surroundings.area, rng, out);
                }
                position
            }
            Ability::Vortex { pulse } => {
                let position = self.orbit.advance(dt, target);
                if pulse.tick(dt) {
                    out.push(Command::PullCreatures {
                        center: position,
                        radius: VORTEX_RADIUS,
                        distance: VORTEX_STRENGTH * seconds,
                    });
                }
                position
            }
            Ability::Spinner { spin, volley } => {
                *spin += SPINNER_SPIN * seconds;
                let position = target + Point::new(0.0, -SPINNER_HOVER);
                if volley.tick(dt) {
                    for shot in 0..SPINNER_SHOTS {
                        let direction = Point::from_angle(f32::from(shot * 45).to_radians());
                        fire(position, direction * SPINNER_SHOT_SPEED, out);
                    }
                }
                position
            }
            Ability::Ram { cooldown, charge } => match charge {
                Some(active) => {
                    active.elapsed = active.elapsed.saturating_add(dt);
                    let position = boss.position + active.velocity * seconds;
                    if active.elapsed >= RAM_CHARGE {
                        *charge = None;
                    }
                    abilities.charging = true;
                    position
                }
                None if cooldown.tick(dt) => {
                    *charge = Some(Charge {
                        velocity: boss.position.direction_to(target) * RAM_SPEED,
                        elapsed: Duration::ZERO,
                    });
                    abilities.charging = true;
                    boss.position
                }
                None => self.orbit.advance(dt, target),
            },
            Ability::Tracker { shot } => {
                let position = self.orbit.advance(dt, target);
                if shot.tick(dt) {
                    let aimed = surroundings
                        .players
                        .nearest(position)
                        .map_or(target, |player| player.anchor);
                    fire(
                        position,
                        position.direction_to(aimed) * TRACKER_SHOT_SPEED,
                        out,
                    );
                }
                position
            }
            Ability::Artical { teleport } => {
                let orbiting = self.orbit.advance(dt, target);
                match teleport.step(dt, || random_anchor(surroundings.players, rng)) {
                    Some(held) => {
                        abilities.teleported = true;
                        held
                    }
                    None => orbiting,
                }
            }
            Ability::Shadow { clone } => {
                let position = self.orbit.advance(dt, target);
                if clone.tick(dt) {
                    summon(CreatureKind::Plain, surroundings.area, rng, out);
                }
                position
            }
            Ability::AlienKing { volley } => {
                let position = self.orbit.advance(dt, target);
                if volley.tick(dt) {
                    for shot in 0..ALIEN_KING_SHOTS {
                        let jitter = rng.gen_range(-ALIEN_KING_JITTER..=ALIEN_KING_JITTER);
                        let degrees = f32::from(shot * 30) + jitter;
                        let direction = Point::from_angle(degrees.to_radians());
                        fire(position, direction * ALIEN_KING_SHOT_SPEED, out);
                    }
                }
                position
            }
            Ability::Madackeda(state) => {
                let mut position = self.orbit.advance(dt, target);
                abilities.shield = state.update_shield(dt);
                let pick = || random_anchor(surroundings.players, rng);
                if let Some(held) = state.teleport.step(dt, pick) {
                    abilities.teleported = true;
                    position = held;
                }
                if state.summon.tick(dt) {
                    let minion = if rng.gen_bool(0.5) {
                        CreatureKind::Snowie
                    } else {
                        CreatureKind::FireSpinner
                    };
                    summon(minion, surroundings.area, rng, out);
                }
                if state.volley.tick(dt) {
                    for degrees in MADACKEDA_VOLLEY_ANGLES {
                        let direction = Point::from_angle(degrees.to_radians());
                        fire(position, direction * MADACKEDA_SHOT_SPEED, out);
                    }
                }
                position
            }
        };

        let heading = match self.ability {
            Ability::Spinner { spin, .. } => spin,
            _ => self.orbit.angle(),
        };

        out.push(Command::UpdateBoss {
            slot: boss.slot,
            position,
            heading,
            abilities,
        });
    }
}

fn summon<R>(kind: CreatureKind, area: PlayArea, rng: &mut R, out: &mut Vec<Command>)
where
    R: Rng + ?Sized,
{
    out.push(Command::SpawnCreature {
        kind,
        position: area.border_point(rng, kind.radius()),
    });
}

fn fire(origin: Point, velocity: Point, out: &mut Vec<Command>) {
    out.push(Command::FireProjectile {
        kind: ProjectileKind::PurpleLaser,
        owner: ProjectileOwner::Boss,
        origin,
        velocity,
    });
}

fn random_anchor<R>(players: &PlayerView, rng: &mut R) -> Option<Point>
where
    R: Rng + ?Sized,
{
    if players.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..players.len());
    players.iter().nth(index).map(|player| player.anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_roster_entry_gets_a_brain_of_its_kind() {
        for kind in BossKind::ROSTER {
            assert_eq!(BossBrain::new(kind).kind(), kind);
        }
    }

    #[test]
    fn madackeda_shield_rises_every_four_seconds_for_two() {
        let mut state = Madackeda::new();
        let step = Duration::from_millis(500);
        let raised: Vec<bool> = (0..16).map(|_| state.update_shield(step)).collect();

        let expected = [
            false, false, false, false, false, false, false, true, true, true, false, false,
            false, false, false, true,
        ];
        assert_eq!(raised, expected);
    }
}
