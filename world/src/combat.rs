//! Per-step collision resolution between players, creatures, projectiles, and
//! bosses.

use std::{mem, time::Duration};

use face_arena_core::{
    BossSlot, DamageSource, EffectKind, EffectSnapshot, Event, KillCause, Point,
    ProjectileOwner, PLAYER_BODY_RADIUS,
};

use crate::{creature::Creature, player::Player, World};

/// Grace period granted after a creature or phase boss reaches a player.
const CONTACT_GRACE: Duration = Duration::from_secs(2);
/// Grace period granted after the eternal boss touches a player.
const ETERNAL_CONTACT_GRACE: Duration = Duration::from_secs(3);
/// Lives removed when the eternal boss touches a player.
const ETERNAL_CONTACT_DAMAGE: u32 = 2;
/// Grace period granted after a gaze strike lands.
pub(crate) const GAZE_GRACE: Duration = Duration::from_secs(3);

const MOUTH_OPEN_THRESHOLD: f32 = 0.03;
const CAPTURE_RADIUS: f32 = 60.0;
/// Extra reach added to a creature's radius when testing punches.
const HAND_REACH: f32 = 20.0;

#[derive(Clone, Copy, Debug)]
pub(crate) struct Effect {
    kind: EffectKind,
    position: Point,
    age: Duration,
}

impl Effect {
    fn new(kind: EffectKind, position: Point) -> Self {
        Self {
            kind,
            position,
            age: Duration::ZERO,
        }
    }

    pub(crate) fn snapshot(&self) -> EffectSnapshot {
        EffectSnapshot {
            kind: self.kind,
            position: self.position,
            age: self.age,
        }
    }
}

/// Runs one phase-scoped step: motion first, then collisions in fixed order.
pub(crate) fn advance(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let seconds = dt.as_secs_f32();

    for player in &mut world.players {
        player.decay_invulnerability(dt);
    }

    advance_projectiles(world, seconds, out_events);
    advance_creatures(world, seconds);
    resolve_creature_contacts(world, out_events);
    resolve_captures(world, out_events);
    resolve_projectile_hits(world, out_events);

    for effect in &mut world.effects {
        effect.age = effect.age.saturating_add(dt);
    }
    world
        .effects
        .retain(|effect| effect.age < effect.kind.lifetime());
}

fn advance_projectiles(world: &mut World, seconds: f32, out_events: &mut Vec<Event>) {
    let area = world.area;
    world.projectiles.retain_mut(|projectile| {
        let active = projectile.advance(seconds, &area);
        if !active {
            out_events.push(Event::ProjectileExpired {
                projectile: projectile.id(),
            });
        }
        active
    });
}

fn advance_creatures(world: &mut World, seconds: f32) {
    let anchors: Vec<Point> = world.players.iter().map(Player::anchor).collect();
    for creature in &mut world.creatures {
        if let Some(target) = nearest_anchor(&anchors, creature.position()) {
            creature.advance(seconds, target);
        }
    }
}

fn nearest_anchor(anchors: &[Point], point: Point) -> Option<Point> {
    anchors
        .iter()
        .copied()
        .min_by(|left, right| left.distance(point).total_cmp(&right.distance(point)))
}

fn resolve_creature_contacts(world: &mut World, out_events: &mut Vec<Event>) {
    let creatures = mem::take(&mut world.creatures);
    let mut survivors = Vec::with_capacity(creatures.len());

    for creature in creatures {
        let reach = creature.radius() + PLAYER_BODY_RADIUS;
        let victim = world.players.iter_mut().find(|player| {
            player.is_vulnerable() && player.anchor().distance(creature.position()) < reach
        });
        match victim {
            Some(player) => damage_player(
                player,
                1,
                CONTACT_GRACE,
                DamageSource::Creature,
                out_events,
            ),
            None => survivors.push(creature),
        }
    }

    world.creatures = survivors;
}

fn resolve_captures(world: &mut World, out_events: &mut Vec<Event>) {
    let creatures = mem::take(&mut world.creatures);
    let mut survivors = Vec::with_capacity(creatures.len());

    for creature in creatures {
        let captured = world.players.iter().any(|player| {
            player.mouth_open_ratio() > MOUTH_OPEN_THRESHOLD
                && player.anchor().distance(creature.position()) < CAPTURE_RADIUS
        });
        if captured {
            world
                .effects
                .push(Effect::new(EffectKind::MouthCapture, creature.position()));
            record_kill(world, &creature, KillCause::Capture, out_events);
        } else {
            survivors.push(creature);
        }
    }

    world.creatures = survivors;
}

fn resolve_projectile_hits(world: &mut World, out_events: &mut Vec<Event>) {
    let creatures = mem::take(&mut world.creatures);
    let mut survivors = Vec::with_capacity(creatures.len());

    for creature in creatures {
        let hit = world
            .projectiles
            .iter()
            .position(|projectile| projectile.overlaps(creature.position(), creature.radius()));
        match hit {
            Some(index) => {
                let _ = world.projectiles.remove(index);
                record_kill(world, &creature, KillCause::Projectile, out_events);
            }
            None => survivors.push(creature),
        }
    }

    world.creatures = survivors;
}

/// Kills every creature within reach of the hand.
pub(crate) fn punch(world: &mut World, position: Point, out_events: &mut Vec<Event>) {
    let creatures = mem::take(&mut world.creatures);
    let mut survivors = Vec::with_capacity(creatures.len());

    for creature in creatures {
        if creature.position().distance(position) < creature.radius() + HAND_REACH {
            world
                .effects
                .push(Effect::new(EffectKind::HandHit, creature.position()));
            record_kill(world, &creature, KillCause::Punch, out_events);
        } else {
            survivors.push(creature);
        }
    }

    world.creatures = survivors;
}

fn record_kill(world: &mut World, creature: &Creature, cause: KillCause, out: &mut Vec<Event>) {
    if cause.counts_toward_wave() {
        world.waves.kills = world.waves.kills.saturating_add(1);
    }
    out.push(Event::CreatureKilled {
        creature: creature.id(),
        kind: creature.kind(),
        cause,
    });
}

/// Resolves contact damage and projectile hits for one boss.
pub(crate) fn resolve_boss(world: &mut World, slot: BossSlot, out_events: &mut Vec<Event>) {
    let World {
        players,
        projectiles,
        phase_boss,
        eternal_boss,
        ..
    } = world;

    let boss = match slot {
        BossSlot::Phase => match phase_boss.as_mut() {
            Some(boss) => boss,
            None => return,
        },
        BossSlot::Eternal => eternal_boss,
    };

    let (damage, grace, source) = match slot {
        BossSlot::Phase => (1, CONTACT_GRACE, DamageSource::PhaseBoss),
        BossSlot::Eternal => (
            ETERNAL_CONTACT_DAMAGE,
            ETERNAL_CONTACT_GRACE,
            DamageSource::EternalBoss,
        ),
    };
    let reach = boss.radius() + PLAYER_BODY_RADIUS;
    for player in players.iter_mut() {
        if player.is_vulnerable() && player.anchor().distance(boss.position()) < reach {
            damage_player(player, damage, grace, source, out_events);
        }
    }

    if !boss.deflects_projectiles() {
        let mut hits = 0_u32;
        projectiles.retain(|projectile| {
            let hit = projectile.owner() == ProjectileOwner::Player
                && projectile.overlaps(boss.position(), boss.radius());
            if hit {
                hits += 1;
            }
            !hit
        });
        if hits > 0 {
            boss.wound(hits);
            out_events.push(Event::BossDamaged {
                slot,
                health: boss.health(),
            });
        }
    }

    if slot == BossSlot::Phase && boss.is_defeated() {
        let kind = boss.kind();
        *phase_boss = None;
        out_events.push(Event::BossDefeated { kind });
    }
}

/// Applies damage to a player and reports the hit and any respawn.
pub(crate) fn damage_player(
    player: &mut Player,
    amount: u32,
    grace: Duration,
    source: DamageSource,
    out_events: &mut Vec<Event>,
) {
    let outcome = player.take_damage(amount, grace);
    out_events.push(Event::PlayerDamaged {
        player: player.slot(),
        source,
        lives: outcome.lives,
    });
    if outcome.respawned {
        out_events.push(Event::PlayerRespawned {
            player: player.slot(),
        });
    }
}
