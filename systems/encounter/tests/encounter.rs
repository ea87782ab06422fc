use std::time::Duration;

use face_arena_core::{
    BossKind, BossSlot, Command, CreatureKind, Event, Phase, PlayerPose, Point, ProjectileKind,
    ProjectileOwner,
};
use face_arena_system_encounter::Encounter;
use face_arena_system_spawning::{self as spawning, Spawning};
use face_arena_world::{self as world, query, World};

fn drive(world: &mut World, encounter: &mut Encounter, events: &[Event]) -> Vec<Event> {
    let mut commands = Vec::new();
    encounter.handle(events, &query::wave(world), &mut commands);
    let mut produced = Vec::new();
    for command in commands {
        world::apply(world, command, &mut produced);
    }
    produced
}

/// Spawns creatures on a player with an open mouth: the first one lands a hit,
/// every later one is captured.
fn capture_kills(world: &mut World, count: usize) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SyncPlayers {
            poses: vec![PlayerPose {
                anchor: Point::new(640.0, 600.0),
                aim: None,
                mouth_open_ratio: 0.2,
                eyes_closed: false,
            }],
        },
        &mut events,
    );
    for _ in 0..count {
        world::apply(
            world,
            Command::SpawnCreature {
                kind: CreatureKind::Ghast,
                position: Point::new(640.0, 600.0),
            },
            &mut events,
        );
        world::apply(
            world,
            Command::FireProjectile {
                kind: ProjectileKind::Laser,
                owner: ProjectileOwner::Player,
                origin: Point::new(640.0, 600.0),
                velocity: Point::ZERO,
            },
            &mut events,
        );
    }
    world::apply(
        world,
        Command::Tick {
            dt: Duration::from_millis(1),
        },
        &mut events,
    );
}

#[test]
fn reaching_the_threshold_enters_the_first_boss_phase() {
    let mut world = World::new();
    let mut encounter = Encounter::new();
    capture_kills(&mut world, 21);
    assert!(query::wave(&world).kills >= 20);

    let events = drive(&mut world, &mut encounter, &[]);

    assert_eq!(query::phase(&world), Phase::Boss(BossKind::SnowKing));
    assert_eq!(query::phase(&world).to_string(), "boss_SnowKing");
    assert_eq!(query::wave(&world).kills, 0);
    assert!(query::creature_view(&world).is_empty());
    assert!(query::projectile_view(&world).is_empty());
    assert!(events.contains(&Event::BossSpawned {
        slot: BossSlot::Phase,
        kind: BossKind::SnowKing,
    }));
}

/// Lands enough player lasers on the phase boss to defeat it and returns the
/// events of the resolving step.
fn defeat_phase_boss(world: &mut World) -> Vec<Event> {
    let kind = query::phase_boss(world).expect("boss").kind;
    let position = query::phase_boss(world).expect("boss").position;
    let mut events = Vec::new();
    for _ in 0..kind.max_health() {
        world::apply(
            world,
            Command::FireProjectile {
                kind: ProjectileKind::Laser,
                owner: ProjectileOwner::Player,
                origin: position,
                velocity: Point::ZERO,
            },
            &mut events,
        );
    }
    events.clear();
    world::apply(
        world,
        Command::ResolveBossCombat {
            slot: BossSlot::Phase,
        },
        &mut events,
    );
    events
}

fn configure_thresholds(world: &mut World, kill_thresholds: Vec<u32>) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::ConfigureWaves { kill_thresholds },
        &mut events,
    );
}

#[test]
fn defeating_the_last_boss_reaches_victory() {
    let mut world = World::new();
    let mut encounter = Encounter::new();
    configure_thresholds(&mut world, vec![1]);
    capture_kills(&mut world, 2);
    let _ = drive(&mut world, &mut encounter, &[]);
    assert_eq!(query::phase(&world), Phase::Boss(BossKind::SnowKing));

    let events = defeat_phase_boss(&mut world);
    let produced = drive(&mut world, &mut encounter, &events);

    assert_eq!(query::phase(&world), Phase::Victory);
    assert_eq!(query::wave(&world).wave_index, 1);
    assert_eq!(query::wave(&world).kills, 0);
    assert_eq!(
        produced,
        vec![Event::PhaseChanged {
            phase: Phase::Victory
        }]
    );
}

#[test]
fn defeating_an_early_boss_returns_to_minions() {
    let mut world = World::new();
    let mut encounter = Encounter::new();
    let mut spawning = Spawning::new(spawning::Config::new(Duration::from_millis(1500), 7));
    let elapsed = [Event::TimeAdvanced {
        dt: Duration::from_millis(1500),
    }];
    configure_thresholds(&mut world, vec![1, 5]);
    capture_kills(&mut world, 2);
    let _ = drive(&mut world, &mut encounter, &[]);
    assert_eq!(query::phase(&world), Phase::Boss(BossKind::SnowKing));

    let mut spawns = Vec::new();
    spawning.handle(
        &elapsed,
        query::phase(&world),
        query::play_area(&world),
        &mut spawns,
    );
    assert!(spawns.is_empty());

    let events = defeat_phase_boss(&mut world);
    assert!(events.contains(&Event::BossDefeated {
        kind: BossKind::SnowKing
    }));
    let produced = drive(&mut world, &mut encounter, &events);

    let wave = query::wave(&world);
    assert_eq!(wave.phase, Phase::Minions);
    assert_eq!(wave.wave_index, 1);
    assert_eq!(wave.kills, 0);
    assert_eq!(wave.threshold, Some(5));
    assert!(query::phase_boss(&world).is_none());
    assert_eq!(
        produced,
        vec![Event::PhaseChanged {
            phase: Phase::Minions
        }]
    );

    spawning.handle(
        &elapsed,
        query::phase(&world),
        query::play_area(&world),
        &mut spawns,
    );
    assert_eq!(spawns.len(), 1);
    assert!(matches!(spawns[0], Command::SpawnCreature { .. }));
}
