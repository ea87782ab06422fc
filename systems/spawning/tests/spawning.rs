use std::time::Duration;

use face_arena_core::{BossKind, Command, Event, Phase, PlayArea};
use face_arena_system_spawning::{Config, Spawning};
use face_arena_world::{self as world, query, World};

fn advance(dt: Duration) -> [Event; 1] {
    [Event::TimeAdvanced { dt }]
}

#[test]
fn emits_multiple_spawn_commands_for_large_dt() {
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(500), 0x1234_5678));
    let mut commands = Vec::new();
    spawning.handle(
        &advance(Duration::from_secs(2)),
        Phase::Minions,
        PlayArea::default(),
        &mut commands,
    );

    assert_eq!(commands.len(), 4, "expected one spawn per interval");
}

#[test]
fn spawned_creatures_start_outside_the_play_area() {
    let area = PlayArea::new(640.0, 480.0);
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(100), 0xfeed_beef));
    let mut commands = Vec::new();
    spawning.handle(
        &advance(Duration::from_secs(5)),
        Phase::Minions,
        area,
        &mut commands,
    );

    assert_eq!(commands.len(), 50);
    for command in &commands {
        match command {
            Command::SpawnCreature { position, .. } => {
                assert!(!area.contains(*position), "{position:?} is visible");
            }
            other => panic!("unexpected command emitted: {other:?}"),
        }
    }
}

#[test]
fn boss_phase_resets_accumulator() {
    let area = PlayArea::default();
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(1500), 0x4d59_5df4));

    let mut commands = Vec::new();
    spawning.handle(
        &advance(Duration::from_millis(1000)),
        Phase::Minions,
        area,
        &mut commands,
    );
    assert!(commands.is_empty(), "no spawn before full interval");

    spawning.handle(
        &advance(Duration::from_millis(1000)),
        Phase::Boss(BossKind::SnowKing),
        area,
        &mut commands,
    );
    assert!(commands.is_empty(), "no spawns during boss phases");

    spawning.handle(
        &advance(Duration::from_millis(1000)),
        Phase::Minions,
        area,
        &mut commands,
    );
    assert!(
        commands.is_empty(),
        "accumulator must restart after leaving minions"
    );
}

#[test]
fn identical_seeds_replay_identically() {
    let run = || {
        let mut spawning = Spawning::new(Config::new(Duration::from_millis(250), 99));
        let mut commands = Vec::new();
        for _ in 0..20 {
            spawning.handle(
                &advance(Duration::from_millis(100)),
                Phase::Minions,
                PlayArea::default(),
                &mut commands,
            );
        }
        commands
    };

    assert_eq!(run(), run());
}

#[test]
fn spawn_commands_populate_the_world() {
    let mut world = World::new();
    let mut events = Vec::new();
    let mut spawning = Spawning::new(Config::new(Duration::from_millis(1500), 7));
    let mut commands = Vec::new();
    spawning.handle(
        &advance(Duration::from_secs(3)),
        query::phase(&world),
        query::play_area(&world),
        &mut commands,
    );

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert_eq!(query::creature_view(&world).len(), 2);
    assert_eq!(
        events
            .iter()
            .filter(|event| matches!(event, Event::CreatureSpawned { .. }))
            .count(),
        2
    );
}
