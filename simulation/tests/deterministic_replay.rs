use face_arena_core::{
    BossSnapshot, CreatureSnapshot, Event, PlayerSnapshot, ProjectileSnapshot,
};
use face_arena_simulation::{GameConfig, PerceptionScript, Session, Simulation};
use face_arena_world::query;

const SCRIPT: &str = r#"{
    "frame_interval_ms": 50,
    "steps": [
        { "faces": [{ "face_anchor": { "x": 400.0, "y": 500.0 } }], "repeat": 20 },
        {
            "faces": [
                { "face_anchor": { "x": 400.0, "y": 500.0 }, "yaw": 0.4, "mouth_open_ratio": 0.5 },
                { "face_anchor": { "x": 900.0, "y": 450.0 }, "pitch": -0.3 }
            ],
            "hands": [{ "x": 380.0, "y": 420.0 }],
            "amplitude": 0.6,
            "repeat": 60
        },
        { "faces": [{ "blink": true }, { "eyes_closed": true }], "repeat": 3 },
        { "missing": true, "repeat": 5 },
        { "faces": [{}], "paused": true, "repeat": 20 },
        {
            "faces": [{ "roll": 0.5, "mouth_open_ratio": 0.4 }, { "yaw": -0.5 }],
            "speak": true,
            "repeat": 80
        }
    ]
}"#;

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    players: Vec<PlayerSnapshot>,
    creatures: Vec<CreatureSnapshot>,
    projectiles: Vec<ProjectileSnapshot>,
    eternal: BossSnapshot,
    phase_boss: Option<BossSnapshot>,
    tick: u64,
}

fn replay(seed: u64) -> ReplayOutcome {
    let script = PerceptionScript::from_json_str(SCRIPT).expect("valid script");
    let interval = script.frame_interval();
    let (perception, audio, operator) = script.into_parts();
    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };
    let mut session = Session::new(Simulation::new(&config), perception, audio);
    let mut events = Vec::new();

    for input in operator {
        let _ = session.frame(interval, input).expect("scripted frame");
        events.extend(session.simulation().events().iter().cloned());
    }

    let world = session.simulation().world();
    ReplayOutcome {
        events,
        players: query::player_view(world).into_vec(),
        creatures: query::creature_view(world).into_vec(),
        projectiles: query::projectile_view(world).into_vec(),
        eternal: query::eternal_boss(world),
        phase_boss: query::phase_boss(world),
        tick: query::tick_index(world),
    }
}

#[test]
fn identical_scripts_replay_identically() {
    let first = replay(42);
    let second = replay(42);

    assert!(!first.events.is_empty());
    assert_eq!(first.tick, 163);
    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn seeds_change_the_outcome() {
    let first = replay(42);
    let second = replay(43);

    assert_ne!(first.events, second.events);
}
