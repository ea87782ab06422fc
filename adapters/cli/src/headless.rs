//! Scripted runs without a window.

use std::{path::Path, time::Duration};

use anyhow::{Context, Result};
use face_arena_core::{Event, Phase};
use face_arena_simulation::{GameConfig, PerceptionScript, Session, Simulation, StepOutcome};
use face_arena_world::query;
use tracing::info;

/// Tallies gathered while replaying a script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RunSummary {
    pub(crate) advanced: u32,
    pub(crate) paused: u32,
    pub(crate) skipped: u32,
    pub(crate) kills: u32,
    pub(crate) bosses_defeated: u32,
    pub(crate) respawns: u32,
    pub(crate) victory: bool,
}

impl RunSummary {
    /// Folds one frame's outcome and events into the tally.
    pub(crate) fn record(&mut self, outcome: StepOutcome, events: &[Event]) {
        match outcome {
            StepOutcome::Advanced => self.advanced += 1,
            StepOutcome::Paused => self.paused += 1,
            StepOutcome::Skipped => self.skipped += 1,
        }

        for event in events {
            match event {
                Event::CreatureKilled { .. } => self.kills += 1,
                Event::BossDefeated { .. } => self.bosses_defeated += 1,
                Event::PlayerRespawned { .. } => self.respawns += 1,
                Event::PhaseChanged {
                    phase: Phase::Victory,
                } => self.victory = true,
                _ => {}
            }
        }
    }

    pub(crate) fn frames(&self) -> u32 {
        self.advanced + self.paused + self.skipped
    }
}

/// Milliseconds in `duration`, saturating at `u64::MAX`.
fn whole_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Replays the perception script at `path` and logs a summary.
pub(crate) fn run(path: &Path, config: &GameConfig) -> Result<RunSummary> {
    let script = PerceptionScript::load(path)
        .with_context(|| format!("failed to load perception script {}", path.display()))?;
    let interval = script.frame_interval();
    let (perception, audio, operator) = script.into_parts();
    info!(
        frames = operator.len(),
        interval_ms = whole_millis(interval),
        "replaying perception script"
    );

    let mut session = Session::new(Simulation::new(config), perception, audio);
    let mut summary = RunSummary::default();
    for (index, input) in operator.into_iter().enumerate() {
        let outcome = session
            .frame(interval, input)
            .with_context(|| format!("scripted frame {index} failed"))?;
        summary.record(outcome, session.simulation().events());
    }

    let world = session.simulation().world();
    let wave = query::wave(world);
    info!(
        frames = summary.frames(),
        advanced = summary.advanced,
        paused = summary.paused,
        skipped = summary.skipped,
        kills = summary.kills,
        bosses_defeated = summary.bosses_defeated,
        respawns = summary.respawns,
        victory = summary.victory,
        wave = wave.wave_index,
        phase = %wave.phase,
        players = query::player_view(world).len(),
        spoken = session.audio().spoken().len(),
        "headless run finished"
    );
    session.shutdown();

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_arena_core::{BossKind, CreatureId, CreatureKind, KillCause, PlayerSlot};
    use std::{env, fs, process};

    #[test]
    fn summary_counts_outcomes_and_events() {
        let mut summary = RunSummary::default();
        summary.record(
            StepOutcome::Advanced,
            &[
                Event::CreatureKilled {
                    creature: CreatureId::new(1),
                    kind: CreatureKind::Plain,
                    cause: KillCause::Capture,
                },
                Event::PlayerRespawned {
                    player: PlayerSlot::new(0),
                },
            ],
        );
        summary.record(StepOutcome::Skipped, &[]);
        summary.record(
            StepOutcome::Paused,
            &[
                Event::BossDefeated {
                    kind: BossKind::SnowKing,
                },
                Event::PhaseChanged {
                    phase: Phase::Victory,
                },
            ],
        );

        assert_eq!(
            summary,
            RunSummary {
                advanced: 1,
                paused: 1,
                skipped: 1,
                kills: 1,
                bosses_defeated: 1,
                respawns: 1,
                victory: true,
            }
        );
        assert_eq!(summary.frames(), 3);
    }

    #[test]
    fn interval_millis_saturate() {
        assert_eq!(whole_millis(Duration::from_millis(50)), 50);
        assert_eq!(whole_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn scripts_replay_from_disk() {
        let path = env::temp_dir().join(format!("face-arena-script-{}.json", process::id()));
        fs::write(
            &path,
            r#"{ "steps": [ { "faces": [{}], "repeat": 3 }, { "missing": true } ] }"#,
        )
        .expect("writable temp dir");

        let summary = run(&path, &GameConfig::default()).expect("script replays");
        let _ = fs::remove_file(&path);

        assert_eq!(summary.advanced, 3);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn missing_scripts_are_reported() {
        let error = run(Path::new("/nonexistent/face-arena.json"), &GameConfig::default())
            .expect_err("missing file");

        assert!(format!("{error:#}").contains("failed to load perception script"));
    }
}
