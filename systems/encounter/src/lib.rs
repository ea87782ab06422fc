#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave and encounter decisions.
//!
//! The system watches the kill counter during minion waves and summons the
//! wave's boss once the threshold is met, then advances to the next wave (or
//! victory) after the world reports the boss defeated.

use face_arena_core::{BossKind, Command, Event, Phase, WaveSnapshot};

/// Pure system deciding when the wave state machine changes phase.
#[derive(Debug, Default)]
pub struct Encounter;

impl Encounter {
    /// Creates a new encounter system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes the step's events and the wave snapshot to emit phase
    /// transition commands.
    pub fn handle(&mut self, events: &[Event], wave: &WaveSnapshot, out: &mut Vec<Command>) {
        let boss_defeated = events
            .iter()
            .any(|event| matches!(event, Event::BossDefeated { .. }));
        if boss_defeated {
            out.push(Command::CompleteEncounter);
            return;
        }

        if wave.phase != Phase::Minions {
            return;
        }

        let Some(threshold) = wave.threshold else {
            return;
        };
        if wave.kills < threshold {
            return;
        }

        if let Some(boss) = BossKind::for_wave(wave.wave_index) {
            out.push(Command::BeginBossEncounter { boss });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(kills: u32, phase: Phase) -> WaveSnapshot {
        WaveSnapshot {
            wave_index: 2,
            wave_count: 10,
            kills,
            threshold: Some(40),
            phase,
        }
    }

    #[test]
    fn threshold_summons_the_wave_boss() {
        let mut commands = Vec::new();
        Encounter::new().handle(&[], &wave(40, Phase::Minions), &mut commands);

        assert_eq!(
            commands,
            vec![Command::BeginBossEncounter {
                boss: BossKind::Vortex
            }]
        );
    }

    #[test]
    fn kills_below_threshold_do_nothing() {
        let mut commands = Vec::new();
        Encounter::new().handle(&[], &wave(39, Phase::Minions), &mut commands);

        assert!(commands.is_empty());
    }

    #[test]
    fn kills_during_boss_phase_are_ignored() {
        let mut commands = Vec::new();
        Encounter::new().handle(
            &[],
            &wave(99, Phase::Boss(BossKind::Vortex)),
            &mut commands,
        );

        assert!(commands.is_empty());
    }
}
