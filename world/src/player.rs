use std::time::Duration;

use face_arena_core::{PlayerPose, PlayerSlot, PlayerSnapshot, Point, PLAYER_MAX_LIVES};

/// Result of applying damage to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DamageOutcome {
    /// Lives the player holds once the hit and any respawn are applied.
    pub(crate) lives: u32,
    /// The hit emptied the player's lives and they were restored.
    pub(crate) respawned: bool,
}

#[derive(Clone, Debug)]
pub(crate) struct Player {
    slot: PlayerSlot,
    anchor: Point,
    lives: u32,
    invulnerability: Duration,
    aim: Point,
    mouth_open_ratio: f32,
    eyes_closed: bool,
}

impl Player {
    pub(crate) fn new(slot: PlayerSlot, pose: &PlayerPose) -> Self {
        let mut player = Self {
            slot,
            anchor: pose.anchor,
            lives: PLAYER_MAX_LIVES,
            invulnerability: Duration::ZERO,
            aim: Point::UP,
            mouth_open_ratio: 0.0,
            eyes_closed: false,
        };
        player.sync(pose);
        player
    }

    /// Copies the per-step pose while keeping the last non-trivial aim.
    pub(crate) fn sync(&mut self, pose: &PlayerPose) {
        self.anchor = pose.anchor;
        if let Some(aim) = pose.aim {
            self.aim = aim;
        }
        self.mouth_open_ratio = pose.mouth_open_ratio;
        self.eyes_closed = pose.eyes_closed;
    }

    pub(crate) fn slot(&self) -> PlayerSlot {
        self.slot
    }

    pub(crate) fn anchor(&self) -> Point {
        self.anchor
    }

    pub(crate) fn mouth_open_ratio(&self) -> f32 {
        self.mouth_open_ratio
    }

    pub(crate) fn is_vulnerable(&self) -> bool {
        self.invulnerability.is_zero()
    }

    pub(crate) fn decay_invulnerability(&mut self, dt: Duration) {
        self.invulnerability = self.invulnerability.saturating_sub(dt);
    }

    /// Removes lives and starts a grace period.
    ///
    /// Lives never observably reach zero: a hit that would empty them restores
    /// the player to full in the same call.
    pub(crate) fn take_damage(&mut self, amount: u32, grace: Duration) -> DamageOutcome {
        let lives_after_hit = self.lives.saturating_sub(amount);
        self.invulnerability = grace;
        let respawned = lives_after_hit == 0;
        self.lives = if respawned {
            PLAYER_MAX_LIVES
        } else {
            lives_after_hit
        };
        DamageOutcome {
            lives: self.lives,
            respawned,
        }
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            slot: self.slot,
            anchor: self.anchor,
            lives: self.lives,
            invulnerability: self.invulnerability,
            aim: self.aim,
            mouth_open_ratio: self.mouth_open_ratio,
            eyes_closed: self.eyes_closed,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }
}
