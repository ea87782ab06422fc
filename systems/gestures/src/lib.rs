#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input-to-action mapper translating perception readings into commands.
//!
//! Each step the mapper receives the faces and hands observed by the sensor
//! plus the normalised microphone amplitude. It publishes the player poses,
//! raises or drops the mirror shield, and fires projectiles for blinks, voice,
//! and hands. Hands additionally punch nearby creatures.

use std::{f32::consts::FRAC_PI_2, time::Duration};

use face_arena_core::{
    Command, FaceMetrics, PerceptionFrame, PlayArea, PlayerPose, PlayerSlot, PlayerView, Point,
    ProjectileKind, ProjectileOwner, EYE_OFFSETS,
};

/// Speed of lasers fired by a blink.
pub const BLINK_LASER_SPEED: f32 = 400.0;
/// Speed of lasers fired by a loud voice.
pub const VOICE_LASER_SPEED: f32 = 600.0;
/// Speed of fireballs thrown from hands.
pub const FIREBALL_SPEED: f32 = 300.0;
/// Normalised amplitude above which players fire voice lasers.
pub const VOICE_THRESHOLD: f32 = 0.25;
/// How long every player must keep their eyes closed to raise the shield.
pub const MIRROR_SHIELD_HOLD: Duration = Duration::from_millis(500);

/// Aim vectors shorter than this are treated as a neutral head pose.
const AIM_DEADZONE: f32 = 1e-3;

/// Converts head yaw and pitch into a unit aim vector.
///
/// Both angles are normalised by a quarter turn and clamped to `[-1, 1]`;
/// looking up (positive pitch) aims toward the top of the screen. Returns
/// `None` for a near-neutral pose.
#[must_use]
pub fn aim_from_pose(yaw: f32, pitch: f32) -> Option<Point> {
    let horizontal = (yaw / FRAC_PI_2).clamp(-1.0, 1.0);
    let vertical = (pitch / FRAC_PI_2).clamp(-1.0, 1.0);
    Point::new(horizontal, -vertical).normalized(AIM_DEADZONE)
}

/// Pure system that maps perception into player actions.
#[derive(Debug, Default)]
pub struct Gestures {
    shield_hold: Duration,
    shield_active: bool,
}

impl Gestures {
    /// Creates a new mapper with the mirror shield lowered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether the mapper currently holds the mirror shield up.
    #[must_use]
    pub fn mirror_shield_active(&self) -> bool {
        self.shield_active
    }

    /// Translates one perception frame into commands.
    ///
    /// `players` is the roster as it stood before this frame; it supplies the
    /// remembered aim used by voice fire when the current pose is neutral.
    pub fn handle(
        &mut self,
        frame: &PerceptionFrame,
        amplitude: f32,
        players: &PlayerView,
        area: PlayArea,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let poses: Vec<PlayerPose> = frame
            .faces
            .iter()
            .enumerate()
            .map(|(index, face)| pose_for(face, index, frame.faces.len(), area))
            .collect();
        out.push(Command::SyncPlayers {
            poses: poses.clone(),
        });

        self.update_mirror_shield(&frame.faces, dt, out);

        if !self.shield_active {
            for (face, pose) in frame.faces.iter().zip(&poses) {
                if face.blink {
                    let direction = pose.aim.unwrap_or(Point::UP);
                    fire_from_eyes(pose.anchor, direction * BLINK_LASER_SPEED, out);
                }
            }
        }

        if amplitude > VOICE_THRESHOLD {
            for (index, pose) in poses.iter().enumerate() {
                let remembered = players
                    .get(PlayerSlot::new(index as u32))
                    .map(|player| player.aim);
                let direction = pose.aim.or(remembered).unwrap_or(Point::UP);
                fire_from_eyes(pose.anchor, direction * VOICE_LASER_SPEED, out);
            }
        }

        let center = area.center();
        for hand in &frame.hands {
            out.push(Command::FireProjectile {
                kind: ProjectileKind::Fireball,
                owner: ProjectileOwner::Player,
                origin: *hand,
                velocity: hand.direction_to(center) * FIREBALL_SPEED,
            });
            out.push(Command::Punch { position: *hand });
        }
    }

    fn update_mirror_shield(
        &mut self,
        faces: &[FaceMetrics],
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        let all_closed = !faces.is_empty() && faces.iter().all(|face| face.eyes_closed);
        if all_closed {
            self.shield_hold = self.shield_hold.saturating_add(dt);
        } else {
            self.shield_hold = Duration::ZERO;
        }

        let active = all_closed && self.shield_hold > MIRROR_SHIELD_HOLD;
        if active != self.shield_active {
            self.shield_active = active;
            out.push(Command::SetMirrorShield { active });
        }
    }
}

fn pose_for(face: &FaceMetrics, index: usize, count: usize, area: PlayArea) -> PlayerPose {
    PlayerPose {
        anchor: face
            .face_anchor
            .unwrap_or_else(|| area.layout_anchor(index, count)),
        aim: aim_from_pose(face.yaw, face.pitch),
        mouth_open_ratio: face.mouth_open_ratio.max(0.0),
        eyes_closed: face.eyes_closed,
    }
}

fn fire_from_eyes(anchor: Point, velocity: Point, out: &mut Vec<Command>) {
    for offset in EYE_OFFSETS {
        out.push(Command::FireProjectile {
            kind: ProjectileKind::Laser,
            owner: ProjectileOwner::Player,
            origin: anchor + offset,
            velocity,
        });
    }
}
