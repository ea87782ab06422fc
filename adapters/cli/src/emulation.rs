//! Keyboard and mouse stand-ins for the camera and microphone.
//!
//! The window reports a [`FrameInput`] each frame; the driver writes it into
//! a shared [`EmulatedFace`] that both emulated services read from when the
//! session polls them.

use std::{cell::RefCell, f32::consts::FRAC_PI_2, rc::Rc};

use face_arena_core::{FaceMetrics, PerceptionFrame, Point};
use face_arena_rendering::FrameInput;
use face_arena_simulation::{AudioService, PerceptionService, ServiceError};
use glam::Vec2;
use tracing::info;

/// Mouth ratio reported while the mouth key is held.
const EMULATED_MOUTH_OPEN: f32 = 0.5;

/// Amplitude reported while the voice key is held.
const EMULATED_VOICE: f32 = 1.0;

/// Latest emulated reading shared by both services.
#[derive(Clone, Debug, Default)]
pub(crate) struct EmulatedFace {
    frame: Option<PerceptionFrame>,
    amplitude: f32,
}

pub(crate) type SharedFace = Rc<RefCell<EmulatedFace>>;

impl EmulatedFace {
    /// Translates the window input into a single face anchored at `anchor`.
    pub(crate) fn update(&mut self, input: &FrameInput, anchor: Vec2) {
        let (yaw, pitch) = input
            .cursor_world_space
            .map_or((0.0, 0.0), |cursor| head_pose_towards(anchor, cursor));
        let face = FaceMetrics {
            yaw,
            pitch,
            roll: 0.0,
            mouth_open_ratio: if input.mouth_open {
                EMULATED_MOUTH_OPEN
            } else {
                0.0
            },
            eyes_closed: input.eyes_closed,
            blink: input.blink,
            face_anchor: Some(Point::new(anchor.x, anchor.y)),
        };

        self.frame = Some(PerceptionFrame {
            faces: vec![face],
            hands: input
                .hand
                .map(|hand| Point::new(hand.x, hand.y))
                .into_iter()
                .collect(),
        });
        self.amplitude = if input.voice { EMULATED_VOICE } else { 0.0 };
    }
}

/// Head yaw and pitch that aim from `anchor` towards `target`.
///
/// The pose is scaled so that the unit direction survives the quarter-turn
/// normalisation applied by the gesture mapper.
fn head_pose_towards(anchor: Vec2, target: Vec2) -> (f32, f32) {
    let direction = (target - anchor).normalize_or_zero();
    (direction.x * FRAC_PI_2, -direction.y * FRAC_PI_2)
}

/// Perception service fed by the window input.
#[derive(Debug)]
pub(crate) struct KeyboardPerception {
    face: SharedFace,
}

impl KeyboardPerception {
    pub(crate) fn new(face: SharedFace) -> Self {
        Self { face }
    }
}

impl PerceptionService for KeyboardPerception {
    fn read_frame(&mut self) -> Result<Option<PerceptionFrame>, ServiceError> {
        Ok(self.face.borrow_mut().frame.take())
    }

    fn release(&mut self) {
        self.face.borrow_mut().frame = None;
    }
}

/// Audio service fed by the window input; speech is written to the log.
#[derive(Debug)]
pub(crate) struct KeyboardAudio {
    face: SharedFace,
}

impl KeyboardAudio {
    pub(crate) fn new(face: SharedFace) -> Self {
        Self { face }
    }
}

impl AudioService for KeyboardAudio {
    fn read_amplitude(&mut self) -> Result<f32, ServiceError> {
        Ok(self.face.borrow().amplitude)
    }

    fn speak(&mut self, phrase: &str) -> Result<(), ServiceError> {
        info!(phrase, "avatar says");
        Ok(())
    }

    fn release(&mut self) {
        self.face.borrow_mut().amplitude = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use face_arena_system_gestures::aim_from_pose;

    #[test]
    fn cursor_direction_survives_the_gesture_mapper() {
        let (yaw, pitch) = head_pose_towards(Vec2::new(100.0, 100.0), Vec2::new(100.0, 0.0));
        let aim = aim_from_pose(yaw, pitch).expect("non-neutral pose");

        assert!(aim.x().abs() < 1e-6);
        assert!((aim.y() + 1.0).abs() < 1e-6);

        let (yaw, pitch) = head_pose_towards(Vec2::new(0.0, 0.0), Vec2::new(30.0, 40.0));
        let aim = aim_from_pose(yaw, pitch).expect("non-neutral pose");
        assert!((aim.x() - 0.6).abs() < 1e-5);
        assert!((aim.y() - 0.8).abs() < 1e-5);
    }

    #[test]
    fn cursor_on_the_anchor_is_neutral() {
        assert_eq!(
            head_pose_towards(Vec2::splat(50.0), Vec2::splat(50.0)),
            (0.0, 0.0)
        );
    }

    #[test]
    fn services_read_the_latest_input_once() {
        let face = SharedFace::default();
        let mut perception = KeyboardPerception::new(Rc::clone(&face));
        let mut audio = KeyboardAudio::new(Rc::clone(&face));

        face.borrow_mut().update(
            &FrameInput {
                mouth_open: true,
                voice: true,
                hand: Some(Vec2::new(10.0, 20.0)),
                ..FrameInput::default()
            },
            Vec2::new(640.0, 540.0),
        );

        let frame = perception
            .read_frame()
            .expect("readable")
            .expect("one frame");
        assert_eq!(frame.faces.len(), 1);
        assert_eq!(frame.faces[0].mouth_open_ratio, EMULATED_MOUTH_OPEN);
        assert_eq!(frame.faces[0].face_anchor, Some(Point::new(640.0, 540.0)));
        assert_eq!(frame.hands, vec![Point::new(10.0, 20.0)]);
        assert_eq!(audio.read_amplitude().expect("readable"), EMULATED_VOICE);
        assert_eq!(perception.read_frame().expect("readable"), None);

        audio.release();
        assert_eq!(audio.read_amplitude().expect("readable"), 0.0);
    }
}
