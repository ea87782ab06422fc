//! Scripted perception for headless runs.
//!
//! A script is a JSON document listing perception frames in order. Each step
//! may repeat, drop its frame to emulate a sensor miss, or carry operator
//! flags. The script splits into perception and audio services plus the
//! operator inputs, so a headless run drives a [`crate::Session`] exactly like
//! the windowed loop does.

use std::{
    collections::VecDeque,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use face_arena_core::{FaceMetrics, PerceptionFrame, Point};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    services::{AudioService, PerceptionService, ServiceError},
    session::OperatorInput,
};

/// Errors raised while loading a [`PerceptionScript`].
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The script file could not be read.
    #[error("failed to read perception script at {}", .path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The script is not valid JSON or has unexpected fields.
    #[error("failed to parse perception script")]
    Parse(#[from] serde_json::Error),
    /// Frames must be spaced by a positive interval.
    #[error("perception script frame interval must be positive")]
    ZeroInterval,
}

/// One scripted frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptStep {
    /// Faces detected during the frame.
    pub faces: Vec<FaceMetrics>,
    /// Hand positions detected during the frame.
    pub hands: Vec<Point>,
    /// The sensor produced no frame at all.
    pub missing: bool,
    /// Normalised microphone amplitude.
    pub amplitude: f32,
    /// Operator pause flag.
    pub paused: bool,
    /// Operator speech request.
    pub speak: bool,
    /// Number of consecutive frames this step describes.
    pub repeat: u32,
}

impl Default for ScriptStep {
    fn default() -> Self {
        Self {
            faces: Vec::new(),
            hands: Vec::new(),
            missing: false,
            amplitude: 0.0,
            paused: false,
            speak: false,
            repeat: 1,
        }
    }
}

fn default_frame_interval_ms() -> u64 {
    33
}

/// Ordered list of scripted frames.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PerceptionScript {
    /// Simulated time between frames, in milliseconds.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Frames in playback order.
    pub steps: Vec<ScriptStep>,
}

impl PerceptionScript {
    /// Reads and parses a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    /// Parses a script from JSON text.
    pub fn from_json_str(contents: &str) -> Result<Self, ScriptError> {
        let script: Self = serde_json::from_str(contents)?;
        if script.frame_interval_ms == 0 {
            return Err(ScriptError::ZeroInterval);
        }
        Ok(script)
    }

    /// Simulated time between frames.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Total number of frames once repeats are expanded.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.steps.iter().map(|step| step.repeat as usize).sum()
    }

    /// Expands the script into services and per-frame operator inputs.
    #[must_use]
    pub fn into_parts(self) -> (ScriptedPerception, ScriptedAudio, Vec<OperatorInput>) {
        let count = self.frame_count();
        let mut frames = VecDeque::with_capacity(count);
        let mut amplitudes = VecDeque::with_capacity(count);
        let mut operator = Vec::with_capacity(count);

        for step in self.steps {
            let frame = (!step.missing).then(|| PerceptionFrame {
                faces: step.faces,
                hands: step.hands,
            });
            for _ in 0..step.repeat {
                frames.push_back(frame.clone());
                amplitudes.push_back(step.amplitude);
                operator.push(OperatorInput {
                    paused: step.paused,
                    speak: step.speak,
                });
            }
        }

        (
            ScriptedPerception {
                frames,
                released: false,
            },
            ScriptedAudio {
                amplitudes,
                spoken: Vec::new(),
                released: false,
            },
            operator,
        )
    }
}

/// Perception service replaying scripted frames.
///
/// Once the script is exhausted every read reports a missing frame.
#[derive(Debug)]
pub struct ScriptedPerception {
    frames: VecDeque<Option<PerceptionFrame>>,
    released: bool,
}

impl ScriptedPerception {
    /// Whether the service has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl PerceptionService for ScriptedPerception {
    fn read_frame(&mut self) -> Result<Option<PerceptionFrame>, ServiceError> {
        if self.released {
            return Err(ServiceError::Failed {
                service: "scripted perception",
                reason: "read after release".to_owned(),
            });
        }
        Ok(self.frames.pop_front().flatten())
    }

    fn release(&mut self) {
        self.released = true;
    }
}

/// Audio service replaying scripted amplitudes and recording speech.
#[derive(Debug)]
pub struct ScriptedAudio {
    amplitudes: VecDeque<f32>,
    spoken: Vec<String>,
    released: bool,
}

impl ScriptedAudio {
    /// Phrases spoken so far, in order.
    #[must_use]
    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }

    /// Whether the service has been released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl AudioService for ScriptedAudio {
    fn read_amplitude(&mut self) -> Result<f32, ServiceError> {
        Ok(self.amplitudes.pop_front().unwrap_or(0.0))
    }

    fn speak(&mut self, phrase: &str) -> Result<(), ServiceError> {
        self.spoken.push(phrase.to_owned());
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
    }
}
