//! Boundaries to the perception and audio devices.

use face_arena_core::PerceptionFrame;
use thiserror::Error;

/// Failures reported by perception or audio services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The device could not be opened.
    #[error("{service} is unavailable: {reason}")]
    Unavailable {
        /// Human-readable service name.
        service: &'static str,
        /// Description of the failure.
        reason: String,
    },
    /// The device failed while the game was running.
    #[error("{service} failed: {reason}")]
    Failed {
        /// Human-readable service name.
        service: &'static str,
        /// Description of the failure.
        reason: String,
    },
}

/// Source of face and hand readings, polled once per frame.
pub trait PerceptionService {
    /// Blocks until the next reading is available.
    ///
    /// `Ok(None)` signals that no frame was captured this time; the caller
    /// treats it as a transient miss.
    fn read_frame(&mut self) -> Result<Option<PerceptionFrame>, ServiceError>;

    /// Releases the underlying device.
    fn release(&mut self);
}

/// Microphone and speech output.
pub trait AudioService {
    /// Blocks until the next normalised amplitude reading is available.
    fn read_amplitude(&mut self) -> Result<f32, ServiceError>;

    /// Queues a phrase for playback without waiting for it to finish.
    fn speak(&mut self, phrase: &str) -> Result<(), ServiceError>;

    /// Releases the microphone and the speaker.
    fn release(&mut self);
}

/// Phrases the avatar says when asked to speak.
pub const PHRASES: [&str; 3] = [
    "Hello, I'm your avatar.",
    "How are you today?",
    "I am your digital friend.",
];

/// Cycles through [`PHRASES`] in order.
#[derive(Clone, Debug, Default)]
pub struct PhraseCycle {
    next: usize,
}

impl PhraseCycle {
    /// Creates a cycle starting at the first phrase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next phrase, wrapping after the last one.
    pub fn next_phrase(&mut self) -> &'static str {
        let phrase = PHRASES[self.next % PHRASES.len()];
        self.next = (self.next + 1) % PHRASES.len();
        phrase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_wrap_around() {
        let mut cycle = PhraseCycle::new();
        let spoken: Vec<&str> = (0..4).map(|_| cycle.next_phrase()).collect();
        assert_eq!(
            spoken,
            vec![PHRASES[0], PHRASES[1], PHRASES[2], PHRASES[0]]
        );
    }
}
