use std::time::Duration;

use tracing::debug;

use crate::{
    services::{AudioService, PerceptionService, PhraseCycle, ServiceError},
    Simulation, StepInput, StepOutcome,
};

/// Operator controls sampled once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OperatorInput {
    /// Freezes the phase-scoped simulation.
    pub paused: bool,
    /// Asks the avatar to say its next phrase.
    pub speak: bool,
}

/// A running game: the simulation plus the devices feeding it.
///
/// Devices are released exactly once, perception first and audio second,
/// either through [`Session::shutdown`] or when the session is dropped.
#[derive(Debug)]
pub struct Session<P, A>
where
    P: PerceptionService,
    A: AudioService,
{
    simulation: Simulation,
    perception: P,
    audio: A,
    phrases: PhraseCycle,
    released: bool,
}

impl<P, A> Session<P, A>
where
    P: PerceptionService,
    A: AudioService,
{
    /// Takes ownership of an acquired perception and audio service.
    #[must_use]
    pub fn new(simulation: Simulation, perception: P, audio: A) -> Self {
        Self {
            simulation,
            perception,
            audio,
            phrases: PhraseCycle::new(),
            released: false,
        }
    }

    /// Reads the devices once and advances the simulation.
    pub fn frame(
        &mut self,
        dt: Duration,
        operator: OperatorInput,
    ) -> Result<StepOutcome, ServiceError> {
        if operator.speak {
            let phrase = self.phrases.next_phrase();
            debug!(phrase, "avatar speaking");
            self.audio.speak(phrase)?;
        }

        let frame = self.perception.read_frame()?;
        let amplitude = self.audio.read_amplitude()?;
        Ok(self.simulation.step(&StepInput {
            frame,
            amplitude,
            dt,
            paused: operator.paused,
        }))
    }

    /// The simulation driven by this session.
    #[must_use]
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// The audio service driven by this session.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Releases every device and ends the session.
    pub fn shutdown(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        debug!("releasing perception service");
        self.perception.release();
        debug!("releasing audio service");
        self.audio.release();
    }
}

impl<P, A> Drop for Session<P, A>
where
    P: PerceptionService,
    A: AudioService,
{
    fn drop(&mut self) {
        self.release();
    }
}
