use crate::error::SimError;
use crate::events::{AudioCue, HudState};

/// External audio collaborator.
///
/// Playback is best-effort: the session drops cues when the sink is
/// unavailable or returns an error, and never changes game state because of it.
pub trait AudioSink: Send {
    /// Whether the device can currently play anything.
    fn is_available(&self) -> bool {
        true
    }

    fn play(&mut self, cue: AudioCue) -> Result<(), SimError>;
}

/// External HUD collaborator. Receives at most one call per tick.
pub trait HudSink: Send {
    fn sync(&mut self, hud: &HudState);
}

/// Audio sink for hosts without sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn is_available(&self) -> bool {
        false
    }

    fn play(&mut self, _cue: AudioCue) -> Result<(), SimError> {
        Err(SimError::AudioUnavailable)
    }
}

/// HUD sink that discards updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHud;

impl HudSink for NullHud {
    fn sync(&mut self, _hud: &HudState) {}
}

/// Collaborators handed to the session at construction.
pub struct Services {
    pub audio: Box<dyn AudioSink>,
    pub hud: Box<dyn HudSink>,
}

impl Services {
    pub fn new(audio: Box<dyn AudioSink>, hud: Box<dyn HudSink>) -> Self {
        Self { audio, hud }
    }

    /// Send a cue, swallowing failures.
    pub fn play(&mut self, cue: AudioCue) {
        if !self.audio.is_available() {
            tracing::debug!(?cue, "Audio unavailable, cue dropped");
            return;
        }
        if let Err(e) = self.audio.play(cue) {
            tracing::debug!(?cue, error = %e, "Audio cue failed");
        }
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(Box::new(NullAudio), Box::new(NullHud))
    }
}
