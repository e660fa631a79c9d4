pub mod error;
pub mod events;
pub mod geometry;
pub mod input;
pub mod powerup;
pub mod services;
pub mod theme;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use crate::error::SimError;
    use crate::events::{AudioCue, HudState};
    use crate::services::{AudioSink, HudSink, Services};

    /// Audio sink that records every cue it receives.
    #[derive(Clone, Default)]
    pub struct RecordingAudio {
        cues: Arc<Mutex<Vec<AudioCue>>>,
    }

    impl RecordingAudio {
        pub fn new() -> Self {
            Self::default()
        }

        /// Cues received so far.
        pub fn cues(&self) -> Vec<AudioCue> {
            self.cues.lock().map(|c| c.clone()).unwrap_or_default()
        }

        pub fn count(&self, cue: AudioCue) -> usize {
            self.cues().iter().filter(|&&c| c == cue).count()
        }
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, cue: AudioCue) -> Result<(), SimError> {
            if let Ok(mut cues) = self.cues.lock() {
                cues.push(cue);
            }
            Ok(())
        }
    }

    /// HUD sink that records every sync call.
    #[derive(Clone, Default)]
    pub struct RecordingHud {
        syncs: Arc<Mutex<Vec<HudState>>>,
    }

    impl RecordingHud {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn syncs(&self) -> Vec<HudState> {
            self.syncs.lock().map(|s| s.clone()).unwrap_or_default()
        }

        pub fn last(&self) -> Option<HudState> {
            self.syncs().last().copied()
        }
    }

    impl HudSink for RecordingHud {
        fn sync(&mut self, hud: &HudState) {
            if let Ok(mut syncs) = self.syncs.lock() {
                syncs.push(*hud);
            }
        }
    }

    /// Build `Services` around fresh recorders and hand back the recorders.
    pub fn recording_services() -> (Services, RecordingAudio, RecordingHud) {
        let audio = RecordingAudio::new();
        let hud = RecordingHud::new();
        let services = Services::new(Box::new(audio.clone()), Box::new(hud.clone()));
        (services, audio, hud)
    }

    /// Assert two floats are within `eps`.
    pub fn assert_close(actual: f32, expected: f32, eps: f32) {
        assert!(
            (actual - expected).abs() <= eps,
            "expected {expected} ± {eps}, got {actual}"
        );
    }
}
