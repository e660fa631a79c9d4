use std::io::{self, Write};

use serde::Serialize;

use skyrun_core::error::SimError;
use skyrun_core::events::{AudioCue, GameEvent, GameState, HudState};
use skyrun_sim::RenderSnapshot;
use skyrun_sim::dispatch::Progress;

/// One line of the host's stdout stream.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Line<'a> {
    Audio { cue: AudioCue },
    Hud { hud: &'a HudState },
    Event { tick: u64, event: &'a GameEvent },
    Snapshot { tick: u64, snapshot: &'a RenderSnapshot },
    Summary {
        ticks: u64,
        state: GameState,
        progress: Progress,
    },
}

/// Write `line` as a single JSON object followed by a newline.
pub fn emit(line: &Line<'_>) -> io::Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer(&mut out, line)?;
    out.write_all(b"\n")
}

/// Audio sink that prints each cue instead of playing it.
#[derive(Debug, Default)]
pub struct StdoutAudio;

impl skyrun_core::services::AudioSink for StdoutAudio {
    fn play(&mut self, cue: AudioCue) -> Result<(), SimError> {
        emit(&Line::Audio { cue }).map_err(|e| {
            tracing::warn!(error = %e, "stdout closed");
            SimError::AudioUnavailable
        })
    }
}

/// HUD sink that prints each update.
#[derive(Debug, Default)]
pub struct StdoutHud;

impl skyrun_core::services::HudSink for StdoutHud {
    fn sync(&mut self, hud: &HudState) {
        if let Err(e) = emit(&Line::Hud { hud }) {
            tracing::warn!(error = %e, "Failed to write HUD line");
        }
    }
}
