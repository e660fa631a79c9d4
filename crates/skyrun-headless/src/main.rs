mod autopilot;
mod sinks;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use skyrun_core::events::GameState;
use skyrun_core::services::Services;
use skyrun_core::time::ticks_to_secs;
use skyrun_sim::SimConfig;
use skyrun_sim::Session;
use skyrun_sim::character::CharacterKind;

use crate::autopilot::{Autopilot, Observation};
use crate::sinks::{Line, StdoutAudio, StdoutHud, emit};

/// Run a skyrun session without a window and stream what happens as JSON lines.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Maximum number of ticks to simulate.
    #[arg(
        long,
        value_name = "TICKS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    ticks: u64,
    /// Fixed RNG seed. Overrides the config file.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// TOML config path. Defaults to $SKYRUN_CONFIG or config/skyrun.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<String>,
    /// Playable character, e.g. sonic or captain_barnacles.
    #[arg(long, value_name = "NAME", value_parser = parse_character)]
    character: Option<CharacterKind>,
    /// Ticks between scheduled jumps.
    #[arg(long, value_name = "TICKS", default_value_t = 90)]
    jump_every: u64,
    /// Restart after game over instead of stopping.
    #[arg(long)]
    restart: bool,
    /// Sleep between ticks to match the configured tick rate.
    #[arg(long)]
    realtime: bool,
    /// Emit a render snapshot every N ticks.
    #[arg(long, value_name = "TICKS")]
    snapshot_every: Option<u64>,
    /// Log as JSON instead of plain text.
    #[arg(long)]
    json_logs: bool,
}

fn parse_character(value: &str) -> Result<CharacterKind, String> {
    serde_json::from_value(serde_json::Value::String(value.to_ascii_lowercase())).map_err(|_| {
        let names: Vec<String> = CharacterKind::ALL
            .iter()
            .filter_map(|c| serde_json::to_value(c).ok())
            .filter_map(|v| v.as_str().map(str::to_owned))
            .collect();
        format!("unknown character; expected one of: {}", names.join(", "))
    })
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn observe(session: &Session) -> Observation {
    let actor = session.actor();
    Observation {
        state: session.state(),
        tick: session.ticks(),
        x: actor.bounds().center_x(),
        on_ground: actor.on_ground,
        goal_x: session.level().goal.bounds.center_x(),
    }
}

fn main() -> std::io::Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.json_logs);

    let mut config = match &args.config {
        Some(path) => SimConfig::load_from(path),
        None => SimConfig::load(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let tick_interval = Duration::from_secs_f32(1.0 / config.tick_rate_hz.max(1.0));

    tracing::info!(
        ticks = args.ticks,
        seed = ?config.seed,
        levels = config.max_level(),
        "skyrun headless starting"
    );

    let services = Services::new(Box::new(StdoutAudio), Box::new(StdoutHud));
    let mut session = Session::new(config, services);
    if let Some(character) = args.character {
        session.select_character(character);
    }
    let mut pilot = Autopilot::new(args.jump_every, args.restart);

    while session.ticks() < args.ticks {
        if session.state() == GameState::Start {
            for event in session.begin() {
                emit(&Line::Event {
                    tick: session.ticks(),
                    event: &event,
                })?;
            }
        }

        let keys = pilot.plan(observe(&session));
        session.apply_input(&keys);

        let tick = session.ticks() + 1;
        for event in session.tick() {
            emit(&Line::Event {
                tick,
                event: &event,
            })?;
        }

        if args
            .snapshot_every
            .is_some_and(|every| every > 0 && tick % every == 0)
        {
            emit(&Line::Snapshot {
                tick,
                snapshot: &session.snapshot(),
            })?;
        }

        match session.state() {
            GameState::Complete => break,
            GameState::GameOver if !args.restart => break,
            _ => {},
        }

        if args.realtime {
            std::thread::sleep(tick_interval);
        }
    }

    let progress = session.progress();
    let game_secs = ticks_to_secs(
        u32::try_from(session.ticks()).unwrap_or(u32::MAX),
        session.config().tick_rate_hz,
    );
    tracing::info!(
        ticks = session.ticks(),
        game_secs,
        state = ?session.state(),
        score = progress.score,
        level = progress.level,
        "skyrun headless finished"
    );
    emit(&Line::Summary {
        ticks: session.ticks(),
        state: session.state(),
        progress,
    })
}
