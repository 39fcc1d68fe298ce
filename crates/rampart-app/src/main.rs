use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rampart_app::autopilot::Autopilot;
use rampart_app::control;
use rampart_app::game_loop::{is_terminal, LoopOptions};
use rampart_app::state::AppState;
use rampart_core::config::GameConfig;
use rampart_core::enums::AlertLevel;
use rampart_core::events::EffectEvent;
use rampart_core::state::GameStateSnapshot;
use rampart_sim::SimulationEngine;

#[derive(Parser, Debug)]
#[command(name = "rampart")]
#[command(about = "Run a RAMPART session with a scripted player")]
struct Args {
    /// TOML config file; built-in defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the config's RNG seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many ticks.
    #[arg(long, default_value_t = 36_000)]
    ticks: u64,
    /// Stop once this many waves are cleared.
    #[arg(long, default_value_t = 5)]
    waves: u32,
    /// Pace the game loop thread at the tick rate instead of running flat out.
    #[arg(long)]
    realtime: bool,
    /// Print the final snapshot as JSON on stdout.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut autopilot = Autopilot::new(&config, args.waves);
    let last = if args.realtime {
        run_realtime(config, &args, &mut autopilot)?
    } else {
        run_headless(config, &args, &mut autopilot)?
    };

    let stats = last.stats;
    info!(
        tick = last.time.tick,
        phase = ?last.phase,
        gold = last.economy.gold,
        lives = last.economy.lives,
        score = last.economy.score,
        waves_cleared = stats.waves_cleared,
        killed = stats.attackers_killed,
        leaked = stats.attackers_leaked,
        shots = stats.shots_fired,
        "session finished"
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&last)?);
    }
    Ok(())
}

/// Drive the engine on this thread. Deterministic for a given seed.
fn run_headless(config: GameConfig, args: &Args, autopilot: &mut Autopilot) -> Result<GameStateSnapshot> {
    let mut engine =
        SimulationEngine::with_instant_loader(config).context("building simulation engine")?;
    for _ in 0..args.ticks {
        let snapshot = engine.tick();
        report(&snapshot);
        if is_terminal(&snapshot) || autopilot.finished(&snapshot) {
            return Ok(snapshot);
        }
        engine.queue_commands(autopilot.decide(&snapshot));
    }
    Ok(engine.snapshot())
}

/// Run through the game loop thread and control surface.
fn run_realtime(config: GameConfig, args: &Args, autopilot: &mut Autopilot) -> Result<GameStateSnapshot> {
    let state = AppState::new();
    let options = LoopOptions {
        realtime: true,
        max_ticks: Some(args.ticks),
    };
    let snapshots = control::start_simulation(&state, config, options)?;

    let mut last = None;
    for snapshot in snapshots.iter() {
        report(&snapshot);
        let done = is_terminal(&snapshot) || autopilot.finished(&snapshot);
        let commands = autopilot.decide(&snapshot);
        last = Some(snapshot);
        if done {
            break;
        }
        for command in commands {
            if let Err(err) = control::send_command(&state, command) {
                warn!(%err, "command not delivered");
            }
        }
    }
    control::stop_simulation(&state)?;
    last.context("game loop produced no snapshots")
}

fn report(snapshot: &GameStateSnapshot) {
    for effect in &snapshot.effects {
        match effect {
            EffectEvent::WaveComplete { wave, bonus } => info!(wave, bonus, "wave cleared"),
            EffectEvent::Death { position } => {
                debug!(x = position.x, y = position.y, "attacker down")
            }
            _ => {}
        }
    }
    for alert in &snapshot.alerts {
        match alert.level {
            AlertLevel::Info => info!(tick = alert.tick, "{}", alert.message),
            AlertLevel::Warning | AlertLevel::Critical => {
                warn!(tick = alert.tick, level = ?alert.level, "{}", alert.message)
            }
        }
    }
}
