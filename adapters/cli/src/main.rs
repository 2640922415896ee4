#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that drives a Burrow Defence session.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, IsTerminal},
    path::PathBuf,
};

use anyhow::{Context, Result};
use burrow_defence_core::{PlayerInput, TICK_PERIOD};
use burrow_defence_simulation::{Config, Signal, Simulation};
use clap::Parser;
use tokio::{
    sync::mpsc,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "burrow-defence", about = "Runs a headless Burrow Defence session")]
struct Args {
    /// TOML session configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Starts waves automatically instead of only the first one.
    #[arg(long)]
    auto_waves: bool,
    /// Scales the time slice of every tick.
    #[arg(long)]
    fast_forward: bool,
    /// Paces ticks with a wall-clock timer instead of running them back to back.
    #[arg(long)]
    realtime: bool,
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config at {}", path.display()))?;
                Config::from_toml_str(&contents)
                    .with_context(|| format!("invalid config at {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        Ok(config)
    }

    fn opening_inputs(&self) -> Vec<PlayerInput> {
        let mut inputs = Vec::new();
        if self.fast_forward {
            inputs.push(PlayerInput::ToggleFastForward);
        }
        if self.auto_waves {
            inputs.push(PlayerInput::ToggleAutoWave);
        } else {
            inputs.push(PlayerInput::StartWave);
        }
        inputs
    }
}

/// Counts the cues drained from the session.
#[derive(Debug, Default)]
struct CueTally {
    counts: BTreeMap<&'static str, u64>,
}

impl CueTally {
    fn drain_from(&mut self, simulation: &mut Simulation) {
        for cue in simulation.sound_events() {
            debug!(cue = cue.name(), "sound cue");
            *self.counts.entry(cue.name()).or_default() += 1;
        }
    }
}

/// Entry point for the Burrow Defence command-line interface.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(io::stdout().is_terminal())
        .init();

    let args = Args::parse();
    let config = args.load_config()?;
    let mut simulation = Simulation::new(&config).context("failed to start session")?;
    let mut tally = CueTally::default();
    info!(
        seed = config.seed,
        ticks = args.ticks,
        realtime = args.realtime,
        "session started"
    );

    if args.realtime {
        run_realtime(&mut simulation, &mut tally, args.opening_inputs(), args.ticks).await;
    } else {
        run_batch(&mut simulation, &mut tally, args.opening_inputs(), args.ticks);
    }

    let snapshot = simulation.snapshot();
    info!(
        ticks = snapshot.tick,
        wave = snapshot.wave.wave,
        map = snapshot.wave.map_index,
        currency = snapshot.currency,
        lives = snapshot.lives,
        towers = snapshot.towers.len(),
        game_over = snapshot.wave.game_over,
        "session finished"
    );
    for (cue, count) in &tally.counts {
        info!(cue, count, "cue total");
    }
    Ok(())
}

fn run_batch(
    simulation: &mut Simulation,
    tally: &mut CueTally,
    inputs: Vec<PlayerInput>,
    ticks: u64,
) {
    for input in inputs {
        dispatch_input(simulation, input);
    }
    for _ in 0..ticks {
        let _ = simulation.dispatch(Signal::Tick);
        tally.drain_from(simulation);
    }
}

async fn run_realtime(
    simulation: &mut Simulation,
    tally: &mut CueTally,
    inputs: Vec<PlayerInput>,
    ticks: u64,
) {
    let (input_tx, mut input_rx) = mpsc::channel(inputs.len().max(1));
    let feeder = tokio::spawn(async move {
        for input in inputs {
            if input_tx.send(input).await.is_err() {
                break;
            }
        }
    });

    let mut ticker = interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut elapsed = 0;
    while elapsed < ticks {
        tokio::select! {
            Some(input) = input_rx.recv() => dispatch_input(simulation, input),
            _ = ticker.tick() => {
                let _ = simulation.dispatch(Signal::Tick);
                tally.drain_from(simulation);
                elapsed += 1;
            }
        }
    }

    if let Err(error) = feeder.await {
        debug!(%error, "input feeder stopped");
    }
}

fn dispatch_input(simulation: &mut Simulation, input: PlayerInput) {
    let accepted = simulation.dispatch(Signal::Input(input));
    debug!(?input, accepted, "input dispatched");
}
