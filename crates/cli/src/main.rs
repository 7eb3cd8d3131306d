//! Handheld emulator CLI.
//!
//! This binary wires the reference host platform to the test-pattern core. It provides:
//! 1. **Run:** Drive a session on the terminal backend or headless, with optional frame
//!    limit, speed and pacing overrides, and a JSON configuration file.
//! 2. **Slots:** Print the hardware services table layout in ABI order.
//!
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to filter them, for
//! example `RUST_LOG=tamasim::guest=trace`.

mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tamasim_core::HalError;
use tamasim_core::config::Config;
use tamasim_core::hal::{ServiceRegistry, Slot};
use tamasim_core::host::HostPlatform;
use tamasim_core::sim::{PatternCore, Session};
use tamasim_core::stats::Instrumented;

use crate::terminal::{DeferredStderr, TerminalInput, TerminalPresenter};

#[derive(Parser, Debug)]
#[command(
    name = "tamasim",
    author,
    version,
    about = "Handheld emulator host platform",
    long_about = "Run the test-pattern core against the reference host platform, or inspect the hardware services table.\n\nExamples:\n  tamasim run\n  tamasim run --backend headless --frames 300 --no-pacing --stats\n  tamasim run --config tamasim.json\n  tamasim slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the test-pattern core.
    Run {
        /// Output backend.
        #[arg(short, long, value_enum, default_value_t = Backend::Terminal)]
        backend: Backend,

        /// Halt after this many frames.
        #[arg(short, long)]
        frames: Option<u64>,

        /// Emulation speed factor (1.0 is real time).
        #[arg(long)]
        speed: Option<f64>,

        /// Do not block in `sleep_until`; run as fast as possible.
        #[arg(long)]
        no_pacing: bool,

        /// Core steps between input polls (defaults to every frame).
        #[arg(long)]
        poll_interval: Option<u32>,

        /// JSON configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print per-slot call counts when the run ends.
        #[arg(long)]
        stats: bool,
    },

    /// Print the hardware services table layout.
    Slots,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    /// Draw the LCD in the terminal and read the keyboard.
    Terminal,
    /// No output and no input.
    Headless,
}

/// Arguments of the `run` subcommand.
#[derive(Debug)]
struct RunArgs {
    backend: Backend,
    frames: Option<u64>,
    speed: Option<f64>,
    no_pacing: bool,
    poll_interval: Option<u32>,
    config: Option<PathBuf>,
    stats: bool,
}

fn main() -> ExitCode {
    let diagnostics = DeferredStderr::default();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(diagnostics.clone())
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            backend,
            frames,
            speed,
            no_pacing,
            poll_interval,
            config,
            stats,
        } => cmd_run(
            &RunArgs {
                backend,
                frames,
                speed,
                no_pacing,
                poll_interval,
                config,
                stats,
            },
            &diagnostics,
        ),
        Commands::Slots => {
            cmd_slots();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Builds the configuration from the optional file and command-line overrides.
fn load_config(args: &RunArgs) -> Result<Config, HalError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(speed) = args.speed {
        config.clock.speed = speed;
    }
    if args.no_pacing {
        config.clock.pacing = false;
    }
    match args.poll_interval {
        Some(interval) => config.session.poll_interval = interval,
        // PatternCore steps once per frame.
        None if args.config.is_none() => config.session.poll_interval = 1,
        None => {}
    }
    config.validate()?;
    Ok(config)
}

/// Runs the test-pattern core until it halts, input quits, or the step limit is hit.
///
/// On the terminal backend, diagnostics are held back while the alternate screen is up.
fn cmd_run(args: &RunArgs, diagnostics: &DeferredStderr) -> Result<(), HalError> {
    let config = load_config(args)?;

    let mut platform = HostPlatform::new(&config)?;
    if args.backend == Backend::Terminal {
        platform = platform
            .with_presenter(TerminalPresenter::new(diagnostics.clone())?)
            .with_input(TerminalInput);
    }
    let monitor = platform.monitor();
    let services = Instrumented::new(platform);
    let counters = services.counters();

    let core = args.frames.map_or_else(PatternCore::new, PatternCore::with_frames);
    let mut session = Session::new(core, ServiceRegistry::new(Box::new(services)), &config.session);
    let reason = session.run();
    let steps = session.steps();

    // Dropping the registry drops the presenter, which restores the terminal and
    // replays held diagnostics.
    let (core, registry) = session.close();
    drop(registry);

    tracing::info!(
        %reason,
        steps,
        frames = core.frames(),
        refreshes = monitor.refresh_count(),
        "run finished"
    );
    let memory = monitor.memory();
    if memory.live_buffers != 0 {
        tracing::warn!(live = memory.live_buffers, "buffers still allocated at exit");
    }
    if args.stats {
        counters.snapshot().print();
    }
    Ok(())
}

/// Prints each slot with its index, Rust name, C name and C signature.
fn cmd_slots() {
    println!("{:<3} {:<20} {:<16} C SIGNATURE", "#", "SLOT", "C NAME");
    for slot in Slot::ALL {
        println!(
            "{:<3} {:<20} {:<16} {}",
            slot.index(),
            slot.name(),
            slot.c_name(),
            slot.c_signature()
        );
    }
}
