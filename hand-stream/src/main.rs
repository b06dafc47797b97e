//! Hand Stream - live hand-tracking telemetry receiver
//!
//! Listens for a hand-tracking stream and reconstructs both hands in world space.

use hand_stream::app::cli::{Cli, Commands, ConfigAction, EmitFormat, WatchArgs};
use hand_stream::app::config::Config;
use hand_stream::hand::HandStateStore;
use hand_stream::stream::{StopToken, StreamReceiver};
use hand_stream::time::timebase::Timebase;
use hand_stream::view::{run_view_loop, FrameSink, JsonLinesSink, LogSink};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments first so we can use --verbose to set log level
    let cli = Cli::parse_args();

    // Initialize tracing (--verbose enables debug-level output); logs go to
    // stderr so `--emit json` keeps stdout clean
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    Timebase::init();

    // Load config
    let config = if let Some(path) = &cli.config {
        Config::load(path)?
    } else {
        Config::load_default()?
    };

    // Execute command
    match cli.command {
        Commands::Watch(args) => {
            run_watch(&args, config)?;
        }
        Commands::Init { force } => {
            run_init(force, &config)?;
        }
        Commands::Config { action } => {
            run_config(action, &config)?;
        }
    }

    Ok(())
}

fn run_watch(args: &WatchArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let store = Arc::new(HandStateStore::new());
    let stop = StopToken::new();

    // Set up Ctrl+C handler
    let stop_handler = stop.clone();
    ctrlc::set_handler(move || stop_handler.cancel())?;

    let mut receiver = StreamReceiver::new(config.transport.clone(), Arc::clone(&store), stop.clone());
    let local_addr = receiver.start()?;
    info!("Listening on {} ({}). Press Ctrl+C to stop", local_addr, config.transport.protocol);

    let deadline = (args.duration > 0).then(|| Instant::now() + Duration::from_secs(args.duration));
    let mut sink: Box<dyn FrameSink> = match args.emit {
        EmitFormat::Log => Box::new(LogSink::default()),
        EmitFormat::Json => Box::new(JsonLinesSink::new(std::io::stdout().lock())),
    };

    let result = run_view_loop(&store, &stop, &config.view, sink.as_mut(), deadline);
    receiver.stop();
    let frames = result?;

    let stats = receiver.stats().snapshot();
    info!(
        "Rendered {} frames; received {} lines ({} applied, {} ignored, {} undecodable chunks)",
        frames,
        stats.lines_received,
        stats.records_applied,
        stats.lines_ignored,
        stats.chunks_undecodable
    );

    Ok(())
}

fn run_init(force: bool, config: &Config) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {:?}. Use --force to overwrite.",
            config_path
        );
    }

    config.save_default()?;
    println!("Created config at {:?}", config_path);
    println!("\nConfig content:\n{}", config.to_toml()?);

    Ok(())
}

fn run_config(action: ConfigAction, config: &Config) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = config.to_toml()?;
            println!("Configuration ({:?}):\n", Config::default_path());
            println!("{}", toml_str);
        }
        ConfigAction::Reset { force } => {
            let config_path = Config::default_path();

            if config_path.exists() && !force {
                println!("Config exists at {:?}", config_path);
                println!("Use --force to reset to defaults");
                return Ok(());
            }

            Config::default().save_default()?;
            println!("Reset config at {:?}", config_path);
        }
    }

    Ok(())
}
