use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use tokio_util::sync::CancellationToken;

mod cli;
mod config;
mod export;
mod monitor;
mod probe;
mod render;
mod state;
mod stats;

use cli::Args;
use config::Config;
use export::CycleLog;
use monitor::Engine;
use probe::SystemProber;
use state::Session;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    // Target list: flag, else one interactive prompt, else the default set
    let csv = if args.targets.trim().is_empty() {
        cli::prompt_targets()
    } else {
        args.targets.clone()
    };
    let mut hosts = cli::parse_targets(&csv);
    if hosts.is_empty() {
        hosts = cli::parse_targets(cli::DEFAULT_TARGETS);
    }

    let config = Config::from(&args);

    // The log must open before any cycle runs; failure here is fatal
    let log = match args.log.as_deref() {
        Some(path) => Some(CycleLog::create(path)?),
        None => None,
    };

    // Cancellation token for graceful shutdown
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        cancel_clone.cancel();
    });

    info!("starting with targets: {}", hosts.join(", "));

    let session = Session::new(hosts, config.window);
    let engine = Engine::new(config, session, SystemProber::new(), log, cancel);
    engine.run().await?;

    println!("\nStopped.");
    Ok(())
}
