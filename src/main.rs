// src/main.rs
use anyhow::Result;
use clap::{CommandFactory, Parser};
use rust_service_waiter::{
    cli::Cli,
    wait::{DeadlineRace, WaitOutcome},
};
use std::process;
use tokio::time::Instant;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // The deadline counts from here, before argument parsing.
    let started_at = Instant::now();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };

    if let Err(e) = init_tracing() {
        eprintln!("failed to initialize logging: {:#}", e);
        process::exit(1);
    }

    match run(cli, started_at).await {
        // Exit straight away: probers still in flight are abandoned with
        // the process rather than drained.
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{}", Cli::command().render_usage());
            process::exit(1);
        }
    }
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rust_service_waiter=info".parse()?)
                .add_directive("waiter=info".parse()?),
        )
        .init();
    Ok(())
}

async fn run(cli: Cli, started_at: Instant) -> Result<WaitOutcome> {
    let config = cli.into_config().await?;

    info!(
        "Waiting up to {:?} for {} services, checking every {:?}",
        config.timeout(),
        config.targets.len(),
        config.interval()
    );

    let race = DeadlineRace::new(&config, started_at)?;
    Ok(race.run().await)
}
