// src/cli.rs
use crate::config::{
    self, WaitConfig, WaitFile, DEFAULT_INTERVAL_SECS, DEFAULT_TIMEOUT_SECS,
};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "waiter",
    about = "Block until network services are reachable or a timeout elapses",
    args_conflicts_with_subcommands = true,
    after_help = "example: waiter --timeout 30 --interval 1 http://service.com https://service2:560 tcp://service3:1234"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub urls: UrlArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Wait for a flat list of HOST PORT pairs over TCP
    Hosts(HostsArgs),
}

// Default surface: tcp://, http:// and https:// URLs.
#[derive(Args, Debug, Clone, Default)]
pub struct UrlArgs {
    /// Overall timeout in seconds [default: 60]
    #[arg(long, short = 't', value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Pause between checks of one service, in seconds [default: 1]
    #[arg(long, short = 'i', value_name = "SECONDS")]
    pub interval: Option<u64>,

    /// YAML or JSON file with timeout_secs, interval_secs and targets
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(value_name = "URL")]
    pub targets: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct HostsArgs {
    /// Overall timeout in seconds
    #[arg(long, short = 't', value_name = "SECONDS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Pause between checks of one host, in seconds
    #[arg(long, short = 'd', value_name = "SECONDS", default_value_t = DEFAULT_INTERVAL_SECS)]
    pub delay: u64,

    #[arg(value_name = "HOST PORT", required = true, num_args = 1..)]
    pub values: Vec<String>,
}

impl Cli {
    /// Resolve the parsed arguments into a validated config.
    pub async fn into_config(self) -> Result<WaitConfig> {
        let config = match self.command {
            Some(Commands::Hosts(args)) => args.into_config()?,
            None => self.urls.into_config().await?,
        };
        config.validate()?;
        Ok(config)
    }
}

impl UrlArgs {
    async fn into_config(self) -> Result<WaitConfig> {
        let file = match &self.config {
            Some(path) => config::load_config(path).await?,
            None => WaitFile::default(),
        };
        Ok(merge(file, self)?)
    }
}

impl HostsArgs {
    fn into_config(self) -> Result<WaitConfig, config::ConfigError> {
        Ok(WaitConfig {
            timeout_secs: self.timeout,
            interval_secs: self.delay,
            targets: config::parse_host_pairs(&self.values)?,
        })
    }
}

/// Command-line values win over file values; targets from both are kept,
/// file first.
fn merge(file: WaitFile, args: UrlArgs) -> Result<WaitConfig, config::ConfigError> {
    let targets = config::parse_targets(file.targets.iter().chain(args.targets.iter()))?;
    Ok(WaitConfig {
        timeout_secs: args
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
        interval_secs: args
            .interval
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS),
        targets,
    })
}
