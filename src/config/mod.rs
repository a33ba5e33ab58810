// src/config/mod.rs
mod models;
mod target;

pub use models::*;
pub use target::{Protocol, ServiceTarget};

use anyhow::{Context, Result};
use std::path::Path;

/// Load a wait file (YAML or JSON)
pub async fn load_config<P: AsRef<Path>>(path: P) -> Result<WaitFile> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let file: WaitFile = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => {
            serde_yaml::from_str(&contents).context("Failed to parse YAML config")?
        }
        _ => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };

    Ok(file)
}

/// Parse every target string, failing on the first bad one.
pub fn parse_targets<I, S>(inputs: I) -> Result<Vec<ServiceTarget>, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| ServiceTarget::parse(input.as_ref()))
        .collect()
}

/// Turn a flat `host port host port ...` list into TCP targets.
pub fn parse_host_pairs(values: &[String]) -> Result<Vec<ServiceTarget>, ConfigError> {
    let mut pairs = values.chunks_exact(2);
    let targets = pairs
        .by_ref()
        .map(|pair| {
            let port = pair[1]
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(pair[1].clone()))?;
            ServiceTarget::tcp(&pair[0], port)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let [host] = pairs.remainder() {
        return Err(ConfigError::UnpairedHost(host.clone()));
    }
    Ok(targets)
}
