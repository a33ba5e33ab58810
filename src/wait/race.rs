// src/wait/race.rs
use super::ReadinessTally;
use crate::config::WaitConfig;
use crate::probe::{probe_for, Probe, ProbeError, Prober};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Duration, Instant};
use tracing::{debug, info, warn};

// About 30 years.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// Every target reported reachable before the deadline.
    Ready,
    /// The deadline fired first.
    TimedOut,
}

impl WaitOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            WaitOutcome::Ready => 0,
            WaitOutcome::TimedOut => 1,
        }
    }
}

/// Runs one prober per target and races their reports against a single
/// global deadline.
pub struct DeadlineRace {
    deadline: Instant,
    interval: Duration,
    probes: Vec<Arc<dyn Probe>>,
}

impl DeadlineRace {
    /// `started_at` anchors the deadline, normally the moment the process
    /// started.
    pub fn new(config: &WaitConfig, started_at: Instant) -> Result<Self, ProbeError> {
        let client = Client::builder().build()?;
        let probes = config
            .targets
            .iter()
            .cloned()
            .map(|target| probe_for(target, &client))
            .collect();

        // Timeouts too large to add to `started_at` saturate to a far-future deadline.
        let deadline = started_at
            .checked_add(config.timeout())
            .unwrap_or_else(|| started_at + FAR_FUTURE);

        Ok(Self::with_probes(
            deadline,
            config.interval(),
            probes,
        ))
    }

    pub fn with_probes(deadline: Instant, interval: Duration, probes: Vec<Arc<dyn Probe>>) -> Self {
        Self {
            deadline,
            interval,
            probes,
        }
    }

    pub async fn run(self) -> WaitOutcome {
        let deadline = sleep_until(self.deadline);
        tokio::pin!(deadline);

        let mut tally = ReadinessTally::new(
            self.probes
                .iter()
                .map(|probe| probe.target().identity().to_string()),
        );
        if tally.is_complete() {
            return WaitOutcome::Ready;
        }

        let (results_tx, mut results_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        for probe in self.probes {
            let prober = Prober::new(probe, self.interval);
            tokio::spawn(prober.run(results_tx.clone(), shutdown_rx.clone()));
        }
        drop(results_tx);

        let outcome = loop {
            tokio::select! {
                _ = &mut deadline => {
                    let pending = tally.pending();
                    warn!(
                        "Timed out waiting for {} of {} services: {}",
                        pending.len(),
                        tally.len(),
                        pending.join(", ")
                    );
                    break WaitOutcome::TimedOut;
                }
                Some(identity) = results_rx.recv() => {
                    if tally.mark_ready(&identity) {
                        debug!("{} marked ready", identity);
                    }
                    if tally.is_complete() {
                        info!("All {} services reachable", tally.len());
                        break WaitOutcome::Ready;
                    }
                }
            }
        };

        // Outstanding probers are not joined; they stop at their next
        // suspension point.
        let _ = shutdown_tx.send(true);
        outcome
    }
}
