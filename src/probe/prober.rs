// src/probe/prober.rs
use super::Probe;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep, Duration};
use tracing::{debug, info};

/// Retry loop for one target.
///
/// Checks the target every `interval` until a check succeeds, then sends
/// the target's identity on `results` exactly once and stops. Every
/// failure is retried the same way; there is no attempt limit. The loop
/// also stops, without reporting, as soon as `shutdown` changes or its
/// sender is dropped.
pub struct Prober {
    probe: Arc<dyn Probe>,
    interval: Duration,
}

impl Prober {
    pub fn new(probe: Arc<dyn Probe>, interval: Duration) -> Self {
        Self { probe, interval }
    }

    pub async fn run(
        self,
        results: mpsc::UnboundedSender<String>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let target = self.probe.target();
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            info!("{} {}", target.protocol().verb(), target);

            let outcome = tokio::select! {
                outcome = self.probe.check() => outcome,
                _ = shutdown.changed() => {
                    debug!("{} abandoned during attempt {}", target, attempt);
                    return;
                }
            };

            match outcome {
                Ok(()) => {
                    info!("{} reachable", target);
                    let _ = results.send(target.identity().to_string());
                    return;
                }
                Err(e) => {
                    info!("{} unreachable", target);
                    debug!("attempt {} against {} failed: {}", attempt, target, e);
                }
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    debug!("{} abandoned after {} attempts", target, attempt);
                    return;
                }
            }
        }
    }
}
