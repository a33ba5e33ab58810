// src/wait/tally.rs
use std::collections::HashMap;

/// Which targets have reported reachable.
///
/// Keyed by target identity, so duplicate targets collapse into one entry.
/// Only the control loop owns and mutates it.
#[derive(Debug, Default)]
pub struct ReadinessTally {
    entries: HashMap<String, bool>,
}

impl ReadinessTally {
    pub fn new<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: identities
                .into_iter()
                .map(|identity| (identity.into(), false))
                .collect(),
        }
    }

    /// Returns true only when this call flipped the entry. Unknown and
    /// already-ready identities are ignored.
    pub fn mark_ready(&mut self, identity: &str) -> bool {
        match self.entries.get_mut(identity) {
            Some(ready) if !*ready => {
                *ready = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.entries.values().all(|ready| *ready)
    }

    /// Identities still waiting, sorted.
    pub fn pending(&self) -> Vec<&str> {
        let mut pending: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, ready)| !**ready)
            .map(|(identity, _)| identity.as_str())
            .collect();
        pending.sort_unstable();
        pending
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
