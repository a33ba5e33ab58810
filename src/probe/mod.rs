// src/probe/mod.rs
mod checker;
mod prober;

pub use checker::{probe_for, HttpProbe, Probe, ProbeError, TcpProbe};
pub use prober::Prober;
