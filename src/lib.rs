// src/lib.rs
pub mod cli;
pub mod config;
pub mod probe;
pub mod wait;
