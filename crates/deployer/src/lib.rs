pub mod cli;
pub mod config;
pub mod friendbot;
pub mod plan;
pub mod policy;
mod run;
#[cfg(test)]
mod testing;
pub mod tooling;

pub use run::{run, start};
