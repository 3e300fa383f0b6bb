//! Read-only HTTP access to the published deployment artifacts.

pub mod api;
pub mod cli;
mod run;

pub use run::{run, start};
