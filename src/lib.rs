//! BuildVision shell: CLI, tracing bootstrap and console adapters around
//! the build monitor.

pub mod adapters;
pub mod bootstrap;
pub mod cli;
