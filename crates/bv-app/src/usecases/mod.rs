//! Business logic use cases

pub mod build_monitor;
