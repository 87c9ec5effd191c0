//! CLI library components for the run design builder.

pub mod config;
pub mod logging;
pub mod pipeline;
