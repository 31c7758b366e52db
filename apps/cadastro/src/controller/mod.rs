//! Controller layer: typed session commands, event presentation, and dispatch onto the registry.

pub mod commands;
pub mod events;
pub mod orchestration;
