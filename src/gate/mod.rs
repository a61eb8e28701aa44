//! Per-scene visibility state machines.

/// The gate state machine and its configuration.
pub mod state;
