//! Core value types, error taxonomy, and deterministic randomness.

/// Core value types: timestamps, progress, epochs, scene ids.
pub mod core;
/// Error taxonomy and result alias.
pub mod error;
/// Seed-deterministic randomness.
pub mod math;
