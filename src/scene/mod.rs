//! Boundary storyboard model: serde defs, validation, defaults.

/// Serde definitions and boundary validation.
pub mod model;
/// Validated storyboard wrapper, defaults, and JSON loading.
pub mod storyboard;
