//! Scroll offset to normalized progress, with sticky anchor visibility.

/// Progress source with push subscriptions and anchor latches.
pub mod progress;
