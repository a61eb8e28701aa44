//! Session-oriented top-level controller.

/// The `Session` object and its options.
pub mod controller;
/// Drained events and the renderer collaborator contract.
pub mod events;
