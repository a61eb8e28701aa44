//! Easing curves for glow ramps and burst intensity falloff.

/// Easing function catalogue.
pub mod ease;
