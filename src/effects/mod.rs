//! Fire-and-forget particle burst parameters and the emitter contract.

/// Burst parameter records and the default catalogue.
pub mod burst;
/// Emitter trait and built-in emitters.
pub mod emitter;
