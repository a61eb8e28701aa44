//! Epoch-tagged cancellable timers and bounded frame tasks.

/// The timer queue and its handles.
pub mod queue;
