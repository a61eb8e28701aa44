use std::cell::RefCell;
use std::rc::Rc;

use crate::effects::burst::BurstSpec;

/// Host particle system contract.
///
/// Strictly one-way: the engine pushes bursts, never blocks on them, and
/// never reads a result. Overlapping emissions are additive.
pub trait EffectEmitter {
    /// Emit one burst.
    fn emit(&mut self, spec: &BurstSpec);
}

/// Emitter that drops every burst; the default when a host attaches none.
#[derive(Debug, Default)]
pub struct NullEmitter;

impl EffectEmitter for NullEmitter {
    fn emit(&mut self, _spec: &BurstSpec) {}
}

/// Emitter that records every burst, for tests and headless inspection.
///
/// Cloning shares the log, so a test can keep a clone after handing the
/// original to a session.
#[derive(Clone, Debug, Default)]
pub struct RecordingEmitter {
    log: Rc<RefCell<Vec<BurstSpec>>>,
}

impl RecordingEmitter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every burst emitted so far, in order.
    pub fn emitted(&self) -> Vec<BurstSpec> {
        self.log.borrow().clone()
    }

    /// Number of bursts emitted so far.
    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }
}

impl EffectEmitter for RecordingEmitter {
    fn emit(&mut self, spec: &BurstSpec) {
        self.log.borrow_mut().push(spec.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/emitter.rs"]
mod tests;
