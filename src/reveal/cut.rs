use tracing::debug;

use crate::reveal::RevealPhase;

/// The cake-cut surface: a single discrete action instead of a mask.
///
/// `Untouched → Revealed` in one step (`InProgress` is skipped); once
/// revealed, further cuts are rejected silently. There is no user-facing
/// reset; only the controller's registry-reset rule restores `Untouched`.
#[derive(Debug, Default)]
pub struct CutSurface {
    phase: RevealPhase,
}

impl CutSurface {
    /// Create an untouched surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase (never `InProgress`).
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Whether the cut happened.
    pub fn revealed(&self) -> bool {
        self.phase == RevealPhase::Revealed
    }

    /// Perform the cut; returns `true` the first time only.
    pub fn cut(&mut self) -> bool {
        if self.phase == RevealPhase::Revealed {
            return false;
        }
        self.phase = RevealPhase::Revealed;
        debug!("cake cut");
        true
    }

    /// Restore `Untouched` (registry-reset rule).
    pub fn reset(&mut self) {
        self.phase = RevealPhase::Untouched;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/cut.rs"]
mod tests;
