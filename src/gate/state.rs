use smallvec::SmallVec;
use tracing::debug;

use crate::foundation::core::{Millis, Progress, SceneId};

/// Visibility state of one gated scene.
///
/// Progression is linear and one-shot within a registry epoch: `Hidden →
/// Pending → Active → Completed`, with the only backward edge being the
/// registry-reset to `Hidden`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum SceneState {
    /// Not yet announced; initial state.
    Hidden,
    /// Activation predicate satisfied; waiting out the configured delay.
    Pending {
        /// Time the predicate first became true.
        since: Millis,
    },
    /// Scene is presenting.
    Active,
    /// Scene finished; terminal within the current epoch.
    Completed,
}

/// How a gate leaves `Active`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionPolicy {
    /// Decorative scenes complete on a fixed timer after activation.
    AfterMs(u64),
    /// Completes when the photo collection becomes non-empty.
    WhenPhotos,
    /// Completes on an explicit done signal from a gesture-reveal surface.
    Gesture,
}

/// Static configuration for one scene gate.
#[derive(Clone, Debug)]
pub struct GateConfig {
    /// The scene this gate governs.
    pub scene: SceneId,
    /// Minimum scroll progress required, if any.
    pub min_progress: Option<Progress>,
    /// Whether the threshold is strict (`>`) rather than `>=`.
    pub strict_progress: bool,
    /// Require a non-empty photo collection.
    pub requires_photos: bool,
    /// Require the scene anchor to have been scrolled into view.
    pub requires_anchor: bool,
    /// Require the scratch surface to have revealed.
    pub requires_scratch: bool,
    /// Scenes that must be `Completed` first.
    pub requires_completed: SmallVec<[SceneId; 2]>,
    /// Delay between `Pending` and `Active`, in milliseconds.
    pub pending_delay_ms: u64,
    /// Completion policy for leaving `Active`.
    pub completion: CompletionPolicy,
}

/// Snapshot of the signals an activation predicate may consult.
#[derive(Clone, Copy, Debug)]
pub struct GateInputs {
    /// Current normalized scroll progress.
    pub progress: Progress,
    /// Whether the photo collection is non-empty.
    pub photos_present: bool,
    /// Whether this scene's anchor has ever been visible.
    pub anchor_seen: bool,
    /// Whether the scratch surface has revealed.
    pub scratch_revealed: bool,
    /// Whether every prerequisite scene is `Completed`.
    pub prereqs_done: bool,
}

/// State machine deciding when one scene mounts, announces itself, and
/// finishes.
///
/// The gate owns no timers; the controller schedules the `Pending → Active`
/// delay and (for timer-completed scenes) the `Active → Completed` deadline
/// on the epoch-tagged queue, so a torn-down or reset gate can never be
/// mutated by a stray continuation.
pub struct SceneGate {
    config: GateConfig,
    state: SceneState,
}

impl SceneGate {
    /// Create a gate in `Hidden`.
    pub fn new(config: GateConfig) -> Self {
        Self {
            config,
            state: SceneState::Hidden,
        }
    }

    /// The gate's static configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// The governed scene.
    pub fn scene(&self) -> SceneId {
        self.config.scene
    }

    /// Evaluate the activation predicate against a signal snapshot.
    pub fn predicate_met(&self, inputs: &GateInputs) -> bool {
        if let Some(min) = self.config.min_progress {
            let p = inputs.progress.value();
            let ok = if self.config.strict_progress {
                p > min.value()
            } else {
                p >= min.value()
            };
            if !ok {
                return false;
            }
        }
        if self.config.requires_photos && !inputs.photos_present {
            return false;
        }
        if self.config.requires_anchor && !inputs.anchor_seen {
            return false;
        }
        if self.config.requires_scratch && !inputs.scratch_revealed {
            return false;
        }
        if !self.config.requires_completed.is_empty() && !inputs.prereqs_done {
            return false;
        }
        true
    }

    /// `Hidden → Pending` when the predicate holds.
    ///
    /// Returns whether the transition fired; at most once per epoch.
    pub fn begin_pending(&mut self, inputs: &GateInputs, now: Millis) -> bool {
        if self.state != SceneState::Hidden || !self.predicate_met(inputs) {
            return false;
        }
        self.state = SceneState::Pending { since: now };
        debug!(scene = self.config.scene.as_str(), at = now.0, "gate pending");
        true
    }

    /// `Pending → Active`, fired by the controller when the delay elapses.
    pub fn activate(&mut self, now: Millis) -> bool {
        if !matches!(self.state, SceneState::Pending { .. }) {
            return false;
        }
        self.state = SceneState::Active;
        debug!(scene = self.config.scene.as_str(), at = now.0, "gate active");
        true
    }

    /// `Active → Completed`, from a timer or an explicit done signal.
    pub fn complete(&mut self, now: Millis) -> bool {
        if self.state != SceneState::Active {
            return false;
        }
        self.state = SceneState::Completed;
        debug!(
            scene = self.config.scene.as_str(),
            at = now.0,
            "gate completed"
        );
        true
    }

    /// Force the gate back to `Hidden` (registry-reset rule).
    pub fn reset(&mut self) {
        if self.state != SceneState::Hidden {
            debug!(scene = self.config.scene.as_str(), "gate reset to hidden");
        }
        self.state = SceneState::Hidden;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gate/state.rs"]
mod tests;
