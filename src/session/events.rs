use std::cell::RefCell;
use std::rc::Rc;

use crate::foundation::core::{Epoch, SceneId};
use crate::gate::state::SceneState;
use crate::media::registry::MediaId;
use crate::scene::model::SceneCue;

/// Observable occurrences drained from a session by the host.
///
/// Events are buffered in occurrence order and drained explicitly; nothing
/// in the engine depends on the host consuming them.
#[derive(Clone, Debug)]
pub enum StoryEvent {
    /// A gate moved to a new state.
    GateChanged {
        /// The governed scene.
        scene: SceneId,
        /// The state after the transition.
        state: SceneState,
    },
    /// A timed in-scene cue fired.
    Cue {
        /// Owning scene.
        scene: SceneId,
        /// Cue payload.
        cue: SceneCue,
    },
    /// A photo was registered.
    MediaAdded {
        /// Id of the new item.
        id: MediaId,
    },
    /// A photo was removed.
    MediaRemoved {
        /// Id of the removed item.
        id: MediaId,
    },
    /// The registry changed and the journey restarted.
    StoryReset {
        /// The new epoch.
        epoch: Epoch,
    },
    /// Scratch coverage changed.
    ScratchProgress {
        /// Coverage fraction after the latest clear batch.
        coverage: f64,
    },
    /// The scratch card revealed.
    ScratchRevealed,
    /// The cake was cut.
    CakeCut,
}

/// Configuration pushed to the host's 3D cake renderer.
///
/// The renderer has no write access back into gate state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CakeRenderConfig {
    /// Whether the cake has been cut.
    pub cut: bool,
    /// Highlight intensity in `[0, 1]`.
    pub glow: f64,
}

/// Host 3D scene renderer contract.
pub trait CakeRenderer {
    /// Apply a new render configuration.
    fn apply(&mut self, cfg: &CakeRenderConfig);
}

/// Renderer that ignores every push; the default.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl CakeRenderer for NullRenderer {
    fn apply(&mut self, _cfg: &CakeRenderConfig) {}
}

/// Renderer that records every pushed configuration, for tests.
///
/// Cloning shares the log.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<Vec<CakeRenderConfig>>>,
}

impl RecordingRenderer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every configuration pushed so far, in order.
    pub fn applied(&self) -> Vec<CakeRenderConfig> {
        self.log.borrow().clone()
    }
}

impl CakeRenderer for RecordingRenderer {
    fn apply(&mut self, cfg: &CakeRenderConfig) {
        self.log.borrow_mut().push(*cfg);
    }
}
