use smallvec::SmallVec;
use tracing::trace;

use crate::foundation::core::{Progress, SceneId};
use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// Scroll range in host units (pixels), mapped onto `[0, 1]`.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    /// Offset mapping to progress 0.
    pub start: f64,
    /// Offset mapping to progress 1.
    pub end: f64,
}

impl ScrollRange {
    /// Create a validated range with `start < end`.
    pub fn new(start: f64, end: f64) -> KeepsakeResult<Self> {
        if !start.is_finite() || !end.is_finite() || start >= end {
            return Err(KeepsakeError::validation(
                "ScrollRange requires finite start < end",
            ));
        }
        Ok(Self { start, end })
    }

    fn progress_at(self, offset: f64) -> Progress {
        Progress::new((offset - self.start) / (self.end - self.start))
    }
}

/// Handle for removing a progress subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(Progress)>;

/// Converts raw scroll offsets into normalized progress and sticky per-scene
/// anchor visibility.
///
/// Progress is pushed to subscribers on change (never polled). Anchor
/// visibility latches: once a scene's anchor has been reported visible it
/// stays seen for the rest of the page session, including across registry
/// resets.
#[derive(Default)]
pub struct ScrollSource {
    range: Option<ScrollRange>,
    progress: Progress,
    seen: [bool; SceneId::ALL.len()],
    listeners: SmallVec<[(SubscriptionId, Listener); 2]>,
    next_sub: u64,
}

impl ScrollSource {
    /// Create a source over the given scroll range.
    pub fn new(range: ScrollRange) -> Self {
        Self {
            range: Some(range),
            ..Self::default()
        }
    }

    /// Current normalized progress.
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Recompute progress from a raw scroll offset.
    ///
    /// Subscribers are notified only when the clamped value actually changed.
    pub fn set_offset(&mut self, offset: f64) -> Progress {
        let next = match self.range {
            Some(range) => range.progress_at(offset),
            None => Progress::new(offset),
        };
        self.set_progress(next);
        self.progress
    }

    /// Set normalized progress directly (hosts that pre-normalize).
    pub fn set_progress(&mut self, next: Progress) {
        if next == self.progress {
            return;
        }
        self.progress = next;
        trace!(progress = next.value(), "scroll progress changed");
        for (_, listener) in &mut self.listeners {
            listener(next);
        }
    }

    /// Report whether a scene anchor currently intersects the viewport.
    ///
    /// Latches to seen on the first `true`; later `false` reports are
    /// ignored (one-shot in-view semantics).
    pub fn anchor_visible(&mut self, scene: SceneId, visible: bool) {
        if visible {
            self.seen[scene.index()] = true;
        }
    }

    /// Whether the scene's anchor has ever been visible.
    pub fn seen(&self, scene: SceneId) -> bool {
        self.seen[scene.index()]
    }

    /// Subscribe to progress changes; the listener receives each new value.
    pub fn subscribe(&mut self, listener: impl FnMut(Progress) + 'static) -> SubscriptionId {
        self.next_sub += 1;
        let id = SubscriptionId(self.next_sub);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscription; unknown ids are a no-op.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(sub, _)| *sub != id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/progress.rs"]
mod tests;
