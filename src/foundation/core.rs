use crate::foundation::error::{KeepsakeError, KeepsakeResult};

pub use kurbo::{Point, Rect, Vec2};

/// Host-supplied monotonic timestamp in whole milliseconds.
///
/// The engine never reads a clock; every mutating call takes the host's
/// current time so the same input sequence always produces the same
/// transition sequence.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Saturating addition of a millisecond delta.
    pub fn plus(self, delta_ms: u64) -> Self {
        Self(self.0.saturating_add(delta_ms))
    }

    /// Milliseconds elapsed since `earlier`, clamped at zero.
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Normalized scroll progress in `[0, 1]`.
///
/// The constructor clamps, so a `Progress` value is valid by construction.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
)]
pub struct Progress(f64);

impl Progress {
    /// Zero progress (top of the page).
    pub const ZERO: Self = Self(0.0);
    /// Full progress (bottom of the page).
    pub const ONE: Self = Self(1.0);

    /// Build a progress value, clamping into `[0, 1]`.
    ///
    /// Non-finite input clamps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    /// The normalized value in `[0, 1]`.
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Registry generation counter.
///
/// Every media mutation advances the epoch; timer entries tagged with an
/// older epoch are guaranteed no-ops when they fire.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Epoch(pub u64);

impl Epoch {
    /// The next generation.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Identifier for the six storyboard scenes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneId {
    /// Opening full-screen splash.
    Hero,
    /// Photo selection scene.
    Upload,
    /// Scroll-through memory gallery.
    Memories,
    /// Photo collect-and-explode takeover.
    Explosion,
    /// 3D cake with cut gesture and scratch card.
    Cake,
    /// Closing wish with celebration effects.
    FinalWish,
}

impl SceneId {
    /// All scenes in storyboard order.
    pub const ALL: [SceneId; 6] = [
        SceneId::Hero,
        SceneId::Upload,
        SceneId::Memories,
        SceneId::Explosion,
        SceneId::Cake,
        SceneId::FinalWish,
    ];

    /// Stable lowercase name used by the boundary storyboard model.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::Upload => "upload",
            Self::Memories => "memories",
            Self::Explosion => "explosion",
            Self::Cake => "cake",
            Self::FinalWish => "final_wish",
        }
    }

    /// Parse a boundary-model scene name.
    pub fn from_name(name: &str) -> KeepsakeResult<Self> {
        match name {
            "hero" => Ok(Self::Hero),
            "upload" => Ok(Self::Upload),
            "memories" => Ok(Self::Memories),
            "explosion" => Ok(Self::Explosion),
            "cake" => Ok(Self::Cake),
            "final_wish" => Ok(Self::FinalWish),
            other => Err(KeepsakeError::validation(format!(
                "unknown scene name '{other}'"
            ))),
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Hero => 0,
            Self::Upload => 1,
            Self::Memories => 2,
            Self::Explosion => 3,
            Self::Cake => 4,
            Self::FinalWish => 5,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
