//! Gesture-reveal surfaces: the scratch card and the cake cut.

/// The one-shot cake-cut action.
pub mod cut;
/// The occlusion-mask scratch card.
pub mod scratch;

/// Phase of a gesture-reveal surface.
///
/// Monotonic `Untouched → InProgress → Revealed`; reveals never revert
/// without an explicit reset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum RevealPhase {
    /// No effective input yet.
    #[default]
    Untouched,
    /// Input received, threshold not yet crossed.
    InProgress,
    /// Threshold crossed; terminal until reset.
    Revealed,
}
