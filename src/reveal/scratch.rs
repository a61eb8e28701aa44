use kurbo::Point;
use tracing::{debug, warn};

use crate::foundation::error::{KeepsakeError, KeepsakeResult};
use crate::reveal::RevealPhase;

/// Default display surface width in pixels.
pub const DEFAULT_WIDTH: u32 = 800;
/// Default display surface height in pixels.
pub const DEFAULT_HEIGHT: u32 = 400;
/// Default clear-disk radius in pixels.
pub const DEFAULT_RADIUS: f64 = 30.0;
/// Coverage fraction that must be exceeded before the card reveals.
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Occlusion mask matching the display surface's pixel grid.
///
/// Clearing is idempotent per pixel, so coverage is monotonically
/// non-decreasing until the mask is restored by a reset.
struct OcclusionMask {
    width: u32,
    height: u32,
    cleared: Vec<bool>,
    cleared_count: usize,
}

impl OcclusionMask {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cleared: vec![false; (width as usize) * (height as usize)],
            cleared_count: 0,
        }
    }

    fn restore(&mut self) {
        self.cleared.fill(false);
        self.cleared_count = 0;
    }

    fn coverage(&self) -> f64 {
        (self.cleared_count as f64) / (self.cleared.len() as f64)
    }

    /// Clear a disk centered at `center`; returns newly cleared pixels.
    fn clear_disk(&mut self, center: Point, radius: f64) -> usize {
        let r2 = radius * radius;
        let x_min = ((center.x - radius).floor().max(0.0)) as u32;
        let y_min = ((center.y - radius).floor().max(0.0)) as u32;
        let x_max = ((center.x + radius).ceil()).min(f64::from(self.width) - 1.0);
        let y_max = ((center.y + radius).ceil()).min(f64::from(self.height) - 1.0);
        if x_max < 0.0 || y_max < 0.0 {
            return 0;
        }
        let (x_max, y_max) = (x_max as u32, y_max as u32);

        let mut newly = 0;
        for y in y_min..=y_max {
            let dy = f64::from(y) - center.y;
            let row = (y as usize) * (self.width as usize);
            for x in x_min..=x_max {
                let dx = f64::from(x) - center.x;
                if dx * dx + dy * dy > r2 {
                    continue;
                }
                let idx = row + x as usize;
                if !self.cleared[idx] {
                    self.cleared[idx] = true;
                    newly += 1;
                }
            }
        }
        self.cleared_count += newly;
        newly
    }
}

/// Result of feeding one pointer batch into the scratch surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScratchOutcome {
    /// Coverage fraction after the batch.
    pub coverage: f64,
    /// Whether this batch crossed the reveal threshold (fires once).
    pub just_revealed: bool,
}

/// The scratch card: a pointer-driven occlusion mask with a one-shot reveal.
///
/// Input before the display surface is attached is absorbed silently (logged)
/// and retried naturally on the next event, never an error to the host.
pub struct ScratchSurface {
    phase: RevealPhase,
    mask: Option<OcclusionMask>,
    pointer_down: bool,
    radius: f64,
    threshold: f64,
}

impl Default for ScratchSurface {
    fn default() -> Self {
        Self::new(DEFAULT_RADIUS, DEFAULT_THRESHOLD)
    }
}

impl ScratchSurface {
    /// Create a surface with the given clear radius and reveal threshold.
    pub fn new(radius: f64, threshold: f64) -> Self {
        Self {
            phase: RevealPhase::Untouched,
            mask: None,
            pointer_down: false,
            radius,
            threshold,
        }
    }

    /// Attach (or re-attach) the backing display surface.
    ///
    /// The mask starts fully occluded. Re-attaching with a different size
    /// restores full occlusion; re-attaching with the same size keeps the
    /// current mask.
    pub fn attach_surface(&mut self, width: u32, height: u32) -> KeepsakeResult<()> {
        if width == 0 || height == 0 {
            return Err(KeepsakeError::surface(
                "scratch surface dimensions must be non-zero",
            ));
        }
        match &self.mask {
            Some(mask) if mask.width == width && mask.height == height => {}
            _ => self.mask = Some(OcclusionMask::new(width, height)),
        }
        Ok(())
    }

    /// Current phase.
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Whether the card has revealed.
    pub fn revealed(&self) -> bool {
        self.phase == RevealPhase::Revealed
    }

    /// Coverage fraction of cleared pixels (0 before a surface is attached).
    pub fn coverage(&self) -> f64 {
        self.mask.as_ref().map_or(0.0, OcclusionMask::coverage)
    }

    /// Pointer pressed: start a stroke and clear at the contact point.
    pub fn pointer_down(&mut self, pos: Point) -> ScratchOutcome {
        self.pointer_down = true;
        self.scratch_batch(&[pos])
    }

    /// Pointer moved while pressed; ignored when the pointer is up.
    pub fn pointer_move(&mut self, pos: Point) -> ScratchOutcome {
        if !self.pointer_down {
            return ScratchOutcome {
                coverage: self.coverage(),
                just_revealed: false,
            };
        }
        self.scratch_batch(&[pos])
    }

    /// Pointer released: end the stroke.
    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
    }

    /// Clear a disk at every position, then recompute coverage once.
    ///
    /// After the reveal fired, further input is ignored until [`Self::reset`].
    pub fn scratch_batch(&mut self, positions: &[Point]) -> ScratchOutcome {
        if self.phase == RevealPhase::Revealed {
            return ScratchOutcome {
                coverage: self.coverage(),
                just_revealed: false,
            };
        }
        let Some(mask) = self.mask.as_mut() else {
            // Missing backing surface: absorb and retry on a later event.
            warn!("scratch input before surface attach; dropped");
            return ScratchOutcome {
                coverage: 0.0,
                just_revealed: false,
            };
        };

        let mut newly = 0;
        for &pos in positions {
            // Non-finite coordinates would alias pixel (0, 0) after the
            // float-to-index casts; drop them like any other bad input.
            if !pos.x.is_finite() || !pos.y.is_finite() {
                warn!(x = pos.x, y = pos.y, "non-finite scratch position dropped");
                continue;
            }
            newly += mask.clear_disk(pos, self.radius);
        }
        if newly > 0 && self.phase == RevealPhase::Untouched {
            self.phase = RevealPhase::InProgress;
        }

        let coverage = mask.coverage();
        let just_revealed = self.phase == RevealPhase::InProgress && coverage > self.threshold;
        if just_revealed {
            self.phase = RevealPhase::Revealed;
            debug!(coverage, "scratch card revealed");
        }
        ScratchOutcome {
            coverage,
            just_revealed,
        }
    }

    /// Restore full occlusion and return to `Untouched`.
    pub fn reset(&mut self) {
        self.phase = RevealPhase::Untouched;
        self.pointer_down = false;
        if let Some(mask) = self.mask.as_mut() {
            mask.restore();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/scratch.rs"]
mod tests;
