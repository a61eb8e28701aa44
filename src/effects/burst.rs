use kurbo::Point;
use smallvec::SmallVec;

use crate::foundation::math::Rng64;

/// Particle color in sRGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Palette constants used by the default storyboard.
pub mod palette {
    use super::Rgb;

    /// Gold.
    pub const GOLD: Rgb = Rgb::new(0xFF, 0xD7, 0x00);
    /// Hot pink.
    pub const HOT_PINK: Rgb = Rgb::new(0xFF, 0x69, 0xB4);
    /// Plum.
    pub const PLUM: Rgb = Rgb::new(0xDD, 0xA0, 0xDD);
    /// Orange.
    pub const ORANGE: Rgb = Rgb::new(0xFF, 0xA5, 0x00);
    /// Deep pink.
    pub const DEEP_PINK: Rgb = Rgb::new(0xFF, 0x14, 0x93);
    /// Green.
    pub const GREEN: Rgb = Rgb::new(0x00, 0xFF, 0x00);
    /// Red.
    pub const RED: Rgb = Rgb::new(0xFF, 0x00, 0x00);
}

/// Particle shape; the heart override is used for one burst only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BurstShape {
    /// Regular confetti rectangles.
    #[default]
    Confetti,
    /// Heart-shaped particles.
    Heart,
}

/// Parameters for one fire-and-forget particle burst.
///
/// Origins are normalized viewport coordinates; everything else matches the
/// host particle system's knobs one-to-one. The engine never reads anything
/// back from an emission.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BurstSpec {
    /// Burst origin in normalized `[0, 1]` viewport coordinates.
    pub origin: Point,
    /// Launch angle in degrees (90 is straight up).
    pub angle_deg: f64,
    /// Angular spread in degrees.
    pub spread_deg: f64,
    /// Particles emitted by this burst.
    pub particle_count: u32,
    /// Color palette sampled per particle.
    pub colors: SmallVec<[Rgb; 5]>,
    /// Particle size multiplier.
    pub scalar: f64,
    /// Downward acceleration multiplier.
    pub gravity: f64,
    /// Horizontal drift.
    pub drift: f64,
    /// Particle shape.
    pub shape: BurstShape,
}

impl BurstSpec {
    fn base(origin: Point, angle_deg: f64, spread_deg: f64, particle_count: u32) -> Self {
        Self {
            origin,
            angle_deg,
            spread_deg,
            particle_count,
            colors: SmallVec::new(),
            scalar: 1.0,
            gravity: 1.0,
            drift: 0.0,
            shape: BurstShape::Confetti,
        }
    }

    /// Apply deterministic per-tick jitter to the origin height.
    ///
    /// Jitter is a pure function of `seed`, so a burst run replays
    /// identically for the same storyboard seed and tick schedule.
    pub fn jittered(&self, seed: u64) -> Self {
        let mut rng = Rng64::new(seed);
        let mut spec = self.clone();
        spec.origin.y = (spec.origin.y + rng.next_f64_signed() * 0.05).clamp(0.0, 1.0);
        spec
    }
}

/// A left/right pair of confetti cannons, one tick's worth.
///
/// The left cannon fires at 60° from the left edge, the right cannon at
/// 120° from the right edge.
pub fn side_cannons(
    particles_per_tick: u32,
    spread_deg: f64,
    origin_y: f64,
    colors: &[Rgb],
) -> [BurstSpec; 2] {
    let mut left = BurstSpec::base(Point::new(0.0, origin_y), 60.0, spread_deg, particles_per_tick);
    left.colors = SmallVec::from_slice(colors);
    let mut right = left.clone();
    right.origin = Point::new(1.0, origin_y);
    right.angle_deg = 120.0;
    [left, right]
}

/// Celebration palette used by the cut and final-wish cannons.
pub fn celebration_colors() -> SmallVec<[Rgb; 5]> {
    SmallVec::from_slice(&[
        palette::GOLD,
        palette::HOT_PINK,
        palette::PLUM,
        palette::ORANGE,
        palette::DEEP_PINK,
    ])
}

/// Softer palette used by the cake ambience cannons.
pub fn ambience_colors() -> SmallVec<[Rgb; 5]> {
    SmallVec::from_slice(&[
        palette::GOLD,
        palette::HOT_PINK,
        palette::PLUM,
        palette::ORANGE,
    ])
}

/// One-shot burst fired when the scratch card reveals.
pub fn scratch_celebration() -> BurstSpec {
    let mut spec = BurstSpec::base(Point::new(0.5, 0.6), 90.0, 70.0, 150);
    spec.colors = SmallVec::from_slice(&[
        palette::GOLD,
        palette::HOT_PINK,
        palette::GREEN,
        palette::RED,
    ]);
    spec
}

/// One-shot heart-shaped burst fired during the final wish.
pub fn heart_burst() -> BurstSpec {
    let mut spec = BurstSpec::base(Point::new(0.5, 0.5), 90.0, 100.0, 50);
    spec.colors = SmallVec::from_slice(&[palette::DEEP_PINK, palette::HOT_PINK]);
    spec.scalar = 2.0;
    spec.gravity = 0.5;
    spec.drift = 1.0;
    spec.shape = BurstShape::Heart;
    spec
}

#[cfg(test)]
#[path = "../../tests/unit/effects/burst.rs"]
mod tests;
