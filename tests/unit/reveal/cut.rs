use super::*;

#[test]
fn cut_is_one_shot() {
    let mut surface = CutSurface::new();
    assert_eq!(surface.phase(), RevealPhase::Untouched);
    assert!(!surface.revealed());

    assert!(surface.cut());
    assert_eq!(surface.phase(), RevealPhase::Revealed);

    // Repeat cuts are rejected silently.
    assert!(!surface.cut());
    assert!(!surface.cut());
    assert!(surface.revealed());
}

#[test]
fn reset_allows_a_fresh_cut() {
    let mut surface = CutSurface::new();
    surface.cut();
    surface.reset();

    assert_eq!(surface.phase(), RevealPhase::Untouched);
    assert!(surface.cut());
}
