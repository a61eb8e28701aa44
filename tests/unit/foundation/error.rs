use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KeepsakeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(KeepsakeError::media("x").to_string().contains("media error:"));
    assert!(
        KeepsakeError::surface("x")
            .to_string()
            .contains("surface error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KeepsakeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
