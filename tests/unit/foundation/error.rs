use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        SkylineError::config("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        SkylineError::font_load("x")
            .to_string()
            .contains("font load error:")
    );
    assert!(
        SkylineError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        SkylineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = SkylineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
