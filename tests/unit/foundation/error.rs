use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(ForgeError::decode("x").to_string().contains("decode error:"));
    assert!(
        ForgeError::source_decode("x")
            .to_string()
            .contains("source decode error:")
    );
    assert!(
        ForgeError::layer_decode("x")
            .to_string()
            .contains("layer decode error:")
    );
    assert!(ForgeError::no_content("x").to_string().contains("no content:"));
    assert!(
        ForgeError::pixel_read("x")
            .to_string()
            .contains("pixel read error:")
    );
    assert!(ForgeError::archive("x").to_string().contains("archive error:"));
    assert!(
        ForgeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        ForgeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ForgeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_source_decode_and_archive_are_fatal() {
    assert!(ForgeError::source_decode("x").is_fatal());
    assert!(ForgeError::archive("x").is_fatal());
    assert!(!ForgeError::layer_decode("x").is_fatal());
    assert!(!ForgeError::no_content("x").is_fatal());
    assert!(!ForgeError::decode("x").is_fatal());
}
