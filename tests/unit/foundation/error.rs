use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        StereoError::missing_input("x")
            .to_string()
            .contains("missing input:")
    );
    assert!(
        StereoError::invalid_parameter("x")
            .to_string()
            .contains("invalid parameter:")
    );
    assert!(
        StereoError::geometry("x")
            .to_string()
            .contains("geometry violation:")
    );
    assert!(
        StereoError::encoding("x")
            .to_string()
            .contains("encoding failure:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StereoError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
