//! Client package version lookup.

/// Version of the installed client, or `None` when the build carries no
/// version metadata. Never fails.
pub fn client_version() -> Option<&'static str> {
    option_env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_present_and_semver_shaped() {
        let version = client_version().expect("cargo always sets the package version");
        assert!(version.split('.').count() >= 3);
    }
}
