use regex::Regex;
use std::sync::LazyLock;

/// Optional edition code, then `MAJOR.MINOR`.
static MAJOR_MINOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]*-?[0-9]+\.[0-9]+").unwrap());

/// Drop the optional patch number from an IDE version.
///
/// `IC-2023.2.1` becomes `IC-2023.2`. Snapshot builds are returned as-is, as is
/// anything that does not look like a version at all (with a warning).
pub fn shorten_version(version: &str) -> &str {
    if version.to_ascii_lowercase().contains("snapshot") {
        return version;
    }

    match MAJOR_MINOR.find(version) {
        Some(m) => m.as_str(),
        None => {
            tracing::warn!("Failed to shorten IDE version {}, keeping it as-is", version);
            version
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("IC-2023.2.1", "IC-2023.2")]
    #[case("IU-2024.1", "IU-2024.1")]
    #[case("2023.2.1", "2023.2")]
    #[case("IC2023.3.4-EAP", "IC2023.3")]
    #[case("2023.2-SNAPSHOT", "2023.2-SNAPSHOT")]
    #[case("IC-233-snapshot", "IC-233-snapshot")]
    #[case("LATEST", "LATEST")]
    fn shortens_ide_versions(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(shorten_version(input), expected);
    }
}
