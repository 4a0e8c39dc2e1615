use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Stable,
    Unstable,
}

impl fmt::Display for Stability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stability::Stable => f.write_str("stable"),
            Stability::Unstable => f.write_str("unstable"),
        }
    }
}

/// Suffixes marking a release build.
const STABLE_MARKERS: &[&str] = &["RELEASE", "FINAL", "GA"];

/// Pre-release qualifiers, optionally followed by a numeric tail (`beta2`, `rc-1`).
const UNSTABLE_MARKERS: &[&str] = &["alpha", "b", "beta", "rc", "M", "EA", "pr", "atlassian"];

/// Ordered rule table, first match wins.
static RULES: LazyLock<Vec<(Regex, Stability)>> = LazyLock::new(|| {
    let stable = STABLE_MARKERS
        .iter()
        .map(|marker| (format!("(?i){}$", marker), Stability::Stable));

    let unstable = UNSTABLE_MARKERS
        .iter()
        .map(|marker| (format!(r"(?i)[.-]{}[.\d-]*$", marker), Stability::Unstable));

    stable
        .chain(unstable)
        .map(|(pattern, stability)| (Regex::new(&pattern).unwrap(), stability))
        .collect()
});

/// Classify a version string; anything no rule recognizes counts as stable.
pub fn classify(version: &str) -> Stability {
    RULES
        .iter()
        .find(|(pattern, _)| pattern.is_match(version))
        .map(|(_, stability)| *stability)
        .unwrap_or(Stability::Stable)
}

pub fn is_stable_version(version: &str) -> bool {
    classify(version) == Stability::Stable
}
