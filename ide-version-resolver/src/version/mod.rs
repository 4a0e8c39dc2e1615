mod shorten;
mod stability;

pub use shorten::shorten_version;
pub use stability::{classify, is_stable_version};

use crate::error::ResolverError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Name of the product node in the update feed.
pub const IDEA_PRODUCT_NAME: &str = "IntelliJ IDEA";

/// Channel both editions are released on.
pub const IDEA_RELEASE_CHANNEL: &str = "IC-IU-RELEASE-licensing-RELEASE";

const LATEST_STABLE_SUFFIX: &str = "-LATEST-STABLE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Edition {
    #[serde(rename = "IC")]
    Community,
    #[serde(rename = "IU")]
    Ultimate,
}

impl Edition {
    pub fn code(self) -> &'static str {
        match self {
            Edition::Community => "IC",
            Edition::Ultimate => "IU",
        }
    }

    pub fn product_name(self) -> &'static str {
        IDEA_PRODUCT_NAME
    }

    pub fn release_channel(self) -> &'static str {
        IDEA_RELEASE_CHANNEL
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "IC" => Some(Edition::Community),
            "IU" => Some(Edition::Ultimate),
            _ => None,
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Which IDE build to target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSpec {
    /// A pinned build identifier such as `IC-2023.2.1`, used as-is.
    Literal(String),

    /// The latest stable release of an edition, written `IC-LATEST-STABLE`.
    LatestStable(Edition),
}

impl FromStr for VersionSpec {
    type Err = ResolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(ResolverError::EmptyVersionSpec);
        }

        // Surrounding whitespace is ignored when matching tokens only;
        // literals are kept verbatim.
        let latest = token
            .strip_suffix(LATEST_STABLE_SUFFIX)
            .and_then(Edition::from_code)
            .map(VersionSpec::LatestStable);

        Ok(latest.unwrap_or_else(|| VersionSpec::Literal(s.to_owned())))
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSpec::Literal(version) => f.write_str(version),
            VersionSpec::LatestStable(edition) => write!(f, "{}{}", edition, LATEST_STABLE_SUFFIX),
        }
    }
}

/// Where a resolved version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VersionSource {
    Literal,
    Cache,
    Remote,
    StaleCache,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub edition: Option<Edition>,
    pub version: String,
    pub source: VersionSource,
}

impl ResolvedVersion {
    pub fn literal(version: impl Into<String>) -> Self {
        Self {
            edition: None,
            version: version.into(),
            source: VersionSource::Literal,
        }
    }

    pub fn latest_stable(edition: Edition, version: String, source: VersionSource) -> Self {
        Self {
            edition: Some(edition),
            version,
            source,
        }
    }
}

/// Prints the build identifier the IDE tooling expects, e.g. `IU-2024.1.2`.
impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.edition {
            Some(edition) => write!(f, "{}-{}", edition, self.version),
            None => f.write_str(&self.version),
        }
    }
}
