use crate::args::ResolveArgs;
use crate::error::ResolverError;
use crate::version::VersionSpec;
use reqwest::Url;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://www.jetbrains.com/updates/updates.xml";

pub const DEFAULT_CACHE_TTL_HOURS: u64 = 24;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Cache file name inside the system temporary directory.
pub const CACHE_FILE_NAME: &str = "jle-ij-latest-version.txt";

pub const VERSION_PROPERTY: &str = "pluginIdeaVersion";

pub const CACHE_TTL_PROPERTY: &str = "pluginIdeaVersionCacheDurationInHours";

pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(CACHE_FILE_NAME)
}

/// Key/value pairs from a `gradle.properties` style file.
///
/// Only single-line `key=value` and `key: value` entries are understood;
/// `#` and `!` start comment lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    entries: HashMap<String, String>,
}

impl BuildProperties {
    pub fn parse(text: &str) -> Self {
        let entries = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(['#', '!']))
            .filter_map(|line| {
                let (key, value) = line.split_once(['=', ':'])?;
                Some((key.trim().to_owned(), value.trim().to_owned()))
            })
            .collect();

        Self { entries }
    }

    #[tracing::instrument]
    pub async fn load(path: &Path) -> Result<Self, ResolverError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|e| {
            tracing::error!("Failed to read properties file {}: {}", path.display(), e);
            e
        })?;

        Ok(Self::parse(&text))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    fn version_spec(&self) -> Result<Option<VersionSpec>, ResolverError> {
        self.get(VERSION_PROPERTY).map(str::parse).transpose()
    }

    fn cache_ttl_hours(&self) -> Result<Option<u64>, ResolverError> {
        self.get(CACHE_TTL_PROPERTY)
            .map(|value| {
                value.parse().map_err(|_| ResolverError::InvalidProperty {
                    key: CACHE_TTL_PROPERTY.to_owned(),
                    value: value.to_owned(),
                })
            })
            .transpose()
    }
}

/// Everything a resolution needs, after merging flags, environment and the
/// properties file.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub spec: VersionSpec,
    pub cache_ttl: Duration,
    pub cache_path: PathBuf,
    pub feed_url: Url,
    pub fetch_timeout: Duration,
}

impl ResolverSettings {
    pub async fn from_args(args: &ResolveArgs) -> Result<Self, ResolverError> {
        let properties = match &args.properties {
            Some(path) => BuildProperties::load(path).await?,
            None => BuildProperties::default(),
        };

        Self::merge(args, &properties)
    }

    /// Flags and environment win over the properties file, which wins over
    /// the defaults.
    pub fn merge(args: &ResolveArgs, properties: &BuildProperties) -> Result<Self, ResolverError> {
        let spec = match &args.ide_version {
            Some(spec) => spec.clone(),
            None => properties
                .version_spec()?
                .ok_or(ResolverError::MissingVersionSpec)?,
        };

        let cache_ttl_hours = match args.cache_ttl_hours {
            Some(hours) => hours,
            None => properties
                .cache_ttl_hours()?
                .unwrap_or(DEFAULT_CACHE_TTL_HOURS),
        };

        Ok(Self {
            spec,
            cache_ttl: Duration::from_secs(cache_ttl_hours.saturating_mul(60 * 60)),
            cache_path: args.cache_file.clone().unwrap_or_else(default_cache_path),
            feed_url: args.feed_url.clone(),
            fetch_timeout: Duration::from_secs(args.timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ResolverArgs;
    use crate::args::Command;
    use crate::version::Edition;
    use clap::Parser as _;

    fn resolve_args(extra: &[&str]) -> ResolveArgs {
        let argv = ["ide-version-resolver", "resolve"].into_iter().chain(extra.iter().copied());
        match ResolverArgs::try_parse_from(argv).unwrap().command {
            Command::Resolve(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    const GRADLE_PROPERTIES: &str = r#"
# IntelliJ Platform
pluginIdeaVersion=IU-LATEST-STABLE
pluginIdeaVersionCacheDurationInHours = 12
! legacy comment
pluginJavaVersion: 17
org.gradle.jvmargs=-Xmx2g -Dfile.encoding=UTF-8
"#;

    #[test]
    fn parses_gradle_properties() {
        let properties = BuildProperties::parse(GRADLE_PROPERTIES);

        assert_eq!(properties.get(VERSION_PROPERTY), Some("IU-LATEST-STABLE"));
        assert_eq!(properties.get(CACHE_TTL_PROPERTY), Some("12"));
        assert_eq!(properties.get("pluginJavaVersion"), Some("17"));
        assert_eq!(
            properties.get("org.gradle.jvmargs"),
            Some("-Xmx2g -Dfile.encoding=UTF-8")
        );
        assert_eq!(properties.get("# IntelliJ Platform"), None);
    }

    #[test]
    fn properties_fill_in_missing_flags() {
        let args = resolve_args(&[]);
        let properties = BuildProperties::parse(GRADLE_PROPERTIES);

        let settings = ResolverSettings::merge(&args, &properties).unwrap();

        assert_eq!(settings.spec, VersionSpec::LatestStable(Edition::Ultimate));
        assert_eq!(settings.cache_ttl, Duration::from_secs(12 * 60 * 60));
        assert_eq!(settings.fetch_timeout, Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));
        assert_eq!(settings.feed_url.as_str(), DEFAULT_FEED_URL);
    }

    #[test]
    fn flags_override_properties() {
        let args = resolve_args(&["--ide-version", "IC-2023.2.1", "--cache-ttl-hours", "1"]);
        let properties = BuildProperties::parse(GRADLE_PROPERTIES);

        let settings = ResolverSettings::merge(&args, &properties).unwrap();

        assert_eq!(settings.spec, VersionSpec::Literal("IC-2023.2.1".to_owned()));
        assert_eq!(settings.cache_ttl, Duration::from_secs(60 * 60));
    }

    #[test]
    fn defaults_apply_without_properties() {
        let args = resolve_args(&["--ide-version", "IC-LATEST-STABLE"]);

        let settings = ResolverSettings::merge(&args, &BuildProperties::default()).unwrap();

        assert_eq!(settings.cache_ttl, Duration::from_secs(24 * 60 * 60));
        assert_eq!(settings.cache_path, default_cache_path());
    }

    #[test]
    fn missing_version_is_an_error() {
        let args = resolve_args(&[]);

        let result = ResolverSettings::merge(&args, &BuildProperties::default());
        assert!(matches!(result, Err(ResolverError::MissingVersionSpec)));
    }

    #[test]
    fn invalid_ttl_property_is_an_error() {
        let args = resolve_args(&["--ide-version", "IC-LATEST-STABLE"]);
        let properties = BuildProperties::parse("pluginIdeaVersionCacheDurationInHours=soon");

        let result = ResolverSettings::merge(&args, &properties);
        assert!(matches!(
            result,
            Err(ResolverError::InvalidProperty { value, .. }) if value == "soon"
        ));
    }

    #[tokio::test]
    async fn loads_properties_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gradle.properties");
        std::fs::write(&path, GRADLE_PROPERTIES).unwrap();

        let properties = BuildProperties::load(&path).await.unwrap();
        assert_eq!(properties.get(VERSION_PROPERTY), Some("IU-LATEST-STABLE"));
    }
}
