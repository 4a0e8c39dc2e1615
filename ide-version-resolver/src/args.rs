use crate::config::{DEFAULT_FEED_URL, DEFAULT_FETCH_TIMEOUT_SECS};
use crate::version::VersionSpec;
use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use std::path::PathBuf;

/// Resolve the IntelliJ IDEA build a plugin should be built against.
#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct ResolverArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the IDE version to build against.
    Resolve(ResolveArgs),

    /// Print a version without its patch number.
    Shorten { build: String },

    /// Print whether each version is a stable release.
    Classify {
        #[arg(required = true)]
        versions: Vec<String>,

        /// Only print the stable versions, one per line.
        #[arg(long, default_value_t = false)]
        stable_only: bool,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// A pinned version such as IC-2023.2.1, or IC-LATEST-STABLE / IU-LATEST-STABLE.
    #[arg(short, long, env = "IDE_VERSION_RESOLVER_VERSION")]
    pub ide_version: Option<VersionSpec>,

    /// gradle.properties file to read pluginIdeaVersion and
    /// pluginIdeaVersionCacheDurationInHours from.
    #[arg(short, long, env = "IDE_VERSION_RESOLVER_PROPERTIES")]
    pub properties: Option<PathBuf>,

    #[arg(long, env = "IDE_VERSION_RESOLVER_CACHE_TTL_HOURS")]
    pub cache_ttl_hours: Option<u64>,

    #[arg(long, env = "IDE_VERSION_RESOLVER_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    #[arg(long, default_value = DEFAULT_FEED_URL, env = "IDE_VERSION_RESOLVER_FEED_URL")]
    pub feed_url: Url,

    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Print MAJOR.MINOR only, e.g. for naming sandbox directories.
    #[arg(long, default_value_t = false)]
    pub short: bool,

    /// Print a JSON object describing the resolution.
    #[arg(long, default_value_t = false, conflicts_with = "short")]
    pub json: bool,
}
