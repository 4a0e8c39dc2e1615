mod args;
mod cache;
mod config;
mod error;
mod feed;
mod resolver;
mod version;

use clap::Parser as _;
use serde::Serialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use crate::args::{Command, ResolveArgs, ResolverArgs};
use crate::cache::FileCache;
use crate::config::ResolverSettings;
use crate::error::ResolverError;
use crate::feed::JetbrainsUpdateFeed;
use crate::resolver::VersionResolver;
use crate::version::{Edition, VersionSource, classify, is_stable_version, shorten_version};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("IDE_VERSION_RESOLVER_LOG")
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = ResolverArgs::parse();

    let result = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build() {
        Ok(v) => v.block_on(async_main(args)),
        Err(err) => {
            tracing::error!("Failed to create tokio runtime: {:?}", err);
            std::process::exit(1);
        }
    };

    if let Err(err) = result {
        tracing::error!("Error: {}", err);

        let mut src = std::error::Error::source(&err);
        while let Some(err) = src {
            tracing::error!("-> Caused by: {}", err);
            src = err.source();
        }

        std::process::exit(1);
    }
}

async fn async_main(args: ResolverArgs) -> Result<(), ResolverError> {
    tracing::trace!("args = {:#?}", args);

    match args.command {
        Command::Resolve(args) => resolve(args).await,
        Command::Shorten { build } => {
            println!("{}", shorten_version(&build));
            Ok(())
        }
        Command::Classify { versions, stable_only } => {
            for version in &versions {
                if !stable_only {
                    println!("{}\t{}", version, classify(version));
                } else if is_stable_version(version) {
                    println!("{}", version);
                }
            }
            Ok(())
        }
    }
}

async fn resolve(args: ResolveArgs) -> Result<(), ResolverError> {
    let settings = ResolverSettings::from_args(&args).await?;
    tracing::debug!("settings = {:#?}", settings);

    let feed = JetbrainsUpdateFeed::new(settings.feed_url, settings.fetch_timeout)?;
    let cache = FileCache::new(settings.cache_path);
    tracing::debug!("Using cache file {}", cache.path().display());
    let resolver = VersionResolver::new(feed, cache, settings.cache_ttl);

    let resolved = resolver.resolve(&settings.spec).await?;
    let ide_version = resolved.to_string();

    if args.json {
        let report = ResolutionReport {
            requested: settings.spec.to_string(),
            short: shorten_version(&ide_version),
            ide_version: &ide_version,
            version: &resolved.version,
            edition: resolved.edition,
            source: resolved.source,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if args.short {
        println!("{}", shorten_version(&ide_version));
    } else {
        println!("{}", ide_version);
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct ResolutionReport<'a> {
    requested: String,
    ide_version: &'a str,
    short: &'a str,
    version: &'a str,
    edition: Option<Edition>,
    source: VersionSource,
}
