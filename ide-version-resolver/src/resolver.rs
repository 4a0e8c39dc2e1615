use crate::cache::VersionCache;
use crate::error::{FetchError, ResolverError};
use crate::feed::UpdateFeed;
use crate::version::{Edition, ResolvedVersion, VersionSource, VersionSpec};
use std::time::{Duration, Instant};

pub struct VersionResolver<F, C> {
    feed: F,
    cache: C,
    cache_ttl: Duration,
}

impl<F, C> VersionResolver<F, C>
where
    F: UpdateFeed,
    C: VersionCache,
{
    pub fn new(feed: F, cache: C, cache_ttl: Duration) -> Self {
        Self {
            feed,
            cache,
            cache_ttl,
        }
    }

    /// Turn a version spec into a concrete IDE version.
    ///
    /// Literals are returned without touching the cache or the network. For
    /// latest-stable requests a fresh cache entry wins, then the update feed,
    /// then a stale cache entry. Only a failed fetch with nothing cached is an
    /// error.
    pub async fn resolve(&self, spec: &VersionSpec) -> Result<ResolvedVersion, ResolverError> {
        let edition = match spec {
            VersionSpec::Literal(version) => return Ok(ResolvedVersion::literal(version.clone())),
            VersionSpec::LatestStable(edition) => *edition,
        };

        let started = Instant::now();
        let resolved = self.resolve_latest_stable(edition).await;
        tracing::debug!("Operation took {} ms", started.elapsed().as_millis());

        let (version, source) = resolved?;
        Ok(ResolvedVersion::latest_stable(edition, version, source))
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_latest_stable(
        &self,
        edition: Edition,
    ) -> Result<(String, VersionSource), ResolverError> {
        if let Some(version) = self.fresh_cached_version().await {
            return Ok((version, VersionSource::Cache));
        }

        match self.feed.latest_stable(edition).await {
            Ok(version) => {
                if let Err(err) = self.cache.write(&version).await {
                    tracing::warn!("Failed to update cached IDE version: {}", err);
                }

                Ok((version, VersionSource::Remote))
            }
            Err(err) => self.fall_back_to_cache(err).await,
        }
    }

    /// The cached version if it is younger than the TTL.
    async fn fresh_cached_version(&self) -> Option<String> {
        let age = match self.cache.age().await {
            Ok(Some(age)) => age,
            Ok(None) => {
                tracing::info!("No cached IDE version, asking the update feed");
                return None;
            }
            Err(err) => {
                tracing::warn!("Failed to inspect cached IDE version: {}", err);
                return None;
            }
        };

        if age > self.cache_ttl {
            tracing::info!(
                "Cache expired ({} s old), asking the update feed",
                age.as_secs()
            );
            return None;
        }

        let version = self.read_cached_version().await;
        if let Some(version) = &version {
            tracing::info!("Using cached IDE version {}", version);
        }

        version
    }

    async fn fall_back_to_cache(
        &self,
        err: FetchError,
    ) -> Result<(String, VersionSource), ResolverError> {
        match self.read_cached_version().await {
            Some(version) => {
                tracing::warn!(
                    "Error: {}. Will use cached IDE version {} instead",
                    err,
                    version
                );
                Ok((version, VersionSource::StaleCache))
            }
            None => Err(ResolverError::CacheMiss(err)),
        }
    }

    async fn read_cached_version(&self) -> Option<String> {
        match self.cache.read().await {
            Ok(version) => version,
            Err(err) => {
                tracing::debug!("Failed to read cached IDE version: {}", err);
                None
            }
        }
    }
}
