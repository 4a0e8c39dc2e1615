use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// Holds at most one previously resolved version.
pub trait VersionCache {
    /// The cached version, or `None` if nothing usable is cached.
    fn read(&self) -> impl Future<Output = io::Result<Option<String>>> + Send;

    /// Time since the entry was written, or `None` if there is no entry.
    fn age(&self) -> impl Future<Output = io::Result<Option<Duration>>> + Send;

    /// Replace the entry with `version`, stamped with the current time.
    fn write(&self, version: &str) -> impl Future<Output = io::Result<()>> + Send;
}

/// Plain text file holding exactly the version string. The entry's timestamp
/// is the file's modification time.
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");

        self.path.with_file_name(name)
    }
}

fn none_if_missing<T>(result: io::Result<T>) -> io::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

impl VersionCache for FileCache {
    async fn read(&self) -> io::Result<Option<String>> {
        let content = none_if_missing(tokio::fs::read_to_string(&self.path).await)?;

        Ok(content
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty()))
    }

    async fn age(&self) -> io::Result<Option<Duration>> {
        let Some(metadata) = none_if_missing(tokio::fs::metadata(&self.path).await)? else {
            return Ok(None);
        };

        let modified = metadata.modified()?;

        // A timestamp in the future counts as just written.
        Ok(Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or_default(),
        ))
    }

    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    async fn write(&self, version: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let staging = self.staging_path();
        tokio::fs::write(&staging, version).await?;

        if let Err(err) = tokio::fs::rename(&staging, &self.path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(err);
        }

        tracing::debug!("Cached IDE version {}", version);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> FileCache {
        FileCache::new(dir.path().join("latest-version.txt"))
    }

    #[tokio::test]
    async fn missing_file_has_no_entry() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        assert_eq!(cache.read().await.unwrap(), None);
        assert_eq!(cache.age().await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_then_read_returns_version() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.write("2024.1.2").await.unwrap();

        assert_eq!(cache.read().await.unwrap().as_deref(), Some("2024.1.2"));
        let age = cache.age().await.unwrap().unwrap();
        assert!(age < Duration::from_secs(60));
    }

    #[tokio::test]
    async fn write_overwrites_previous_entry() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        cache.write("2023.3.6").await.unwrap();
        cache.write("2024.1.2").await.unwrap();

        assert_eq!(cache.read().await.unwrap().as_deref(), Some("2024.1.2"));
        assert!(!cache.staging_path().exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn write_creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("nested").join("cache.txt"));

        cache.write("2024.1.2").await.unwrap();

        assert_eq!(cache.read().await.unwrap().as_deref(), Some("2024.1.2"));
    }

    #[tokio::test]
    async fn future_modification_time_counts_as_fresh() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        cache.write("2024.1.2").await.unwrap();

        let file = std::fs::File::options().write(true).open(cache.path()).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(24 * 60 * 60))
            .unwrap();

        assert_eq!(cache.age().await.unwrap(), Some(Duration::ZERO));
    }

    #[tokio::test]
    async fn failed_rename_removes_staging_file() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        // A non-empty directory in the way makes the rename fail.
        std::fs::create_dir(cache.path()).unwrap();
        std::fs::write(cache.path().join("occupied"), "x").unwrap();

        assert!(cache.write("2024.1.2").await.is_err());
        assert!(!cache.staging_path().exists());
    }

    #[tokio::test]
    async fn read_trims_and_ignores_blank_content() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        std::fs::write(cache.path(), "2024.1.2\n").unwrap();
        assert_eq!(cache.read().await.unwrap().as_deref(), Some("2024.1.2"));

        std::fs::write(cache.path(), "  \n").unwrap();
        assert_eq!(cache.read().await.unwrap(), None);
    }
}
