use std::{
    io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use async_trait::async_trait;
use parking_lot::Mutex;

/// Durable location for the serialized label map.
///
/// `read` and `write` are awaited on the background runtime. `write_blocking`
/// is called from the blocking pool for debounced saves and from the
/// caller's thread for the shutdown flush.
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Full contents, or `None` if nothing has been stored yet.
    async fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replace the stored contents.
    async fn write(&self, bytes: Vec<u8>) -> io::Result<()>;

    /// Replace the stored contents, blocking the calling thread.
    fn write_blocking(&self, bytes: &[u8]) -> io::Result<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Single JSON file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn write(&self, bytes: Vec<u8>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, bytes).await
    }

    fn write_blocking(&self, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, bytes)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Process-local storage, for ephemeral stores and tests.
///
/// Counts writes and can be told to fail them.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: Mutex<Option<Vec<u8>>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with `content`.
    pub fn with_content(content: impl Into<Vec<u8>>) -> Self {
        let s = Self::default();
        *s.data.lock() = Some(content.into());
        s
    }

    /// Current contents as UTF-8, if any.
    pub fn contents(&self) -> Option<String> {
        self.data
            .lock()
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Number of successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Acquire)
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Release);
    }

    fn store(&self, bytes: Vec<u8>) -> io::Result<()> {
        if self.fail_writes.load(Ordering::Acquire) {
            return Err(io::Error::other("write rejected"));
        }
        *self.data.lock() = Some(bytes);
        self.writes.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.data.lock().clone())
    }

    async fn write(&self, bytes: Vec<u8>) -> io::Result<()> {
        self.store(bytes)
    }

    fn write_blocking(&self, bytes: &[u8]) -> io::Result<()> {
        self.store(bytes.to_vec())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("pronouns.json"));
        assert!(storage.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data/plugin/pronouns.json"));
        storage.write(b"{}".to_vec()).await.unwrap();
        assert_eq!(storage.read().await.unwrap().as_deref(), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn memory_storage_counts_and_fails_writes() {
        let storage = MemoryStorage::new();
        assert!(storage.read().await.unwrap().is_none());

        storage.write_blocking(b"{}").unwrap();
        assert_eq!(storage.writes(), 1);

        storage.set_fail_writes(true);
        assert!(storage.write(b"x".to_vec()).await.is_err());
        assert_eq!(storage.writes(), 1);
        assert_eq!(storage.contents().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn blocking_write_is_visible_to_async_read() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("pronouns.json"));
        storage.write_blocking(br#"{"a":"b"}"#).unwrap();
        assert_eq!(
            storage.read().await.unwrap().as_deref(),
            Some(&br#"{"a":"b"}"#[..])
        );
    }
}
