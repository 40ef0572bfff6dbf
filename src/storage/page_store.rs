//! Persistence for sealed pages
//!
//! Sealed pages are keyed by page number alone. A page is written once when
//! its buffer seals and only ever read afterwards. File handles live for a
//! single read or write.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::errors::{StorageError, StorageResult};
use super::page::Page;
use crate::observability::{log_event_with_fields, Event};

/// Keyed storage for sealed pages.
pub trait PageStore {
    /// Persists a sealed page under its page number.
    fn write_page(&mut self, page: &Page) -> StorageResult<()>;

    /// Loads and verifies the page numbered `page_no`.
    fn read_page(&self, page_no: u64) -> StorageResult<Page>;
}

/// Page store backed by one file per page in a spill directory.
///
/// Pages live at `<dir>/page_<n>.sorp`. A store created by
/// [`FilePageStore::temporary`] owns its directory and removes it on drop
/// unless [`FilePageStore::keep`] was called.
#[derive(Debug)]
pub struct FilePageStore {
    dir: PathBuf,
    owned: bool,
}

impl FilePageStore {
    /// Uses `dir` as the spill directory, creating it if missing.
    ///
    /// The directory is never removed by the store.
    pub fn create(dir: &Path) -> StorageResult<Self> {
        fs::create_dir_all(dir).map_err(|e| {
            StorageError::page_io(
                format!("Failed to create page directory: {}", dir.display()),
                e,
            )
        })?;

        Ok(Self {
            dir: dir.to_path_buf(),
            owned: false,
        })
    }

    /// Creates a fresh `sorer-<uuid>` spill directory under the system
    /// temp dir, owned by this store.
    pub fn temporary() -> StorageResult<Self> {
        let dir = std::env::temp_dir().join(format!("sorer-{}", Uuid::new_v4()));
        let mut store = Self::create(&dir)?;
        store.owned = true;
        log_event_with_fields(
            Event::SpillDirCreated,
            &[("dir", &dir.display().to_string())],
        );
        Ok(store)
    }

    /// Disowns the spill directory so it survives the store.
    pub fn keep(&mut self) {
        self.owned = false;
    }

    /// Returns the spill directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding page `page_no`
    pub fn page_path(&self, page_no: u64) -> PathBuf {
        self.dir.join(format!("page_{}.sorp", page_no))
    }
}

impl PageStore for FilePageStore {
    fn write_page(&mut self, page: &Page) -> StorageResult<()> {
        let path = self.page_path(page.page_no());
        let encoded = page.encode();

        let mut file = File::create(&path).map_err(|e| {
            StorageError::page_io(format!("Failed to create page file: {}", path.display()), e)
        })?;
        file.write_all(&encoded).map_err(|e| {
            StorageError::page_io(format!("Failed to write page file: {}", path.display()), e)
        })?;
        file.flush().map_err(|e| {
            StorageError::page_io(format!("Failed to flush page file: {}", path.display()), e)
        })?;

        Ok(())
    }

    fn read_page(&self, page_no: u64) -> StorageResult<Page> {
        let path = self.page_path(page_no);

        let mut data = Vec::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_end(&mut data))
            .map_err(|e| {
                StorageError::page_io(format!("Failed to read page file: {}", path.display()), e)
            })?;

        Page::decode(page_no, &data)
    }
}

impl Drop for FilePageStore {
    fn drop(&mut self) {
        if self.owned && fs::remove_dir_all(&self.dir).is_ok() {
            log_event_with_fields(
                Event::SpillDirRemoved,
                &[("dir", &self.dir.display().to_string())],
            );
        }
    }
}

/// In-memory page store holding encoded pages.
///
/// Pages still go through encode/decode so checksum verification is
/// exercised exactly as on disk.
#[derive(Debug, Default)]
pub struct MemoryPageStore {
    pages: HashMap<u64, Vec<u8>>,
}

impl MemoryPageStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages written
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns whether no page was written
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Mutable access to an encoded page, for corruption tests
    #[cfg(test)]
    pub(crate) fn raw_page_mut(&mut self, page_no: u64) -> Option<&mut Vec<u8>> {
        self.pages.get_mut(&page_no)
    }
}

impl PageStore for MemoryPageStore {
    fn write_page(&mut self, page: &Page) -> StorageResult<()> {
        self.pages.insert(page.page_no(), page.encode());
        Ok(())
    }

    fn read_page(&self, page_no: u64) -> StorageResult<Page> {
        let data = self.pages.get(&page_no).ok_or_else(|| {
            StorageError::page_io_no_source(format!("Page {} was never written", page_no))
        })?;
        Page::decode(page_no, data)
    }
}
