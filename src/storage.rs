use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::clipboard::{self, Bitmap};
use crate::entry::Entry;
use crate::error::{HistoryError, Result};
use crate::transfer::{self, Segment};

/// Counts reported by [`HistoryStore::import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub added: usize,
    pub skipped_images: usize,
    pub skipped_duplicates: usize,
}

/// Ordered clipboard history backed by a JSON file.
///
/// Every mutation is written through to disk. A failed write is logged and
/// returned, but the in-memory history stays authoritative until the next
/// successful save.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl HistoryStore {
    /// Create an empty store writing to `path`. Does not read the file.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| HistoryError::io(dir, e))?;
        }
        Ok(Self {
            path,
            entries: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory history with the backing file's contents.
    ///
    /// A missing file yields an empty history. Any read or decode failure is
    /// logged, leaves the history empty, and is returned.
    pub fn load(&mut self) -> Result<()> {
        self.entries.clear();

        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("no history at {:?}, starting fresh", self.path);
                return Ok(());
            }
            Err(e) => {
                error!("failed to read history {:?}: {}", self.path, e);
                return Err(HistoryError::io(&self.path, e));
            }
        };

        match serde_json::from_str::<Vec<Entry>>(&data) {
            Ok(entries) => {
                info!("loaded {} entries from {:?}", entries.len(), self.path);
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                error!(
                    "invalid history document {:?}, starting empty: {}",
                    self.path, e
                );
                Err(HistoryError::Decode {
                    path: self.path.clone(),
                    source: e,
                })
            }
        }
    }

    /// Overwrite the backing file with the full history.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            error!("failed to encode history: {}", e);
            HistoryError::Encode(e)
        })?;
        fs::write(&self.path, json).map_err(|e| {
            error!("failed to save history to {:?}: {}", self.path, e);
            HistoryError::io(&self.path, e)
        })?;
        debug!("saved {} entries to {:?}", self.entries.len(), self.path);
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Append an entry and save. No duplicate check happens here; callers
    /// that care use [`HistoryStore::is_duplicate`] first.
    pub fn add(&mut self, entry: Entry) -> Result<()> {
        self.entries.push(entry);
        self.save()
    }

    /// Remove and return the entry at `index`, then save.
    pub fn delete(&mut self, index: usize) -> Result<Entry> {
        if index >= self.entries.len() {
            warn!(
                "invalid index {} (history has {} entries), nothing deleted",
                index,
                self.entries.len()
            );
            return Err(HistoryError::IndexOutOfRange {
                index: index as i64,
                len: self.entries.len(),
            });
        }
        let removed = self.entries.remove(index);
        self.save()?;
        Ok(removed)
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// True if an entry of the same kind with identical content exists.
    pub fn is_duplicate(&self, candidate: &Entry) -> bool {
        self.entries.iter().any(|entry| entry == candidate)
    }

    /// Encode `bitmap` as PNG and add it unless an identical image is already
    /// stored. Returns whether the image was added.
    pub fn add_image(&mut self, bitmap: &Bitmap) -> Result<bool> {
        let png = clipboard::encode_png(bitmap).map_err(|e| {
            error!("failed to encode clipboard image: {:#}", e);
            HistoryError::Image(format!("{:#}", e))
        })?;
        let entry = Entry::Image(png);
        if self.is_duplicate(&entry) {
            debug!("duplicate image not added");
            return Ok(false);
        }
        self.add(entry)?;
        Ok(true)
    }

    /// Remove every entry and save.
    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        self.save()
    }

    /// Write the history as delimited plain text to `path`.
    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, transfer::render(&self.entries)).map_err(|e| {
            error!("failed to export history to {:?}: {}", path, e);
            HistoryError::io(path, e)
        })?;
        info!("exported {} entries to {:?}", self.entries.len(), path);
        Ok(())
    }

    /// Read a delimited plain-text file and add its text entries that are
    /// not already present. Image placeholders are skipped.
    ///
    /// All new entries are kept in memory before the single save, so a failed
    /// save still leaves the whole import in the history.
    pub fn import(&mut self, path: impl AsRef<Path>) -> Result<ImportSummary> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| {
            error!("failed to import history from {:?}: {}", path, e);
            HistoryError::io(path, e)
        })?;

        let mut summary = ImportSummary::default();
        for segment in transfer::parse(&text) {
            let entry = match segment {
                Segment::ImagePlaceholder => {
                    summary.skipped_images += 1;
                    continue;
                }
                Segment::Text(text) => Entry::Text(text),
            };
            if self.is_duplicate(&entry) {
                summary.skipped_duplicates += 1;
                continue;
            }
            self.entries.push(entry);
            summary.added += 1;
        }

        if summary.added > 0 {
            self.save()?;
        }

        info!(
            "imported {} entries from {:?} ({} images skipped, {} duplicates skipped)",
            summary.added, path, summary.skipped_images, summary.skipped_duplicates
        );
        Ok(summary)
    }
}
