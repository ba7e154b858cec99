// NerView - app/history.rs
//
// Bounded history of past analyses, persisted in a single named slot.
//
// Design principles:
// - The list is newest-first and never longer than HISTORY_CAPACITY after a
//   mutation; the tail (oldest) record is evicted first.
// - Reads never fail. A missing or corrupt slot is an empty history.
// - Writes serialise the whole list before touching the slot, and the file
//   slot commits via temp-file + rename, so a failed write leaves the
//   previous history intact.
// - Read-modify-write is not atomic across processes; one writer is assumed.
// - Two record shapes exist in older data. Only `{id, text, results, date}`
//   is written; the legacy `{id, timestamp, text, fullText, results,
//   entitiesCount}` shape is normalised on read.

use crate::core::model::{iso_timestamp, AnalysisResult, HistoryRecord};
use crate::util::constants::{HISTORY_CAPACITY, HISTORY_FILE_NAME};
use crate::util::error::HistoryError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};

// =============================================================================
// Slots
// =============================================================================

/// Storage backing a history list: one string value that may be absent.
pub trait HistorySlot {
    /// Current slot contents, or `None` if the slot is empty or unreadable.
    fn read(&self) -> Option<String>;

    /// Replace the slot contents. On error the previous contents must remain.
    fn write(&mut self, contents: &str) -> Result<(), HistoryError>;

    /// Remove the slot entirely.
    fn remove(&mut self) -> Result<(), HistoryError>;
}

/// History slot stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Slot at the standard file name inside `data_dir`.
    pub fn in_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(HISTORY_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySlot for FileSlot {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| {
                // "Not found" is the normal first-run case.
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::debug!(path = %self.path.display(), error = %e, "Cannot read history file");
                }
            })
            .ok()
    }

    fn write(&mut self, contents: &str) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| HistoryError::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        // Atomic write: a crash or full disk between write and rename loses
        // the new list but never truncates the old one.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents.as_bytes()).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            HistoryError::Write {
                path: tmp.clone(),
                source: e,
            }
        })?;

        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            HistoryError::Write {
                path: self.path.clone(),
                source: e,
            }
        })?;

        tracing::debug!(path = %self.path.display(), bytes = contents.len(), "History saved");
        Ok(())
    }

    fn remove(&mut self) -> Result<(), HistoryError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HistoryError::Remove {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// In-memory slot for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    fail_writes: bool,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with raw contents.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            value: Some(contents.into()),
            fail_writes: false,
        }
    }

    /// Make every subsequent write fail, as a full storage quota would.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Raw slot contents.
    pub fn contents(&self) -> Option<&str> {
        self.value.as_deref()
    }

    fn refuse(&self) -> Option<HistoryError> {
        self.fail_writes.then(|| HistoryError::Write {
            path: PathBuf::from("<memory>"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "storage quota exceeded"),
        })
    }
}

impl HistorySlot for MemorySlot {
    fn read(&self) -> Option<String> {
        self.value.clone()
    }

    fn write(&mut self, contents: &str) -> Result<(), HistoryError> {
        if let Some(err) = self.refuse() {
            return Err(err);
        }
        self.value = Some(contents.to_owned());
        Ok(())
    }

    fn remove(&mut self) -> Result<(), HistoryError> {
        if let Some(err) = self.refuse() {
            return Err(err);
        }
        self.value = None;
        Ok(())
    }
}

// =============================================================================
// Stored record shapes
// =============================================================================

/// Ids were numbers (epoch ms) in legacy data and strings since.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredId {
    Text(String),
    Number(serde_json::Number),
}

impl StoredId {
    fn into_string(self) -> String {
        match self {
            StoredId::Text(s) => s,
            StoredId::Number(n) => n.to_string(),
        }
    }
}

/// Union of both record shapes found in the slot.
#[derive(Debug, Deserialize)]
struct StoredRecord {
    id: StoredId,
    #[serde(default)]
    text: Option<String>,
    #[serde(default, rename = "fullText")]
    full_text: Option<String>,
    results: AnalysisResult,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl From<StoredRecord> for HistoryRecord {
    fn from(stored: StoredRecord) -> Self {
        HistoryRecord {
            id: stored.id.into_string(),
            // Legacy `text` was truncated for display; `fullText` is the input.
            text: stored.full_text.or(stored.text).unwrap_or_default(),
            results: stored.results,
            date: stored.date.or(stored.timestamp).unwrap_or_default(),
        }
    }
}

/// Parse slot contents, tolerating corruption.
fn parse_slot(contents: &str) -> Vec<HistoryRecord> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(contents) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "History slot is malformed; treating as empty");
            return Vec::new();
        }
    };

    let total = values.len();
    let records: Vec<HistoryRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<StoredRecord>(value) {
            Ok(stored) => Some(stored.into()),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable history record");
                None
            }
        })
        .collect();

    if records.len() < total {
        tracing::debug!(kept = records.len(), total, "History loaded with skipped records");
    }
    records
}

// =============================================================================
// Record creation
// =============================================================================

static LAST_RECORD_ID: AtomicI64 = AtomicI64::new(0);

/// Next record id: the epoch-millisecond time, bumped so ids handed out by
/// this process are strictly increasing even within one millisecond.
fn next_record_id(now_ms: i64) -> i64 {
    let mut current = LAST_RECORD_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now_ms.max(current + 1);
        match LAST_RECORD_ID.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => current = actual,
        }
    }
}

/// Create a history record for a completed analysis, stamped now.
pub fn new_record(text: &str, results: AnalysisResult) -> HistoryRecord {
    new_record_at(text, results, Utc::now())
}

/// As [`new_record`], with an explicit creation time.
pub fn new_record_at(text: &str, results: AnalysisResult, at: DateTime<Utc>) -> HistoryRecord {
    HistoryRecord {
        id: next_record_id(at.timestamp_millis()).to_string(),
        text: text.to_owned(),
        results,
        date: iso_timestamp(at),
    }
}

// =============================================================================
// Store
// =============================================================================

/// Owner of the persisted history list.
///
/// Construct once and pass by reference; every operation reads the slot
/// afresh so external edits to the slot are picked up.
#[derive(Debug)]
pub struct HistoryStore<S: HistorySlot> {
    slot: S,
}

impl<S: HistorySlot> HistoryStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn slot_mut(&mut self) -> &mut S {
        &mut self.slot
    }

    /// Current history, newest first. Never fails.
    pub fn load(&self) -> Vec<HistoryRecord> {
        match self.slot.read() {
            Some(contents) => parse_slot(&contents),
            None => Vec::new(),
        }
    }

    /// Look up one record by id.
    pub fn get(&self, id: &str) -> Option<HistoryRecord> {
        self.load().into_iter().find(|r| r.id == id)
    }

    /// Prepend `record`, evict from the tail down to capacity, and persist.
    pub fn append(&mut self, record: HistoryRecord) -> Result<(), HistoryError> {
        let mut list = self.load();
        let id = record.id.clone();
        list.insert(0, record);

        if list.len() > HISTORY_CAPACITY {
            let evicted = list.len() - HISTORY_CAPACITY;
            list.truncate(HISTORY_CAPACITY);
            tracing::debug!(evicted, capacity = HISTORY_CAPACITY, "Evicted oldest history records");
        }

        self.persist(&list)?;
        tracing::info!(id = %id, len = list.len(), "Analysis added to history");
        Ok(())
    }

    /// Delete the record with `id`, keeping the order of the rest.
    /// Unknown ids leave the slot untouched.
    pub fn remove(&mut self, id: &str) -> Result<(), HistoryError> {
        let list = self.load();
        let before = list.len();
        let kept: Vec<HistoryRecord> = list.into_iter().filter(|r| r.id != id).collect();

        if kept.len() == before {
            tracing::debug!(id, "History remove: id not present");
            return Ok(());
        }

        self.persist(&kept)?;
        tracing::info!(id, len = kept.len(), "History record removed");
        Ok(())
    }

    /// Drop every record.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.slot.remove()?;
        tracing::info!("History cleared");
        Ok(())
    }

    fn persist(&mut self, list: &[HistoryRecord]) -> Result<(), HistoryError> {
        // Serialise fully before touching the slot.
        let json =
            serde_json::to_string(list).map_err(|e| HistoryError::Serialise { source: e })?;
        self.slot.write(&json)
    }
}

impl HistoryStore<FileSlot> {
    /// Store backed by `history.json` in the platform data directory.
    pub fn open(data_dir: &Path) -> Self {
        Self::new(FileSlot::in_data_dir(data_dir))
    }
}

// =============================================================================
// Unit tests
// =============================================================================
