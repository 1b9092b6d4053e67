// =============================================================================
// Correlation History Store — per-instrument append/replace time series
// =============================================================================
//
// One CSV file per tracked instrument, one record per calendar date:
//
//   date,correlation
//   2024-01-02,0.412
//   2024-01-03,            <- empty field encodes an undefined coefficient
//
// Upsert is last-write-wins keyed by date: an existing entry for the same
// date is replaced in place, anything else is appended, so file order stays
// deterministic and diffs stay stable. The read-merge-write sequence is not
// naturally atomic, so it is guarded by a mutex and finished with a
// tmp + rename write. Entries the upsert does not touch are rewritten
// verbatim, never altered.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::types::HistoryEntry;

/// Per-instrument store of daily correlation results.
pub struct CorrelationHistory {
    dir: PathBuf,
    /// Guards the read-merge-write upsert sequence.
    write_lock: Mutex<()>,
}

impl CorrelationHistory {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// File path for one instrument's history. Ticker symbols like `ES=F`
    /// are sanitized to filesystem-safe names (`ES_F.csv`).
    pub fn path_for(&self, instrument: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", sanitize(instrument)))
    }

    /// Load all entries for `instrument`. A missing file is an empty
    /// history, not an error.
    pub fn load(&self, instrument: &str) -> Result<Vec<HistoryEntry>> {
        let path = self.path_for(instrument);
        if !path.exists() {
            debug!(instrument, "no history file yet — starting empty");
            return Ok(Vec::new());
        }
        read_entries(&path)
    }

    /// Insert or replace the entry for `entry.date` (last write wins).
    ///
    /// Existing entries for other dates are preserved untouched and in
    /// their original order; a new date is appended.
    pub fn upsert(&self, instrument: &str, entry: HistoryEntry) -> Result<()> {
        let _guard = self.write_lock.lock();

        let mut entries = self.load(instrument)?;
        match entries.iter_mut().find(|e| e.date == entry.date) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }

        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("failed to create history directory {}", self.dir.display())
        })?;

        let path = self.path_for(instrument);
        write_entries(&path, &entries)?;

        info!(
            instrument,
            date = %entry.date,
            correlation = ?entry.correlation,
            total = entries.len(),
            "correlation history updated"
        );
        Ok(())
    }
}

// =============================================================================
// CSV plumbing
// =============================================================================

fn read_entries(path: &Path) -> Result<Vec<HistoryEntry>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open history file {}", path.display()))?;

    let mut entries = Vec::new();
    for record in reader.deserialize() {
        let entry: HistoryEntry = record
            .with_context(|| format!("malformed history record in {}", path.display()))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Atomic write: serialize to a tmp sibling, then rename over the target.
fn write_entries(path: &Path, entries: &[HistoryEntry]) -> Result<()> {
    let tmp_path = path.with_extension("csv.tmp");

    let mut writer = csv::Writer::from_path(&tmp_path)
        .with_context(|| format!("failed to create tmp history file {}", tmp_path.display()))?;
    for entry in entries {
        writer
            .serialize(entry)
            .context("failed to serialise history entry")?;
    }
    writer.flush().context("failed to flush history file")?;
    drop(writer);

    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to rename tmp history to {}", path.display()))?;
    Ok(())
}

/// Map an instrument symbol to a filesystem-safe stem.
pub(crate) fn sanitize(instrument: &str) -> String {
    instrument
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
