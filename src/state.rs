// ReelPress Result List State
// Copyright (c) 2026 Xing_The_Creator | ReelPress
//
// Append-only list of acquired and compressed videos. The list itself is an
// immutable snapshot; the store swaps snapshots through a watch channel so the
// GUI can repaint whenever a new record lands.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// A playable file and its size in megabytes, measured once at insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub url: String,
    pub size: String,
}

impl VideoRecord {
    pub fn new(url: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            url: url.into(),
            size: format_size_mb(size_bytes),
        }
    }
}

/// Render a byte count as megabytes with two decimals ("5.00", "2.30").
pub fn format_size_mb(size_bytes: u64) -> String {
    format!("{:.2}", size_bytes as f64 / BYTES_PER_MB)
}

/// Immutable ordered snapshot of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordList {
    records: Arc<Vec<VideoRecord>>,
}

impl RecordList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pure append: returns a new list, leaves `self` untouched.
    pub fn appended(&self, record: VideoRecord) -> Self {
        let mut next = Vec::with_capacity(self.records.len() + 1);
        next.extend(self.records.iter().cloned());
        next.push(record);
        Self {
            records: Arc::new(next),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VideoRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VideoRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[VideoRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a VideoRecord;
    type IntoIter = std::slice::Iter<'a, VideoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Shared handle over the current `RecordList`. Clones observe the same list.
#[derive(Clone)]
pub struct ListStore {
    tx: Arc<watch::Sender<RecordList>>,
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ListStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RecordList::new());
        Self { tx: Arc::new(tx) }
    }

    /// Append `record` on top of whatever the latest list is and return the
    /// resulting list. Concurrent appends never lose each other.
    pub fn append(&self, record: VideoRecord) -> RecordList {
        let mut next = RecordList::new();
        self.tx.send_modify(|prev| {
            *prev = prev.appended(record);
            next = prev.clone();
        });
        info!(
            "[LIST] Appended {} ({} MB), {} entries",
            next.as_slice().last().map(|r| r.url.as_str()).unwrap_or_default(),
            next.as_slice().last().map(|r| r.size.as_str()).unwrap_or_default(),
            next.len()
        );
        next
    }

    pub fn snapshot(&self) -> RecordList {
        self.tx.borrow().clone()
    }

    /// Receiver that wakes on every append.
    pub fn subscribe(&self) -> watch::Receiver<RecordList> {
        self.tx.subscribe()
    }
}
