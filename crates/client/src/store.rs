//! In-memory notification store with a denormalized unread counter.
//!
//! The counter is maintained alongside the record set instead of being
//! recomputed on every read, so every mutation path keeps the two in sync.
//! Invariant after every operation: `unread_count() == records with
//! is_read == false`.

use std::sync::{Arc, Mutex, MutexGuard};

use campushub_shared::NotificationRecord;

/// Ordered collection of notification records for one authenticated session.
///
/// The seed order (from the server) is the baseline and is never re-sorted;
/// push-delivered records are prepended, newest first.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NotificationStore {
    records: Vec<NotificationRecord>,
    unread: u64,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store contents wholesale with the server snapshot.
    /// The input order and count are taken as-is.
    pub fn seed(&mut self, records: Vec<NotificationRecord>, unread_count: u64) {
        self.records = records;
        self.unread = unread_count;
    }

    /// Prepend a newly delivered record.
    ///
    /// Returns false if a record with the same id already exists
    /// (idempotent delivery); the store is left untouched in that case.
    pub fn insert(&mut self, record: NotificationRecord) -> bool {
        if self.records.iter().any(|r| r.id == record.id) {
            return false;
        }
        if !record.is_read {
            self.unread += 1;
        }
        self.records.insert(0, record);
        true
    }

    /// Mark a single record as read.
    ///
    /// Returns true only when the record existed and was previously unread;
    /// the counter is decremented exactly in that case. A missing id or an
    /// already-read record is a no-op.
    pub fn mark_read(&mut self, id: &str) -> bool {
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) if !record.is_read => {
                record.is_read = true;
                self.unread = self.unread.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    /// Mark every record as read and reset the counter to zero.
    pub fn mark_all_read(&mut self) {
        for record in &mut self.records {
            record.is_read = true;
        }
        self.unread = 0;
    }

    pub fn records(&self) -> &[NotificationRecord] {
        &self.records
    }

    pub fn unread_count(&self) -> u64 {
        self.unread
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared handle to a session's store. Mutations are short synchronous
/// critical sections; callers must not hold the guard across an await.
#[derive(Debug, Default, Clone)]
pub struct SharedStore(Arc<Mutex<NotificationStore>>);

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, NotificationStore> {
        // A poisoned lock means a panic mid-mutation somewhere else; the
        // store is still structurally valid, so recover rather than cascade.
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
