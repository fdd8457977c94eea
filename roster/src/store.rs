//! The local mirror of the remote user list.

use crate::{Record, RecordId};
use std::collections::HashSet;
use tracing::warn;

/// An ordered collection of [Record](../struct.Record.html)s with unique ids.
///
/// The store performs no validation beyond identity matching. Renaming or removing an id
/// that is not present is a no-op, which is what lets late confirmations for records that
/// are already gone pass through harmlessly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MirrorStore {
    records: Vec<Record>
}

impl MirrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole content, keeping source order.
    ///
    /// If `records` repeats an id, the first occurrence wins and the rest are dropped.
    /// Returns the number of records now held.
    pub fn replace_all<I: IntoIterator<Item = Record>>(&mut self, records: I) -> usize {
        let mut seen = HashSet::new();
        self.records = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.id.clone());
                if !fresh {
                    warn!(id = %record.id, "dropping duplicate record");
                }
                fresh
            })
            .collect();
        self.records.len()
    }

    /// Replace the name of the record with `id`. Returns whether such a record existed.
    pub fn rename_by_id<N: Into<String>>(&mut self, id: &RecordId, name: N) -> bool {
        match self.records.iter_mut().find(|record| &record.id == id) {
            Some(record) => {
                record.name = name.into();
                true
            }
            None => false
        }
    }

    /// Remove the record with `id`, keeping the order of the rest. Returns whether such a record existed.
    pub fn remove_by_id(&mut self, id: &RecordId) -> bool {
        match self.records.iter().position(|record| &record.id == id) {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.get(id).is_some()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
