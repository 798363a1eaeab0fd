use crate::record::Record;
use serde::{Deserialize, Serialize};

/// An ordered, in-memory list of records, edited one entry at a time.
///
/// Records keep their insertion order; the analytics engine sorts its own copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordBook {
    records: Vec<Record>,
}

impl RecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Removes and returns the most recently added record, if any.
    pub fn remove_last(&mut self) -> Option<Record> {
        self.records.pop()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

impl From<Vec<Record>> for RecordBook {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl Extend<Record> for RecordBook {
    fn extend<T: IntoIterator<Item = Record>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}
