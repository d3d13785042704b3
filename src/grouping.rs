//! Partition records by commodity or station.

use std::collections::HashMap;

use crate::types::{Dimension, OperationRecord, UNKNOWN_KEY};

/// Records bucketed by a dimension value. Buckets keep the order in
/// which their key was first seen, and records inside a bucket keep
/// their input order.
#[derive(Debug, Default)]
pub struct Groups<'a> {
    index: HashMap<String, usize>,
    buckets: Vec<(String, Vec<&'a OperationRecord>)>,
}

impl<'a> Groups<'a> {
    fn push(&mut self, key: &str, record: &'a OperationRecord) {
        match self.index.get(key) {
            Some(&i) => self.buckets[i].1.push(record),
            None => {
                self.index.insert(key.to_string(), self.buckets.len());
                self.buckets.push((key.to_string(), vec![record]));
            }
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.buckets.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&[&'a OperationRecord]> {
        self.index.get(key).map(|&i| self.buckets[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a OperationRecord])> + '_ {
        self.buckets.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total records across all buckets.
    pub fn record_count(&self) -> usize {
        self.buckets.iter().map(|(_, v)| v.len()).sum()
    }
}

/// Normalized grouping key for a record: trimmed, with null and blank
/// values mapped to [`UNKNOWN_KEY`].
pub fn group_key<'r>(record: &'r OperationRecord, dimension: Dimension) -> &'r str {
    match dimension.select(record).map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => UNKNOWN_KEY,
    }
}

pub fn group_by<'a, I>(records: I, dimension: Dimension) -> Groups<'a>
where
    I: IntoIterator<Item = &'a OperationRecord>,
{
    let mut groups = Groups::default();
    for record in records {
        groups.push(group_key(record, dimension), record);
    }
    groups
}
