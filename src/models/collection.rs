//! Keyed record collections as returned by the collection endpoints.
//!
//! Every collection endpoint answers with a JSON object of `id -> record`.
//! Decoding fully replaces whatever was loaded before and always yields the
//! records sorted descending by ID.

use serde_json::Value;
use thiserror::Error;

use super::defect::json_kind;
use super::record_id::{RecordId, sort_descending_by_id};

/// A record type that can be resolved from one entry of a collection payload.
pub trait ApiRecord: Sized {
    fn from_value(id: RecordId, value: &Value) -> Self;
    fn id(&self) -> &RecordId;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
    #[error("collection payload is {0}, expected an object keyed by id")]
    NotAnObject(&'static str),
}

/// Records of one kind, highest ID first.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<T> {
    records: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T: ApiRecord> Collection<T> {
    /// Decode a collection payload.
    ///
    /// Only a non-object payload is an error; individual records never are.
    pub fn from_value(payload: &Value) -> Result<Self, CollectionError> {
        let map = payload
            .as_object()
            .ok_or_else(|| CollectionError::NotAnObject(json_kind(payload)))?;

        let records = map
            .iter()
            .map(|(id, value)| T::from_value(RecordId::new(id.as_str()), value))
            .collect();

        Ok(Self::from_records(records))
    }

    /// Build a collection from already-resolved records.
    #[must_use]
    pub fn from_records(mut records: Vec<T>) -> Self {
        sort_descending_by_id(&mut records, T::id);
        Self { records }
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id().as_str() == id)
    }
}

impl<T> Collection<T> {
    #[must_use]
    pub fn records(&self) -> &[T] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.records.iter()
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
