//! Core data model types shared by the extractors.
//!
//! Records have no fixed schema: a CSV extractor yields ordered rows of string fields, a JSON
//! extractor yields arbitrary [`serde_json::Value`]s. [`Record`] unifies both for callers that do
//! not care which format they are reading.

use csv::StringRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single extracted record.
///
/// Serializes as the bare row (a list of strings) or the bare JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    /// One row of a delimited text file, fields in file order.
    Row(Vec<String>),
    /// One element of a (possibly flattened) JSON document.
    Document(Value),
}

impl Record {
    /// Returns the row fields if this record came from delimited text.
    pub fn as_row(&self) -> Option<&[String]> {
        match self {
            Record::Row(fields) => Some(fields.as_slice()),
            Record::Document(_) => None,
        }
    }

    /// Returns the JSON value if this record came from a JSON document.
    pub fn as_document(&self) -> Option<&Value> {
        match self {
            Record::Row(_) => None,
            Record::Document(value) => Some(value),
        }
    }
}

impl From<StringRecord> for Record {
    fn from(record: StringRecord) -> Self {
        Record::Row(record.iter().map(str::to_owned).collect())
    }
}

impl From<Value> for Record {
    fn from(value: Value) -> Self {
        Record::Document(value)
    }
}

/// Shared processing context handed to [`crate::extraction::Extractor::extract`].
///
/// Extractors only ever write the identifier of the record being extracted.
pub trait Context {
    /// Record the identifier of the record currently flowing through the pipeline.
    fn set_identifier(&mut self, identifier: &str);
}

/// A plain [`Context`] that remembers the last identifier it was given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionContext {
    identifier: Option<String>,
}

impl ExtractionContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// The last identifier set, if any.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }
}

impl Context for ExtractionContext {
    fn set_identifier(&mut self, identifier: &str) {
        self.identifier = Some(identifier.to_owned());
    }
}
