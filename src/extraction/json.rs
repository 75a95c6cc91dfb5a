//! JSON extraction implementation.
//!
//! The whole document is fetched and parsed once, on first access, then optionally flattened
//! with an [`AccessPath`]. The resulting flat sequence backs the cursor:
//!
//! - no path: a top-level array yields its elements, any other document yields itself once
//! - with a path: every node selected by the path, in document order
//!
//! Construction performs no I/O.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{ExtractError, ExtractResult};
use crate::types::Context;

use super::Extractor;
use super::fetch::{Fetch, FileFetcher};
use super::observability::{ExtractionLogger, logger_or_null};
use super::path::AccessPath;

/// Options controlling how a JSON resource is loaded.
#[derive(Clone, Default)]
pub struct JsonOptions {
    /// Dotted path to the target nodes, e.g. `items.*.name`.
    pub path: Option<String>,
    /// Content retrieval; reads the resource as a local file if `None`.
    pub fetcher: Option<Arc<dyn Fetch>>,
    /// Optional logger for debug events.
    pub logger: Option<Arc<dyn ExtractionLogger>>,
}

impl fmt::Debug for JsonOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonOptions")
            .field("path", &self.path)
            .field("fetcher_set", &self.fetcher.is_some())
            .field("logger_set", &self.logger.is_some())
            .finish()
    }
}

#[derive(Debug)]
struct LoadedDocument {
    records: Vec<Value>,
    cursor: usize,
}

/// Seekable, countable cursor over a JSON document.
pub struct JsonExtractor {
    resource: String,
    path: Option<AccessPath>,
    fetcher: Arc<dyn Fetch>,
    logger: Arc<dyn ExtractionLogger>,
    /// `None` until first access.
    document: Option<LoadedDocument>,
}

impl fmt::Debug for JsonExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonExtractor")
            .field("resource", &self.resource)
            .field("path", &self.path.as_ref().map(ToString::to_string))
            .field("loaded", &self.document.is_some())
            .finish()
    }
}

impl JsonExtractor {
    /// Create an extractor for `resource` (a file path, or anything the configured fetcher
    /// understands).
    pub fn new(resource: impl Into<String>, options: &JsonOptions) -> Self {
        let resource = resource.into();
        let logger = logger_or_null(options.logger.as_ref());
        logger.debug("Extracting JSON", &[("path", resource.clone())]);

        let fetcher: Arc<dyn Fetch> = match options.fetcher.as_ref() {
            Some(f) => Arc::clone(f),
            None => Arc::new(FileFetcher),
        };

        Self {
            resource,
            path: options.path.as_deref().map(AccessPath::parse),
            fetcher,
            logger,
            document: None,
        }
    }

    /// Resource this extractor reads from.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Parsed access path, if one was configured.
    pub fn access_path(&self) -> Option<&AccessPath> {
        self.path.as_ref()
    }

    fn document(&mut self) -> ExtractResult<&mut LoadedDocument> {
        let doc = match self.document.take() {
            Some(doc) => doc,
            None => self.load()?,
        };
        Ok(self.document.insert(doc))
    }

    fn load(&self) -> ExtractResult<LoadedDocument> {
        let bytes = self
            .fetcher
            .fetch(&self.resource)
            .map_err(|source| ExtractError::Fetch {
                resource: self.resource.clone(),
                source,
            })?;

        let value: Value = serde_json::from_slice(&bytes).map_err(|e| ExtractError::Parse {
            resource: self.resource.clone(),
            message: e.to_string(),
        })?;
        // A literal `null` document is rejected like unparseable content.
        if value.is_null() {
            return Err(ExtractError::Parse {
                resource: self.resource.clone(),
                message: "document is null".to_string(),
            });
        }

        let records = match &self.path {
            Some(path) => path.flatten(&value),
            None => match value {
                Value::Array(items) => items,
                other => vec![other],
            },
        };

        self.logger.debug(
            "Loaded JSON document",
            &[("path", self.resource.clone()), ("records", records.len().to_string())],
        );
        Ok(LoadedDocument { records, cursor: 0 })
    }
}

impl Extractor for JsonExtractor {
    type Record = Value;

    fn current(&mut self) -> ExtractResult<Option<Value>> {
        let doc = self.document()?;
        Ok(doc.records.get(doc.cursor).cloned())
    }

    fn next(&mut self) -> ExtractResult<()> {
        let doc = self.document()?;
        doc.cursor = (doc.cursor + 1).min(doc.records.len());
        let key = doc.cursor;
        self.logger.debug(
            "Next JSON element",
            &[("path", self.resource.clone()), ("key", key.to_string())],
        );
        Ok(())
    }

    fn valid(&mut self) -> ExtractResult<bool> {
        let doc = self.document()?;
        Ok(doc.cursor < doc.records.len())
    }

    fn rewind(&mut self) -> ExtractResult<()> {
        self.document()?.cursor = 0;
        Ok(())
    }

    fn key(&self) -> usize {
        self.document.as_ref().map_or(0, |doc| doc.cursor)
    }

    fn seek(&mut self, position: usize) -> ExtractResult<()> {
        let doc = self.document()?;
        doc.cursor = position.min(doc.records.len());
        Ok(())
    }

    fn count(&mut self) -> ExtractResult<usize> {
        Ok(self.document()?.records.len())
    }

    fn extract(&mut self, _context: &mut dyn Context) -> ExtractResult<Option<Value>> {
        let current = self.current()?;
        self.next()?;
        Ok(current)
    }
}
