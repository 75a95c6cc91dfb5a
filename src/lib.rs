//! `record-extract` provides pull-based, seekable extraction of records from flat files, for use
//! as the first stage of an extract/transform/load pipeline.
//!
//! Every extractor implements [`extraction::Extractor`]: a lazy cursor that can be rewound,
//! stepped, seeked and counted, plus an `extract` call that returns the current record, hands its
//! identifier to a shared [`types::Context`], and advances.
//!
//! ## Formats
//!
//! - **CSV** ([`extraction::CsvExtractor`]): every row is a record. Delimiter and quote character
//!   are configurable (defaults `;` and `"`). `count()` probes the file once and memoizes the
//!   result without moving the cursor.
//! - **JSON** ([`extraction::JsonExtractor`]): the document is loaded on first access. A top-level
//!   array yields its elements; anything else yields itself once. A dotted access path with `*`
//!   wildcards (e.g. `items.*.name`) flattens nested nodes into the record sequence.
//!
//! ## Quick example: CSV with identifiers
//!
//! ```no_run
//! use record_extract::extraction::{CsvExtractor, CsvOptions, Extractor};
//! use record_extract::types::ExtractionContext;
//!
//! # fn main() -> Result<(), record_extract::ExtractError> {
//! let opts = CsvOptions {
//!     identifier_column: Some(0),
//!     ..Default::default()
//! };
//! let mut ex = CsvExtractor::open("people.csv", &opts)?;
//! let mut ctx = ExtractionContext::new();
//!
//! println!("total={}", ex.count()?);
//! ex.rewind()?;
//! while ex.valid()? {
//!     let row = ex.extract(&mut ctx)?;
//!     println!("{:?} -> {:?}", ctx.identifier(), row);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## JSON with an access path and in-memory content
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use record_extract::extraction::{Extractor, Fetch, JsonExtractor, JsonOptions};
//! use serde_json::json;
//!
//! let in_memory: Arc<dyn Fetch> = Arc::new(|_: &str| -> std::io::Result<Vec<u8>> {
//!     Ok(br#"{"items":[{"name":"Riri"},{"name":"Fifi"},{"name":"Loulou"}]}"#.to_vec())
//! });
//! let opts = JsonOptions {
//!     path: Some("items.*.name".to_string()),
//!     fetcher: Some(in_memory),
//!     ..Default::default()
//! };
//! let mut ex = JsonExtractor::new("ducks.json", &opts);
//!
//! let names: Vec<_> = ex.records().collect::<Result<_, _>>().unwrap();
//! assert_eq!(names, vec![json!("Riri"), json!("Fifi"), json!("Loulou")]);
//! ```
//!
//! ## Modules
//!
//! - [`extraction`]: the extractor contract and format-specific implementations
//! - [`types`]: records and the processing context
//! - [`error`]: error types used across extraction

pub mod error;
pub mod extraction;
pub mod types;

pub use error::{ExtractError, ExtractErrorKind, ExtractResult};
