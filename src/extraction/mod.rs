//! Extractors and the cursor contract they share.
//!
//! Every extractor is a lazy, seekable cursor over a sequence of records:
//!
//! - [`Extractor::rewind`] / [`Extractor::next`] / [`Extractor::valid`] / [`Extractor::current`]
//!   walk the sequence,
//! - [`Extractor::seek`] / [`Extractor::key`] jump to and report a zero-based position,
//! - [`Extractor::count`] reports the total number of records (computed at most once),
//! - [`Extractor::extract`] returns the current record, hands its identifier to a
//!   [`Context`], and advances.
//!
//! Format-specific implementations live in [`csv`] and [`json`]; [`open_extractor`] (from
//! [`unified`]) picks one by file extension.
//!
//! Extractors are single-threaded: cursor state is mutated in place without synchronization, so
//! sharing one instance between threads is the caller's responsibility.

pub mod csv;
pub mod fetch;
pub mod json;
pub mod observability;
pub mod path;
pub mod unified;

use crate::error::ExtractResult;
use crate::types::Context;

pub use self::csv::{CsvExtractor, CsvOptions};
pub use fetch::{Fetch, FileFetcher};
pub use json::{JsonExtractor, JsonOptions};
pub use observability::{CompositeLogger, ExtractionLogger, NullLogger, StdErrLogger, TracingLogger};
pub use path::{AccessPath, PathSegment};
pub use unified::{ExtractorFormat, ExtractorOptions, FileExtractor, open_extractor};

/// The cursor contract shared by file-backed extractors.
///
/// Valid positions lie in `0..count()`; position `count()` is end-of-sequence.
pub trait Extractor {
    /// Record type produced by this extractor.
    type Record;

    /// The record at the cursor, without advancing. `None` past the end.
    fn current(&mut self) -> ExtractResult<Option<Self::Record>>;

    /// Advance the cursor by one. A no-op at end-of-sequence.
    fn next(&mut self) -> ExtractResult<()>;

    /// Whether the cursor points at an existing record.
    fn valid(&mut self) -> ExtractResult<bool>;

    /// Move the cursor back to position 0.
    fn rewind(&mut self) -> ExtractResult<()>;

    /// Current zero-based position.
    fn key(&self) -> usize;

    /// Move the cursor to `position`. Positions past the end land on end-of-sequence.
    fn seek(&mut self, position: usize) -> ExtractResult<()>;

    /// Total number of records. Does not move the cursor.
    fn count(&mut self) -> ExtractResult<usize>;

    /// Return the current record and advance the cursor.
    fn extract(&mut self, context: &mut dyn Context) -> ExtractResult<Option<Self::Record>>;

    /// Iterate every record from the start, as a std [`Iterator`].
    fn records(&mut self) -> Records<'_, Self>
    where
        Self: Sized,
    {
        Records {
            extractor: self,
            state: RecordsState::Fresh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordsState {
    Fresh,
    Running,
    Done,
}

/// Iterator returned by [`Extractor::records`].
///
/// Rewinds on first use, then yields records until the cursor is no longer valid. Stops after the
/// first error.
#[derive(Debug)]
pub struct Records<'a, E> {
    extractor: &'a mut E,
    state: RecordsState,
}

impl<E: Extractor> Records<'_, E> {
    fn step(&mut self) -> ExtractResult<Option<E::Record>> {
        if self.state == RecordsState::Fresh {
            self.extractor.rewind()?;
            self.state = RecordsState::Running;
        }
        let Some(record) = self.extractor.current()? else {
            return Ok(None);
        };
        self.extractor.next()?;
        Ok(Some(record))
    }
}

impl<E: Extractor> Iterator for Records<'_, E> {
    type Item = ExtractResult<E::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == RecordsState::Done {
            return None;
        }
        match self.step() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.state = RecordsState::Done;
                None
            }
            Err(e) => {
                self.state = RecordsState::Done;
                Some(Err(e))
            }
        }
    }
}
