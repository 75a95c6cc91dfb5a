//! CSV extraction implementation.
//!
//! [`CsvExtractor`] presents every row of a delimited text file as a record, in file order. The
//! cursor is an index into a table of record start offsets that grows as the file is read, so
//! stepping forward is O(1) and seeking back to an already-seen row is a single file seek.
//!
//! [`Extractor::count`] probes the end of the file once, in raw mode (byte records, no UTF-8
//! decoding), then memoizes the result. The caller's cursor is left where it was.
//!
//! Fields are decoded as UTF-8; invalid sequences become U+FFFD rather than failing the row.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{ByteRecord, Position, StringRecord};

use crate::error::{ExtractError, ExtractResult};
use crate::types::Context;

use super::Extractor;
use super::observability::{ExtractionLogger, logger_or_null};

/// Options controlling how a CSV file is read.
#[derive(Clone)]
pub struct CsvOptions {
    /// Field delimiter. Defaults to `;`.
    pub delimiter: u8,
    /// Quote (enclosure) character. Defaults to `"`.
    pub quote: u8,
    /// If set, [`Extractor::extract`] hands this column of each record to the context as its
    /// identifier.
    pub identifier_column: Option<usize>,
    /// Optional logger for debug events.
    pub logger: Option<Arc<dyn ExtractionLogger>>,
}

impl fmt::Debug for CsvOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvOptions")
            .field("delimiter", &(self.delimiter as char))
            .field("quote", &(self.quote as char))
            .field("identifier_column", &self.identifier_column)
            .field("logger_set", &self.logger.is_some())
            .finish()
    }
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            quote: b'"',
            identifier_column: None,
            logger: None,
        }
    }
}

/// What the cursor currently points at.
#[derive(Debug)]
enum Slot {
    /// Not read yet.
    Unread,
    Record(StringRecord),
    End,
}

/// Seekable, countable cursor over the rows of a delimited text file.
pub struct CsvExtractor {
    path: PathBuf,
    name: String,
    reader: csv::Reader<File>,
    identifier_column: Option<usize>,
    logger: Arc<dyn ExtractionLogger>,
    /// Start position of every record seen so far.
    offsets: Vec<Position>,
    /// Start position of the first record not in `offsets`.
    frontier: Position,
    /// End of file reached: `offsets` holds every record.
    complete: bool,
    /// Index of the record the reader yields on its next read, if known.
    reader_at: Option<usize>,
    key: usize,
    slot: Slot,
    line_count: Option<usize>,
}

impl fmt::Debug for CsvExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsvExtractor")
            .field("path", &self.path)
            .field("key", &self.key)
            .field("indexed_records", &self.offsets.len())
            .field("line_count", &self.line_count)
            .finish()
    }
}

impl CsvExtractor {
    /// Open `path` for extraction.
    ///
    /// Rows may have differing widths; no shape validation is performed. Every row, including a
    /// header line if the file has one, is a record.
    pub fn open(path: impl AsRef<Path>, options: &CsvOptions) -> ExtractResult<Self> {
        let path = path.as_ref();
        let logger = logger_or_null(options.logger.as_ref());
        logger.debug("Extracting CSV", &[("filepath", path.display().to_string())]);

        let file = File::open(path)?;
        let reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            reader,
            identifier_column: options.identifier_column,
            logger,
            offsets: Vec::new(),
            frontier: Position::new(),
            complete: false,
            reader_at: Some(0),
            key: 0,
            slot: Slot::Unread,
            line_count: None,
        })
    }

    /// Path this extractor reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Put the reader right before record `index` (or the frontier if `index` is not indexed yet).
    fn position_reader(&mut self, index: usize) -> ExtractResult<()> {
        let index = index.min(self.offsets.len());
        if self.reader_at == Some(index) {
            return Ok(());
        }
        let pos = match self.offsets.get(index) {
            Some(pos) => pos.clone(),
            None => self.frontier.clone(),
        };
        self.reader_at = None;
        self.reader.seek(pos)?;
        self.reader_at = Some(index);
        Ok(())
    }

    /// Index records in raw mode until record `target` is known or the file ends.
    fn index_through(&mut self, target: usize) -> ExtractResult<()> {
        if self.complete || target < self.offsets.len() {
            return Ok(());
        }
        self.position_reader(self.offsets.len())?;

        let mut scratch = ByteRecord::new();
        while self.offsets.len() <= target {
            let start = self.reader.position().clone();
            // A failed read may have consumed part of the input; force a re-seek next time.
            self.reader_at = None;
            if !self.reader.read_byte_record(&mut scratch)? {
                self.complete = true;
                break;
            }
            self.offsets.push(start);
            self.frontier = self.reader.position().clone();
            self.reader_at = Some(self.offsets.len());
        }
        Ok(())
    }

    /// Resolve the slot for the current key, clamping the key to end-of-sequence if needed.
    fn load(&mut self) -> ExtractResult<()> {
        if !matches!(self.slot, Slot::Unread) {
            return Ok(());
        }
        if self.key > self.offsets.len() {
            self.index_through(self.key - 1)?;
        }
        if self.key >= self.offsets.len() && self.complete {
            self.key = self.offsets.len();
            self.slot = Slot::End;
            return Ok(());
        }

        self.position_reader(self.key)?;
        let start = self.reader.position().clone();
        let mut raw = ByteRecord::new();
        self.reader_at = None;
        if !self.reader.read_byte_record(&mut raw)? {
            self.complete = true;
            self.slot = Slot::End;
            return Ok(());
        }
        if self.key == self.offsets.len() {
            self.offsets.push(start);
            self.frontier = self.reader.position().clone();
        }
        self.reader_at = Some(self.key + 1);
        // Fields that are not valid UTF-8 are decoded lossily, so iteration accepts every row
        // the count probe does.
        self.slot = Slot::Record(StringRecord::from_byte_record_lossy(raw));
        Ok(())
    }
}

impl Extractor for CsvExtractor {
    type Record = StringRecord;

    fn current(&mut self) -> ExtractResult<Option<StringRecord>> {
        self.load()?;
        match &self.slot {
            Slot::Record(record) => Ok(Some(record.clone())),
            Slot::Unread | Slot::End => Ok(None),
        }
    }

    fn next(&mut self) -> ExtractResult<()> {
        self.load()?;
        if matches!(self.slot, Slot::Record(_)) {
            self.key += 1;
            self.slot = Slot::Unread;
        }
        self.logger.debug(
            "Next csv element",
            &[("name", self.name.clone()), ("value", self.key.to_string())],
        );
        Ok(())
    }

    fn valid(&mut self) -> ExtractResult<bool> {
        self.load()?;
        Ok(matches!(self.slot, Slot::Record(_)))
    }

    fn rewind(&mut self) -> ExtractResult<()> {
        self.seek(0)
    }

    fn key(&self) -> usize {
        self.key
    }

    fn seek(&mut self, position: usize) -> ExtractResult<()> {
        self.key = position;
        self.slot = Slot::Unread;
        self.load()
    }

    fn count(&mut self) -> ExtractResult<usize> {
        if let Some(n) = self.line_count {
            return Ok(n);
        }
        // Walking to the largest possible index clamps at end of file.
        self.index_through(usize::MAX)?;
        let n = self.offsets.len();
        self.line_count = Some(n);
        self.logger.debug(
            "Counted CSV lines",
            &[("name", self.name.clone()), ("lines", n.to_string())],
        );
        Ok(n)
    }

    fn extract(&mut self, context: &mut dyn Context) -> ExtractResult<Option<StringRecord>> {
        let record = self.current()?;
        if let (Some(column), Some(record)) = (self.identifier_column, record.as_ref()) {
            let identifier = record.get(column).ok_or(ExtractError::IndexOutOfRange {
                index: column,
                len: record.len(),
            })?;
            context.set_identifier(identifier);
        }
        self.next()?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{CsvExtractor, CsvOptions};
    use crate::extraction::Extractor;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    fn fields(ex: &mut CsvExtractor) -> Vec<String> {
        ex.current()
            .unwrap()
            .map(|r| r.iter().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    #[test]
    fn steps_through_rows_in_file_order() {
        let f = csv_file("a;1\nb;2\nc;3\n");
        let mut ex = CsvExtractor::open(f.path(), &CsvOptions::default()).unwrap();

        ex.rewind().unwrap();
        assert_eq!(fields(&mut ex), vec!["a", "1"]);
        ex.next().unwrap();
        ex.next().unwrap();
        assert_eq!(ex.key(), 2);
        assert_eq!(fields(&mut ex), vec!["c", "3"]);
        ex.next().unwrap();
        assert!(!ex.valid().unwrap());
        assert_eq!(ex.key(), 3);
    }

    #[test]
    fn next_at_end_does_not_move_past_count() {
        let f = csv_file("a\n");
        let mut ex = CsvExtractor::open(f.path(), &CsvOptions::default()).unwrap();
        ex.next().unwrap();
        ex.next().unwrap();
        ex.next().unwrap();
        assert_eq!(ex.key(), 1);
        assert!(!ex.valid().unwrap());
    }

    #[test]
    fn seek_backwards_reuses_indexed_offsets() {
        let f = csv_file("r0\nr1\nr2\nr3\n");
        let mut ex = CsvExtractor::open(f.path(), &CsvOptions::default()).unwrap();

        ex.seek(3).unwrap();
        assert_eq!(fields(&mut ex), vec!["r3"]);
        ex.seek(1).unwrap();
        assert_eq!(fields(&mut ex), vec!["r1"]);
        ex.next().unwrap();
        assert_eq!(fields(&mut ex), vec!["r2"]);
    }

    #[test]
    fn count_is_memoized_and_keeps_cursor() {
        let f = csv_file("r0\nr1\nr2\n");
        let mut ex = CsvExtractor::open(f.path(), &CsvOptions::default()).unwrap();
        ex.seek(1).unwrap();

        assert_eq!(ex.count().unwrap(), 3);
        assert_eq!(ex.key(), 1);
        assert_eq!(fields(&mut ex), vec!["r1"]);

        // The probe is not repeated: growing the file afterwards does not change the count.
        std::fs::OpenOptions::new()
            .append(true)
            .open(f.path())
            .unwrap()
            .write_all(b"r3\n")
            .unwrap();
        assert_eq!(ex.count().unwrap(), 3);
    }

    #[test]
    fn quoted_fields_may_span_lines() {
        let f = csv_file("id;note\n1;\"line one\nline two\"\n2;\"a;b\"\n");
        let mut ex = CsvExtractor::open(f.path(), &CsvOptions::default()).unwrap();

        assert_eq!(ex.count().unwrap(), 3);
        ex.seek(1).unwrap();
        assert_eq!(fields(&mut ex), vec!["1", "line one\nline two"]);
        ex.seek(2).unwrap();
        assert_eq!(fields(&mut ex), vec!["2", "a;b"]);
    }

    #[test]
    fn custom_delimiter_and_quote() {
        let f = csv_file("x,'y,z'\n");
        let opts = CsvOptions {
            delimiter: b',',
            quote: b'\'',
            ..Default::default()
        };
        let mut ex = CsvExtractor::open(f.path(), &opts).unwrap();
        assert_eq!(fields(&mut ex), vec!["x", "y,z"]);
    }
}
