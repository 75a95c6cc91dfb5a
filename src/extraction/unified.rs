//! Unified extractor entrypoint.
//!
//! [`open_extractor`] builds a [`FileExtractor`] for a path:
//!
//! - If [`ExtractorOptions::format`] is `None`, the format is inferred from the file extension.
//! - The matching format-specific options ([`ExtractorOptions::csv`] / [`ExtractorOptions::json`])
//!   are applied; the other set is ignored.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, ExtractResult};
use crate::types::{Context, Record};

use super::Extractor;
use super::csv::{CsvExtractor, CsvOptions};
use super::json::{JsonExtractor, JsonOptions};

/// Supported extractor formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractorFormat {
    /// Delimited text.
    Csv,
    /// A single JSON document.
    Json,
}

impl ExtractorFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling [`open_extractor`].
///
/// Use [`Default`] for common cases.
#[derive(Debug, Clone, Default)]
pub struct ExtractorOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<ExtractorFormat>,
    /// CSV-specific options.
    pub csv: CsvOptions,
    /// JSON-specific options.
    pub json: JsonOptions,
}

/// Either kind of file extractor, yielding format-neutral [`Record`]s.
#[derive(Debug)]
pub enum FileExtractor {
    Csv(CsvExtractor),
    Json(JsonExtractor),
}

impl FileExtractor {
    /// Format of the wrapped extractor.
    pub fn format(&self) -> ExtractorFormat {
        match self {
            FileExtractor::Csv(_) => ExtractorFormat::Csv,
            FileExtractor::Json(_) => ExtractorFormat::Json,
        }
    }
}

impl From<CsvExtractor> for FileExtractor {
    fn from(ex: CsvExtractor) -> Self {
        FileExtractor::Csv(ex)
    }
}

impl From<JsonExtractor> for FileExtractor {
    fn from(ex: JsonExtractor) -> Self {
        FileExtractor::Json(ex)
    }
}

impl Extractor for FileExtractor {
    type Record = Record;

    fn current(&mut self) -> ExtractResult<Option<Record>> {
        match self {
            FileExtractor::Csv(ex) => Ok(ex.current()?.map(Record::from)),
            FileExtractor::Json(ex) => Ok(ex.current()?.map(Record::from)),
        }
    }

    fn next(&mut self) -> ExtractResult<()> {
        match self {
            FileExtractor::Csv(ex) => ex.next(),
            FileExtractor::Json(ex) => ex.next(),
        }
    }

    fn valid(&mut self) -> ExtractResult<bool> {
        match self {
            FileExtractor::Csv(ex) => ex.valid(),
            FileExtractor::Json(ex) => ex.valid(),
        }
    }

    fn rewind(&mut self) -> ExtractResult<()> {
        match self {
            FileExtractor::Csv(ex) => ex.rewind(),
            FileExtractor::Json(ex) => ex.rewind(),
        }
    }

    fn key(&self) -> usize {
        match self {
            FileExtractor::Csv(ex) => ex.key(),
            FileExtractor::Json(ex) => ex.key(),
        }
    }

    fn seek(&mut self, position: usize) -> ExtractResult<()> {
        match self {
            FileExtractor::Csv(ex) => ex.seek(position),
            FileExtractor::Json(ex) => ex.seek(position),
        }
    }

    fn count(&mut self) -> ExtractResult<usize> {
        match self {
            FileExtractor::Csv(ex) => ex.count(),
            FileExtractor::Json(ex) => ex.count(),
        }
    }

    fn extract(&mut self, context: &mut dyn Context) -> ExtractResult<Option<Record>> {
        match self {
            FileExtractor::Csv(ex) => Ok(ex.extract(context)?.map(Record::from)),
            FileExtractor::Json(ex) => Ok(ex.extract(context)?.map(Record::from)),
        }
    }
}

/// Open an extractor for `path`.
///
/// # Examples
///
/// ```no_run
/// use record_extract::extraction::{open_extractor, Extractor, ExtractorOptions, JsonOptions};
///
/// # fn main() -> Result<(), record_extract::ExtractError> {
/// let opts = ExtractorOptions {
///     json: JsonOptions {
///         path: Some("items.*.name".to_string()),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
///
/// let mut ex = open_extractor("ducks.json", &opts)?;
/// for record in ex.records() {
///     println!("{:?}", record?);
/// }
/// # Ok(())
/// # }
/// ```
pub fn open_extractor(path: impl AsRef<Path>, options: &ExtractorOptions) -> ExtractResult<FileExtractor> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    match fmt {
        ExtractorFormat::Csv => Ok(CsvExtractor::open(path, &options.csv)?.into()),
        ExtractorFormat::Json => {
            let resource = path.to_str().ok_or_else(|| {
                ExtractError::Io(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("json resource path is not valid UTF-8 ({})", path.display()),
                ))
            })?;
            Ok(JsonExtractor::new(resource, &options.json).into())
        }
    }
}

fn infer_format_from_path(path: &Path) -> ExtractResult<ExtractorFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ExtractError::UnsupportedFormat {
            message: format!(
                "cannot infer format: path has no extension ({})",
                path.display()
            ),
        })?;

    ExtractorFormat::from_extension(ext).ok_or_else(|| ExtractError::UnsupportedFormat {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}
