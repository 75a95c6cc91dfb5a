use std::fmt;
use std::sync::Arc;

/// Ordered key/value attributes attached to a log event.
pub type Attributes<'a> = [(&'a str, String)];

/// Logging capability injected into extractors.
///
/// Implementors can forward events to a logging framework, a file, or a test recorder.
pub trait ExtractionLogger: Send + Sync {
    /// Called for debug-level extraction events (construction, cursor moves, counts, loads).
    fn debug(&self, message: &str, attributes: &Attributes<'_>);
}

/// Discards every event. Used when no logger is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl ExtractionLogger for NullLogger {
    fn debug(&self, _message: &str, _attributes: &Attributes<'_>) {}
}

/// Forwards events to [`tracing`] at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ExtractionLogger for TracingLogger {
    fn debug(&self, message: &str, attributes: &Attributes<'_>) {
        tracing::debug!(attributes = %DisplayAttributes(attributes), "{message}");
    }
}

/// Logs extraction events to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdErrLogger;

impl ExtractionLogger for StdErrLogger {
    fn debug(&self, message: &str, attributes: &Attributes<'_>) {
        eprintln!("[extract][debug] {message} {}", DisplayAttributes(attributes));
    }
}

/// A logger that fans out events to a list of loggers.
#[derive(Default)]
pub struct CompositeLogger {
    loggers: Vec<Arc<dyn ExtractionLogger>>,
}

impl CompositeLogger {
    /// Create a new composite logger from a list of loggers.
    pub fn new(loggers: Vec<Arc<dyn ExtractionLogger>>) -> Self {
        Self { loggers }
    }
}

impl fmt::Debug for CompositeLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeLogger")
            .field("loggers_len", &self.loggers.len())
            .finish()
    }
}

impl ExtractionLogger for CompositeLogger {
    fn debug(&self, message: &str, attributes: &Attributes<'_>) {
        for l in &self.loggers {
            l.debug(message, attributes);
        }
    }
}

pub(crate) fn logger_or_null(logger: Option<&Arc<dyn ExtractionLogger>>) -> Arc<dyn ExtractionLogger> {
    match logger {
        Some(l) => Arc::clone(l),
        None => Arc::new(NullLogger),
    }
}

struct DisplayAttributes<'a, 'b>(&'a Attributes<'b>);

impl fmt::Display for DisplayAttributes<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}
