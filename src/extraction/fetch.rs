//! Pluggable raw content retrieval for the JSON extractor.

use std::fs;
use std::io;

/// Retrieves the raw bytes of a resource (a file path, a URL, ...).
///
/// Closures `Fn(&str) -> io::Result<Vec<u8>>` implement this trait, which makes it easy to serve
/// in-memory content in tests or to plug in an HTTP client.
pub trait Fetch: Send + Sync {
    fn fetch(&self, resource: &str) -> io::Result<Vec<u8>>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> io::Result<Vec<u8>> + Send + Sync,
{
    fn fetch(&self, resource: &str) -> io::Result<Vec<u8>> {
        self(resource)
    }
}

/// Reads the resource as a local file. This is the default fetcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileFetcher;

impl Fetch for FileFetcher {
    fn fetch(&self, resource: &str) -> io::Result<Vec<u8>> {
        fs::read(resource)
    }
}
