use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use record_extract::extraction::{Extractor, Fetch, JsonExtractor, JsonOptions};
use record_extract::types::{Context, ExtractionContext};
use record_extract::ExtractErrorKind;
use serde_json::{Value, json};

const DUCKS: &str = r#"{"items":[{"name":"Riri"},{"name":"Fifi"},{"name":"Loulou"}]}"#;

/// Serves fixed content and counts how often it was asked for it.
struct CountingFetcher {
    content: &'static str,
    calls: AtomicUsize,
}

impl CountingFetcher {
    fn new(content: &'static str) -> Arc<Self> {
        Arc::new(Self {
            content,
            calls: AtomicUsize::new(0),
        })
    }
}

impl Fetch for CountingFetcher {
    fn fetch(&self, _resource: &str) -> io::Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.content.as_bytes().to_vec())
    }
}

fn with_content(fetcher: &Arc<CountingFetcher>, path: Option<&str>) -> JsonExtractor {
    let opts = JsonOptions {
        path: path.map(str::to_owned),
        fetcher: Some(fetcher.clone() as Arc<dyn Fetch>),
        ..Default::default()
    };
    JsonExtractor::new("memory://ducks.json", &opts)
}

fn collect(ex: &mut JsonExtractor) -> Vec<Value> {
    ex.records().map(|r| r.unwrap()).collect()
}

#[test]
fn extract_json_from_path_with_wildcard() {
    let opts = JsonOptions {
        path: Some("items.*.name".to_string()),
        ..Default::default()
    };
    let mut ex = JsonExtractor::new("tests/fixtures/ducks.json", &opts);

    assert_eq!(collect(&mut ex), vec![json!("Riri"), json!("Fifi"), json!("Loulou")]);
    assert_eq!(ex.count().unwrap(), 3);
}

#[test]
fn literal_index_segment_selects_one_element() {
    let fetcher = CountingFetcher::new(DUCKS);
    let mut ex = with_content(&fetcher, Some("items.0"));
    assert_eq!(collect(&mut ex), vec![json!({"name": "Riri"})]);
}

#[test]
fn top_level_array_yields_its_elements() {
    let fetcher = CountingFetcher::new(r#"[1, "two", {"three": 3}]"#);
    let mut ex = with_content(&fetcher, None);
    assert_eq!(collect(&mut ex), vec![json!(1), json!("two"), json!({"three": 3})]);
}

#[test]
fn object_document_without_path_is_a_single_record() {
    let mut ex = JsonExtractor::new("tests/fixtures/settings.json", &JsonOptions::default());
    assert_eq!(ex.count().unwrap(), 1);
    assert_eq!(collect(&mut ex), vec![json!({"name": "settings", "enabled": true})]);
}

#[test]
fn scalar_document_without_path_is_a_single_record() {
    let fetcher = CountingFetcher::new("42");
    let mut ex = with_content(&fetcher, None);
    assert_eq!(collect(&mut ex), vec![json!(42)]);
}

#[test]
fn construction_is_lazy_and_load_happens_once() {
    let fetcher = CountingFetcher::new(DUCKS);
    let mut ex = with_content(&fetcher, Some("items.*.name"));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    assert_eq!(ex.key(), 0);

    assert_eq!(ex.count().unwrap(), 3);
    assert_eq!(ex.count().unwrap(), 3);
    ex.rewind().unwrap();
    ex.next().unwrap();
    let _ = collect(&mut ex);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn cursor_contract_matches_csv() {
    let fetcher = CountingFetcher::new(DUCKS);
    let mut ex = with_content(&fetcher, Some("items.*.name"));

    ex.seek(2).unwrap();
    assert_eq!(ex.key(), 2);
    assert_eq!(ex.current().unwrap(), Some(json!("Loulou")));

    ex.next().unwrap();
    assert!(!ex.valid().unwrap());
    assert_eq!(ex.current().unwrap(), None);
    ex.next().unwrap();
    assert_eq!(ex.key(), 3);

    ex.seek(99).unwrap();
    assert!(!ex.valid().unwrap());
    assert_eq!(ex.key(), 3);

    ex.rewind().unwrap();
    assert_eq!(ex.current().unwrap(), Some(json!("Riri")));
}

#[test]
fn extract_returns_current_and_never_sets_identifier() {
    struct Panicking;
    impl Context for Panicking {
        fn set_identifier(&mut self, _identifier: &str) {
            panic!("json extraction must not set identifiers");
        }
    }

    let fetcher = CountingFetcher::new(DUCKS);
    let mut ex = with_content(&fetcher, Some("items.*.name"));

    assert_eq!(ex.extract(&mut Panicking).unwrap(), Some(json!("Riri")));
    assert_eq!(ex.key(), 1);
    let mut ctx = ExtractionContext::new();
    assert_eq!(ex.extract(&mut ctx).unwrap(), Some(json!("Fifi")));
    assert_eq!(ctx.identifier(), None);
}

#[test]
fn malformed_json_fails_on_first_access_naming_the_resource() {
    let mut ex = JsonExtractor::new("tests/fixtures/broken.json", &JsonOptions::default());

    let err = ex.valid().unwrap_err();
    assert_eq!(err.kind(), ExtractErrorKind::Parse);
    assert!(err.to_string().contains("tests/fixtures/broken.json could not be parsed as json"));
}

#[test]
fn null_document_is_rejected_like_a_parse_failure() {
    let mut ex = JsonExtractor::new("tests/fixtures/null.json", &JsonOptions::default());
    let err = ex.count().unwrap_err();
    assert_eq!(err.kind(), ExtractErrorKind::Parse);
}

#[test]
fn fetch_failure_is_an_io_error() {
    let gone: Arc<dyn Fetch> = Arc::new(|resource: &str| -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::NotFound, format!("{resource} is gone")))
    });
    let opts = JsonOptions {
        fetcher: Some(gone),
        ..Default::default()
    };
    let mut ex = JsonExtractor::new("https://example.invalid/feed.json", &opts);

    let err = ex.rewind().unwrap_err();
    assert_eq!(err.kind(), ExtractErrorKind::Io);
    assert!(err.to_string().contains("https://example.invalid/feed.json could not be fetched"));
}

#[test]
fn missing_file_is_an_io_error() {
    let mut ex = JsonExtractor::new("tests/fixtures/does_not_exist.json", &JsonOptions::default());
    assert_eq!(ex.current().unwrap_err().kind(), ExtractErrorKind::Io);
}
