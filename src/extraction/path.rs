//! Dotted access paths and the flattening walk used by the JSON extractor.
//!
//! Given
//!
//! ```json
//! {"items": [{"name": "Riri"}, {"name": "Fifi"}, {"name": "Loulou"}]}
//! ```
//!
//! the path `items.*.name` selects every name:
//!
//! ```rust
//! use record_extract::extraction::path::AccessPath;
//! use serde_json::json;
//!
//! let doc = json!({"items": [{"name": "Riri"}, {"name": "Fifi"}, {"name": "Loulou"}]});
//! let names = AccessPath::parse("items.*.name").flatten(&doc);
//! assert_eq!(names, vec![json!("Riri"), json!("Fifi"), json!("Loulou")]);
//! ```

use std::fmt;

use serde_json::Value;

/// One segment of an [`AccessPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `*`: matches every key of an object and every index of an array.
    Wildcard,
    /// Matches an object key by equality, or an array index by its decimal form.
    Literal(String),
}

impl PathSegment {
    fn matches(&self, key: ChildKey<'_>) -> bool {
        match (self, key) {
            (PathSegment::Wildcard, _) => true,
            (PathSegment::Literal(s), ChildKey::Name(name)) => s == name,
            (PathSegment::Literal(s), ChildKey::Index(idx)) => *s == idx.to_string(),
        }
    }
}

/// A parsed dotted path such as `nodes.*.node`. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPath {
    segments: Vec<PathSegment>,
}

impl AccessPath {
    /// Split `path` on `.`; a segment equal to `*` becomes [`PathSegment::Wildcard`].
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('.')
            .map(|s| match s {
                "*" => PathSegment::Wildcard,
                other => PathSegment::Literal(other.to_owned()),
            })
            .collect();
        Self { segments }
    }

    /// Segments in path order.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Collect every node selected by this path, in document order.
    ///
    /// Nodes matched by the last segment are collected; a matched array contributes its elements
    /// rather than itself. Branches that do not match are skipped, and branches that run out of
    /// depth before the path does contribute nothing.
    pub fn flatten(&self, root: &Value) -> Vec<Value> {
        let mut out = Vec::new();
        self.collect(root, 0, &mut out);
        out
    }

    fn collect(&self, node: &Value, level: usize, out: &mut Vec<Value>) {
        let Some(segment) = self.segments.get(level) else {
            return;
        };
        let is_last = level + 1 == self.segments.len();

        for (key, child) in children(node) {
            if !segment.matches(key) {
                continue;
            }
            if is_last {
                match child {
                    Value::Array(items) => out.extend(items.iter().cloned()),
                    other => out.push(other.clone()),
                }
            } else if is_container(child) {
                self.collect(child, level + 1, out);
            }
        }
    }
}

impl From<&str> for AccessPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            match segment {
                PathSegment::Wildcard => f.write_str("*")?,
                PathSegment::Literal(s) => f.write_str(s)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum ChildKey<'a> {
    Name(&'a str),
    Index(usize),
}

fn is_container(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

/// Direct children of `node` in document order; scalars have none.
fn children(node: &Value) -> Box<dyn Iterator<Item = (ChildKey<'_>, &Value)> + '_> {
    match node {
        Value::Object(map) => Box::new(map.iter().map(|(k, v)| (ChildKey::Name(k.as_str()), v))),
        Value::Array(items) => Box::new(items.iter().enumerate().map(|(i, v)| (ChildKey::Index(i), v))),
        _ => Box::new(std::iter::empty()),
    }
}
