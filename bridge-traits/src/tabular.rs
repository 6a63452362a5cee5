//! Tabular Data Source Abstraction
//!
//! The core never parses spreadsheets or CSV itself. A host hands over rows
//! through [`TabularSource`], already split into header-keyed field mappings
//! ([`RawRow`]). Values stay loosely typed: a source may deliver text only
//! (CSV) or typed JSON values (a pre-parsed feed), and the core converts them
//! to text on demand with [`value_to_text`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::Result;

/// Where a tabular catalog lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SourceLocation {
    /// Local file path
    File(PathBuf),
    /// HTTP(S) URL
    Url(String),
}

impl SourceLocation {
    /// Classify a user-supplied string: anything starting with `http://` or
    /// `https://` is a URL, everything else a file path.
    pub fn parse(raw: &str) -> Self {
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            SourceLocation::Url(raw.to_string())
        } else {
            SourceLocation::File(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File(path) => write!(f, "file:{}", path.display()),
            SourceLocation::Url(url) => write!(f, "{}", url),
        }
    }
}

/// One loosely-typed row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow {
    fields: BTreeMap<String, Value>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly useful in tests and in-memory sources.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text form of a field, or `None` when the key is absent or `null`.
    ///
    /// An empty string is returned as `Some("")`; callers decide whether an
    /// empty value counts as missing.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(value_to_text)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn into_fields(self) -> BTreeMap<String, Value> {
        self.fields
    }
}

impl From<BTreeMap<String, Value>> for RawRow {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Convert a loosely-typed value to its display text.
///
/// Numbers use their shortest decimal rendering (`2.5` stays `"2.5"`),
/// booleans become `"true"`/`"false"`, nested arrays and objects fall back
/// to their JSON text. `null` has no text.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Source of raw catalog rows.
///
/// Implementations:
/// - Desktop: CSV from a local file or an HTTP(S) URL (`bridge-desktop`)
/// - Tests / embedded data: [`InMemoryTabularSource`]
///
/// # Contract
///
/// `fetch_rows` completes exactly once per call, either with every data row
/// (header row excluded, empty lines skipped) or with an error describing why
/// the source could not be read or parsed. Implementations must not retry on
/// their own.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::tabular::TabularSource;
///
/// async fn count_rows(source: &dyn TabularSource) -> Result<usize> {
///     Ok(source.fetch_rows().await?.len())
/// }
/// ```
#[async_trait]
pub trait TabularSource: Send + Sync {
    /// Fetch and parse every data row.
    async fn fetch_rows(&self) -> Result<Vec<RawRow>>;

    /// Short description of where rows come from, used in logs and events.
    fn describe(&self) -> String;
}

/// Tabular source backed by rows already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTabularSource {
    label: String,
    rows: Vec<RawRow>,
}

impl InMemoryTabularSource {
    pub fn new(label: impl Into<String>, rows: Vec<RawRow>) -> Self {
        Self {
            label: label.into(),
            rows,
        }
    }
}

#[async_trait]
impl TabularSource for InMemoryTabularSource {
    async fn fetch_rows(&self) -> Result<Vec<RawRow>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.label)
    }
}
