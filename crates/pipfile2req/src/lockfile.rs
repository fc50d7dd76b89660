//! Pipfile.lock (JSON) reading.
//!
//! ```json
//! {
//!   "_meta": {
//!     "sources": [{ "name": "pypi", "url": "https://pypi.org/simple", "verify_ssl": true }]
//!   },
//!   "default": {
//!     "requests": {
//!       "hashes": ["sha256:..."],
//!       "index": "pypi",
//!       "version": "==2.31.0"
//!     }
//!   },
//!   "develop": {}
//! }
//! ```

use crate::config::Section;
use crate::manifest::{Manifest, ManifestKind, ParseFailure};
use pipfile2req_core::{IndexSource, RawAttributeSet, RawEntry, RawValue};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Pipfile.lock structure (partial, only fields we need).
#[derive(Debug, Deserialize)]
struct PipfileLock {
    #[serde(rename = "_meta", default)]
    meta: LockMeta,
    #[serde(default)]
    default: Map<String, Value>,
    #[serde(default)]
    develop: Map<String, Value>,
}

#[derive(Debug, Default, Deserialize)]
struct LockMeta {
    #[serde(default)]
    sources: Vec<LockSource>,
}

#[derive(Debug, Deserialize)]
struct LockSource {
    name: Option<String>,
    url: Option<String>,
}

/// Parser for resolved Pipfile.lock records.
///
/// # Examples
///
/// ```
/// use pipfile2req::config::Section;
/// use pipfile2req::lockfile::PipfileLockParser;
///
/// let content = r#"{
///     "_meta": {"sources": []},
///     "default": {"requests": {"version": "==2.31.0", "hashes": ["sha256:abc"]}},
///     "develop": {}
/// }"#;
///
/// let manifest = PipfileLockParser::new().parse_content(content, Section::Default).unwrap();
/// assert_eq!(manifest.packages.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct PipfileLockParser;

impl PipfileLockParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_content(&self, content: &str, section: Section) -> Result<Manifest, ParseFailure> {
        let value: Value =
            serde_json::from_str(content).map_err(|e| ParseFailure::Syntax(e.to_string()))?;
        let lock: PipfileLock =
            serde_json::from_value(value).map_err(|e| ParseFailure::Structure(e.to_string()))?;

        let entries = match section {
            Section::Default => lock.default,
            Section::Develop => lock.develop,
        };

        let packages = entries
            .into_iter()
            .map(|(name, value)| {
                let entry = entry_from_json(&name, &value)?;
                Ok((name, entry))
            })
            .collect::<Result<Vec<_>, ParseFailure>>()?;

        Ok(Manifest {
            kind: ManifestKind::PipfileLock,
            section,
            packages,
            sources: index_sources(lock.meta.sources),
        })
    }
}

fn index_sources(sources: Vec<LockSource>) -> Vec<IndexSource> {
    sources
        .into_iter()
        .filter_map(|source| match source.url {
            Some(url) => Some(IndexSource::new(source.name.as_deref(), url)),
            None => {
                tracing::warn!(
                    "Skipping source {:?} without a url",
                    source.name.as_deref().unwrap_or("<unnamed>")
                );
                None
            }
        })
        .collect()
}

fn entry_from_json(name: &str, value: &Value) -> Result<RawEntry, ParseFailure> {
    match value {
        Value::String(version) => Ok(RawEntry::Shorthand(version.clone())),
        Value::Object(object) => Ok(RawEntry::Attributes(object_to_raw(object))),
        _ => Err(ParseFailure::Structure(format!(
            "dependency '{}' must be an object",
            name
        ))),
    }
}

fn object_to_raw(object: &Map<String, Value>) -> RawAttributeSet {
    object
        .iter()
        .filter_map(|(key, value)| match json_to_raw(value) {
            Some(raw) => Some((key.as_str(), raw)),
            None => {
                tracing::debug!("Ignoring attribute '{}' with unsupported value type", key);
                None
            }
        })
        .collect()
}

fn json_to_raw(value: &Value) -> Option<RawValue> {
    match value {
        Value::String(s) => Some(RawValue::String(s.clone())),
        Value::Bool(b) => Some(RawValue::Bool(*b)),
        Value::Array(items) => items
            .iter()
            .map(json_to_raw)
            .collect::<Option<Vec<_>>>()
            .map(RawValue::List),
        Value::Object(object) => Some(RawValue::Table(object_to_raw(object))),
        Value::Null | Value::Number(_) => None,
    }
}
