//! Pipfile (TOML) reading.
//!
//! ```toml
//! [[source]]
//! name = "pypi"
//! url = "https://pypi.org/simple"
//! verify_ssl = true
//!
//! [packages]
//! requests = "*"
//! flask = { version = ">=1.0", extras = ["async"] }
//!
//! [packages.mylib]
//! path = "."
//! editable = true
//! ```

use crate::config::Section;
use crate::manifest::{Manifest, ManifestKind, ParseFailure};
use pipfile2req_core::{IndexSource, RawAttributeSet, RawEntry, RawValue};
use toml_edit::{DocumentMut, Item, TableLike, Value};

/// Parser for declarative Pipfile manifests.
///
/// Uses `toml_edit` so entries come out in the order they were written.
///
/// # Examples
///
/// ```
/// use pipfile2req::config::Section;
/// use pipfile2req::pipfile::PipfileParser;
///
/// let content = r#"
/// [packages]
/// requests = "*"
/// flask = { version = ">=1.0", extras = ["async"] }
/// "#;
///
/// let manifest = PipfileParser::new().parse_content(content, Section::Default).unwrap();
/// assert_eq!(manifest.packages.len(), 2);
/// assert_eq!(manifest.packages[0].0, "requests");
/// ```
#[derive(Debug, Default)]
pub struct PipfileParser;

impl PipfileParser {
    pub fn new() -> Self {
        Self
    }

    /// Parses Pipfile content and extracts `section` and the `[[source]]` list.
    ///
    /// A missing section yields no packages.
    pub fn parse_content(&self, content: &str, section: Section) -> Result<Manifest, ParseFailure> {
        let doc = content
            .parse::<DocumentMut>()
            .map_err(|e| ParseFailure::Syntax(e.to_string()))?;

        let key = section.pipfile_key();
        let packages = match doc.get(key) {
            Some(item) => {
                let table = item
                    .as_table_like()
                    .ok_or_else(|| ParseFailure::Structure(format!("[{key}] must be a table")))?;
                table
                    .iter()
                    .map(|(name, value)| Ok((name.to_string(), entry_from_item(name, value)?)))
                    .collect::<Result<Vec<_>, ParseFailure>>()?
            }
            None => {
                tracing::debug!("Pipfile has no [{}] section", key);
                Vec::new()
            }
        };

        let sources = match doc.get("source") {
            Some(item) => parse_sources(item)?,
            None => Vec::new(),
        };

        Ok(Manifest {
            kind: ManifestKind::Pipfile,
            section,
            packages,
            sources,
        })
    }
}

fn entry_from_item(name: &str, item: &Item) -> Result<RawEntry, ParseFailure> {
    if let Some(version) = item.as_str() {
        return Ok(RawEntry::Shorthand(version.to_string()));
    }
    if let Some(table) = item.as_table_like() {
        return Ok(RawEntry::Attributes(table_to_raw(table)));
    }
    Err(ParseFailure::Structure(format!(
        "dependency '{}' must be a version string or a table",
        name
    )))
}

/// Accepts both `[[source]]` and `source = [{ ... }]`.
fn parse_sources(item: &Item) -> Result<Vec<IndexSource>, ParseFailure> {
    let tables: Vec<&dyn TableLike> = if let Some(array) = item.as_array_of_tables() {
        array.iter().map(|t| t as &dyn TableLike).collect()
    } else if let Some(array) = item.as_array() {
        array
            .iter()
            .map(|v| {
                v.as_inline_table()
                    .map(|t| t as &dyn TableLike)
                    .ok_or_else(|| ParseFailure::Structure("source entries must be tables".into()))
            })
            .collect::<Result<_, _>>()?
    } else {
        return Err(ParseFailure::Structure(
            "source must be an array of tables".into(),
        ));
    };

    let mut sources = Vec::with_capacity(tables.len());
    for table in tables {
        let name = table.get("name").and_then(Item::as_str);
        match table.get("url").and_then(Item::as_str) {
            Some(url) => sources.push(IndexSource::new(name, url)),
            None => tracing::warn!("Skipping source {:?} without a url", name.unwrap_or("<unnamed>")),
        }
    }
    Ok(sources)
}

fn table_to_raw(table: &dyn TableLike) -> RawAttributeSet {
    table
        .iter()
        .filter_map(|(key, item)| match item_to_raw(item) {
            Some(value) => Some((key, value)),
            None => {
                tracing::debug!("Ignoring attribute '{}' with unsupported value type", key);
                None
            }
        })
        .collect()
}

fn item_to_raw(item: &Item) -> Option<RawValue> {
    if let Some(table) = item.as_table_like() {
        return Some(RawValue::Table(table_to_raw(table)));
    }
    item.as_value().and_then(value_to_raw)
}

fn value_to_raw(value: &Value) -> Option<RawValue> {
    match value {
        Value::String(s) => Some(RawValue::String(s.value().clone())),
        Value::Boolean(b) => Some(RawValue::Bool(*b.value())),
        Value::Array(items) => items
            .iter()
            .map(value_to_raw)
            .collect::<Option<Vec<_>>>()
            .map(RawValue::List),
        Value::InlineTable(table) => Some(RawValue::Table(table_to_raw(table))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str, section: Section) -> Manifest {
        PipfileParser::new().parse_content(content, section).unwrap()
    }

    #[test]
    fn test_shorthand_and_inline_tables() {
        let manifest = parse(
            r#"
[packages]
requests = "*"
flask = { version = ">=1.0", extras = ["async"] }
"#,
            Section::Default,
        );

        assert_eq!(manifest.kind, ManifestKind::Pipfile);
        assert_eq!(manifest.packages.len(), 2);
        assert_eq!(manifest.packages[0], ("requests".into(), RawEntry::from("*")));

        let RawEntry::Attributes(attrs) = &manifest.packages[1].1 else {
            panic!("expected attribute table");
        };
        assert_eq!(attrs.get("version"), Some(&RawValue::from(">=1.0")));
        assert_eq!(attrs.get("extras"), Some(&RawValue::from(vec!["async"])));
    }

    #[test]
    fn test_sub_table_entry() {
        let manifest = parse(
            r#"
[packages]
requests = "*"

[packages.mylib]
path = "."
editable = true
"#,
            Section::Default,
        );

        assert_eq!(manifest.packages.len(), 2);
        let (name, RawEntry::Attributes(attrs)) = &manifest.packages[1] else {
            panic!("expected attribute table");
        };
        assert_eq!(name, "mylib");
        assert_eq!(attrs.get("editable"), Some(&RawValue::Bool(true)));
    }

    #[test]
    fn test_dev_section() {
        let content = r#"
[packages]
requests = "*"

[dev-packages]
pytest = ">=7.0"
mypy = "*"
"#;
        let manifest = parse(content, Section::Develop);
        let names: Vec<_> = manifest.packages.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["pytest", "mypy"]);
    }

    #[test]
    fn test_missing_section_is_empty() {
        let manifest = parse("[packages]\nrequests = \"*\"\n", Section::Develop);
        assert!(manifest.packages.is_empty());
    }

    #[test]
    fn test_sources() {
        let manifest = parse(
            r#"
[[source]]
name = "pypi"
url = "https://pypi.org/simple"
verify_ssl = true

[[source]]
name = "internal"
url = "https://pypi.internal/simple"

[[source]]
name = "broken"
"#,
            Section::Default,
        );

        assert_eq!(
            manifest.sources,
            [
                IndexSource::new(Some("pypi"), "https://pypi.org/simple"),
                IndexSource::new(Some("internal"), "https://pypi.internal/simple"),
            ]
        );
    }

    #[test]
    fn test_inline_source_array() {
        let manifest = parse(
            r#"source = [{ name = "pypi", url = "https://pypi.org/simple" }]"#,
            Section::Default,
        );
        assert_eq!(manifest.sources.len(), 1);
        assert!(manifest.sources[0].is_default());
    }

    #[test]
    fn test_unsupported_values_are_dropped() {
        let manifest = parse(
            "[packages]\nfoo = { version = \"*\", weight = 3 }\n",
            Section::Default,
        );
        let RawEntry::Attributes(attrs) = &manifest.packages[0].1 else {
            panic!("expected attribute table");
        };
        assert!(attrs.contains_key("version"));
        assert!(!attrs.contains_key("weight"));
    }

    #[test]
    fn test_invalid_entry_type() {
        let err = PipfileParser::new()
            .parse_content("[packages]\nfoo = 3\n", Section::Default)
            .unwrap_err();
        assert!(matches!(err, ParseFailure::Structure(msg) if msg.contains("foo")));
    }

    #[test]
    fn test_section_not_a_table() {
        let err = PipfileParser::new()
            .parse_content("packages = \"oops\"\n", Section::Default)
            .unwrap_err();
        assert!(matches!(err, ParseFailure::Structure(_)));
    }

    #[test]
    fn test_syntax_error() {
        let err = PipfileParser::new()
            .parse_content("[packages\n", Section::Default)
            .unwrap_err();
        assert!(matches!(err, ParseFailure::Syntax(_)));
    }
}
