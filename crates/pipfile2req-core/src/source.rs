use serde::Deserialize;

/// Name pipenv gives the primary package index.
pub const DEFAULT_INDEX_NAME: &str = "pypi";

/// A package index declared in the manifest (`[[source]]` in a Pipfile,
/// `_meta.sources` in a lock file).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexSource {
    #[serde(default)]
    pub name: Option<String>,
    pub url: String,
}

impl IndexSource {
    pub fn new(name: Option<&str>, url: impl Into<String>) -> Self {
        Self {
            name: name.map(String::from),
            url: url.into(),
        }
    }

    /// True for the index that replaces pip's default rather than extending it.
    pub fn is_default(&self) -> bool {
        self.name.as_deref() == Some(DEFAULT_INDEX_NAME)
    }

    /// `--index-url=<url>` for the default index, `--extra-index-url=<url>` otherwise.
    pub fn as_line(&self) -> String {
        if self.is_default() {
            format!("--index-url={}", self.url)
        } else {
            format!("--extra-index-url={}", self.url)
        }
    }
}

/// Index override lines for `sources`, in manifest order.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::source::{IndexSource, index_lines};
///
/// let sources = [
///     IndexSource::new(Some("pypi"), "https://pypi.org/simple"),
///     IndexSource::new(Some("internal"), "https://pypi.internal/simple"),
/// ];
/// assert_eq!(
///     index_lines(&sources),
///     [
///         "--index-url=https://pypi.org/simple",
///         "--extra-index-url=https://pypi.internal/simple",
///     ]
/// );
/// ```
pub fn index_lines(sources: &[IndexSource]) -> Vec<String> {
    sources.iter().map(IndexSource::as_line).collect()
}
