//! Normalization of raw manifest entries into [`Requirement`]s.

use crate::error::{RequirementError, Result};
use crate::marker::MarkerTree;
use crate::specifier::Specifier;
use crate::types::{RawAttributeSet, RawEntry};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Environment-marker variables that may appear as top-level entry keys,
/// in the order their clauses are appended to the merged marker.
pub const ENVIRONMENT_KEYS: [&str; 11] = [
    "implementation_name",
    "implementation_version",
    "os_name",
    "platform_machine",
    "platform_release",
    "platform_system",
    "platform_version",
    "python_full_version",
    "platform_python_implementation",
    "python_version",
    "sys_platform",
];

const SCALAR_KEYS: [&str; 9] = [
    "version",
    "extras",
    "markers",
    "file",
    "path",
    "editable",
    "ref",
    "subdirectory",
    "hashes",
];

/// Version control systems pip can install from, in lookup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VcsKind {
    Git,
    Svn,
    Hg,
    Bzr,
}

impl VcsKind {
    pub const ALL: [Self; 4] = [Self::Git, Self::Svn, Self::Hg, Self::Bzr];

    /// Manifest key and URL scheme prefix for this VCS.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Svn => "svn",
            Self::Hg => "hg",
            Self::Bzr => "bzr",
        }
    }
}

impl fmt::Display for VcsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a requirement is installed from.
///
/// Exactly one source is chosen per entry. When an entry names several,
/// the precedence is `path`, then VCS, then `file`, then the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementSource {
    /// Package index with an optional version constraint.
    Registry(Specifier),
    /// Version-controlled checkout.
    Vcs {
        vcs: VcsKind,
        repo: String,
        reference: Option<String>,
        subdirectory: Option<String>,
    },
    /// Direct download URL.
    Url(String),
    /// Local directory or archive.
    Path(String),
}

/// A normalized manifest entry, ready to render as one requirements line.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::requirement::Requirement;
/// use pipfile2req_core::types::{RawAttributeSet, RawEntry, RawValue};
///
/// let attrs: RawAttributeSet = [
///     ("version", RawValue::from(">=1.0")),
///     ("extras", RawValue::from(vec!["test", "sec"])),
/// ]
/// .into_iter()
/// .collect();
///
/// let req = Requirement::parse("foo", &RawEntry::Attributes(attrs)).unwrap();
/// assert_eq!(req.as_line(false), "foo[test,sec]>=1.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    name: String,
    extras: Vec<String>,
    markers: Option<MarkerTree>,
    source: RequirementSource,
    hashes: Vec<String>,
    editable: bool,
}

impl Requirement {
    /// Normalizes one manifest entry.
    ///
    /// A shorthand entry is treated as `{ version = <shorthand> }`.
    /// Unrecognized keys (for example the lock file's `index`) are ignored.
    ///
    /// # Errors
    ///
    /// - [`RequirementError::EmptyName`] for a blank name
    /// - [`RequirementError::MalformedSpecifier`] for an invalid `version`
    /// - [`RequirementError::MalformedMarker`] for an unparsable marker fragment
    /// - [`RequirementError::AmbiguousSource`] when more than one VCS key is present
    /// - [`RequirementError::InvalidAttribute`] when a known key has the wrong value type
    pub fn parse(name: &str, entry: &RawEntry) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(RequirementError::EmptyName);
        }

        let attrs: Cow<'_, RawAttributeSet> = match entry {
            RawEntry::Shorthand(version) => {
                Cow::Owned([("version", version.as_str())].into_iter().collect())
            }
            RawEntry::Attributes(attrs) => Cow::Borrowed(attrs),
        };
        let fields = Fields { name, attrs: &attrs };

        for key in attrs.keys() {
            if !is_recognized(key) {
                tracing::debug!("Ignoring unrecognized attribute '{}' of '{}'", key, name);
            }
        }

        let specifier = match fields.string("version")? {
            Some(raw) => Specifier::parse(raw).map_err(|message| {
                RequirementError::MalformedSpecifier {
                    name: name.to_string(),
                    specifier: raw.to_string(),
                    message,
                }
            })?,
            None => Specifier::any(),
        };

        let mut extras: Vec<String> = Vec::new();
        for extra in fields.string_list("extras")?.unwrap_or_default() {
            if !extras.iter().any(|e| e == extra) {
                extras.push(extra.to_string());
            }
        }

        let vcs_keys: Vec<VcsKind> = VcsKind::ALL
            .into_iter()
            .filter(|vcs| attrs.contains_key(vcs.as_str()))
            .collect();
        if vcs_keys.len() > 1 {
            return Err(RequirementError::AmbiguousSource {
                name: name.to_string(),
                keys: vcs_keys.iter().map(|v| v.as_str().to_string()).collect(),
            });
        }

        let source = if let Some(path) = fields.non_empty_string("path")? {
            RequirementSource::Path(path.to_string())
        } else if let Some(&vcs) = vcs_keys.first() {
            let repo = fields
                .string(vcs.as_str())?
                .ok_or_else(|| RequirementError::invalid_attribute(name, vcs.as_str(), "a string"))?;
            RequirementSource::Vcs {
                vcs,
                repo: repo.to_string(),
                reference: fields.non_empty_string("ref")?.map(String::from),
                subdirectory: fields.non_empty_string("subdirectory")?.map(String::from),
            }
        } else if let Some(url) = fields.non_empty_string("file")? {
            RequirementSource::Url(url.to_string())
        } else {
            RequirementSource::Registry(specifier)
        };

        let markers = fields.markers()?;

        let hashes = fields
            .string_list("hashes")?
            .unwrap_or_default()
            .into_iter()
            .map(String::from)
            .collect();

        let editable = match attrs.get("editable") {
            Some(value) => value
                .as_bool()
                .ok_or_else(|| RequirementError::invalid_attribute(name, "editable", "a boolean"))?,
            None => false,
        };

        Ok(Self {
            name: name.to_string(),
            extras,
            markers,
            source,
            hashes,
            editable,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extras(&self) -> &[String] {
        &self.extras
    }

    pub fn markers(&self) -> Option<&MarkerTree> {
        self.markers.as_ref()
    }

    pub fn source(&self) -> &RequirementSource {
        &self.source
    }

    /// Version constraint, present only for registry requirements.
    pub fn specifier(&self) -> Option<&Specifier> {
        match &self.source {
            RequirementSource::Registry(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn hashes(&self) -> &[String] {
        &self.hashes
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// `name[extra1,extra2]`, or just the name when there are no extras.
    pub fn name_with_extras(&self) -> String {
        if self.extras.is_empty() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, self.extras.join(","))
        }
    }
}

fn is_recognized(key: &str) -> bool {
    SCALAR_KEYS.contains(&key)
        || ENVIRONMENT_KEYS.contains(&key)
        || VcsKind::ALL.iter().any(|vcs| vcs.as_str() == key)
}

/// Typed access to an entry's attributes, reporting shape errors against the
/// dependency name.
struct Fields<'a> {
    name: &'a str,
    attrs: &'a RawAttributeSet,
}

impl<'a> Fields<'a> {
    fn string(&self, key: &str) -> Result<Option<&'a str>> {
        self.attrs
            .get(key)
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| RequirementError::invalid_attribute(self.name, key, "a string"))
            })
            .transpose()
    }

    /// Like [`Self::string`], but an empty value counts as absent.
    fn non_empty_string(&self, key: &str) -> Result<Option<&'a str>> {
        Ok(self.string(key)?.filter(|value| !value.is_empty()))
    }

    fn string_list(&self, key: &str) -> Result<Option<Vec<&'a str>>> {
        self.attrs
            .get(key)
            .map(|value| {
                value.as_string_list().ok_or_else(|| {
                    RequirementError::invalid_attribute(self.name, key, "a list of strings")
                })
            })
            .transpose()
    }

    /// Collects the explicit `markers` value followed by every environment key
    /// (rendered as `{key}{value}`) and conjoins them.
    fn markers(&self) -> Result<Option<MarkerTree>> {
        let mut fragments: Vec<Cow<'a, str>> = Vec::new();
        if let Some(markers) = self.string("markers")? {
            fragments.push(Cow::Borrowed(markers));
        }
        for key in ENVIRONMENT_KEYS {
            if let Some(value) = self.string(key)? {
                fragments.push(Cow::Owned(format!("{key}{value}")));
            }
        }

        let mut trees = Vec::with_capacity(fragments.len());
        for fragment in &fragments {
            let tree = MarkerTree::from_str(fragment).map_err(|e| {
                RequirementError::MalformedMarker {
                    name: self.name.to_string(),
                    marker: fragment.to_string(),
                    message: e.to_string(),
                }
            })?;
            trees.push(tree);
        }

        Ok(MarkerTree::and(trees))
    }
}
