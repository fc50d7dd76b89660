use crate::requirement::{Requirement, RequirementSource};
use std::fmt;

/// Renders [`Requirement`]s as requirements-file lines.
///
/// Line shape by source:
///
/// | Source   | Main token                                                   |
/// |----------|--------------------------------------------------------------|
/// | path     | `./pkg[extras]`                                              |
/// | VCS      | `git+<repo>@<ref>#egg=name[extras]&subdirectory=<dir>`       |
/// | URL      | `name[extras] @ <url>`                                       |
/// | registry | `name[extras]<specifier>`                                    |
///
/// followed by an optional `-e ` prefix, a `; <markers>` suffix and, when
/// enabled, one ` --hash=<digest>` per hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormatter {
    include_hashes: bool,
}

impl LineFormatter {
    pub fn new(include_hashes: bool) -> Self {
        Self { include_hashes }
    }

    pub fn format(&self, req: &Requirement) -> String {
        let mut line = String::new();

        if req.is_editable() {
            line.push_str("-e ");
        }

        match req.source() {
            RequirementSource::Path(path) => {
                line.push_str(path);
                if !req.extras().is_empty() {
                    line.push('[');
                    line.push_str(&req.extras().join(","));
                    line.push(']');
                }
            }
            RequirementSource::Vcs { .. } => {
                line.push_str(&vcs_url(req).unwrap_or_default());
            }
            RequirementSource::Url(url) => {
                line.push_str(&req.name_with_extras());
                line.push_str(" @ ");
                line.push_str(url);
            }
            RequirementSource::Registry(specifier) => {
                line.push_str(&req.name_with_extras());
                line.push_str(&specifier.to_string());
            }
        }

        if let Some(markers) = req.markers() {
            line.push_str("; ");
            line.push_str(&markers.to_string());
        }

        if self.include_hashes {
            for hash in req.hashes() {
                line.push_str(" --hash=");
                line.push_str(hash);
            }
        }

        line
    }
}

/// pip's VCS URL for a requirement, or `None` if it is not a VCS requirement.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::formatter::vcs_url;
/// use pipfile2req_core::requirement::Requirement;
/// use pipfile2req_core::types::{RawAttributeSet, RawEntry, RawValue};
///
/// let attrs: RawAttributeSet = [
///     ("hg", RawValue::from("https://hg.example.com/foo")),
/// ]
/// .into_iter()
/// .collect();
/// let req = Requirement::parse("foo", &RawEntry::Attributes(attrs)).unwrap();
///
/// assert_eq!(vcs_url(&req).as_deref(), Some("hg+https://hg.example.com/foo#egg=foo"));
/// ```
pub fn vcs_url(req: &Requirement) -> Option<String> {
    let RequirementSource::Vcs {
        vcs,
        repo,
        reference,
        subdirectory,
    } = req.source()
    else {
        return None;
    };

    let mut url = format!("{vcs}+{repo}");
    if let Some(reference) = reference {
        url.push('@');
        url.push_str(reference);
    }
    url.push_str("#egg=");
    url.push_str(&req.name_with_extras());
    if let Some(subdirectory) = subdirectory {
        url.push_str("&subdirectory=");
        url.push_str(subdirectory);
    }
    Some(url)
}

impl Requirement {
    /// Renders this requirement as a single requirements-file line.
    pub fn as_line(&self, include_hashes: bool) -> String {
        LineFormatter::new(include_hashes).format(self)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_line(false))
    }
}
