//! Whole-manifest conversion.

use crate::config::ConvertOptions;
use crate::error::{ConvertError, Result};
use crate::loader::{load_manifest, locate_manifest};
use crate::manifest::{Manifest, ManifestKind};
use pipfile2req_core::{LineFormatter, Requirement, index_lines};
use std::fmt;
use std::path::Path;

/// Non-fatal condition found during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Hashes were requested but the manifest does not record them.
    HashesUnavailable { kind: ManifestKind },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HashesUnavailable { kind } => write!(
                f,
                "{kind} is given, the hashes flag won't take effect"
            ),
        }
    }
}

/// Output of a conversion: requirement lines followed by index lines, plus
/// any diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub lines: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Converts an already loaded manifest section.
///
/// Any invalid entry fails the whole conversion.
///
/// # Examples
///
/// ```
/// use pipfile2req::config::{ConvertOptions, Section};
/// use pipfile2req::convert::{Diagnostic, convert_manifest};
/// use pipfile2req::manifest::ManifestKind;
/// use pipfile2req::pipfile::PipfileParser;
///
/// let manifest = PipfileParser::new()
///     .parse_content("[packages]\nrequests = \">=2.0\"\n", Section::Default)
///     .unwrap();
/// let options = ConvertOptions { hashes: true, ..Default::default() };
///
/// let conversion = convert_manifest(&manifest, &options).unwrap();
/// assert_eq!(conversion.lines, ["requests>=2.0"]);
/// assert_eq!(
///     conversion.diagnostics,
///     [Diagnostic::HashesUnavailable { kind: ManifestKind::Pipfile }]
/// );
/// ```
pub fn convert_manifest(manifest: &Manifest, options: &ConvertOptions) -> Result<Conversion> {
    let mut diagnostics = Vec::new();

    let include_hashes = if options.hashes && !manifest.kind.has_hashes() {
        diagnostics.push(Diagnostic::HashesUnavailable {
            kind: manifest.kind,
        });
        false
    } else {
        options.hashes
    };

    let formatter = LineFormatter::new(include_hashes);
    let mut lines = manifest
        .packages
        .iter()
        .map(|(name, entry)| {
            Requirement::parse(name, entry)
                .map(|req| formatter.format(&req))
                .map_err(|source| ConvertError::Requirement {
                    section: manifest.kind.section_key(manifest.section).to_string(),
                    source,
                })
        })
        .collect::<Result<Vec<_>>>()?;

    if options.sources {
        lines.extend(index_lines(&manifest.sources));
    }

    Ok(Conversion { lines, diagnostics })
}

/// Locates, loads and converts the manifest for `project`.
///
/// See [`locate_manifest`] for how `file` is resolved.
pub fn convert_pipfile_or_lock(
    project: &Path,
    file: Option<&Path>,
    options: &ConvertOptions,
) -> Result<Conversion> {
    let path = locate_manifest(project, file)?;
    let manifest = load_manifest(&path, options.section())?;
    tracing::debug!(
        "Converting {} entries from {} ({})",
        manifest.packages.len(),
        path.display(),
        manifest.kind
    );
    convert_manifest(&manifest, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Section;
    use crate::lockfile::PipfileLockParser;
    use crate::pipfile::PipfileParser;
    use pipfile2req_core::RequirementError;

    const LOCK: &str = r#"{
    "_meta": {"sources": [{"name": "pypi", "url": "https://pypi.org/simple"}]},
    "default": {
        "idna": {"hashes": ["sha256:111", "sha256:222"], "version": "==3.4"}
    },
    "develop": {}
}"#;

    fn lock_manifest() -> Manifest {
        PipfileLockParser::new()
            .parse_content(LOCK, Section::Default)
            .unwrap()
    }

    #[test]
    fn test_lockfile_with_hashes() {
        let options = ConvertOptions {
            hashes: true,
            ..Default::default()
        };
        let conversion = convert_manifest(&lock_manifest(), &options).unwrap();
        assert_eq!(
            conversion.lines,
            ["idna==3.4 --hash=sha256:111 --hash=sha256:222"]
        );
        assert!(conversion.diagnostics.is_empty());
    }

    #[test]
    fn test_lockfile_without_hashes() {
        let conversion = convert_manifest(&lock_manifest(), &ConvertOptions::default()).unwrap();
        assert_eq!(conversion.lines, ["idna==3.4"]);
    }

    #[test]
    fn test_sources_appended_last() {
        let options = ConvertOptions {
            sources: true,
            ..Default::default()
        };
        let conversion = convert_manifest(&lock_manifest(), &options).unwrap();
        assert_eq!(
            conversion.lines,
            ["idna==3.4", "--index-url=https://pypi.org/simple"]
        );
    }

    #[test]
    fn test_pipfile_hashes_downgraded_to_diagnostic() {
        let manifest = PipfileParser::new()
            .parse_content(
                "[packages]\nfoo = { version = \"==1.0\", hashes = [\"sha256:1\"] }\n",
                Section::Default,
            )
            .unwrap();
        let options = ConvertOptions {
            hashes: true,
            ..Default::default()
        };
        let conversion = convert_manifest(&manifest, &options).unwrap();
        assert_eq!(conversion.lines, ["foo==1.0"]);
        assert_eq!(
            conversion.diagnostics[0].to_string(),
            "Pipfile is given, the hashes flag won't take effect"
        );
    }

    #[test]
    fn test_bad_entry_fails_whole_conversion() {
        let manifest = PipfileParser::new()
            .parse_content(
                "[dev-packages]\ngood = \"*\"\nbad = \">=>1\"\n",
                Section::Develop,
            )
            .unwrap();
        let err = convert_manifest(&manifest, &ConvertOptions::default()).unwrap_err();
        match err {
            ConvertError::Requirement { section, source } => {
                assert_eq!(section, "dev-packages");
                assert!(matches!(source, RequirementError::MalformedSpecifier { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
