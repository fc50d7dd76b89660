use crate::config::Section;
use pipfile2req_core::{IndexSource, RawEntry};
use std::fmt;

/// The two manifest shapes pipenv writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind {
    /// Declarative TOML manifest.
    Pipfile,
    /// Resolved JSON lock record.
    PipfileLock,
}

impl ManifestKind {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Pipfile => "Pipfile",
            Self::PipfileLock => "Pipfile.lock",
        }
    }

    /// Only lock files record artifact digests.
    pub fn has_hashes(self) -> bool {
        matches!(self, Self::PipfileLock)
    }

    /// Name of `section` in this manifest shape.
    pub fn section_key(self, section: Section) -> &'static str {
        match self {
            Self::Pipfile => section.pipfile_key(),
            Self::PipfileLock => section.lockfile_key(),
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// One section of a manifest, lowered into the untyped entry model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub kind: ManifestKind,
    pub section: Section,
    /// Entries in manifest order.
    pub packages: Vec<(String, RawEntry)>,
    /// Declared package indexes in manifest order.
    pub sources: Vec<IndexSource>,
}

/// Why a manifest parser rejected its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseFailure {
    /// The content is not valid in this serialization at all.
    Syntax(String),
    /// The content parsed but does not have the expected structure.
    Structure(String),
}
