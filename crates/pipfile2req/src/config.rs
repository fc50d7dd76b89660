use serde::Deserialize;

/// Options controlling one conversion.
///
/// All fields default to `false`, which converts the default section of
/// the manifest without hashes or index lines.
///
/// # Examples
///
/// ```
/// use pipfile2req::config::{ConvertOptions, Section};
///
/// let options: ConvertOptions = serde_json::from_str(r#"{"dev": true}"#).unwrap();
/// assert_eq!(options.section(), Section::Develop);
/// assert!(!options.hashes);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ConvertOptions {
    /// Append `--hash=` options (lock files only).
    #[serde(default)]
    pub hashes: bool,
    /// Convert the development section instead of the default one.
    #[serde(default)]
    pub dev: bool,
    /// Append `--index-url` / `--extra-index-url` lines.
    #[serde(default)]
    pub sources: bool,
}

impl ConvertOptions {
    pub fn section(&self) -> Section {
        if self.dev {
            Section::Develop
        } else {
            Section::Default
        }
    }
}

/// Which dependency group of the manifest to convert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    #[default]
    Default,
    Develop,
}

impl Section {
    /// Table name in a Pipfile.
    pub fn pipfile_key(self) -> &'static str {
        match self {
            Self::Default => "packages",
            Self::Develop => "dev-packages",
        }
    }

    /// Object key in a Pipfile.lock.
    pub fn lockfile_key(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Develop => "develop",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(!options.hashes && !options.dev && !options.sources);
        assert_eq!(options.section(), Section::Default);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: ConvertOptions = serde_json::from_str(r#"{"hashes": true}"#).unwrap();
        assert!(options.hashes);
        assert!(!options.sources);
    }

    #[test]
    fn test_section_keys() {
        assert_eq!(Section::Default.pipfile_key(), "packages");
        assert_eq!(Section::Develop.pipfile_key(), "dev-packages");
        assert_eq!(Section::Default.lockfile_key(), "default");
        assert_eq!(Section::Develop.lockfile_key(), "develop");
    }
}
