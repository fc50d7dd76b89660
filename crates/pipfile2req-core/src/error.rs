use thiserror::Error;

/// Errors raised while normalizing a single manifest entry.
///
/// Every variant carries the dependency name so a failure in a large
/// manifest points straight at the offending entry.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::error::RequirementError;
///
/// let error = RequirementError::MalformedSpecifier {
///     name: "requests".into(),
///     specifier: ">=>1.0".into(),
///     message: "unexpected character".into(),
/// };
/// assert!(error.to_string().contains("requests"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequirementError {
    #[error("dependency name must not be empty")]
    EmptyName,

    #[error("invalid version specifier '{specifier}' for {name}: {message}")]
    MalformedSpecifier {
        name: String,
        specifier: String,
        message: String,
    },

    #[error("invalid environment marker '{marker}' for {name}: {message}")]
    MalformedMarker {
        name: String,
        marker: String,
        message: String,
    },

    #[error("ambiguous source for {name}: more than one VCS key given ({})", keys.join(", "))]
    AmbiguousSource { name: String, keys: Vec<String> },

    #[error("invalid value for '{key}' in {name}: expected {expected}")]
    InvalidAttribute {
        name: String,
        key: String,
        expected: &'static str,
    },
}

impl RequirementError {
    pub(crate) fn invalid_attribute(name: &str, key: &str, expected: &'static str) -> Self {
        Self::InvalidAttribute {
            name: name.to_string(),
            key: key.to_string(),
            expected,
        }
    }
}

/// Convenience type alias for `Result<T, RequirementError>`.
pub type Result<T> = std::result::Result<T, RequirementError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_display() {
        assert_eq!(
            RequirementError::EmptyName.to_string(),
            "dependency name must not be empty"
        );
    }

    #[test]
    fn test_ambiguous_source_lists_keys() {
        let error = RequirementError::AmbiguousSource {
            name: "foo".into(),
            keys: vec!["git".into(), "hg".into()],
        };
        assert_eq!(
            error.to_string(),
            "ambiguous source for foo: more than one VCS key given (git, hg)"
        );
    }

    #[test]
    fn test_invalid_attribute_display() {
        let error = RequirementError::invalid_attribute("foo", "editable", "a boolean");
        assert_eq!(
            error.to_string(),
            "invalid value for 'editable' in foo: expected a boolean"
        );
    }

    #[test]
    fn test_malformed_marker_display() {
        let error = RequirementError::MalformedMarker {
            name: "foo".into(),
            marker: "os_name ==".into(),
            message: "expected a value at position 10".into(),
        };
        assert!(error.to_string().starts_with("invalid environment marker 'os_name =='"));
    }
}
