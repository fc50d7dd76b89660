use pep440_rs::VersionSpecifier;
use std::fmt;
use std::str::FromStr;

/// Token meaning "any version" in a Pipfile.
pub const WILDCARD: &str = "*";

/// A PEP 440 version constraint, possibly empty.
///
/// Clauses keep the order they were written in and render comma-joined
/// without spaces, which is the form pip accepts in a requirements file.
///
/// # Examples
///
/// ```
/// use pipfile2req_core::specifier::Specifier;
///
/// let spec = Specifier::parse(">=1.0, <2.0").unwrap();
/// assert_eq!(spec.to_string(), ">=1.0,<2.0");
///
/// assert!(Specifier::parse("*").unwrap().is_any());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specifier {
    clauses: Vec<VersionSpecifier>,
}

impl Specifier {
    /// The unconstrained specifier.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parses a constraint expression.
    ///
    /// The wildcard `*` and the empty string both mean "unconstrained".
    /// On failure returns the parser's message.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() || raw == WILDCARD {
            return Ok(Self::any());
        }

        let clauses = raw
            .split(',')
            .map(|clause| VersionSpecifier::from_str(clause.trim()).map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }

    pub fn is_any(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[VersionSpecifier] {
        &self.clauses
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}
