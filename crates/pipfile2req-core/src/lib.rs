//! Requirement line synthesis for pipenv manifests.
//!
//! This crate turns one `Pipfile` / `Pipfile.lock` dependency entry into one
//! line of a pip requirements file. It performs no I/O: callers lower their
//! manifest into [`RawEntry`] values and get strings back.
//!
//! # Architecture
//!
//! - **Types**: `RawEntry`, `RawAttributeSet`, `RawValue`, the untyped entry model
//! - **Specifier**: PEP 440 constraints via `pep440_rs`
//! - **Marker**: PEP 508 marker expression tree and conjunction
//! - **Requirement**: normalization into a tagged `RequirementSource`
//! - **Formatter**: requirement and index-override line rendering
//! - **Error Handling**: typed errors with `thiserror`
//!
//! # Examples
//!
//! ```
//! use pipfile2req_core::{RawAttributeSet, RawEntry, RawValue, Requirement};
//!
//! let attrs: RawAttributeSet = [
//!     ("version", RawValue::from(">=1.0")),
//!     ("markers", RawValue::from("os_name=='nt'")),
//!     ("python_version", RawValue::from("~='3.7'")),
//! ]
//! .into_iter()
//! .collect();
//!
//! let req = Requirement::parse("foo", &RawEntry::Attributes(attrs)).unwrap();
//! assert_eq!(
//!     req.as_line(false),
//!     r#"foo>=1.0; os_name == "nt" and python_version ~= "3.7""#
//! );
//! ```

pub mod error;
pub mod formatter;
pub mod marker;
pub mod requirement;
pub mod source;
pub mod specifier;
pub mod types;

// Re-export commonly used types
pub use error::{RequirementError, Result};
pub use formatter::LineFormatter;
pub use marker::{MarkerParseError, MarkerTree};
pub use requirement::{Requirement, RequirementSource, VcsKind};
pub use source::{IndexSource, index_lines};
pub use specifier::Specifier;
pub use types::{RawAttributeSet, RawEntry, RawValue};
