//! Convert pipenv manifests to pip requirements files.
//!
//! Locates a `Pipfile.lock` or `Pipfile`, detects which of the two it is by
//! content, and renders one requirement line per entry of the selected
//! section using [`pipfile2req_core`].
//!
//! # Examples
//!
//! ```no_run
//! use pipfile2req::config::ConvertOptions;
//! use pipfile2req::convert::convert_pipfile_or_lock;
//! use std::path::Path;
//!
//! let options = ConvertOptions { hashes: true, ..Default::default() };
//! let conversion = convert_pipfile_or_lock(Path::new("."), None, &options).unwrap();
//! for line in &conversion.lines {
//!     println!("{line}");
//! }
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod loader;
pub mod lockfile;
pub mod manifest;
pub mod pipfile;

// Re-export commonly used types
pub use config::{ConvertOptions, Section};
pub use convert::{Conversion, Diagnostic, convert_manifest, convert_pipfile_or_lock};
pub use error::{ConvertError, Result};
pub use manifest::{Manifest, ManifestKind};
