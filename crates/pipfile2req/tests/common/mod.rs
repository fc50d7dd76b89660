//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub(crate) const PIPFILE: &str = include_str!("../fixtures/Pipfile");
pub(crate) const PIPFILE_LOCK: &str = include_str!("../fixtures/Pipfile.lock");

pub(crate) const PIPFILE_DEFAULT: &[&str] = &[
    "requests",
    "flask[async]>=1.0",
    r#"pywinusb; sys_platform == "win32""#,
    "demo @ file:///data/demo-0.0.1.tar.gz",
    "-e .[test,sec]",
    "-e git+https://github.com/kennethreitz/records.git@v0.5.0#egg=records",
    r#"colorama>=0.4; (os_name == "nt" or sys_platform == "cygwin") and python_version >= "3.6""#,
];

pub(crate) const PIPFILE_DEV: &[&str] = &["pytest>=7.0", "mypy"];

pub(crate) const LOCK_DEFAULT: &[&str] = &[
    r#"certifi==2023.7.22; python_version >= "3.6""#,
    "-e .",
    "-e git+https://github.com/kennethreitz/records.git@5941a0c4ae6b2de2b1e6a1a3e8b6bb0b6dd4a3f7#egg=records",
    "requests==2.31.0",
];

pub(crate) const LOCK_DEV: &[&str] = &[r#"pytest==7.4.3; python_version >= "3.7""#];

pub(crate) const SOURCE_LINES: &[&str] = &[
    "--index-url=https://pypi.org/simple",
    "--extra-index-url=https://pypi.internal/simple",
];

/// Creates a project directory holding the requested fixture manifests.
pub(crate) fn project(with_pipfile: bool, with_lock: bool) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    if with_pipfile {
        write(dir.path(), "Pipfile", PIPFILE);
    }
    if with_lock {
        write(dir.path(), "Pipfile.lock", PIPFILE_LOCK);
    }
    dir
}

pub(crate) fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write fixture");
}

pub(crate) fn concat(parts: &[&[&str]]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|part| part.iter().map(|s| (*s).to_string()))
        .collect()
}
