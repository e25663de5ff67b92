#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Python toolchain discovery.
//!
//! `uv` is the preferred way to run pytest because it injects the
//! dependency and manages the environment; a plain `python -m pytest`
//! fallback covers machines without it.

use std::{ffi::OsString, path::PathBuf};

use anyhow::{Context, Result};
use which::which;

/// Finds and returns the path to the uv binary.
pub fn uv_path() -> Result<PathBuf> {
    which("uv").context("Cannot find uv on path")
}

/// Finds and returns the path to a Python interpreter.
pub fn python_path() -> Result<PathBuf> {
    which("python3")
        .or_else(|_| which("python"))
        .context("Cannot find a Python interpreter on path (python3 or python)")
}

/// Returns the command and arguments to run pytest with the given
/// arguments.
///
/// Prefers `uv run --with pytest -- python -m pytest <args>` so pytest is
/// available even when the student environment does not install it;
/// otherwise falls back to `python -m pytest <args>`.
pub fn pytest_command(extra_args: &[OsString]) -> Result<(OsString, Vec<OsString>)> {
    if let Ok(uv) = uv_path() {
        let mut args: Vec<OsString> = vec![
            "run".into(),
            "--with".into(),
            "pytest".into(),
            "--".into(),
            "python".into(),
            "-m".into(),
            "pytest".into(),
        ];
        args.extend(extra_args.iter().cloned());
        Ok((uv.into_os_string(), args))
    } else {
        let python = python_path()?;
        let mut args: Vec<OsString> = vec!["-m".into(), "pytest".into()];
        args.extend(extra_args.iter().cloned());
        Ok((python.into_os_string(), args))
    }
}
