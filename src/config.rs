//! Configuration file loading
//!
//! Run configurations are plain serde types. They can be written as JSON or
//! as pkl, which is evaluated to JSON by the `pkl` CLI before parsing.

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::Command;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Pkl,
}

impl ConfigFormat {
    /// `.pkl` files are evaluated, anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("pkl") => Self::Pkl,
            _ => Self::Json,
        }
    }
}

fn eval_pkl(path: &Path) -> Result<String> {
    let output = Command::new("pkl")
        .args(["eval", "-f", "json"])
        .arg(path)
        .output()
        .context("Failed to execute pkl command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!(path = %path.display(), "pkl eval failed: {}", stderr);
        bail!("pkl eval of {} failed: {}", path.display(), stderr);
    }
    String::from_utf8(output.stdout).context("pkl produced non-utf8 output")
}

/// Read `path` as JSON text in the given format.
fn read_json(path: &Path, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Pkl => eval_pkl(path),
        ConfigFormat::Json => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display())),
    }
}

pub fn load_pkl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    load_as(path.as_ref(), ConfigFormat::Pkl)
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    load_as(path.as_ref(), ConfigFormat::Json)
}

/// Load a configuration file, picking the format from its extension.
pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    load_as(path, ConfigFormat::from_path(path))
}

fn load_as<T: DeserializeOwned>(path: &Path, format: ConfigFormat) -> Result<T> {
    debug!(path = %path.display(), ?format, "loading config");
    let json = read_json(path, format)?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse config {}", path.display()))
}
