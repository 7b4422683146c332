use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

use autolog_core::interchange::parse_payload;

/// Read a JSON file into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let value = read_json_value(path)?;
    Ok(serde_json::from_value(value)?)
}

pub fn read_json_value(path: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse_payload(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e).into())
}

/// Overwrite `path` with `contents`, used by `--save`.
pub fn write_text(path: &str, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
    let target = absolute(path)?;
    fs::write(&target, contents)
        .map_err(|e| format!("Failed to write '{}': {}", target.display(), e))?;
    tracing::info!("wrote {}", target.display());
    Ok(())
}

fn absolute(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    Ok(if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    })
}

fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let canonical = absolute(path)?;
    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }
    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }
    Ok(canonical)
}
