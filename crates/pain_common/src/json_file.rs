//! Whole-file JSON reads and writes.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{PainError, Result};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|e| PainError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| PainError::json(path, e))
}

/// Write pretty JSON to a temp sibling, then rename over the target
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PainError::io(parent, e))?;
        }
    }

    let json = serde_json::to_string_pretty(value).map_err(|e| PainError::json(path, e))?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = Path::new(&temp_name);

    fs::write(temp_path, json).map_err(|e| PainError::io(temp_path, e))?;
    fs::rename(temp_path, path).map_err(|e| PainError::io(path, e))?;

    Ok(())
}
