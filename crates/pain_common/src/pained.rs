//! Pained profile list.
//!
//! A JSON array of profile IDs that have already had their encyclopedia
//! rebuilt. The file is the source of truth: every operation re-reads it, and
//! every append rewrites it in full via a temp file and rename.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;
use crate::json_file::{read_json, write_json_atomic};

/// Default location, relative to the server root
pub const DEFAULT_PAINED_PROFILES: &str = "user/mods/pain/painedProfiles.json";

pub struct PainedProfiles {
    path: PathBuf,
}

impl PainedProfiles {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Create the file holding `[]` if it does not exist yet.
    ///
    /// Returns true when the file was created.
    pub fn initialize_if_absent(&self) -> Result<bool> {
        if self.exists() {
            info!(
                target: "pain",
                "Pained profiles file already exists at {}",
                self.path.display()
            );
            return Ok(false);
        }

        write_json_atomic(&self.path, &[] as &[String])?;
        info!(
            target: "pain",
            "Created pained profiles file at {}",
            self.path.display()
        );
        Ok(true)
    }

    /// Read the full list. A malformed file is an error, never a reset.
    pub fn load(&self) -> Result<Vec<String>> {
        read_json(&self.path)
    }

    /// Membership check. A missing file is an empty set.
    pub fn contains(&self, profile_id: &str) -> Result<bool> {
        if !self.exists() {
            return Ok(false);
        }
        Ok(self.load()?.iter().any(|id| id == profile_id))
    }

    /// Append an ID and persist. Returns false if it was already present.
    pub fn append_and_save(&self, profile_id: &str) -> Result<bool> {
        let mut ids = if self.exists() { self.load()? } else { Vec::new() };
        if ids.iter().any(|id| id == profile_id) {
            return Ok(false);
        }

        ids.push(profile_id.to_string());
        write_json_atomic(&self.path, &ids)?;
        Ok(true)
    }
}
