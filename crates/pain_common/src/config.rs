//! PAIN configuration.
//!
//! Config file: `<server root>/user/mods/pain/config.toml`, or an explicit
//! path. Every field has a default, so a missing or partial file is fine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PainError, Result};
use crate::pained::DEFAULT_PAINED_PROFILES;

/// Config file location, relative to the server root
pub const DEFAULT_CONFIG_PATH: &str = "user/mods/pain/config.toml";

/// Built-in inserts base class; its items stay examined
pub const BUILT_IN_INSERTS_BASE_CLASS: &str = "65649eb40bf0ed77b8044453";

/// BEAR and USEC dog tags, including the edition variants
pub const DEFAULT_DOGTAG_TEMPLATES: &[&str] = &[
    "59f32bb586f774757e1e8442",
    "59f32c3b86f77472a31742f0",
    "6662e9aca7e0b43baa3d5f74",
    "6662e9cda7e0b43baa3d5f76",
    "6662e9f37fa79a6d83730fa0",
    "6662ea05f6259762c56f3189",
];

/// On-disk locations, relative to the server root unless absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_pained_profiles")]
    pub pained_profiles: PathBuf,

    #[serde(default = "default_profiles_dir")]
    pub profiles_dir: PathBuf,

    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
}

fn default_pained_profiles() -> PathBuf {
    PathBuf::from(DEFAULT_PAINED_PROFILES)
}

fn default_profiles_dir() -> PathBuf {
    PathBuf::from("user/profiles")
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("database/templates")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pained_profiles: default_pained_profiles(),
            profiles_dir: default_profiles_dir(),
            templates_dir: default_templates_dir(),
        }
    }
}

/// Which templates catalog adjustment leaves alone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_excluded_base_classes")]
    pub excluded_base_classes: Vec<String>,

    #[serde(default = "default_dogtag_templates")]
    pub dogtag_templates: Vec<String>,
}

fn default_excluded_base_classes() -> Vec<String> {
    vec![BUILT_IN_INSERTS_BASE_CLASS.to_string()]
}

fn default_dogtag_templates() -> Vec<String> {
    DEFAULT_DOGTAG_TEMPLATES.iter().map(|s| s.to_string()).collect()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            excluded_base_classes: default_excluded_base_classes(),
            dogtag_templates: default_dogtag_templates(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PainConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl PainConfig {
    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. `<root>/user/mods/pain/config.toml`
    /// 3. Defaults
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = root.join(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::from_file(&default_path);
        }

        Ok(Self::default())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| PainError::io(path, e))?;
        toml::from_str(&contents)
            .map_err(|e| PainError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Resolve a configured path against the server root
    pub fn resolve(root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }

    pub fn pained_profiles_path(&self, root: &Path) -> PathBuf {
        Self::resolve(root, &self.paths.pained_profiles)
    }

    pub fn profiles_dir(&self, root: &Path) -> PathBuf {
        Self::resolve(root, &self.paths.profiles_dir)
    }

    pub fn templates_dir(&self, root: &Path) -> PathBuf {
        Self::resolve(root, &self.paths.templates_dir)
    }
}
