//! File-backed host: the server's on-disk database and profile directory.
//!
//! Layout (paths come from `PainConfig`):
//!   <templates_dir>/items.json      item templates keyed by ID
//!   <templates_dir>/profiles.json   starting profiles keyed by edition
//!   <profiles_dir>/<id>.json        one full profile per account

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::catalog::{ItemTemplate, ProfileTemplate, TemplateTables};
use crate::error::{PainError, Result};
use crate::host::{AccountHost, ItemClassifier, ProfileHost};
use crate::json_file::{read_json, write_json_atomic};
use crate::profile::{PmcProfile, ProfileInfo, SptProfile};

const ITEMS_FILE: &str = "items.json";
const PROFILES_FILE: &str = "profiles.json";

/// Parent-chain lookups over the item table
#[derive(Debug, Clone, Default)]
pub struct BaseClassIndex {
    parents: HashMap<String, String>,
    dogtags: HashSet<String>,
}

impl BaseClassIndex {
    pub fn from_items<'a, I>(items: I, dogtag_templates: &[String]) -> Self
    where
        I: IntoIterator<Item = &'a ItemTemplate>,
    {
        let parents = items
            .into_iter()
            .filter_map(|item| Some((item.id.clone(), item.parent.clone()?)))
            .filter(|(_, parent)| !parent.is_empty())
            .collect();

        Self {
            parents,
            dogtags: dogtag_templates.iter().cloned().collect(),
        }
    }
}

impl ItemClassifier for BaseClassIndex {
    fn is_dogtag(&self, tpl: &str) -> bool {
        self.dogtags.contains(tpl)
    }

    fn is_of_base_class(&self, tpl: &str, base_class: &str) -> bool {
        let mut seen = HashSet::new();
        let mut current = tpl;

        while let Some(parent) = self.parents.get(current) {
            if parent == base_class {
                return true;
            }
            if !seen.insert(parent.as_str()) {
                // Cycle in the parent chain
                return false;
            }
            current = parent.as_str();
        }

        false
    }
}

/// Item and profile templates from the server database
pub struct TemplateDatabase {
    dir: PathBuf,
}

impl TemplateDatabase {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<TemplateTables> {
        let items: BTreeMap<String, ItemTemplate> = read_json(&self.dir.join(ITEMS_FILE))?;

        let profiles_path = self.dir.join(PROFILES_FILE);
        let profiles: BTreeMap<String, ProfileTemplate> = if profiles_path.exists() {
            read_json(&profiles_path)?
        } else {
            debug!(target: "pain", "No profile templates at {}", profiles_path.display());
            BTreeMap::new()
        };

        Ok(TemplateTables { items, profiles })
    }

    pub fn save(&self, tables: &TemplateTables) -> Result<()> {
        write_json_atomic(&self.dir.join(ITEMS_FILE), &tables.items)?;
        if !tables.profiles.is_empty() {
            write_json_atomic(&self.dir.join(PROFILES_FILE), &tables.profiles)?;
        }
        Ok(())
    }
}

/// Account profiles, one JSON file each
pub struct DiskProfiles {
    dir: PathBuf,
    profiles: BTreeMap<String, SptProfile>,
}

impl DiskProfiles {
    /// Load every `*.json` profile in the directory. Unreadable files are
    /// skipped with a warning, as the server itself does.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| PainError::io(&dir, e))?;

        let mut profiles = BTreeMap::new();
        let entries = fs::read_dir(&dir).map_err(|e| PainError::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| PainError::io(&dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            match read_json::<SptProfile>(&path) {
                Ok(profile) => {
                    profiles.insert(id.to_string(), profile);
                }
                Err(e) => warn!(target: "pain", "Skipping profile {}: {}", path.display(), e),
            }
        }

        debug!(target: "pain", "Loaded {} profiles from {}", profiles.len(), dir.display());
        Ok(Self { dir, profiles })
    }

    fn profile_path(&self, profile_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", profile_id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileHost for DiskProfiles {
    fn pmc_profile_mut(&mut self, session_id: &str) -> Option<&mut PmcProfile> {
        self.profiles.get_mut(session_id)?.characters.pmc.as_mut()
    }

    fn username(&self, session_id: &str) -> Option<String> {
        self.profiles
            .get(session_id)
            .map(|profile| profile.info.username.clone())
    }

    fn save_profile(&mut self, session_id: &str) -> Result<()> {
        let profile = self
            .profiles
            .get(session_id)
            .ok_or_else(|| PainError::ProfileNotFound(session_id.to_string()))?;
        write_json_atomic(&self.profile_path(session_id), profile)
    }
}

impl AccountHost for DiskProfiles {
    fn create_profile(&mut self, info: ProfileInfo) -> Result<()> {
        if self.profiles.contains_key(&info.id) || self.profile_path(&info.id).exists() {
            return Err(PainError::ProfileExists(info.id));
        }
        self.profiles.insert(info.id.clone(), SptProfile::new(info));
        Ok(())
    }

    /// Pick up the on-disk copy if there is one; otherwise keep what's in memory.
    fn load_profile(&mut self, profile_id: &str) -> Result<()> {
        let path = self.profile_path(profile_id);
        if path.exists() {
            let profile = read_json::<SptProfile>(&path)?;
            self.profiles.insert(profile_id.to_string(), profile);
            return Ok(());
        }

        if self.profiles.contains_key(profile_id) {
            Ok(())
        } else {
            Err(PainError::ProfileNotFound(profile_id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn item(id: &str, parent: &str) -> ItemTemplate {
        serde_json::from_value(json!({"_id": id, "_parent": parent, "_props": {}})).unwrap()
    }

    #[test]
    fn test_base_class_walks_whole_chain() {
        let items = vec![
            item("root", ""),
            item("inserts", "root"),
            item("armor_insert", "inserts"),
            item("plate", "armor_insert"),
            item("rifle", "root"),
        ];
        let index = BaseClassIndex::from_items(&items, &[]);

        assert!(index.is_of_base_class("plate", "inserts"));
        assert!(index.is_of_base_class("armor_insert", "inserts"));
        assert!(!index.is_of_base_class("inserts", "inserts"));
        assert!(!index.is_of_base_class("rifle", "inserts"));
        assert!(!index.is_of_base_class("unknown", "inserts"));
    }

    #[test]
    fn test_base_class_survives_cycles() {
        let items = vec![item("a", "b"), item("b", "a")];
        let index = BaseClassIndex::from_items(&items, &[]);
        assert!(!index.is_of_base_class("a", "zzz"));
    }

    #[test]
    fn test_dogtags_come_from_config_list() {
        let index = BaseClassIndex::from_items(&Vec::<ItemTemplate>::new(), &["tag".to_string()]);
        assert!(index.is_dogtag("tag"));
        assert!(!index.is_dogtag("rifle"));
    }

    #[test]
    fn test_template_database_round_trip() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("items.json"),
            json!({"gun": {"_id": "gun", "_name": "ak", "_props": {"ExaminedByDefault": true}}})
                .to_string(),
        )
        .unwrap();

        let db = TemplateDatabase::new(dir.path());
        let mut tables = db.load().unwrap();
        assert!(tables.profiles.is_empty());

        tables
            .items
            .get_mut("gun")
            .unwrap()
            .props
            .as_mut()
            .unwrap()
            .insert("ExaminedByDefault".to_string(), json!(false));
        db.save(&tables).unwrap();

        let reloaded = db.load().unwrap();
        assert_eq!(reloaded.items["gun"].examined_by_default(), Some(false));
        assert_eq!(reloaded.items["gun"].extra.get("_name"), Some(&json!("ak")));
        assert!(!dir.path().join("profiles.json").exists());
    }

    #[test]
    fn test_disk_profiles_skip_bad_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(
            dir.path().join("p1.json"),
            json!({
                "info": {"id": "p1", "scavId": "s1", "aid": 1000001, "username": "alice",
                         "password": "", "wipe": false, "edition": "Standard"},
                "characters": {"pmc": {"Inventory": {"items": [{"_id": "i", "_tpl": "X"}]}}},
                "dialogues": {}
            })
            .to_string(),
        )
        .unwrap();

        let mut profiles = DiskProfiles::open(dir.path()).unwrap();
        assert_eq!(profiles.ids().collect::<Vec<_>>(), vec!["p1"]);
        assert_eq!(profiles.len(), 1);
        assert!(!profiles.is_empty());
        assert_eq!(profiles.username("p1").as_deref(), Some("alice"));
        assert!(profiles.pmc_profile_mut("p1").is_some());
        assert!(profiles.pmc_profile_mut("broken").is_none());
    }

    #[test]
    fn test_create_refuses_existing_profile() {
        let dir = TempDir::new().unwrap();
        let mut profiles = DiskProfiles::open(dir.path()).unwrap();
        let info: ProfileInfo = serde_json::from_value(json!({
            "id": "p2", "scavId": "s2", "aid": 1000002, "username": "bob",
            "password": "pw", "wipe": true, "edition": "Standard"
        }))
        .unwrap();

        profiles.create_profile(info.clone()).unwrap();
        profiles.load_profile("p2").unwrap();
        profiles.save_profile("p2").unwrap();
        assert!(dir.path().join("p2.json").exists());

        let err = profiles.create_profile(info).unwrap_err();
        assert!(matches!(err, PainError::ProfileExists(id) if id == "p2"));
        assert!(matches!(
            profiles.load_profile("missing"),
            Err(PainError::ProfileNotFound(_))
        ));
    }
}
