//! Profile Pain Tracker.
//!
//! The context object handed to every hook. It owns the pained profile list
//! and serializes each check-then-append on it, so two signals for the same
//! profile can never both apply the adjustment within one process.

use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, info, warn};

use crate::catalog::{self, CatalogReport, TemplateTables};
use crate::config::PainConfig;
use crate::error::Result;
use crate::host::{
    AccountCreationStrategy, AccountHost, IdGenerator, ItemClassifier, PostDbLoadHook,
    ProfileHost, StaticRouteHook, GAME_MODE_ROUTE,
};
use crate::pained::PainedProfiles;
use crate::profile::{ProfileInfo, RegisterData};

/// Placeholder when a profile's username can't be resolved
pub const NAME_NOT_FOUND: &str = "name_not_found";

/// What a game-mode signal did to a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustOutcome {
    /// Already in the pained list; nothing touched
    AlreadyPained,
    /// No profile or no inventory items; nothing touched
    MissingInventory,
    /// Encyclopedia rebuilt, profile saved, ID recorded
    Pained { discovered: usize },
}

pub struct PainTracker {
    pained: Mutex<PainedProfiles>,
    excluded_base_classes: Vec<String>,
}

impl PainTracker {
    pub fn new(pained: PainedProfiles, excluded_base_classes: Vec<String>) -> Self {
        Self {
            pained: Mutex::new(pained),
            excluded_base_classes,
        }
    }

    pub fn from_config(config: &PainConfig, root: &Path) -> Self {
        Self::new(
            PainedProfiles::new(config.pained_profiles_path(root)),
            config.catalog.excluded_base_classes.clone(),
        )
    }

    fn store(&self) -> MutexGuard<'_, PainedProfiles> {
        // The store holds no in-memory state, so a poisoned lock is still usable.
        self.pained.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Create the pained profile list if it is missing
    pub fn initialize(&self) -> Result<bool> {
        self.store().initialize_if_absent()
    }

    pub fn is_pained(&self, profile_id: &str) -> Result<bool> {
        self.store().contains(profile_id)
    }

    pub fn pained_profiles(&self) -> Result<Vec<String>> {
        let store = self.store();
        if !store.exists() {
            return Ok(Vec::new());
        }
        store.load()
    }

    /// Unexamine eligible items and rebuild profile template encyclopedias
    pub fn adjust_catalog(
        &self,
        tables: &mut TemplateTables,
        classifier: &dyn ItemClassifier,
    ) -> CatalogReport {
        let (items_unexamined, items_skipped) =
            catalog::unexamine_items(&mut tables.items, classifier, &self.excluded_base_classes);
        info!(
            target: "pain",
            "Updated {} items to be unexamined by default.",
            items_unexamined
        );

        let templates_rebuilt = catalog::rebuild_template_encyclopedias(&mut tables.profiles);

        CatalogReport {
            items_unexamined,
            items_skipped,
            templates_rebuilt,
        }
    }

    /// Rebuild an existing profile's encyclopedia from its inventory, once.
    pub fn adjust_ready_profile(
        &self,
        session_id: &str,
        profiles: &mut dyn ProfileHost,
    ) -> Result<AdjustOutcome> {
        let store = self.store();

        if store.contains(session_id)? {
            info!(
                target: "pain",
                "Account \"{}\" has already been pained. You a real one.",
                display_name(profiles, session_id)
            );
            return Ok(AdjustOutcome::AlreadyPained);
        }

        let discovered = match profiles
            .pmc_profile_mut(session_id)
            .and_then(|profile| profile.rebuild_encyclopedia())
        {
            Some(discovered) => discovered,
            None => {
                warn!(
                    target: "pain",
                    "Could not find items in account \"{}\".",
                    display_name(profiles, session_id)
                );
                return Ok(AdjustOutcome::MissingInventory);
            }
        };

        profiles.save_profile(session_id)?;

        let username = display_name(profiles, session_id);
        mark_pained(&store, session_id, &username)?;

        Ok(AdjustOutcome::Pained { discovered })
    }

    /// Host account creation, plus recording the new profile as pained.
    ///
    /// A new profile starts from an already-adjusted template, so there is
    /// no inventory to copy.
    pub fn create_account(
        &self,
        info: &RegisterData,
        accounts: &mut dyn AccountHost,
        ids: &dyn IdGenerator,
    ) -> Result<String> {
        let profile_id = ids.generate_profile_id();
        let scav_id = ids.generate_profile_id();
        let details = ProfileInfo {
            id: profile_id.clone(),
            scav_id,
            aid: ids.generate_account_id(),
            username: info.username.clone(),
            password: info.password.clone(),
            wipe: true,
            edition: info.edition.clone(),
            extra: Default::default(),
        };

        let store = self.store();

        accounts.create_profile(details)?;
        accounts.load_profile(&profile_id)?;
        accounts.save_profile(&profile_id)?;

        mark_pained(&store, &profile_id, &info.username)?;

        Ok(profile_id)
    }
}

fn mark_pained(store: &PainedProfiles, profile_id: &str, username: &str) -> Result<()> {
    store.append_and_save(profile_id)?;
    info!(target: "pain", "Account \"{}\" has been pained.", username);
    Ok(())
}

fn display_name(profiles: &dyn ProfileHost, session_id: &str) -> String {
    profiles
        .username(session_id)
        .unwrap_or_else(|| NAME_NOT_FOUND.to_string())
}

impl PostDbLoadHook for PainTracker {
    fn post_db_load(&self, tables: &mut TemplateTables, classifier: &dyn ItemClassifier) {
        if let Err(e) = self.initialize() {
            error!(target: "pain", "Failed to initialize pained profiles file: {}", e);
        }
        self.adjust_catalog(tables, classifier);
    }
}

impl StaticRouteHook for PainTracker {
    fn route(&self) -> &'static str {
        GAME_MODE_ROUTE
    }

    fn action(
        &self,
        _url: &str,
        _info: &Value,
        session_id: &str,
        output: String,
        profiles: &mut dyn ProfileHost,
    ) -> String {
        if let Err(e) = self.adjust_ready_profile(session_id, profiles) {
            error!(
                target: "pain",
                "Failed to adjust profile {}: {}",
                session_id,
                e
            );
        }
        output
    }
}

impl AccountCreationStrategy for PainTracker {
    fn create_account(
        &self,
        info: &RegisterData,
        accounts: &mut dyn AccountHost,
        ids: &dyn IdGenerator,
    ) -> Result<String> {
        PainTracker::create_account(self, info, accounts, ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PainError;
    use crate::profile::{Inventory, InventoryItem, PmcProfile};
    use crate::test_logs::capture_logs;
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[derive(Default)]
    struct MemoryProfiles {
        pmc: HashMap<String, PmcProfile>,
        names: HashMap<String, String>,
        infos: Vec<ProfileInfo>,
        saves: Vec<String>,
        fail_save: bool,
    }

    impl ProfileHost for MemoryProfiles {
        fn pmc_profile_mut(&mut self, session_id: &str) -> Option<&mut PmcProfile> {
            self.pmc.get_mut(session_id)
        }

        fn username(&self, session_id: &str) -> Option<String> {
            self.names.get(session_id).cloned()
        }

        fn save_profile(&mut self, session_id: &str) -> Result<()> {
            if self.fail_save {
                return Err(PainError::ProfileNotFound(session_id.to_string()));
            }
            self.saves.push(session_id.to_string());
            Ok(())
        }
    }

    impl AccountHost for MemoryProfiles {
        fn create_profile(&mut self, info: ProfileInfo) -> Result<()> {
            self.names.insert(info.id.clone(), info.username.clone());
            self.pmc.insert(info.id.clone(), PmcProfile::default());
            self.infos.push(info);
            Ok(())
        }

        fn load_profile(&mut self, profile_id: &str) -> Result<()> {
            if self.pmc.contains_key(profile_id) {
                Ok(())
            } else {
                Err(PainError::ProfileNotFound(profile_id.to_string()))
            }
        }
    }

    struct CountingIds {
        next: Cell<u32>,
    }

    impl IdGenerator for CountingIds {
        fn generate_profile_id(&self) -> String {
            let n = self.next.get();
            self.next.set(n + 1);
            format!("{:024x}", n)
        }

        fn generate_account_id(&self) -> u32 {
            1_000_042
        }
    }

    fn profile_with(tpls: &[&str]) -> PmcProfile {
        let items = tpls
            .iter()
            .enumerate()
            .map(|(i, tpl)| InventoryItem::new(format!("item{}", i), *tpl))
            .collect();
        PmcProfile {
            inventory: Some(Inventory {
                items: Some(items),
                extra: Default::default(),
            }),
            ..Default::default()
        }
    }

    fn tracker(dir: &TempDir) -> PainTracker {
        let tracker = PainTracker::new(
            PainedProfiles::new(dir.path().join("painedProfiles.json")),
            Vec::new(),
        );
        tracker.initialize().unwrap();
        tracker
    }

    #[test]
    fn test_adjust_rebuilds_encyclopedia_and_records_profile() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let mut host = MemoryProfiles::default();
        host.pmc.insert("abc123".to_string(), profile_with(&["X", "Y", "X"]));

        let outcome = tracker.adjust_ready_profile("abc123", &mut host).unwrap();

        assert_eq!(outcome, AdjustOutcome::Pained { discovered: 2 });
        let enc = host.pmc["abc123"].encyclopedia.as_ref().unwrap();
        assert_eq!(enc.templates().collect::<Vec<_>>(), vec!["X", "Y"]);
        assert!(enc.is_discovered("X") && enc.is_discovered("Y"));
        assert_eq!(host.saves, vec!["abc123".to_string()]);
        assert_eq!(tracker.pained_profiles().unwrap(), vec!["abc123".to_string()]);
    }

    #[test]
    fn test_second_adjust_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let mut host = MemoryProfiles::default();
        host.pmc.insert("abc123".to_string(), profile_with(&["X"]));

        tracker.adjust_ready_profile("abc123", &mut host).unwrap();

        // Player discovers something new; a repeat signal must not wipe it
        host.pmc
            .get_mut("abc123")
            .unwrap()
            .encyclopedia
            .as_mut()
            .unwrap()
            .mark("W", true);

        let outcome = tracker.adjust_ready_profile("abc123", &mut host).unwrap();

        assert_eq!(outcome, AdjustOutcome::AlreadyPained);
        assert_eq!(host.saves.len(), 1);
        assert!(host.pmc["abc123"].encyclopedia.as_ref().unwrap().is_discovered("W"));
        assert_eq!(tracker.pained_profiles().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_inventory_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let mut host = MemoryProfiles::default();
        host.pmc.insert("empty".to_string(), PmcProfile::default());
        host.names.insert("empty".to_string(), "Nikita".to_string());

        let (outcomes, logs) = capture_logs(|| {
            (
                tracker.adjust_ready_profile("empty", &mut host).unwrap(),
                tracker.adjust_ready_profile("ghost", &mut host).unwrap(),
            )
        });

        assert_eq!(
            outcomes,
            (AdjustOutcome::MissingInventory, AdjustOutcome::MissingInventory)
        );
        assert!(logs.contains("WARN"));
        assert!(logs.contains("Could not find items in account \"Nikita\"."));
        assert!(logs.contains("Could not find items in account \"name_not_found\"."));
        assert!(host.pmc["empty"].encyclopedia.is_none());
        assert!(host.saves.is_empty());
        assert!(tracker.pained_profiles().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_signals_for_distinct_profiles() {
        let dir = TempDir::new().unwrap();
        let tracker = Arc::new(tracker(&dir));
        let num_threads = 16;

        let handles: Vec<_> = (0..num_threads)
            .map(|i| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    let id = format!("profile{:02}", i);
                    let mut host = MemoryProfiles::default();
                    host.pmc.insert(id.clone(), profile_with(&["X", "Y"]));
                    tracker.adjust_ready_profile(&id, &mut host).unwrap()
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(
                handle.join().unwrap(),
                AdjustOutcome::Pained { discovered: 2 }
            );
        }

        let mut pained = tracker.pained_profiles().unwrap();
        assert_eq!(pained.len(), num_threads);
        pained.sort();
        pained.dedup();
        let expected: Vec<String> = (0..num_threads).map(|i| format!("profile{:02}", i)).collect();
        assert_eq!(pained, expected);
    }

    #[test]
    fn test_concurrent_signals_for_same_profile() {
        let dir = TempDir::new().unwrap();
        let tracker = Arc::new(tracker(&dir));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let tracker = Arc::clone(&tracker);
                thread::spawn(move || {
                    let mut host = MemoryProfiles::default();
                    host.pmc.insert("abc123".to_string(), profile_with(&["X"]));
                    let outcome = tracker.adjust_ready_profile("abc123", &mut host).unwrap();
                    (outcome, host.saves.len())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        let saves: usize = results.iter().map(|(_, saves)| saves).sum();
        let pained = results
            .iter()
            .filter(|(outcome, _)| matches!(outcome, AdjustOutcome::Pained { .. }))
            .count();
        assert_eq!(saves, 1);
        assert_eq!(pained, 1);
        assert!(results
            .iter()
            .any(|(outcome, _)| *outcome == AdjustOutcome::AlreadyPained));
        assert_eq!(tracker.pained_profiles().unwrap(), vec!["abc123".to_string()]);
    }

    #[test]
    fn test_failed_save_does_not_record_profile() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let mut host = MemoryProfiles {
            fail_save: true,
            ..Default::default()
        };
        host.pmc.insert("abc123".to_string(), profile_with(&["X"]));

        assert!(tracker.adjust_ready_profile("abc123", &mut host).is_err());
        assert!(!tracker.is_pained("abc123").unwrap());
    }

    #[test]
    fn test_route_hook_passes_output_through() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let mut host = MemoryProfiles::default();
        host.pmc.insert("abc123".to_string(), profile_with(&["X"]));

        let output = r#"{"err":0,"data":{"gameMode":"pve"}}"#.to_string();
        let returned = tracker.action(
            GAME_MODE_ROUTE,
            &Value::Null,
            "abc123",
            output.clone(),
            &mut host,
        );

        assert_eq!(returned, output);
        assert_eq!(tracker.route(), "/client/game/mode");
        assert!(tracker.is_pained("abc123").unwrap());
    }

    #[test]
    fn test_route_hook_swallows_malformed_list() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        std::fs::write(dir.path().join("painedProfiles.json"), "nope").unwrap();
        let mut host = MemoryProfiles::default();
        host.pmc.insert("abc123".to_string(), profile_with(&["X"]));

        let returned = tracker.action(GAME_MODE_ROUTE, &Value::Null, "abc123", "ok".into(), &mut host);

        assert_eq!(returned, "ok");
        assert!(host.pmc["abc123"].encyclopedia.is_none());
        assert!(host.saves.is_empty());
    }

    #[test]
    fn test_create_account_records_new_profile() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker(&dir);
        let mut host = MemoryProfiles::default();
        let ids = CountingIds { next: Cell::new(1) };
        let register = RegisterData {
            username: "newbie".to_string(),
            password: "hunter2".to_string(),
            edition: "Standard".to_string(),
        };

        let profile_id =
            AccountCreationStrategy::create_account(&tracker, &register, &mut host, &ids).unwrap();

        assert_eq!(profile_id, format!("{:024x}", 1));
        assert!(tracker.is_pained(&profile_id).unwrap());
        assert_eq!(host.saves, vec![profile_id.clone()]);

        let info = &host.infos[0];
        assert_eq!(info.scav_id, format!("{:024x}", 2));
        assert_eq!(info.aid, 1_000_042);
        assert!(info.wipe);
        assert_eq!(info.edition, "Standard");

        // The new profile is never adjusted again
        host.pmc.insert(profile_id.clone(), profile_with(&["X"]));
        assert_eq!(
            tracker.adjust_ready_profile(&profile_id, &mut host).unwrap(),
            AdjustOutcome::AlreadyPained
        );
    }
}
