//! Profile shapes owned by the host server.
//!
//! Only the fields PAIN reads or writes are modelled. Everything else is kept
//! in `extra` so a load/save cycle through the disk host leaves host data
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::encyclopedia::Encyclopedia;

/// A single inventory entry referencing an item template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_tpl")]
    pub tpl: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryItem {
    pub fn new(id: impl Into<String>, tpl: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InventoryItem>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// PMC character data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PmcProfile {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "Inventory", default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Inventory>,

    #[serde(rename = "Encyclopedia", default, skip_serializing_if = "Option::is_none")]
    pub encyclopedia: Option<Encyclopedia>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PmcProfile {
    /// Inventory items, if both the inventory and its item list are present
    pub fn inventory_items(&self) -> Option<&[InventoryItem]> {
        self.inventory.as_ref()?.items.as_deref()
    }

    /// Replace the encyclopedia with one derived from the inventory.
    ///
    /// Returns the number of discovered templates, or `None` (leaving the
    /// profile untouched) when there is no inventory to derive from.
    pub fn rebuild_encyclopedia(&mut self) -> Option<usize> {
        let encyclopedia = Encyclopedia::from_inventory(self.inventory_items()?);
        let discovered = encyclopedia.len();
        self.encyclopedia = Some(encyclopedia);
        Some(discovered)
    }
}

/// Account record stored in a full profile's `info` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub id: String,
    pub scav_id: String,
    pub aid: u32,
    pub username: String,
    pub password: String,
    pub wipe: bool,
    pub edition: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Characters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmc: Option<PmcProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scav: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full on-disk profile: account info plus characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SptProfile {
    pub info: ProfileInfo,

    #[serde(default)]
    pub characters: Characters,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SptProfile {
    /// Fresh profile as created at registration: info only, empty characters
    pub fn new(info: ProfileInfo) -> Self {
        Self {
            info,
            characters: Characters {
                pmc: Some(PmcProfile::default()),
                scav: Some(Value::Object(Map::new())),
                extra: Map::new(),
            },
            extra: Map::new(),
        }
    }
}

/// Launcher registration request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub password: String,
    pub edition: String,
}
