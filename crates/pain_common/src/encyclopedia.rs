//! Encyclopedia: which item templates a player has discovered.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::profile::InventoryItem;

/// Template ID -> discovered flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encyclopedia(BTreeMap<String, bool>);

impl Encyclopedia {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every distinct template in the inventory, marked discovered.
    pub fn from_inventory<'a, I>(items: I) -> Self
    where
        I: IntoIterator<Item = &'a InventoryItem>,
    {
        let entries = items
            .into_iter()
            .map(|item| (item.tpl.clone(), true))
            .collect();
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_discovered(&self, tpl: &str) -> bool {
        self.0.get(tpl).copied().unwrap_or(false)
    }

    pub fn mark(&mut self, tpl: impl Into<String>, discovered: bool) {
        self.0.insert(tpl.into(), discovered);
    }

    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
