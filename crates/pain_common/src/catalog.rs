//! Template catalog: item templates and starting-profile templates.
//!
//! Catalog adjustment runs once after the host has populated its database. It
//! flips `ExaminedByDefault` off for every eligible item and rebuilds each
//! profile template's encyclopedia from its starting inventory, so new
//! characters only know the items they actually carry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::host::ItemClassifier;
use crate::profile::PmcProfile;

const EXAMINED_BY_DEFAULT: &str = "ExaminedByDefault";

/// Static definition of an item type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_parent", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,

    #[serde(rename = "_props", default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Map<String, Value>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ItemTemplate {
    /// `ExaminedByDefault`, only when present as a JSON boolean
    pub fn examined_by_default(&self) -> Option<bool> {
        self.props.as_ref()?.get(EXAMINED_BY_DEFAULT)?.as_bool()
    }

    fn set_examined_by_default(&mut self, examined: bool) {
        if let Some(props) = self.props.as_mut() {
            props.insert(EXAMINED_BY_DEFAULT.to_string(), Value::Bool(examined));
        }
    }
}

/// Playable factions carried by each profile template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Faction {
    Bear,
    Usec,
}

impl Faction {
    pub const ALL: [Faction; 2] = [Faction::Bear, Faction::Usec];

    pub fn as_str(&self) -> &'static str {
        match self {
            Faction::Bear => "bear",
            Faction::Usec => "usec",
        }
    }
}

/// One faction's side of a profile template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSide {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<PmcProfile>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Starting profile for one game edition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bear: Option<ProfileSide>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usec: Option<ProfileSide>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProfileTemplate {
    pub fn side_mut(&mut self, faction: Faction) -> Option<&mut ProfileSide> {
        match faction {
            Faction::Bear => self.bear.as_mut(),
            Faction::Usec => self.usec.as_mut(),
        }
    }
}

/// The slice of the host database PAIN touches at load time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateTables {
    pub items: BTreeMap<String, ItemTemplate>,
    pub profiles: BTreeMap<String, ProfileTemplate>,
}

/// Outcome of a catalog adjustment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogReport {
    /// Items set to unexamined
    pub items_unexamined: usize,
    /// Items with the flag that were excluded (dog tags, excluded base classes)
    pub items_skipped: usize,
    /// Faction characters whose encyclopedia was rebuilt
    pub templates_rebuilt: usize,
}

/// Set `ExaminedByDefault = false` on every eligible item.
///
/// Returns `(changed, excluded)`. Items already false still count as changed.
pub fn unexamine_items(
    items: &mut BTreeMap<String, ItemTemplate>,
    classifier: &dyn ItemClassifier,
    excluded_base_classes: &[String],
) -> (usize, usize) {
    let mut changed = 0;
    let mut excluded = 0;

    for item in items.values_mut() {
        if item.examined_by_default().is_none() {
            continue;
        }

        let is_excluded = classifier.is_dogtag(&item.id)
            || excluded_base_classes
                .iter()
                .any(|base| classifier.is_of_base_class(&item.id, base));
        if is_excluded {
            excluded += 1;
            continue;
        }

        item.set_examined_by_default(false);
        changed += 1;
    }

    (changed, excluded)
}

/// Rebuild every faction character's encyclopedia from its starting inventory.
///
/// Missing sides, characters and inventories are skipped.
pub fn rebuild_template_encyclopedias(profiles: &mut BTreeMap<String, ProfileTemplate>) -> usize {
    let mut rebuilt = 0;

    for template in profiles.values_mut() {
        for faction in Faction::ALL {
            let Some(character) = template
                .side_mut(faction)
                .and_then(|side| side.character.as_mut())
            else {
                continue;
            };

            if character.rebuild_encyclopedia().is_some() {
                rebuilt += 1;
            }
        }
    }

    rebuilt
}
