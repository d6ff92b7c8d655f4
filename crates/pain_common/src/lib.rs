//! PAIN: items start unexamined, and existing profiles only know what they carry.
//!
//! The library hooks three host extension points: database load, the
//! game-mode route and account creation. `PainTracker` is the context object
//! behind all three; the host is reached only through the traits in `host`.

pub mod catalog;
pub mod config;
pub mod disk;
pub mod encyclopedia;
pub mod error;
pub mod host;
pub mod ids;
pub mod json_file;
pub mod pained;
pub mod profile;
pub mod tracker;

#[cfg(test)]
mod test_logs;

pub use catalog::{CatalogReport, Faction, ItemTemplate, ProfileTemplate, TemplateTables};
pub use config::PainConfig;
pub use disk::{BaseClassIndex, DiskProfiles, TemplateDatabase};
pub use encyclopedia::Encyclopedia;
pub use error::{PainError, Result};
pub use host::{
    AccountCreationStrategy, AccountHost, IdGenerator, ItemClassifier, PostDbLoadHook,
    ProfileHost, StaticRouteHook, GAME_MODE_ROUTE,
};
pub use ids::RandomIds;
pub use pained::PainedProfiles;
pub use profile::{InventoryItem, PmcProfile, ProfileInfo, RegisterData, SptProfile};
pub use tracker::{AdjustOutcome, PainTracker};
