//! Narrow interfaces onto the host server.
//!
//! PAIN never reaches into the host directly. Each capability it needs is a
//! trait here, and callers hand in an implementation when they fire a hook.

use serde_json::Value;

use crate::catalog::TemplateTables;
use crate::error::Result;
use crate::profile::{PmcProfile, ProfileInfo, RegisterData};

/// Route the client hits when it selects a game mode
pub const GAME_MODE_ROUTE: &str = "/client/game/mode";

/// Item database queries used to exclude templates from catalog adjustment
pub trait ItemClassifier {
    fn is_dogtag(&self, tpl: &str) -> bool;

    /// True if `base_class` appears anywhere in the template's parent chain
    fn is_of_base_class(&self, tpl: &str, base_class: &str) -> bool;
}

/// Profile access for existing accounts
pub trait ProfileHost {
    /// PMC character for a session, if the host knows it
    fn pmc_profile_mut(&mut self, session_id: &str) -> Option<&mut PmcProfile>;

    /// Account username for log lines
    fn username(&self, session_id: &str) -> Option<String>;

    fn save_profile(&mut self, session_id: &str) -> Result<()>;
}

/// Profile creation, as used by the launcher's registration path
pub trait AccountHost: ProfileHost {
    fn create_profile(&mut self, info: ProfileInfo) -> Result<()>;

    fn load_profile(&mut self, profile_id: &str) -> Result<()>;
}

/// ID generation borrowed from the launcher
pub trait IdGenerator {
    fn generate_profile_id(&self) -> String;

    fn generate_account_id(&self) -> u32;
}

/// Runs once after the host's template database is populated
pub trait PostDbLoadHook {
    fn post_db_load(&self, tables: &mut TemplateTables, classifier: &dyn ItemClassifier);
}

/// Intercepts a static route; must hand the response back unchanged
pub trait StaticRouteHook {
    fn route(&self) -> &'static str;

    fn action(
        &self,
        url: &str,
        info: &Value,
        session_id: &str,
        output: String,
        profiles: &mut dyn ProfileHost,
    ) -> String;
}

/// Replacement for the host's account creation
pub trait AccountCreationStrategy {
    fn create_account(
        &self,
        info: &RegisterData,
        accounts: &mut dyn AccountHost,
        ids: &dyn IdGenerator,
    ) -> Result<String>;
}
