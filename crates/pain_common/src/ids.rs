//! Profile and account ID generation.

use chrono::Utc;
use rand::Rng;

use crate::host::IdGenerator;

pub const ACCOUNT_ID_MIN: u32 = 1_000_000;
pub const ACCOUNT_ID_MAX: u32 = 1_999_999;

/// Launcher-compatible IDs: 24 hex chars, timestamp first
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn generate_profile_id(&self) -> String {
        let timestamp = Utc::now().timestamp().max(0) as u32;
        let random: [u8; 8] = rand::thread_rng().gen();
        format!("{:08x}{}", timestamp, hex::encode(random))
    }

    fn generate_account_id(&self) -> u32 {
        rand::thread_rng().gen_range(ACCOUNT_ID_MIN..=ACCOUNT_ID_MAX)
    }
}
