use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};

/// Ceiling for `max_participants`. A split logs one `invoice_create` entry per
/// payer (at most ~250 bytes with 64-character account ids) and a receipt may
/// log 16 KiB in total.
pub const MAX_PARTICIPANTS_LIMIT: u32 = 64;
pub const DEFAULT_MAX_PARTICIPANTS: u32 = MAX_PARTICIPANTS_LIMIT;
pub const DEFAULT_MAX_DESCRIPTION_LEN: u32 = 256;
pub const DEFAULT_MAX_NAME_LEN: u32 = 64;
/// 1,000,000 NEAR in yoctoNEAR.
pub const DEFAULT_MAX_INVOICE_AMOUNT: u128 = 1_000_000 * 10u128.pow(24);

/// Limits enforced by the contract, fixed at `new`.
#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde")]
pub struct WarikannerConfig {
    pub max_participants: u32,
    pub max_description_len: u32,
    pub max_name_len: u32,
    pub max_invoice_amount: U128,
}

impl Default for WarikannerConfig {
    fn default() -> Self {
        Self {
            max_participants: DEFAULT_MAX_PARTICIPANTS,
            max_description_len: DEFAULT_MAX_DESCRIPTION_LEN,
            max_name_len: DEFAULT_MAX_NAME_LEN,
            max_invoice_amount: U128(DEFAULT_MAX_INVOICE_AMOUNT),
        }
    }
}

impl WarikannerConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.max_participants == 0 {
            return Err("max_participants must be positive");
        }
        if self.max_participants > MAX_PARTICIPANTS_LIMIT {
            return Err("max_participants exceeds the event log budget");
        }
        if self.max_description_len == 0 {
            return Err("max_description_len must be positive");
        }
        if self.max_name_len == 0 {
            return Err("max_name_len must be positive");
        }
        if self.max_invoice_amount.0 == 0 {
            return Err("max_invoice_amount must be positive");
        }
        Ok(())
    }
}
