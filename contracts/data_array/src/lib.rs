/*!
 * Append-only message log.
 *
 * Every entry remembers the account that added it. Entries are addressed by
 * their insertion index and never change once written.
 */

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::{LookupMap, Vector};
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::{
    env, near_bindgen, require, AccountId, BorshStorageKey, NearToken, PanicOnDefault, Promise,
};

#[derive(BorshSerialize, BorshStorageKey)]
enum StorageKey {
    Entries,
    EntriesByAuthor,
}

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde")]
pub struct DataEntry {
    pub message: String,
    pub author: AccountId,
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct DataArray {
    entries: Vector<DataEntry>,
    entries_by_author: LookupMap<AccountId, Vec<u64>>,
}

#[near_bindgen]
impl DataArray {
    #[init]
    pub fn new() -> Self {
        Self {
            entries: Vector::new(StorageKey::Entries),
            entries_by_author: LookupMap::new(StorageKey::EntriesByAuthor),
        }
    }

    /// Appends `message` authored by the caller and returns its index. The
    /// attached deposit pays for the bytes written; the surplus is refunded.
    #[payable]
    pub fn add_data(&mut self, message: String) -> u64 {
        require!(!message.trim().is_empty(), "Message cannot be empty");
        let initial_storage = env::storage_usage();
        let author = env::predecessor_account_id();
        let index = self.entries.len();

        self.entries.push(&DataEntry {
            message,
            author: author.clone(),
        });

        let mut indices = self.entries_by_author.get(&author).unwrap_or_default();
        indices.push(index);
        self.entries_by_author.insert(&author, &indices);

        let cost = env::storage_byte_cost().as_yoctonear()
            * u128::from(env::storage_usage().saturating_sub(initial_storage));
        let deposit = env::attached_deposit().as_yoctonear();
        require!(deposit >= cost, "Insufficient storage deposit");
        if deposit > cost {
            Promise::new(author).transfer(NearToken::from_yoctonear(deposit - cost));
        }

        index
    }

    pub fn get_data_by_id(&self, id: u64) -> DataEntry {
        self.entries
            .get(id)
            .unwrap_or_else(|| env::panic_str("Entry not found"))
    }

    pub fn get_data_count(&self) -> u64 {
        self.entries.len()
    }

    pub fn get_entries_by_author(&self, author: AccountId) -> Vec<u64> {
        self.entries_by_author.get(&author).unwrap_or_default()
    }
}
