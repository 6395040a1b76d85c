use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::json_types::U128;
use near_sdk::{env, near_bindgen, PanicOnDefault};

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct SimpleStorage {
    value: u128,
}

#[near_bindgen]
impl SimpleStorage {
    #[init]
    pub fn new() -> Self {
        Self { value: 0 }
    }

    pub fn set(&mut self, value: U128) {
        self.value = value.0;
        env::log_str(&format!("value set to {} by {}", value.0, env::predecessor_account_id()));
    }

    pub fn get(&self) -> U128 {
        U128(self.value)
    }
}
