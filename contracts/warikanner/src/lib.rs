use std::collections::HashSet;

use near_sdk::borsh::{self, BorshDeserialize, BorshSerialize};
use near_sdk::collections::LookupMap;
use near_sdk::env;
use near_sdk::json_types::U128;
use near_sdk::serde::{Deserialize, Serialize};
use near_sdk::serde_json::{self, json};
use near_sdk::{
    near_bindgen, require, AccountId, BorshStorageKey, NearToken, PanicOnDefault, Promise,
};

pub mod address;
pub mod config;
pub mod payment_link;
pub mod split;
pub mod units;

use crate::address::sanitize_input;
use crate::config::WarikannerConfig;
use crate::split::{Participant, SplitAmountResult};

const EVENT_STANDARD: &str = "warikanner";
const EVENT_VERSION: &str = "1.0.0";
const DEFAULT_PAGE_LIMIT: u64 = 50;

fn timestamp_ms() -> u64 {
    env::block_timestamp() / 1_000_000
}

fn yocto_to_token(amount: u128) -> NearToken {
    NearToken::from_yoctonear(amount)
}

#[derive(BorshSerialize, BorshStorageKey)]
enum StorageKey {
    Users,
    Invoices,
    InvoicesByAccount,
    PaymentsByAccount,
}

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde")]
pub struct User {
    pub account_id: AccountId,
    pub name: String,
    pub registered_ms: u64,
}

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde")]
pub struct Invoice {
    pub id: String,
    pub payer: AccountId,
    pub recipient: AccountId,
    pub amount: U128,
    pub is_paid: bool,
    pub created_ms: u64,
    pub description: String,
    pub paid_ms: Option<u64>,
}

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde")]
pub struct PaymentRecord {
    pub invoice_id: String,
    pub payer: AccountId,
    pub recipient: AccountId,
    pub amount: U128,
    pub ts_ms: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde", rename_all = "camelCase")]
pub struct SplitAmountView {
    pub participant_number: u32,
    pub split_amount: U128,
}

impl From<SplitAmountResult> for SplitAmountView {
    fn from(result: SplitAmountResult) -> Self {
        Self {
            participant_number: result.participant_number,
            split_amount: U128(result.split_amount),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(crate = "near_sdk::serde", rename_all = "camelCase")]
pub struct SplitInvoiceParticipant {
    pub participant_number: u32,
    pub payer: AccountId,
    pub is_rounding: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(crate = "near_sdk::serde", rename_all = "camelCase")]
pub struct SplitInvoiceView {
    pub participant_number: u32,
    pub payer: AccountId,
    pub split_amount: U128,
    /// `None` for the caller's own share and for zero shares.
    pub invoice_id: Option<String>,
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Warikanner {
    config: WarikannerConfig,
    users: LookupMap<AccountId, User>,
    invoices: LookupMap<String, Invoice>,
    invoices_by_account: LookupMap<AccountId, Vec<String>>,
    payments_by_account: LookupMap<AccountId, Vec<PaymentRecord>>,
    next_invoice_index: u64,
}

#[near_bindgen]
impl Warikanner {
    #[init]
    pub fn new(config: Option<WarikannerConfig>) -> Self {
        let config = config.unwrap_or_default();
        if let Err(message) = config.validate() {
            env::panic_str(message);
        }
        Self {
            config,
            users: LookupMap::new(StorageKey::Users),
            invoices: LookupMap::new(StorageKey::Invoices),
            invoices_by_account: LookupMap::new(StorageKey::InvoicesByAccount),
            payments_by_account: LookupMap::new(StorageKey::PaymentsByAccount),
            next_invoice_index: 1,
        }
    }

    pub fn get_config(&self) -> WarikannerConfig {
        self.config.clone()
    }

    #[payable]
    pub fn register_user(&mut self, name: String) -> User {
        let initial_storage = env::storage_usage();
        let account_id = env::predecessor_account_id();
        let name = sanitize_input(&name);
        require!(!name.is_empty(), "Name cannot be empty");
        require!(
            name.chars().count() <= self.config.max_name_len as usize,
            "Name is too long",
        );

        let registered_ms = self
            .users
            .get(&account_id)
            .map(|existing| existing.registered_ms)
            .unwrap_or_else(timestamp_ms);
        let user = User {
            account_id: account_id.clone(),
            name: name.clone(),
            registered_ms,
        };
        self.users.insert(&account_id, &user);

        self.emit_event(
            "user_register",
            json!([{ "account_id": account_id, "name": name }]),
        );
        charge_storage(initial_storage, env::attached_deposit().as_yoctonear());
        user
    }

    pub fn get_user(&self, account_id: AccountId) -> Option<User> {
        self.users.get(&account_id)
    }

    pub fn compute_split(
        &self,
        total_amount: U128,
        participants: Vec<Participant>,
    ) -> Vec<SplitAmountView> {
        self.assert_participant_cap(participants.len());
        split_or_panic(total_amount.0, &participants)
            .into_iter()
            .map(SplitAmountView::from)
            .collect()
    }

    #[payable]
    pub fn create_invoice(
        &mut self,
        payer: AccountId,
        amount: U128,
        description: Option<String>,
    ) -> String {
        let initial_storage = env::storage_usage();
        let recipient = env::predecessor_account_id();
        self.assert_registered(&recipient);
        require!(payer != recipient, "Payer cannot be the recipient");
        self.assert_amount(amount.0);
        let description = self.clean_description(description);

        let invoice = self.insert_invoice(payer, recipient, amount.0, description);
        self.emit_event("invoice_create", json!([invoice_created_entry(&invoice)]));
        charge_storage(initial_storage, env::attached_deposit().as_yoctonear());
        invoice.id
    }

    /// Bills every other participant for their share. All created invoices
    /// are announced in a single `invoice_create` event.
    #[payable]
    pub fn create_split_invoices(
        &mut self,
        total_amount: U128,
        participants: Vec<SplitInvoiceParticipant>,
        description: Option<String>,
    ) -> Vec<SplitInvoiceView> {
        let initial_storage = env::storage_usage();
        let recipient = env::predecessor_account_id();
        self.assert_registered(&recipient);
        self.assert_amount(total_amount.0);
        self.assert_participant_cap(participants.len());

        let mut unique_payers: HashSet<AccountId> = HashSet::new();
        for participant in &participants {
            require!(
                unique_payers.insert(participant.payer.clone()),
                "Duplicate payer",
            );
        }
        let description = self.clean_description(description);

        let split_input: Vec<Participant> = participants
            .iter()
            .map(|p| Participant::new(p.participant_number, p.is_rounding))
            .collect();
        let shares = split_or_panic(total_amount.0, &split_input);

        let mut views = Vec::with_capacity(participants.len());
        let mut created = Vec::new();
        for (participant, share) in participants.into_iter().zip(shares) {
            let invoice_id = if participant.payer == recipient || share.split_amount == 0 {
                None
            } else {
                let invoice = self.insert_invoice(
                    participant.payer.clone(),
                    recipient.clone(),
                    share.split_amount,
                    description.clone(),
                );
                created.push(invoice_created_entry(&invoice));
                Some(invoice.id)
            };
            views.push(SplitInvoiceView {
                participant_number: participant.participant_number,
                payer: participant.payer,
                split_amount: U128(share.split_amount),
                invoice_id,
            });
        }

        if !created.is_empty() {
            self.emit_event("invoice_create", serde_json::Value::Array(created));
        }
        charge_storage(initial_storage, env::attached_deposit().as_yoctonear());
        views
    }

    #[payable]
    pub fn pay_invoice(&mut self, invoice_id: String) {
        let payer = env::predecessor_account_id();
        let amount = env::attached_deposit().as_yoctonear();

        let mut invoice = self
            .invoices
            .get(&invoice_id)
            .unwrap_or_else(|| env::panic_str("Invoice not found"));
        require!(!invoice.is_paid, "Invoice already paid");
        require!(invoice.payer == payer, "Only the payer can pay this invoice");
        require!(
            amount == invoice.amount.0,
            "Attach deposit equal to invoice amount",
        );

        let ts_ms = timestamp_ms();
        invoice.is_paid = true;
        invoice.paid_ms = Some(ts_ms);
        self.invoices.insert(&invoice_id, &invoice);

        let record = PaymentRecord {
            invoice_id: invoice_id.clone(),
            payer: payer.clone(),
            recipient: invoice.recipient.clone(),
            amount: invoice.amount,
            ts_ms,
        };
        self.record_payment(&payer, &record);
        self.record_payment(&invoice.recipient, &record);

        self.emit_event(
            "invoice_paid",
            json!([{
                "invoice_id": invoice_id,
                "payer": payer,
                "recipient": invoice.recipient,
                "amount": invoice.amount,
            }]),
        );

        Promise::new(invoice.recipient).transfer(yocto_to_token(amount));
    }

    pub fn get_invoice(&self, invoice_id: String) -> Invoice {
        self.invoices
            .get(&invoice_id)
            .unwrap_or_else(|| env::panic_str("Invoice not found"))
    }

    /// Invoices the account pays or receives, newest first.
    pub fn list_invoices_for_account(
        &self,
        account_id: AccountId,
        from: Option<u64>,
        limit: Option<u64>,
    ) -> Vec<Invoice> {
        let mut ids = self.invoices_by_account.get(&account_id).unwrap_or_default();
        ids.reverse();
        paginate_vec(&ids, from.unwrap_or(0), limit.unwrap_or(DEFAULT_PAGE_LIMIT))
            .iter()
            .filter_map(|id| self.invoices.get(id))
            .collect()
    }

    pub fn list_payments(
        &self,
        account_id: AccountId,
        from: Option<u64>,
        limit: Option<u64>,
    ) -> Vec<PaymentRecord> {
        let mut payments = self.payments_by_account.get(&account_id).unwrap_or_default();
        payments.reverse();
        paginate_vec(&payments, from.unwrap_or(0), limit.unwrap_or(DEFAULT_PAGE_LIMIT))
    }

    fn insert_invoice(
        &mut self,
        payer: AccountId,
        recipient: AccountId,
        amount: u128,
        description: String,
    ) -> Invoice {
        let invoice_id = format!("invoice-{}", self.next_invoice_index);
        self.next_invoice_index += 1;

        let invoice = Invoice {
            id: invoice_id.clone(),
            payer: payer.clone(),
            recipient: recipient.clone(),
            amount: U128(amount),
            is_paid: false,
            created_ms: timestamp_ms(),
            description,
            paid_ms: None,
        };
        self.invoices.insert(&invoice_id, &invoice);
        self.index_invoice(&payer, &invoice_id);
        self.index_invoice(&recipient, &invoice_id);
        invoice
    }

    fn index_invoice(&mut self, account_id: &AccountId, invoice_id: &str) {
        let mut ids = self.invoices_by_account.get(account_id).unwrap_or_default();
        ids.push(invoice_id.to_string());
        self.invoices_by_account.insert(account_id, &ids);
    }

    fn record_payment(&mut self, account_id: &AccountId, record: &PaymentRecord) {
        let mut list = self.payments_by_account.get(account_id).unwrap_or_default();
        list.push(record.clone());
        self.payments_by_account.insert(account_id, &list);
    }

    fn clean_description(&self, description: Option<String>) -> String {
        let description = sanitize_input(&description.unwrap_or_default());
        require!(
            description.chars().count() <= self.config.max_description_len as usize,
            "Description is too long",
        );
        description
    }

    fn assert_amount(&self, amount: u128) {
        require!(amount > 0, "Amount must be positive");
        require!(
            amount <= self.config.max_invoice_amount.0,
            "Amount exceeds invoice limit",
        );
    }

    fn assert_participant_cap(&self, count: usize) {
        require!(
            count <= self.config.max_participants as usize,
            "Too many participants",
        );
    }

    fn assert_registered(&self, account_id: &AccountId) {
        require!(
            self.users.get(account_id).is_some(),
            "Account must call register_user first",
        );
    }

    fn emit_event(&self, event: &str, data: serde_json::Value) {
        let payload = json!({
            "standard": EVENT_STANDARD,
            "version": EVENT_VERSION,
            "event": event,
            "data": data,
        });
        env::log_str(&format!("EVENT_JSON:{}", payload));
    }
}

/// Charges the caller for the storage written since `initial_storage` and
/// refunds whatever `deposit` has left over.
fn charge_storage(initial_storage: u64, deposit: u128) {
    let added = env::storage_usage().saturating_sub(initial_storage);
    let cost = env::storage_byte_cost().as_yoctonear() * u128::from(added);
    require!(
        deposit >= cost,
        format!("Insufficient storage deposit, attach at least {cost} yoctoNEAR"),
    );
    if deposit > cost {
        Promise::new(env::predecessor_account_id()).transfer(yocto_to_token(deposit - cost));
    }
}

// Descriptions are left out so a full split fits in one receipt's log budget.
fn invoice_created_entry(invoice: &Invoice) -> serde_json::Value {
    json!({
        "invoice_id": invoice.id,
        "payer": invoice.payer,
        "recipient": invoice.recipient,
        "amount": invoice.amount,
    })
}

fn split_or_panic(total_amount: u128, participants: &[Participant]) -> Vec<SplitAmountResult> {
    split::compute_split(total_amount, participants)
        .unwrap_or_else(|err| env::panic_str(&err.to_string()))
}

fn paginate_vec<T: Clone>(items: &[T], from: u64, limit: u64) -> Vec<T> {
    if items.is_empty() {
        return Vec::new();
    }
    let start = usize::try_from(from).unwrap_or(usize::MAX).min(items.len());
    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    let end = start.saturating_add(limit).min(items.len());
    items[start..end].to_vec()
}
