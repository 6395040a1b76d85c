//! EIP-681 style payment requests for invoices.
//!
//! The payload doubles as QR code content, so wallets scanning the code open
//! a `payInvoice` call with the invoice id and value prefilled.

use urlencoding::encode;

const SCHEME: &str = "ethereum";
const PAY_FUNCTION: &str = "payInvoice";

/// Query values are form-encoded, so a space becomes `+` and a literal `+`
/// becomes `%2B`.
fn encode_query_value(value: &str) -> String {
    encode(value).replace("%20", "+")
}

pub fn payment_link(contract_address: &str, invoice_id: &str, amount: Option<u128>) -> String {
    let mut link = format!(
        "{SCHEME}:{contract_address}?function={}&invoiceId={}",
        encode_query_value(PAY_FUNCTION),
        encode_query_value(invoice_id)
    );
    if let Some(amount) = amount {
        link.push_str(&format!("&value={amount}"));
    }
    link
}

pub fn qr_code_data(contract_address: &str, invoice_id: &str, amount: Option<u128>) -> String {
    payment_link(contract_address, invoice_id, amount)
}
