//! Wallet address helpers and free-text sanitizing.

pub const DEFAULT_SHORTEN_CHARS: usize = 4;

const ADDRESS_HEX_LEN: usize = 40;

/// Keeps the `0x` prefix plus `chars` characters on each side: `0x742d...b22f`.
pub fn shorten_address(address: &str, chars: usize) -> String {
    let symbols: Vec<char> = address.chars().collect();
    if symbols.len() <= chars.saturating_mul(2).saturating_add(2) {
        return address.to_string();
    }
    let head: String = symbols[..chars + 2].iter().collect();
    let tail: String = symbols[symbols.len() - chars..].iter().collect();
    format!("{head}...{tail}")
}

/// `0x` followed by exactly 40 hex digits, either case.
pub fn is_valid_address(address: &str) -> bool {
    address
        .strip_prefix("0x")
        .filter(|digits| digits.len() == ADDRESS_HEX_LEN)
        .map(|digits| hex::decode(digits).is_ok())
        .unwrap_or(false)
}

pub fn sanitize_input(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '"' | '\''))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x742d35Cc6834C0532925a3b8D697Fc41B3Abb22f";

    #[test]
    fn shortens_long_addresses() {
        assert_eq!(shorten_address(ADDRESS, DEFAULT_SHORTEN_CHARS), "0x742d...b22f");
        assert_eq!(shorten_address(ADDRESS, 6), "0x742d35...Abb22f");
    }

    #[test]
    fn shortens_only_past_the_visible_width() {
        assert_eq!(shorten_address("", 4), "");
        assert_eq!(shorten_address("0x12345678", 4), "0x12345678");
        assert_eq!(shorten_address("alice.near", 4), "alice.near");
        assert_eq!(shorten_address("bob.testnet", 4), "bob.te...tnet");
    }

    #[test]
    fn validates_hex_addresses() {
        assert!(is_valid_address(ADDRESS));
        assert!(is_valid_address("0x0000000000000000000000000000000000000000"));
        assert!(!is_valid_address("742d35Cc6834C0532925a3b8D697Fc41B3Abb22f"));
        assert!(!is_valid_address("0x742d35Cc6834C0532925a3b8D697Fc41B3Abb22"));
        assert!(!is_valid_address("0x8ba1f109551bD432803012645Hac136c9123456789"));
        assert!(!is_valid_address("0xZZ2d35Cc6834C0532925a3b8D697Fc41B3Abb22f"));
    }

    #[test]
    fn sanitize_strips_markup_characters() {
        assert_eq!(sanitize_input("  <b>lunch</b> "), "blunch/b");
        assert_eq!(sanitize_input("\"Taro's\" taxi"), "Taros taxi");
        assert_eq!(sanitize_input("ランチ代の割り勘"), "ランチ代の割り勘");
    }

    #[test]
    fn oversized_width_returns_address_unchanged() {
        let address = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";
        assert_eq!(shorten_address(address, usize::MAX), address);
        assert_eq!(shorten_address(address, usize::MAX / 2), address);
    }
}
