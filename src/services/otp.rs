//! OTP issuance helpers: channel selection, phone normalization and code
//! generation.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

use crate::entities::otp_codes::{CHANNEL_EMAIL, CHANNEL_PHONE};

lazy_static! {
    static ref NON_PHONE_CHARS: Regex = Regex::new(r"[^\d+]").unwrap();
}

/// An identifier containing `@` is an email address; anything else is
/// treated as a phone number.
pub fn channel_for(identifier: &str) -> &'static str {
    if identifier.contains('@') {
        CHANNEL_EMAIL
    } else {
        CHANNEL_PHONE
    }
}

/// Strip everything but digits and `+`, then ensure a leading `+`.
pub fn normalize_phone(value: &str) -> String {
    let digits = NON_PHONE_CHARS.replace_all(value, "").to_string();
    if digits.starts_with('+') {
        digits
    } else {
        format!("+{}", digits)
    }
}

/// Numeric code of `length` digits with a non-zero leading digit.
pub fn generate_code(length: u32) -> String {
    let length = length.max(4);
    let low = 10u64.pow(length - 1);
    let high = 10u64.pow(length);
    rand::thread_rng().gen_range(low..high).to_string()
}

/// Random 4-digit suffix used to dodge username collisions.
pub fn username_suffix() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

/// Fallback username for phone signups: `user_` plus the trailing digits.
pub fn phone_username(identifier: &str) -> String {
    let digits: String = identifier
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();
    let tail: String = digits
        .chars()
        .rev()
        .take(6)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("user_{}", tail)
}

/// Username for email signups: the local part of the address.
pub fn email_username(identifier: &str) -> String {
    identifier
        .split('@')
        .next()
        .unwrap_or(identifier)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_selection() {
        assert_eq!(channel_for("user@example.com"), CHANNEL_EMAIL);
        assert_eq!(channel_for("+919876543210"), CHANNEL_PHONE);
        assert_eq!(channel_for("98765 43210"), CHANNEL_PHONE);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+91 98765-43210"), "+919876543210");
        assert_eq!(normalize_phone("9876543210"), "+9876543210");
        assert_eq!(normalize_phone("(987) 654-3210"), "+9876543210");
    }

    #[test]
    fn test_generate_code_length_and_leading_digit() {
        for _ in 0..50 {
            let code = generate_code(6);
            assert_eq!(code.len(), 6);
            assert!(!code.starts_with('0'));
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
        // Below the floor the length is clamped up
        assert_eq!(generate_code(1).len(), 4);
    }

    #[test]
    fn test_usernames() {
        assert_eq!(email_username("jane.doe@example.com"), "jane.doe");
        assert_eq!(phone_username("+919876543210"), "user_543210");
        assert_eq!(phone_username("+1234"), "user_1234");
    }
}
