//! Masking of sensitive numbers for output.
//!
//! The mask prefix is always emitted, followed by at most the last four
//! characters of the whitespace-stripped value.

use crate::validation::strip_whitespace;

pub const CARD_MASK_PREFIX: &str = "xxxx-xxxx-xxxx-";
pub const ACCOUNT_MASK_PREFIX: &str = "xxxxxxxx";

fn last_four(value: &str) -> String {
    let cleaned: Vec<char> = strip_whitespace(value).chars().collect();
    let start = cleaned.len().saturating_sub(4);
    cleaned[start..].iter().collect()
}

pub fn mask_card_number(number: &str) -> String {
    format!("{CARD_MASK_PREFIX}{}", last_four(number))
}

pub fn mask_account_number(number: &str) -> String {
    format!("{ACCOUNT_MASK_PREFIX}{}", last_four(number))
}
