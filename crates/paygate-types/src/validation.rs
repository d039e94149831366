//! Format rules for stored payment credentials.
//!
//! All checks are pure. They look at the shape of the input only: an expiry of
//! `13/99` passes, and no checksum is computed for card numbers.

use regex::Regex;
use std::sync::LazyLock;

use crate::account::{PaymentDetails, PaymentMethod};

static CARD_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("valid regex"));
static CARD_EXPIRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}/[0-9]{2}$").expect("valid regex"));
static CARD_CVV: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("valid regex"));
static BANK_ACCOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8,12}$").expect("valid regex"));
static MOBILE_HANDLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.]+@[a-zA-Z0-9]+$").expect("valid regex"));

/// Removes every whitespace character, including interior ones.
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// 16 digits once whitespace is stripped, an `MM/YY`-shaped expiry and a
/// 3-digit CVV.
pub fn valid_card(number: Option<&str>, expiry: Option<&str>, cvv: Option<&str>) -> bool {
    let (Some(number), Some(expiry), Some(cvv)) = (number, expiry, cvv) else {
        return false;
    };
    CARD_NUMBER.is_match(&strip_whitespace(number))
        && CARD_EXPIRY.is_match(expiry)
        && CARD_CVV.is_match(cvv)
}

/// 8 to 12 digits once whitespace is stripped.
pub fn valid_bank_account(number: Option<&str>) -> bool {
    number.is_some_and(|number| BANK_ACCOUNT.is_match(&strip_whitespace(number)))
}

/// `localpart@provider`: alphanumerics and periods before the `@`,
/// alphanumerics only after it.
pub fn valid_mobile_handle(handle: Option<&str>) -> bool {
    handle.is_some_and(|handle| MOBILE_HANDLE.is_match(handle))
}

/// Runs the rule matching `method` against the stored fields for that method.
///
/// External wallets always pass; unrecognized methods never do.
pub fn validate(method: &PaymentMethod, details: &PaymentDetails) -> bool {
    match method {
        PaymentMethod::CreditCard => valid_card(
            details.card_number.as_deref(),
            details.card_expiry.as_deref(),
            details.card_cvv.as_deref(),
        ),
        PaymentMethod::BankAccount => valid_bank_account(details.bank_account.as_deref()),
        PaymentMethod::MobileHandle => valid_mobile_handle(details.mobile_handle.as_deref()),
        PaymentMethod::ExternalWallet => true,
        PaymentMethod::Unrecognized(_) => false,
    }
}
