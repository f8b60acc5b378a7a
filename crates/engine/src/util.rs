//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, Money, ResultEngine};

/// Largest single amount accepted from a form, in minor units.
pub(crate) const MAX_AMOUNT_MINOR: i64 = 1_000_000_000_000;

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidInput(format!("invalid {label} id")))
}

/// Comparison key for people's names: accents stripped, lowercased,
/// punctuation and repeated whitespace collapsed to single spaces.
///
/// `"María  Pérez"` and `"maria perez"` share the key `"maria perez"`.
pub(crate) fn normalize_name_key(value: &str) -> String {
    let mut out = String::new();
    let mut prev_space = false;
    for ch in value.trim().nfkd() {
        if is_combining_mark(ch) {
            continue;
        }
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            prev_space = false;
        } else if !out.is_empty() && !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    out.trim_end().to_string()
}

/// Ensure a form amount is `>= 0` and within bounds.
pub(crate) fn ensure_non_negative(amount: Money, label: &str) -> ResultEngine<()> {
    if amount.is_negative() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must not be negative"
        )));
    }
    ensure_bounded(amount, label)
}

/// Ensure a form amount is `> 0` and within bounds.
pub(crate) fn ensure_positive(amount: Money, label: &str) -> ResultEngine<()> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    ensure_bounded(amount, label)
}

fn ensure_bounded(amount: Money, label: &str) -> ResultEngine<()> {
    if amount.minor() > MAX_AMOUNT_MINOR {
        return Err(EngineError::InvalidAmount(format!("{label} is too large")));
    }
    Ok(())
}
