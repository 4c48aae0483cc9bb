//! Conversion between user input and contract values.
//!
//! Amounts typed by the user are decimal strings; the contract works in base
//! units scaled by `10^decimals`. Conversion happens only here, at the
//! orchestrator boundary.

use crate::OrchestratorError;
use alloy_primitives::{
    utils::{format_units, parse_units},
    Address, U256,
};

/// Parse a decimal amount such as `"1.5"` into base units.
///
/// Only plain decimals are accepted: digits with at most one `.` and no more
/// fractional digits than `decimals`. Anything that would be rounded is
/// rejected.
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, OrchestratorError> {
    let trimmed = input.trim();
    let invalid = || OrchestratorError::InvalidInput(format!("Số lượng không hợp lệ: {trimmed}"));

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let digits_only = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !digits_only(whole) || !digits_only(fraction) {
        return Err(invalid());
    }
    if fraction.len() > usize::from(decimals) {
        return Err(OrchestratorError::InvalidInput(format!(
            "Số lượng không hợp lệ: {trimmed} (tối đa {decimals} chữ số thập phân)"
        )));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };

    let parsed = parse_units(&normalized, decimals).map_err(|_| invalid())?;
    Ok(parsed.get_absolute())
}

/// Format base units as a decimal string without trailing fractional zeros.
pub fn format_amount(value: U256, decimals: u8) -> String {
    let formatted = format_units(value, decimals).unwrap_or_else(|_| value.to_string());

    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Parse a hex address, with or without `0x` prefix.
pub fn parse_address(input: &str) -> Result<Address, OrchestratorError> {
    let trimmed = input.trim();
    trimmed
        .parse()
        .map_err(|_| OrchestratorError::InvalidInput(format!("Địa chỉ không hợp lệ: {trimmed}")))
}
