use primitive_types::U256;

use crate::error::ValidationError;

/// `MM:SS`, zero-padded. Minutes grow past 59 instead of rolling into hours.
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Formats an integer amount with `decimals` fractional digits, trimming
/// trailing zeros: `150_000_000` with 8 decimals is `"1.5"`.
pub fn format_units(value: U256, decimals: u32) -> String {
    let divisor = U256::exp10(decimals as usize);
    let whole = value / divisor;
    let remainder = value % divisor;
    if remainder.is_zero() {
        return whole.to_string();
    }
    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    format!("{}.{}", whole, fraction.trim_end_matches('0'))
}

/// Parses a non-negative decimal string into an integer amount with `decimals`
/// fractional digits. Rejects signs, exponents and excess precision.
pub fn parse_units(input: &str, decimals: u32) -> Result<U256, ValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty("amount"));
    }
    if s.starts_with('-') {
        return Err(ValidationError::Negative("amount"));
    }
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (s, ""),
    };
    let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
        return Err(ValidationError::NotNumeric("amount"));
    }
    if fraction.len() > decimals as usize {
        return Err(ValidationError::TooManyDecimals(decimals));
    }
    let whole = U256::from_dec_str(whole).map_err(|_| ValidationError::Overflow("amount"))?;
    let fraction = format!("{:0<width$}", fraction, width = decimals as usize);
    let fraction = if fraction.is_empty() {
        U256::zero()
    } else {
        U256::from_dec_str(&fraction).map_err(|_| ValidationError::Overflow("amount"))?
    };
    whole
        .checked_mul(U256::exp10(decimals as usize))
        .and_then(|w| w.checked_add(fraction))
        .ok_or(ValidationError::Overflow("amount"))
}

/// Parses a whole, non-negative number typed into the owner panel.
pub fn parse_whole(input: &str, field: &'static str) -> Result<U256, ValidationError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if s.starts_with('-') {
        return Err(ValidationError::Negative(field));
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::NotNumeric(field));
    }
    U256::from_dec_str(s).map_err(|_| ValidationError::Overflow(field))
}

/// `"12s ago"`, `"3m ago"`, `"2h ago"`, `"1d ago"`.
pub fn time_ago(timestamp_ms: u64, now_ms: u64) -> String {
    let seconds = now_ms.saturating_sub(timestamp_ms) / 1000;
    if seconds < 60 {
        format!("{}s ago", seconds)
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}
