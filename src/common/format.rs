// src/common/format.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::invoice::PlanAmount;

/// Shown wherever a value is missing.
pub const PLACEHOLDER: &str = "-";

const RUPEE: char = '₹';

/// Formats a raw amount as Indian rupees without fraction digits.
///
/// Empty input yields the placeholder. Input that is not a number is returned
/// verbatim, so formatting an already formatted value is a no-op.
pub fn format_currency(value: &str) -> String {
    if value.is_empty() {
        return PLACEHOLDER.to_string();
    }

    match parse_amount(value) {
        Some(amount) => {
            let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
            let digits = rounded.abs().trunc().to_string();
            let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
            format!("{sign}{RUPEE}{}", group_indian(&digits))
        }
        None => value.to_string(),
    }
}

/// Label for one of the fixed plan sizes, placeholder for anything else.
pub fn plan_amount_label(value: &str) -> String {
    PlanAmount::from_value(value)
        .map(|plan| plan.label().to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Placeholder for empty text, the text itself otherwise.
pub fn or_placeholder(value: &str) -> String {
    if value.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        value.to_string()
    }
}

/// Groups an unsigned digit string the Indian way: the last three digits,
/// then pairs (12,34,56,789).
pub fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Reads an amount the way a numeric form input does: surrounding whitespace
/// is ignored and blank input counts as zero. Digit separators are not numbers.
fn parse_amount(value: &str) -> Option<Decimal> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(Decimal::ZERO);
    }
    if trimmed.contains('_') {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
