use std::str::FromStr;

use rust_decimal::prelude::*;
use serde_json::Value;

use super::NumberFormatting;
use crate::table::ColumnFormat;

/// Most fraction digits rendered, whatever the column asks for.
pub const MAX_DECIMALS: u32 = 20;

/// en-US number rendering: fixed decimals, comma grouping, `$` and `%`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntlNumberFormatter;

impl NumberFormatting for IntlNumberFormatter {
    fn format_number(&self, value: &Value, kind: ColumnFormat, decimals: u32) -> String {
        let decimals = decimals.min(MAX_DECIMALS);
        let Some(mut number) = Numeric::from_value(value) else {
            return "NaN".to_string();
        };
        if kind == ColumnFormat::Percent {
            number = number.times_hundred();
        }
        let Some((negative, int_part, frac_part)) = number.fixed(decimals) else {
            return "NaN".to_string();
        };

        let mut body = match kind {
            ColumnFormat::NumberUngrouped => int_part,
            _ => group_thousands(&int_part),
        };
        if !frac_part.is_empty() {
            body.push('.');
            body.push_str(&frac_part);
        }

        let sign = if negative { "-" } else { "" };
        match kind {
            ColumnFormat::CurrencyUs => format!("{sign}${body}"),
            ColumnFormat::Percent => format!("{sign}{body}%"),
            _ => format!("{sign}{body}"),
        }
    }
}

/// A cell value as a number: exact when it fits a `Decimal`, otherwise `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Numeric {
    Exact(Decimal),
    Approx(f64),
}

impl Numeric {
    fn from_value(value: &Value) -> Option<Self> {
        let raw = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.trim().to_string(),
            _ => return None,
        };
        if raw.is_empty() {
            return None;
        }
        if let Ok(exact) = Decimal::from_str(&raw).or_else(|_| Decimal::from_scientific(&raw)) {
            return Some(Self::Exact(exact));
        }
        // out of Decimal's range but still a number
        let approx = match value {
            Value::Number(n) => n.as_f64()?,
            _ => raw.parse::<f64>().ok()?,
        };
        approx.is_finite().then_some(Self::Approx(approx))
    }

    fn times_hundred(self) -> Self {
        match self {
            Self::Exact(d) => match d.checked_mul(Decimal::ONE_HUNDRED) {
                Some(scaled) => Self::Exact(scaled),
                None => Self::Approx(shift_two_places(&d.to_string())),
            },
            Self::Approx(f) => Self::Approx(shift_two_places(&format!("{f:e}"))),
        }
    }

    /// Sign, integer digits and exactly `decimals` fraction digits.
    fn fixed(self, decimals: u32) -> Option<(bool, String, String)> {
        match self {
            Self::Exact(d) => Some(fixed_decimal(d, decimals)),
            Self::Approx(f) if !f.is_finite() => None,
            // rounds to zero at any supported precision
            Self::Approx(f) if f.abs() < 1e-21 => {
                Some((false, "0".to_string(), "0".repeat(decimals as usize)))
            }
            Self::Approx(f) => match Decimal::from_f64(f) {
                Some(d) => Some(fixed_decimal(d, decimals)),
                None => Some(fixed_large(f, decimals)),
            },
        }
    }
}

/// Multiplies a decimal literal by 100 through its exponent, so the result is
/// the correctly rounded `f64` rather than a product of two rounded values.
fn shift_two_places(literal: &str) -> f64 {
    let (mantissa, exp) = literal.split_once('e').unwrap_or((literal, "0"));
    exp.parse::<i32>()
        .ok()
        .and_then(|exp| format!("{mantissa}e{}", exp + 2).parse().ok())
        .unwrap_or(f64::NAN)
}

fn fixed_decimal(number: Decimal, decimals: u32) -> (bool, String, String) {
    let rounded = number.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let fixed = format!("{:.*}", decimals as usize, rounded.abs());
    match fixed.split_once('.') {
        Some((i, f)) => (negative, i.to_string(), f.to_string()),
        None => (negative, fixed, String::new()),
    }
}

/// Magnitudes past `Decimal::MAX` have no fraction an `f64` can carry, so the
/// shortest round-trip digits are padded out with zeros.
fn fixed_large(value: f64, decimals: u32) -> (bool, String, String) {
    let sci = format!("{:e}", value.abs());
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: usize = exp.parse().unwrap_or(0);
    let digits = mantissa.replace('.', "");
    let int_part = if digits.len() > exp {
        digits[..=exp].to_string()
    } else {
        format!("{digits}{}", "0".repeat(exp + 1 - digits.len()))
    };
    (value < 0.0, int_part, "0".repeat(decimals as usize))
}

/// Inserts a comma between every group of three digits.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
