//! Locale-aware rendering of dates, numbers, and currency amounts.
//!
//! Rendering is driven entirely by the [`FormatterSet`] carried on each
//! catalogue record, so adding a locale never means touching this module.

use crate::catalogue::{LanguageConfig, NumberFormat};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};

/// Which formatter pattern to apply to a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStyle {
    /// The locale's date pattern (default)
    #[default]
    Date,
    /// The locale's time pattern
    Time,
    /// Date and time patterns joined with a space
    DateTime,
}

/// Check that a strftime pattern contains no invalid specifiers.
///
/// chrono reports invalid specifiers lazily while rendering; validating up
/// front keeps rendering infallible.
pub fn validate_strftime(pattern: &str) -> bool {
    !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
}

/// Render a timestamp using the locale's configured patterns.
///
/// An invalid stored pattern falls back to ISO-8601 rather than failing the
/// call; validation at load time makes that path unreachable for catalogue
/// records.
pub fn format_date(date: &DateTime<Utc>, config: &LanguageConfig, style: DateStyle) -> String {
    let pattern = match style {
        DateStyle::Date => config.formatters.date.clone(),
        DateStyle::Time => config.formatters.time.clone(),
        DateStyle::DateTime => {
            format!("{} {}", config.formatters.date, config.formatters.time)
        }
    };

    if !validate_strftime(&pattern) {
        return date.format("%Y-%m-%d %H:%M").to_string();
    }
    date.format(&pattern).to_string()
}

/// Render a number with the locale's separators and grouping.
///
/// `decimals` fixes the fraction width; `None` keeps the value's natural
/// representation (integers render without a fraction).
pub fn format_number(value: f64, format: &NumberFormat, decimals: Option<usize>) -> String {
    let negative = value.is_sign_negative() && value != 0.0;
    let magnitude = value.abs();

    let rendered = match decimals {
        Some(d) => format!("{:.*}", d, magnitude),
        None if magnitude.fract() == 0.0 => format!("{:.0}", magnitude),
        None => format!("{}", magnitude),
    };

    let mut parts = rendered.splitn(2, '.');
    let integer_part = parts.next().unwrap_or("0");
    let fraction_part = parts.next();

    let grouped = if format.grouping {
        add_grouping(integer_part, format.grouping_separator)
    } else {
        integer_part.to_string()
    };

    let body = match fraction_part {
        Some(frac) => format!("{}{}{}", grouped, format.decimal_separator, frac),
        None => grouped,
    };

    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

/// Render a currency amount using the locale's symbol and template.
pub fn format_currency(value: f64, config: &LanguageConfig) -> String {
    let amount = format_number(value, &config.formatters.number, Some(2));
    config
        .formatters
        .currency
        .template
        .replace("{symbol}", &config.formatters.currency.symbol)
        .replace("{amount}", &amount)
}

/// Insert a grouping separator every three digits, right to left.
fn add_grouping(integer: &str, separator: char) -> String {
    let digits: Vec<char> = integer.chars().collect();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(*c);
    }
    out
}
