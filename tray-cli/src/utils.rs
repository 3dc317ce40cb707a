use rust_decimal::Decimal;
use thiserror::Error;
use tray_core::calculations::common::round_half_up;

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("empty decimal input")]
    Empty,

    #[error("invalid decimal '{input}': {source}")]
    Invalid {
        input: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Parses a decimal, accepting `,` as a thousands separator.
///
/// A trailing `%` divides by 100, so `"8%"` and `"0.08"` are the same rate.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    let normalized = s.trim().replace(',', "");
    let (digits, percent) = match normalized.strip_suffix('%') {
        Some(rest) => (rest.trim_end(), true),
        None => (normalized.as_str(), false),
    };
    if digits.is_empty() {
        return Err(ParseDecimalError::Empty);
    }

    let value: Decimal = digits.parse().map_err(|source| {
        tracing::error!(input = %s, "invalid decimal: {}", source);
        ParseDecimalError::Invalid {
            input: s.to_string(),
            source,
        }
    })?;

    Ok(if percent {
        value / Decimal::ONE_HUNDRED
    } else {
        value
    })
}

/// How money is written at the display boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyStyle {
    pub symbol: String,
    pub group_separator: char,
    pub decimal_separator: char,
}

impl Default for CurrencyStyle {
    /// US dollars: `$1,234.56`.
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            group_separator: ',',
            decimal_separator: '.',
        }
    }
}

impl CurrencyStyle {
    /// Formats `value` rounded half-up to whole cents.
    pub fn format(
        &self,
        value: Decimal,
    ) -> String {
        let rounded = round_half_up(value);
        let plain = format!("{:.2}", rounded.abs());
        let (whole, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, digit) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(self.group_separator);
            }
            grouped.push(digit);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        format!(
            "{sign}{}{grouped}{}{cents}",
            self.symbol, self.decimal_separator
        )
    }
}

/// Formats with the default (US dollar) style.
pub fn format_currency(value: Decimal) -> String {
    CurrencyStyle::default().format(value)
}
