//! Currency codes and locale-aware number formatting.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::DomainError;

/// ISO 4217 currency representation.
///
/// Deserialization validates through [`CurrencyCode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "String")]
pub struct CurrencyCode(String);

impl<'de> Deserialize<'de> for CurrencyCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        CurrencyCode::parse(&raw).map_err(de::Error::custom)
    }
}

impl CurrencyCode {
    /// Builds a code from any string, upper-casing it without further checks.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Builds a code, rejecting anything that is not three ASCII letters.
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let trimmed = code.trim();
        if trimmed.len() == 3 && trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
            Ok(Self::new(trimmed))
        } else {
            Err(DomainError::InvalidCurrency(code.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digits after the decimal point for amounts in this currency.
    pub fn minor_units(&self) -> u32 {
        minor_units_for(self.as_str())
    }

    pub fn symbol(&self) -> String {
        symbol_for(self.as_str())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<String> for CurrencyCode {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for CurrencyCode {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.0
    }
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl LocaleConfig {
    /// Picks separators for a handful of common language tags, falling back to `en-US`.
    pub fn for_tag(tag: &str) -> Self {
        let (decimal_separator, grouping_separator) = match tag.replace('_', "-").as_str() {
            "de-DE" | "es-ES" | "it-IT" | "nl-NL" | "pt-BR" | "id-ID" => (',', '.'),
            "fr-FR" | "sv-SE" | "nb-NO" | "pl-PL" | "cs-CZ" => (',', ' '),
            "de-CH" => ('.', '\''),
            _ => ('.', ','),
        };
        Self {
            language_tag: tag.to_string(),
            decimal_separator,
            grouping_separator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FormatOptions {
    pub currency_display: CurrencyDisplay,
    pub negative_style: NegativeStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurrencyDisplay {
    #[default]
    Symbol,
    Code,
    SymbolAndCode,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "INR" => "₹".into(),
        "BRL" => "R$".into(),
        _ => code.into(),
    }
}

pub fn minor_units_for(code: &str) -> u32 {
    match code {
        "JPY" | "KRW" | "CLP" | "ISK" => 0,
        "KWD" | "BHD" | "OMR" | "JOD" => 3,
        _ => 2,
    }
}

/// Renders `value` with exactly `precision` fractional digits and locale separators.
pub fn format_number(locale: &LocaleConfig, value: Decimal, precision: u32) -> String {
    let mut fixed = value;
    fixed.rescale(precision);
    let raw = fixed.to_string();
    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let mut body = format!("{}{}", sign, group_digits(int_part, locale.grouping_separator));
    if let Some(frac) = frac_part {
        body.push(locale.decimal_separator);
        body.push_str(frac);
    }
    body
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

pub fn format_currency_value(
    amount: Decimal,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    options: &FormatOptions,
) -> String {
    let body = format_number(locale, amount.abs(), code.minor_units());
    let negative = amount.is_sign_negative() && !amount.is_zero();
    let symbol = code.symbol();
    let decorated = |prefix: &str| match (negative, options.negative_style) {
        (false, _) => format!("{prefix}{body}"),
        (true, NegativeStyle::Sign) => format!("-{prefix}{body}"),
        (true, NegativeStyle::Parentheses) => format!("({prefix}{body})"),
    };
    match options.currency_display {
        CurrencyDisplay::Symbol => decorated(&symbol),
        CurrencyDisplay::Code => decorated(&format!("{} ", code.as_str())),
        CurrencyDisplay::SymbolAndCode => format!("{} ({})", decorated(&symbol), code.as_str()),
    }
}
