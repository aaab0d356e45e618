use super::exchange_service::ExchangeError;
use std::fmt;

/// Currencies offered by the `/convertir` autocomplete, in display order.
pub const CURRENCIES: [&str; 10] = [
    "USD", "DOP", "EUR", "GBP", "JPY", "CNY", "CAD", "AUD", "CHF", "BRL",
];

/// Currencies whose code starts with `partial`, ignoring case.
pub fn filter_currencies(partial: &str) -> Vec<&'static str> {
    let prefix = partial.trim().to_uppercase();
    CURRENCIES
        .iter()
        .copied()
        .filter(|code| code.starts_with(&prefix))
        .collect()
}

/// An ISO-4217 style code: three ASCII letters, stored uppercase.
///
/// Codes outside [`CURRENCIES`] are accepted; the list only drives
/// suggestions, the rate API knows many more.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn parse(raw: &str) -> Result<Self, ExchangeError> {
        let code = raw.trim().to_uppercase();
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(ExchangeError::InvalidCurrency(raw.trim().to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
