// Currency conversion - platform-agnostic.
//
// The rate itself comes from a RateProvider (see infra/exchange); this
// service validates the request, multiplies, and words the answer.

use super::currencies::CurrencyCode;
use async_trait::async_trait;

/// Shown whenever no rate could be obtained.
pub const RATE_UNAVAILABLE: &str = "No se pudo obtener el tipo de cambio en este momento.";

#[derive(Debug, thiserror::Error)]
pub enum ExchangeError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),
    #[error("Exchange-rate request failed: {0}")]
    Transport(String),
    #[error("Exchange-rate API error: {0}")]
    Api(String),
}

impl ExchangeError {
    /// Text shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ExchangeError::InvalidCurrency(code) => {
                format!("Código de moneda no válido: {}.", code)
            }
            ExchangeError::InvalidAmount(_) => {
                "El monto debe ser un número mayor o igual a cero.".to_string()
            }
            ExchangeError::Transport(_) | ExchangeError::Api(_) => RATE_UNAVAILABLE.to_string(),
        }
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Units of `to` per one unit of `from`, or `None` when the API has no
    /// rate for that pair.
    async fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Option<f64>, ExchangeError>;
}

/// A validated `/convertir` request.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionRequest {
    pub fn new(amount: f64, from: &str, to: &str) -> Result<Self, ExchangeError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(ExchangeError::InvalidAmount(amount));
        }

        Ok(Self {
            amount,
            from: CurrencyCode::parse(from)?,
            to: CurrencyCode::parse(to)?,
        })
    }
}

/// "100 USD son aproximadamente 5850.00 DOP"
pub fn format_conversion(request: &ConversionRequest, rate: f64) -> String {
    format!(
        "{} {} son aproximadamente {:.2} {}",
        request.amount,
        request.from,
        request.amount * rate,
        request.to
    )
}

pub struct ExchangeService<R: RateProvider> {
    provider: R,
}

impl<R: RateProvider> ExchangeService<R> {
    pub fn new(provider: R) -> Self {
        Self { provider }
    }

    #[allow(dead_code)]
    pub fn provider(&self) -> &R {
        &self.provider
    }

    /// Converts and always returns text for the user. No retries.
    pub async fn convert(&self, request: &ConversionRequest) -> String {
        match self.provider.rate(&request.from, &request.to).await {
            Ok(Some(rate)) => {
                tracing::info!(
                    from = request.from.as_str(),
                    to = request.to.as_str(),
                    rate,
                    "Exchange rate resolved"
                );
                format_conversion(request, rate)
            }
            Ok(None) => {
                tracing::warn!(
                    from = request.from.as_str(),
                    to = request.to.as_str(),
                    "No exchange rate for target currency"
                );
                RATE_UNAVAILABLE.to_string()
            }
            Err(e) => {
                tracing::error!("Error fetching exchange rate: {}", e);
                e.user_message()
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fixed table of rates keyed by "FROM->TO".
    pub(crate) struct StubRates {
        rates: HashMap<String, f64>,
        fail: bool,
        pub lookups: AtomicUsize,
    }

    impl StubRates {
        pub(crate) fn with(pairs: &[(&str, &str, f64)]) -> Self {
            Self {
                rates: pairs
                    .iter()
                    .map(|(from, to, rate)| (format!("{}->{}", from, to), *rate))
                    .collect(),
                fail: false,
                lookups: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::with(&[])
            }
        }
    }

    #[async_trait]
    impl RateProvider for StubRates {
        async fn rate(
            &self,
            from: &CurrencyCode,
            to: &CurrencyCode,
        ) -> Result<Option<f64>, ExchangeError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ExchangeError::Transport("timed out".to_string()));
            }
            Ok(self.rates.get(&format!("{}->{}", from, to)).copied())
        }
    }

    #[tokio::test]
    async fn test_convert_usd_to_dop() {
        let service = ExchangeService::new(StubRates::with(&[("USD", "DOP", 58.5)]));
        let request = ConversionRequest::new(100.0, "USD", "DOP").unwrap();

        assert_eq!(
            service.convert(&request).await,
            "100 USD son aproximadamente 5850.00 DOP"
        );
    }

    #[tokio::test]
    async fn test_convert_keeps_fractional_amount() {
        let service = ExchangeService::new(StubRates::with(&[("EUR", "USD", 1.0833)]));
        let request = ConversionRequest::new(12.5, "eur", "usd").unwrap();

        assert_eq!(
            service.convert(&request).await,
            "12.5 EUR son aproximadamente 13.54 USD"
        );
    }

    #[tokio::test]
    async fn test_missing_rate_is_unavailable() {
        let service = ExchangeService::new(StubRates::with(&[("USD", "DOP", 58.5)]));
        let request = ConversionRequest::new(1.0, "USD", "XAU").unwrap();

        assert_eq!(service.convert(&request).await, RATE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_provider_failure_is_unavailable() {
        let service = ExchangeService::new(StubRates::failing());
        let request = ConversionRequest::new(1.0, "USD", "DOP").unwrap();

        assert_eq!(service.convert(&request).await, RATE_UNAVAILABLE);
        assert_eq!(service.provider.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_rejects_invalid_amounts() {
        for amount in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ConversionRequest::new(amount, "USD", "DOP"),
                Err(ExchangeError::InvalidAmount(_))
            ));
        }
        assert!(ConversionRequest::new(0.0, "USD", "DOP").is_ok());
    }

    #[test]
    fn test_request_rejects_invalid_currency() {
        let err = ConversionRequest::new(5.0, "USD", "dollars").unwrap_err();
        assert_eq!(err.user_message(), "Código de moneda no válido: dollars.");
    }
}
