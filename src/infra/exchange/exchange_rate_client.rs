use crate::core::exchange::{CurrencyCode, ExchangeError, RateProvider};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://v6.exchangerate-api.com/v6";

/// Client for exchangerate-api.com's `latest` endpoint.
pub struct ExchangeRateApiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    conversion_rates: HashMap<String, f64>,
}

impl ExchangeRateApiClient {
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn latest_url(&self, base: &CurrencyCode) -> String {
        format!("{}/{}/latest/{}", self.base_url, self.api_key, base)
    }
}

/// Reads the rate for `to` out of a `latest` response body.
fn parse_rate(body: &str, to: &CurrencyCode) -> Result<Option<f64>, ExchangeError> {
    let latest: LatestRates =
        serde_json::from_str(body).map_err(|e| ExchangeError::Api(e.to_string()))?;

    if latest.result.as_deref() == Some("error") {
        return Err(ExchangeError::Api(
            latest.error_type.unwrap_or_else(|| "unknown error".to_string()),
        ));
    }

    Ok(latest.conversion_rates.get(to.as_str()).copied())
}

#[async_trait]
impl RateProvider for ExchangeRateApiClient {
    async fn rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Option<f64>, ExchangeError> {
        // The URL carries the API key, so only the currencies are logged.
        tracing::debug!(from = from.as_str(), to = to.as_str(), "Fetching exchange rate");

        let response = self
            .client
            .get(self.latest_url(from))
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ExchangeError::Transport(e.without_url().to_string()))?;

        if !status.is_success() {
            // The body still says why (e.g. "invalid-key"), so try it first.
            return match parse_rate(&text, to) {
                Err(e) => Err(e),
                Ok(_) => Err(ExchangeError::Api(format!("HTTP {}", status))),
            };
        }

        parse_rate(&text, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(raw: &str) -> CurrencyCode {
        CurrencyCode::parse(raw).unwrap()
    }

    #[test]
    fn test_latest_url() {
        let client = ExchangeRateApiClient::new(
            "KEY".to_string(),
            "https://v6.exchangerate-api.com/v6/",
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.latest_url(&code("USD")),
            "https://v6.exchangerate-api.com/v6/KEY/latest/USD"
        );
    }

    #[test]
    fn test_parse_rate_found() {
        let body = r#"{"result":"success","base_code":"USD","conversion_rates":{"USD":1,"DOP":58.5}}"#;
        assert_eq!(parse_rate(body, &code("DOP")).unwrap(), Some(58.5));
    }

    #[test]
    fn test_parse_rate_missing_currency() {
        let body = r#"{"result":"success","conversion_rates":{"USD":1}}"#;
        assert_eq!(parse_rate(body, &code("DOP")).unwrap(), None);
    }

    #[test]
    fn test_parse_rate_api_error() {
        let body = r#"{"result":"error","error-type":"invalid-key"}"#;
        match parse_rate(body, &code("DOP")) {
            Err(ExchangeError::Api(reason)) => assert_eq!(reason, "invalid-key"),
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rate_garbage() {
        assert!(matches!(
            parse_rate("<html>", &code("DOP")),
            Err(ExchangeError::Api(_))
        ));
    }
}
