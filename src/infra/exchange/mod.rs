pub mod exchange_rate_client;

pub use exchange_rate_client::ExchangeRateApiClient;
