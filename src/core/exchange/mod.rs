pub mod currencies;
pub mod exchange_service;

pub use currencies::{filter_currencies, CurrencyCode};
pub use exchange_service::{ConversionRequest, ExchangeError, ExchangeService, RateProvider};
