pub mod cache;
pub mod chain;
pub mod config;
pub mod market_hours;
pub mod providers;
pub mod rate_gate;
pub mod sanitize;
pub mod service;

pub use cache::QuoteCache;
pub use chain::ProviderChain;
pub use config::FeedConfig;
pub use rate_gate::RateGate;
pub use sanitize::sanitize_symbol;
pub use service::QuoteService;
