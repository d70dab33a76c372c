use async_trait::async_trait;

use crate::{Exchange, MarketError, Quote};

/// A single upstream quote source. Implementations own their HTTP client and
/// rate limiting; `Ok(None)` means the source has no data for the symbol.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, symbol: &str, exchange: Exchange) -> Result<Option<Quote>, MarketError>;
}
