use market_core::{Exchange, Quote, QuoteProvider};

/// Ordered fallback over quote sources. Each provider has an independent
/// failure domain: an error or malformed payload from one source is logged
/// and the next source is tried. Exhausting every source yields `None`,
/// which is the defined "no data" outcome rather than an error.
pub struct ProviderChain {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn QuoteProvider>>) -> Self {
        Self { providers }
    }

    pub async fn fetch_quote(&self, symbol: &str, exchange: Exchange) -> Option<Quote> {
        for provider in &self.providers {
            match provider.fetch(symbol, exchange).await {
                Ok(Some(quote)) => {
                    tracing::debug!(
                        provider = provider.name(),
                        symbol,
                        price = quote.price,
                        "quote fetched"
                    );
                    return Some(quote);
                }
                Ok(None) => {
                    tracing::debug!(
                        provider = provider.name(),
                        symbol,
                        "no data, falling through to next source"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        provider = provider.name(),
                        symbol,
                        error = %e,
                        "provider failed, falling through to next source"
                    );
                }
            }
        }
        tracing::debug!(symbol, "all quote sources exhausted");
        None
    }
}
