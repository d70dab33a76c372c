use std::collections::HashMap;

use futures_util::future::join_all;
use market_core::{Exchange, Quote, QuoteProvider};

use crate::cache::QuoteCache;
use crate::chain::ProviderChain;
use crate::config::FeedConfig;
use crate::providers::{ChartApiProvider, QuoteApiProvider, ScrapeProvider};
use crate::sanitize::sanitize_symbol;

/// Front door for quote retrieval: sanitizes symbols, consults the TTL cache,
/// and falls back to the provider chain on a miss. Bulk requests fan the
/// misses out concurrently; each provider self-throttles through its gate.
pub struct QuoteService {
    cache: QuoteCache,
    chain: ProviderChain,
}

impl QuoteService {
    pub fn new(config: &FeedConfig) -> Self {
        let providers: Vec<Box<dyn QuoteProvider>> = vec![
            Box::new(ChartApiProvider::new(config)),
            Box::new(QuoteApiProvider::new(config)),
            Box::new(ScrapeProvider::new(config)),
        ];
        Self::with_chain(ProviderChain::new(providers), config.cache_capacity)
    }

    /// Build against an arbitrary chain, used by tests and by callers that
    /// need a custom provider order.
    pub fn with_chain(chain: ProviderChain, cache_capacity: usize) -> Self {
        Self {
            cache: QuoteCache::new(cache_capacity),
            chain,
        }
    }

    /// Latest quote for one symbol, or `None` when the symbol is invalid or
    /// every source came up empty.
    pub async fn get_quote(&self, raw_symbol: &str, exchange: Exchange) -> Option<Quote> {
        let symbol = sanitize_symbol(raw_symbol)?;
        let key = QuoteCache::key(&symbol, exchange);
        if let Some(quote) = self.cache.get(&key) {
            return Some(quote);
        }
        let quote = self.chain.fetch_quote(&symbol, exchange).await?;
        self.cache.put(key, quote.clone());
        Some(quote)
    }

    /// Quotes for many symbols. Cache hits are answered immediately; misses
    /// are fetched concurrently. Symbols with no data anywhere are simply
    /// absent from the result — callers treat absence as "unknown".
    pub async fn get_bulk_quotes(
        &self,
        raw_symbols: &[String],
        exchange: Exchange,
    ) -> HashMap<String, Quote> {
        let mut out = HashMap::new();
        let mut misses: Vec<String> = Vec::new();

        for raw in raw_symbols {
            let Some(symbol) = sanitize_symbol(raw) else {
                tracing::debug!(%raw, "skipping invalid symbol");
                continue;
            };
            if out.contains_key(&symbol) || misses.contains(&symbol) {
                continue;
            }
            match self.cache.get(&QuoteCache::key(&symbol, exchange)) {
                Some(quote) => {
                    out.insert(symbol, quote);
                }
                None => misses.push(symbol),
            }
        }

        let fetches = misses
            .iter()
            .map(|symbol| self.chain.fetch_quote(symbol, exchange));
        let results = join_all(fetches).await;

        for (symbol, result) in misses.into_iter().zip(results) {
            if let Some(quote) = result {
                self.cache
                    .put(QuoteCache::key(&symbol, exchange), quote.clone());
                out.insert(symbol, quote);
            }
        }

        out
    }
}
