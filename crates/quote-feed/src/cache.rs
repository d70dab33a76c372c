use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use market_core::{Exchange, Quote};

use crate::market_hours;

/// Freshness window while the exchange session is running.
const OPEN_TTL_SECS: i64 = 60;
/// Freshness window outside trading hours, when prices cannot move.
const CLOSED_TTL_SECS: i64 = 3600;

struct CacheEntry {
    quote: Quote,
    expires_at: DateTime<Utc>,
}

struct Inner {
    map: HashMap<String, CacheEntry>,
    order: VecDeque<String>,
}

/// In-process TTL cache for quotes, keyed by `symbol:exchange`. Bounded at
/// `capacity` entries; inserting past the bound evicts the oldest entry by
/// insertion order. A single lock covers both the map and the order queue so
/// eviction order stays exact under concurrent use.
pub struct QuoteCache {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl QuoteCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity,
        }
    }

    pub fn key(symbol: &str, exchange: Exchange) -> String {
        format!("{symbol}:{exchange}")
    }

    pub fn get(&self, key: &str) -> Option<Quote> {
        self.get_at(key, Utc::now())
    }

    /// Lookup against an explicit clock. An entry at or past its expiry is a
    /// miss; it is never served stale.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<Quote> {
        let inner = self.inner.lock().expect("quote cache lock poisoned");
        inner
            .map
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.quote.clone())
    }

    pub fn put(&self, key: String, quote: Quote) {
        self.put_at(key, quote, Utc::now(), market_hours::is_market_open());
    }

    /// Insert against an explicit clock and market state. TTL is 60s during
    /// the trading session and an hour otherwise.
    pub fn put_at(&self, key: String, quote: Quote, now: DateTime<Utc>, market_open: bool) {
        let ttl_secs = if market_open {
            OPEN_TTL_SECS
        } else {
            CLOSED_TTL_SECS
        };
        let mut inner = self.inner.lock().expect("quote cache lock poisoned");
        if !inner.map.contains_key(&key) && inner.map.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
                tracing::debug!(key = %oldest, "quote cache full, evicted oldest entry");
            }
        }
        let entry = CacheEntry {
            quote,
            expires_at: now + Duration::seconds(ttl_secs),
        };
        if inner.map.insert(key.clone(), entry).is_none() {
            inner.order.push_back(key);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("quote cache lock poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
