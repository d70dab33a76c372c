use async_trait::async_trait;
use chrono::Utc;
use market_core::{change_percent, Exchange, MarketError, Quote, QuoteProvider};
use reqwest::Client;
use serde::Deserialize;

use crate::config::FeedConfig;
use crate::rate_gate::RateGate;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const QUOTE_BASE_URL: &str = "https://query2.finance.yahoo.com/v7/finance/quote";
const SCRAPE_BASE_URL: &str = "https://www.google.com/finance/quote";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

fn build_client(config: &FeedConfig) -> Client {
    Client::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Primary source: the chart API. Richest schema — full day OHLCV plus
/// previous close in the chart meta.
pub struct ChartApiProvider {
    client: Client,
    gate: RateGate,
}

impl ChartApiProvider {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: build_client(config),
            gate: RateGate::new(config.min_call_interval),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartOuter,
}

#[derive(Debug, Deserialize)]
struct ChartOuter {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "chartPreviousClose")]
    chart_previous_close: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "regularMarketDayHigh")]
    regular_market_day_high: Option<f64>,
    #[serde(rename = "regularMarketDayLow")]
    regular_market_day_low: Option<f64>,
    #[serde(rename = "regularMarketVolume")]
    regular_market_volume: Option<f64>,
}

#[async_trait]
impl QuoteProvider for ChartApiProvider {
    fn name(&self) -> &'static str {
        "yahoo-chart"
    }

    async fn fetch(&self, symbol: &str, exchange: Exchange) -> Result<Option<Quote>, MarketError> {
        self.gate.acquire().await;

        let url = format!("{}/{}{}", CHART_BASE_URL, symbol, exchange.api_suffix());
        let response = self
            .client
            .get(&url)
            .query(&[("interval", "1d"), ("range", "1d")])
            .send()
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketError::Provider(format!(
                "chart API HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let meta = match body.chart.result.and_then(|mut r| r.pop()) {
            Some(result) => result.meta,
            None => return Ok(None),
        };
        let price = match meta.regular_market_price {
            Some(p) if p > 0.0 => p,
            _ => return Ok(None),
        };
        let previous_close = meta
            .chart_previous_close
            .or(meta.previous_close)
            .unwrap_or(0.0);

        Ok(Some(Quote {
            symbol: symbol.to_string(),
            exchange,
            price,
            previous_close,
            day_open: None,
            day_high: meta.regular_market_day_high,
            day_low: meta.regular_market_day_low,
            volume: meta.regular_market_volume,
            change_pct: change_percent(price, previous_close),
            source: self.name().to_string(),
            fetched_at: Utc::now(),
        }))
    }
}

/// Secondary source: the quote aggregator API. Looser schema, walked as raw
/// JSON — only price plus an optional previous close are guaranteed.
pub struct QuoteApiProvider {
    client: Client,
    gate: RateGate,
}

impl QuoteApiProvider {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: build_client(config),
            gate: RateGate::new(config.min_call_interval),
        }
    }
}

#[async_trait]
impl QuoteProvider for QuoteApiProvider {
    fn name(&self) -> &'static str {
        "yahoo-quote"
    }

    async fn fetch(&self, symbol: &str, exchange: Exchange) -> Result<Option<Quote>, MarketError> {
        self.gate.acquire().await;

        let api_symbol = format!("{}{}", symbol, exchange.api_suffix());
        let response = self
            .client
            .get(QUOTE_BASE_URL)
            .query(&[("symbols", api_symbol.as_str())])
            .send()
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketError::Provider(format!(
                "quote API HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let result = json
            .get("quoteResponse")
            .and_then(|v| v.get("result"))
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first());
        let Some(result) = result else {
            return Ok(None);
        };

        let price = result
            .get("regularMarketPrice")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        if price <= 0.0 {
            return Ok(None);
        }
        let previous_close = result
            .get("regularMarketPreviousClose")
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);

        Ok(Some(Quote {
            symbol: symbol.to_string(),
            exchange,
            price,
            previous_close,
            day_open: result.get("regularMarketOpen").and_then(|v| v.as_f64()),
            day_high: result.get("regularMarketDayHigh").and_then(|v| v.as_f64()),
            day_low: result.get("regularMarketDayLow").and_then(|v| v.as_f64()),
            volume: result.get("regularMarketVolume").and_then(|v| v.as_f64()),
            change_pct: change_percent(price, previous_close),
            source: self.name().to_string(),
            fetched_at: Utc::now(),
        }))
    }
}

/// Tertiary source: scrape of the public quote page. Last resort — only the
/// last traded price is extracted.
pub struct ScrapeProvider {
    client: Client,
    gate: RateGate,
}

impl ScrapeProvider {
    pub fn new(config: &FeedConfig) -> Self {
        Self {
            client: build_client(config),
            gate: RateGate::new(config.min_call_interval),
        }
    }
}

/// Pull a numeric HTML attribute value like `data-last-price="123.45"` out
/// of a page body without a full DOM parse.
fn extract_numeric_attr(body: &str, attr: &str) -> Option<f64> {
    let marker = format!("{attr}=\"");
    let start = body.find(&marker)? + marker.len();
    let rest = &body[start..];
    let end = rest.find('"')?;
    rest[..end].replace(',', "").parse().ok()
}

#[async_trait]
impl QuoteProvider for ScrapeProvider {
    fn name(&self) -> &'static str {
        "google-scrape"
    }

    async fn fetch(&self, symbol: &str, exchange: Exchange) -> Result<Option<Quote>, MarketError> {
        self.gate.acquire().await;

        let url = format!("{}/{}:{}", SCRAPE_BASE_URL, symbol, exchange.scrape_code());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MarketError::Provider(format!(
                "scrape HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MarketError::Provider(e.to_string()))?;

        let price = match extract_numeric_attr(&body, "data-last-price") {
            Some(p) if p > 0.0 => p,
            _ => return Ok(None),
        };

        Ok(Some(Quote {
            symbol: symbol.to_string(),
            exchange,
            price,
            previous_close: 0.0,
            day_open: None,
            day_high: None,
            day_low: None,
            volume: None,
            change_pct: 0.0,
            source: self.name().to_string(),
            fetched_at: Utc::now(),
        }))
    }
}
