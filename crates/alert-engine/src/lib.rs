//! Threshold alerts over the latest quote/indicator snapshot.
//!
//! The evaluator is a pure predicate: it answers "should this alert fire
//! now". Persisting the flip and dispatching the notification belong to
//! the caller; the never-fire-twice contract is honored by only accepting
//! alerts that are still active and by the one-shot
//! [`AlertSpec::mark_triggered`] stamp.

use chrono::{DateTime, NaiveDate, Utc};
use market_core::{IndicatorSet, Quote};
use serde::{Deserialize, Serialize};

/// Tolerance around the 52-week high: fire within 2% below it.
const WEEK_52_HIGH_FACTOR: f64 = 0.98;
/// Tolerance around the 52-week low: fire within 2% above it.
const WEEK_52_LOW_FACTOR: f64 = 1.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertKind {
    PriceAbove,
    PriceBelow,
    PercentChange,
    Week52High,
    Week52Low,
    VolumeSpike,
    Earnings,
}

/// A user-configured alert. Created active; once triggered it is flipped
/// inactive and stays that way until externally reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertSpec {
    pub symbol: String,
    pub kind: AlertKind,
    /// Threshold whose meaning depends on `kind`: a price level, a percent
    /// move, a volume-spike percentage, or a days-until-earnings window.
    pub target_value: f64,
    pub earnings_date: Option<NaiveDate>,
    pub is_active: bool,
    pub notification_sent: bool,
    pub triggered_at: Option<DateTime<Utc>>,
}

impl AlertSpec {
    pub fn new(symbol: impl Into<String>, kind: AlertKind, target_value: f64) -> Self {
        Self {
            symbol: symbol.into(),
            kind,
            target_value,
            earnings_date: None,
            is_active: true,
            notification_sent: false,
            triggered_at: None,
        }
    }

    /// One-shot lifecycle stamp applied by the caller after a positive
    /// evaluation: deactivates the alert so it cannot fire again without an
    /// external reset.
    pub fn mark_triggered(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.notification_sent = true;
        self.triggered_at = Some(now);
    }
}

/// Decide whether `alert` fires against the latest snapshot. Inactive
/// alerts never fire. Alert kinds that need indicator context return false
/// when no `IndicatorSet` is available.
pub fn evaluate_alert(
    alert: &AlertSpec,
    quote: &Quote,
    indicators: Option<&IndicatorSet>,
    today: NaiveDate,
) -> bool {
    if !alert.is_active {
        return false;
    }

    let triggered = match alert.kind {
        AlertKind::PriceAbove => quote.price >= alert.target_value,
        AlertKind::PriceBelow => quote.price <= alert.target_value,
        AlertKind::PercentChange => quote.change_pct.abs() >= alert.target_value,
        AlertKind::Week52High => indicators
            .map(|ind| quote.price >= ind.high_52w * WEEK_52_HIGH_FACTOR)
            .unwrap_or(false),
        AlertKind::Week52Low => indicators
            .map(|ind| quote.price <= ind.low_52w * WEEK_52_LOW_FACTOR)
            .unwrap_or(false),
        AlertKind::VolumeSpike => match (quote.volume, indicators) {
            // Zero volume (pre-market, halted) is never a spike.
            (Some(volume), Some(ind)) if volume > 0.0 && ind.vol_ratio > 0.0 => {
                // Recover the 20-day average from the snapshot's ratio.
                let avg_volume = volume / ind.vol_ratio;
                volume >= avg_volume * (1.0 + alert.target_value / 100.0)
            }
            _ => false,
        },
        AlertKind::Earnings => match alert.earnings_date {
            Some(date) => {
                let days_until = (date - today).num_days();
                days_until >= 0 && days_until as f64 <= alert.target_value
            }
            None => false,
        },
    };

    if triggered {
        tracing::debug!(symbol = %alert.symbol, kind = ?alert.kind, "alert condition met");
    }
    triggered
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_core::Exchange;

    fn quote(price: f64, change_pct: f64, volume: Option<f64>) -> Quote {
        Quote {
            symbol: "TCS".to_string(),
            exchange: Exchange::Nse,
            price,
            previous_close: price,
            day_open: None,
            day_high: None,
            day_low: None,
            volume,
            change_pct,
            source: "test".to_string(),
            fetched_at: Utc::now(),
        }
    }

    fn indicators(high_52w: f64, low_52w: f64, vol_ratio: f64) -> IndicatorSet {
        IndicatorSet {
            last_close: 100.0,
            sma5: None,
            sma20: None,
            sma50: None,
            sma200: None,
            rsi: 50.0,
            macd: None,
            vol_ratio,
            high_52w,
            low_52w,
            range_position: 50.0,
            day_change_pct: 0.0,
            above_sma20: None,
            above_sma50: None,
            above_sma200: None,
            support: None,
            resistance: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    #[test]
    fn price_above_and_below() {
        let alert = AlertSpec::new("TCS", AlertKind::PriceAbove, 100.0);
        assert!(evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));
        assert!(!evaluate_alert(&alert, &quote(99.9, 0.0, None), None, today()));

        let alert = AlertSpec::new("TCS", AlertKind::PriceBelow, 100.0);
        assert!(evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));
        assert!(!evaluate_alert(&alert, &quote(100.1, 0.0, None), None, today()));
    }

    #[test]
    fn percent_change_uses_magnitude() {
        let alert = AlertSpec::new("TCS", AlertKind::PercentChange, 5.0);
        assert!(evaluate_alert(&alert, &quote(100.0, 6.0, None), None, today()));
        assert!(evaluate_alert(&alert, &quote(100.0, -6.0, None), None, today()));
        assert!(!evaluate_alert(&alert, &quote(100.0, 4.0, None), None, today()));
    }

    #[test]
    fn week_52_high_within_two_percent() {
        let alert = AlertSpec::new("TCS", AlertKind::Week52High, 0.0);
        let ind = indicators(100.0, 50.0, 1.0);

        assert!(evaluate_alert(&alert, &quote(100.0, 0.0, None), Some(&ind), today()));
        assert!(evaluate_alert(&alert, &quote(98.0, 0.0, None), Some(&ind), today()));
        assert!(!evaluate_alert(&alert, &quote(97.0, 0.0, None), Some(&ind), today()));
    }

    #[test]
    fn week_52_low_within_two_percent() {
        let alert = AlertSpec::new("TCS", AlertKind::Week52Low, 0.0);
        let ind = indicators(100.0, 50.0, 1.0);

        assert!(evaluate_alert(&alert, &quote(51.0, 0.0, None), Some(&ind), today()));
        assert!(!evaluate_alert(&alert, &quote(52.0, 0.0, None), Some(&ind), today()));
    }

    #[test]
    fn week_52_kinds_need_indicators() {
        let alert = AlertSpec::new("TCS", AlertKind::Week52High, 0.0);
        assert!(!evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));
    }

    #[test]
    fn volume_spike_threshold() {
        // vol_ratio 2.0 means today's volume is twice the 20-day average.
        let ind = indicators(100.0, 50.0, 2.0);
        let q = quote(100.0, 0.0, Some(2_000_000.0));

        let alert = AlertSpec::new("TCS", AlertKind::VolumeSpike, 50.0);
        assert!(evaluate_alert(&alert, &q, Some(&ind), today()));

        let alert = AlertSpec::new("TCS", AlertKind::VolumeSpike, 150.0);
        assert!(!evaluate_alert(&alert, &q, Some(&ind), today()));
    }

    #[test]
    fn zero_volume_is_never_a_spike() {
        let ind = indicators(100.0, 50.0, 0.5);
        let q = quote(100.0, 0.0, Some(0.0));

        let alert = AlertSpec::new("TCS", AlertKind::VolumeSpike, 50.0);
        assert!(!evaluate_alert(&alert, &q, Some(&ind), today()));
    }

    #[test]
    fn earnings_window() {
        let mut alert = AlertSpec::new("TCS", AlertKind::Earnings, 3.0);
        alert.earnings_date = Some(today() + chrono::Duration::days(2));
        assert!(evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));

        alert.earnings_date = Some(today() + chrono::Duration::days(5));
        assert!(!evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));

        // Already past: never fires.
        alert.earnings_date = Some(today() - chrono::Duration::days(1));
        assert!(!evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));
    }

    #[test]
    fn inactive_alert_never_fires() {
        let mut alert = AlertSpec::new("TCS", AlertKind::PriceAbove, 50.0);
        alert.mark_triggered(Utc::now());

        assert!(!alert.is_active);
        assert!(alert.notification_sent);
        assert!(alert.triggered_at.is_some());
        assert!(!evaluate_alert(&alert, &quote(100.0, 0.0, None), None, today()));
    }
}
