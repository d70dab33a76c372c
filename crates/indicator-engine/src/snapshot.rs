use market_core::{change_percent, Bar, IndicatorSet};

use crate::indicators::*;

/// Build the full indicator snapshot from a chronological bar series.
/// Returns `None` below 2 closes; above that, each indicator degrades
/// independently (`None` SMA, neutral RSI) rather than failing the set.
pub fn compute_indicators(bars: &[Bar]) -> Option<IndicatorSet> {
    if bars.len() < 2 {
        return None;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

    let last_close = closes[closes.len() - 1];
    let prev_close = closes[closes.len() - 2];

    let sma5 = sma_last(&closes, 5);
    let sma20 = sma_last(&closes, 20);
    let sma50 = sma_last(&closes, 50);
    let sma200 = sma_last(&closes, 200);

    let (high_52w, low_52w) = week_52_range(&highs, &lows)?;
    let (support, resistance) = support_resistance(&highs, &lows);

    Some(IndicatorSet {
        last_close,
        sma5,
        sma20,
        sma50,
        sma200,
        rsi: rsi_simple(&closes, 14),
        macd: macd_simple(&closes),
        vol_ratio: volume_ratio(&volumes),
        high_52w,
        low_52w,
        range_position: range_position(last_close, high_52w, low_52w),
        day_change_pct: change_percent(last_close, prev_close),
        above_sma20: sma20.map(|s| last_close > s),
        above_sma50: sma50.map(|s| last_close > s),
        above_sma200: sma200.map(|s| last_close > s),
        support,
        resistance,
    })
}
