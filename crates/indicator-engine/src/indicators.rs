//! Indicator math over chronological (oldest to newest) OHLCV columns.
//!
//! These are the snapshot-oriented forms: each returns the latest value
//! rather than a full series, and each degrades per-indicator when the
//! series is too short instead of failing the whole computation.

/// Floor applied to the average loss when forming RS, so a gains-only
/// series yields RSI near 100 instead of a division by zero.
const RSI_EPSILON: f64 = 1e-10;

/// Trading days in a 52-week lookback.
pub const WEEK_52_WINDOW: usize = 252;

/// Lookback for the support/resistance band and the volume average.
pub const SHORT_WINDOW: usize = 20;

pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        None
    } else {
        Some(data.iter().sum::<f64>() / data.len() as f64)
    }
}

/// Simple moving average of the last `period` values. `None` when the
/// series is shorter than the window.
pub fn sma_last(data: &[f64], period: usize) -> Option<f64> {
    if period == 0 || data.len() < period {
        return None;
    }
    mean(&data[data.len() - period..])
}

/// Simplified RSI over the last `period` close-to-close deltas: plain
/// averages of gains and losses, not Wilder smoothing. Neutral 50 when the
/// series is too short or perfectly flat.
pub fn rsi_simple(closes: &[f64], period: usize) -> f64 {
    if period == 0 || closes.len() < period + 1 {
        return 50.0;
    }
    let window = &closes[closes.len() - period - 1..];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let delta = pair[1] - pair[0];
        if delta > 0.0 {
            gain_sum += delta;
        } else {
            loss_sum += delta.abs();
        }
    }
    let avg_gain = gain_sum / period as f64;
    let avg_loss = loss_sum / period as f64;
    if avg_gain == 0.0 && avg_loss == 0.0 {
        return 50.0;
    }
    let rs = avg_gain / avg_loss.max(RSI_EPSILON);
    100.0 - 100.0 / (1.0 + rs)
}

/// Simplified MACD: difference of the 12- and 26-period simple averages.
/// The simple-average form is kept deliberately for parity with the
/// signals this feeds; swapping in true EMAs would shift recommendation
/// and alert outcomes.
pub fn macd_simple(closes: &[f64]) -> Option<f64> {
    let fast = sma_last(closes, 12)?;
    let slow = sma_last(closes, 26)?;
    Some(fast - slow)
}

/// 52-week high/low over up to the last [`WEEK_52_WINDOW`] points, or the
/// whole series when shorter. `None` only for empty input.
pub fn week_52_range(highs: &[f64], lows: &[f64]) -> Option<(f64, f64)> {
    if highs.is_empty() || lows.is_empty() {
        return None;
    }
    let h_window = &highs[highs.len().saturating_sub(WEEK_52_WINDOW)..];
    let l_window = &lows[lows.len().saturating_sub(WEEK_52_WINDOW)..];
    let high = h_window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = l_window.iter().copied().fold(f64::INFINITY, f64::min);
    Some((high, low))
}

/// Where the current price sits inside the 52-week range, 0-100. Defined
/// as 50 when the range has no width.
pub fn range_position(current: f64, high: f64, low: f64) -> f64 {
    let width = high - low;
    if width <= 0.0 {
        50.0
    } else {
        (current - low) / width * 100.0
    }
}

/// Latest volume relative to its recent average. 1.0 when the average is
/// zero or unavailable.
pub fn volume_ratio(volumes: &[f64]) -> f64 {
    let Some(&latest) = volumes.last() else {
        return 1.0;
    };
    let window = &volumes[volumes.len().saturating_sub(SHORT_WINDOW)..];
    match mean(window) {
        Some(avg) if avg > 0.0 => latest / avg,
        _ => 1.0,
    }
}

/// Recent trading band: support is the lowest low and resistance the
/// highest high over the last [`SHORT_WINDOW`] bars.
pub fn support_resistance(highs: &[f64], lows: &[f64]) -> (Option<f64>, Option<f64>) {
    if highs.len() < 2 || lows.len() < 2 {
        return (None, None);
    }
    let h_window = &highs[highs.len().saturating_sub(SHORT_WINDOW)..];
    let l_window = &lows[lows.len().saturating_sub(SHORT_WINDOW)..];
    let resistance = h_window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let support = l_window.iter().copied().fold(f64::INFINITY, f64::min);
    (Some(support), Some(resistance))
}
