//! Ordered recommendation rules. The list is evaluated top-down and the
//! first matching rule wins, so stronger conditions must stay ahead of the
//! weaker ones they would otherwise be masked by. Reordering entries
//! changes advice.

use market_core::{IndicatorSet, Signal, TradeAction};

/// Everything a rule may look at. The trend flags are tri-state: `None`
/// means the SMA was unavailable, which is weaker than "below".
struct RuleContext<'a> {
    ind: &'a IndicatorSet,
    pnl_pct: f64,
}

struct Outcome {
    action: TradeAction,
    reasons: Vec<String>,
    target: Option<f64>,
    stop_loss: Option<f64>,
}

struct Rule {
    matches: fn(&RuleContext<'_>) -> bool,
    build: fn(&RuleContext<'_>) -> Outcome,
}

const RULES: &[Rule] = &[
    // Deeply oversold at the bottom of the yearly range.
    Rule {
        matches: |c| c.ind.rsi < 25.0 && c.ind.range_position < 15.0,
        build: |c| Outcome {
            action: TradeAction::StrongBuy,
            reasons: vec![
                format!("RSI {:.1} is deeply oversold", c.ind.rsi),
                format!(
                    "Trading near the 52-week low ({:.0}% of range)",
                    c.ind.range_position
                ),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Oversold while the long-term trend is not broken.
    Rule {
        matches: |c| c.ind.rsi < 35.0 && c.ind.above_sma200 != Some(false),
        build: |c| Outcome {
            action: TradeAction::BuyMore,
            reasons: vec![
                format!("RSI {:.1} is oversold", c.ind.rsi),
                "Long-term trend intact (not below the 200-day SMA)".to_string(),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Sharp one-day drop on heavy volume with momentum already weak.
    Rule {
        matches: |c| c.ind.day_change_pct < -4.0 && c.ind.rsi < 45.0 && c.ind.vol_ratio > 1.5,
        build: |c| Outcome {
            action: TradeAction::BuyMore,
            reasons: vec![
                format!("Sharp dip of {:.1}% today", c.ind.day_change_pct),
                format!(
                    "Volume {:.1}x the 20-day average suggests capitulation",
                    c.ind.vol_ratio
                ),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Overbought at the top of the yearly range.
    Rule {
        matches: |c| c.ind.rsi > 75.0 && c.ind.range_position > 90.0,
        build: |c| Outcome {
            action: TradeAction::Sell,
            reasons: vec![
                format!("RSI {:.1} is overbought", c.ind.rsi),
                format!(
                    "Trading near the 52-week high ({:.0}% of range)",
                    c.ind.range_position
                ),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Overbought with a large open profit: take some off.
    Rule {
        matches: |c| c.ind.rsi > 70.0 && c.pnl_pct > 30.0,
        build: |c| Outcome {
            action: TradeAction::PartialSell,
            reasons: vec![
                format!("RSI {:.1} is overbought", c.ind.rsi),
                format!("Position is up {:.1}%", c.pnl_pct),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Big winner spiking further today: bank part of the gain.
    Rule {
        matches: |c| c.pnl_pct > 50.0 && c.ind.day_change_pct > 5.0,
        build: |c| Outcome {
            action: TradeAction::PartialSell,
            reasons: vec![
                format!(
                    "Up {:.1}% overall and {:.1}% today",
                    c.pnl_pct, c.ind.day_change_pct
                ),
                "Lock in part of the gain".to_string(),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Neutral momentum in an uptrend: hold with the band as target/stop.
    Rule {
        matches: |c| {
            (40.0..=60.0).contains(&c.ind.rsi) && c.ind.above_sma50 == Some(true)
        },
        build: |c| Outcome {
            action: TradeAction::Hold,
            reasons: vec![
                format!("RSI {:.1} is neutral", c.ind.rsi),
                "Holding above the 50-day SMA".to_string(),
            ],
            target: c.ind.resistance,
            stop_loss: c.ind.support,
        },
    },
    // Below both short-term SMAs: watch a winner, wait on everything else.
    Rule {
        matches: |c| c.ind.above_sma20 != Some(true) && c.ind.above_sma50 != Some(true),
        build: |c| {
            if c.pnl_pct > 0.0 {
                Outcome {
                    action: TradeAction::HoldWatch,
                    reasons: vec![
                        "Below both the 20- and 50-day SMAs".to_string(),
                        format!("Still up {:.1}%, watch the stop", c.pnl_pct),
                    ],
                    target: None,
                    stop_loss: c.ind.support,
                }
            } else {
                Outcome {
                    action: TradeAction::Wait,
                    reasons: vec![
                        "Below both the 20- and 50-day SMAs".to_string(),
                        "No edge while the trend is down".to_string(),
                    ],
                    target: None,
                    stop_loss: None,
                }
            }
        },
    },
    // Deep loser bouncing without trend support: use the strength to exit.
    Rule {
        matches: |c| {
            c.pnl_pct < -20.0 && c.ind.above_sma50 != Some(true) && c.ind.rsi > 50.0
        },
        build: |c| Outcome {
            action: TradeAction::Exit,
            reasons: vec![
                format!("Down {:.1}% with no trend support", c.pnl_pct),
                format!("Bounce strength (RSI {:.1}) offers an exit", c.ind.rsi),
            ],
            target: None,
            stop_loss: None,
        },
    },
    // Default: nothing actionable.
    Rule {
        matches: |_| true,
        build: |_| Outcome {
            action: TradeAction::Hold,
            reasons: vec!["No clear signal".to_string()],
            target: None,
            stop_loss: None,
        },
    },
];

/// Map indicators and position state to an actionable signal. Pure and
/// deterministic: identical inputs always produce identical output. The
/// position quantity is part of the contract for the API layer but the
/// rules key off price state only.
pub fn recommend(symbol: &str, avg_price: f64, _qty: f64, indicators: &IndicatorSet) -> Signal {
    let pnl_pct = if avg_price > 0.0 {
        (indicators.last_close - avg_price) / avg_price * 100.0
    } else {
        0.0
    };
    let ctx = RuleContext {
        ind: indicators,
        pnl_pct,
    };

    // The default rule matches everything, so this always yields.
    let outcome = RULES
        .iter()
        .find(|rule| (rule.matches)(&ctx))
        .map(|rule| (rule.build)(&ctx))
        .unwrap_or_else(|| Outcome {
            action: TradeAction::Hold,
            reasons: vec!["No clear signal".to_string()],
            target: None,
            stop_loss: None,
        });

    Signal {
        symbol: symbol.to_string(),
        action: outcome.action,
        reasons: outcome.reasons,
        target: outcome.target,
        stop_loss: outcome.stop_loss,
        rsi: indicators.rsi,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators() -> IndicatorSet {
        IndicatorSet {
            last_close: 100.0,
            sma5: Some(100.0),
            sma20: Some(95.0),
            sma50: Some(90.0),
            sma200: Some(85.0),
            rsi: 50.0,
            macd: Some(0.0),
            vol_ratio: 1.0,
            high_52w: 120.0,
            low_52w: 80.0,
            range_position: 50.0,
            day_change_pct: 0.0,
            above_sma20: Some(true),
            above_sma50: Some(true),
            above_sma200: Some(true),
            support: Some(88.0),
            resistance: Some(112.0),
        }
    }

    #[test]
    fn deterministic_for_identical_input() {
        let ind = indicators();
        let a = recommend("TCS", 80.0, 10.0, &ind);
        let b = recommend("TCS", 80.0, 10.0, &ind);
        assert_eq!(a, b);
    }

    #[test]
    fn deep_oversold_near_low_is_strong_buy() {
        let mut ind = indicators();
        ind.rsi = 20.0;
        ind.range_position = 10.0;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::StrongBuy);
        assert_eq!(signal.reasons.len(), 2);
    }

    #[test]
    fn oversold_above_long_trend_is_buy_more() {
        let mut ind = indicators();
        ind.rsi = 30.0;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::BuyMore);
    }

    #[test]
    fn oversold_with_unknown_long_trend_still_buys() {
        // aboveSma200 unknown is weaker than "below" and must not block.
        let mut ind = indicators();
        ind.rsi = 30.0;
        ind.sma200 = None;
        ind.above_sma200 = None;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::BuyMore);
    }

    #[test]
    fn oversold_below_long_trend_does_not_buy() {
        let mut ind = indicators();
        ind.rsi = 30.0;
        ind.above_sma200 = Some(false);
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_ne!(signal.action, TradeAction::BuyMore);
    }

    #[test]
    fn capitulation_dip_is_buy_more() {
        let mut ind = indicators();
        ind.rsi = 40.0;
        ind.day_change_pct = -5.0;
        ind.vol_ratio = 2.0;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::BuyMore);
    }

    #[test]
    fn overbought_near_high_is_sell() {
        let mut ind = indicators();
        ind.rsi = 80.0;
        ind.range_position = 95.0;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::Sell);
    }

    #[test]
    fn strong_buy_outranks_sell_conditions() {
        // Rule order is the contract: an earlier rule must win even when a
        // later predicate also matches.
        let mut ind = indicators();
        ind.rsi = 20.0;
        ind.range_position = 10.0;
        ind.day_change_pct = -5.0;
        ind.vol_ratio = 2.0;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::StrongBuy);
    }

    #[test]
    fn overbought_winner_is_partial_sell() {
        let mut ind = indicators();
        ind.rsi = 72.0;
        ind.last_close = 140.0; // +40% on avg 100
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::PartialSell);
    }

    #[test]
    fn big_winner_spiking_is_partial_sell() {
        let mut ind = indicators();
        ind.last_close = 160.0; // +60%
        ind.day_change_pct = 6.0;
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::PartialSell);
    }

    #[test]
    fn neutral_uptrend_holds_with_band() {
        let ind = indicators();
        let signal = recommend("TCS", 100.0, 1.0, &ind);
        assert_eq!(signal.action, TradeAction::Hold);
        assert_eq!(signal.target, Some(112.0));
        assert_eq!(signal.stop_loss, Some(88.0));
    }

    #[test]
    fn below_trend_in_profit_is_hold_watch() {
        let mut ind = indicators();
        ind.above_sma20 = Some(false);
        ind.above_sma50 = Some(false);
        ind.rsi = 65.0; // keep rule 7 out of the way
        let signal = recommend("TCS", 80.0, 1.0, &ind); // +25%
        assert_eq!(signal.action, TradeAction::HoldWatch);
        assert_eq!(signal.stop_loss, Some(88.0));
    }

    #[test]
    fn below_trend_at_loss_is_wait() {
        let mut ind = indicators();
        ind.above_sma20 = Some(false);
        ind.above_sma50 = Some(false);
        ind.rsi = 65.0;
        let signal = recommend("TCS", 120.0, 1.0, &ind); // -16.7%
        assert_eq!(signal.action, TradeAction::Wait);
    }

    #[test]
    fn deep_loss_bounce_is_exit() {
        let mut ind = indicators();
        ind.above_sma20 = Some(true); // keep rule 8 out of the way
        ind.above_sma50 = Some(false);
        ind.rsi = 62.0;
        let signal = recommend("TCS", 140.0, 1.0, &ind); // -28.6%
        assert_eq!(signal.action, TradeAction::Exit);
    }

    #[test]
    fn no_position_defaults_to_hold() {
        let mut ind = indicators();
        ind.rsi = 65.0; // outside rule 7's neutral band
        let signal = recommend("TCS", 0.0, 0.0, &ind);
        assert_eq!(signal.action, TradeAction::Hold);
        assert_eq!(signal.reasons, vec!["No clear signal".to_string()]);
    }
}
