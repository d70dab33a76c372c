//! Money-weighted return math: XIRR via Newton-Raphson over dated cash
//! flows, and point-to-point CAGR.

use market_core::CashFlow;

const INITIAL_GUESS: f64 = 0.10;
const MAX_ITERATIONS: usize = 100;
const NPV_TOLERANCE: f64 = 1e-3;
const DERIVATIVE_FLOOR: f64 = 1e-4;
const STEP_TOLERANCE: f64 = 1e-6;
const FD_STEP: f64 = 1e-4;
const RATE_MIN: f64 = -0.99;
const RATE_MAX: f64 = 10.0;
/// Rates at or beyond this many percent are reported as non-convergence:
/// large cash-flow ratios over short horizons make the solver unstable and
/// the raw outlier is not a usable answer.
const MAX_SANE_PERCENT: f64 = 1000.0;

/// Net present value of the flows at `rate`, with time measured in
/// 365-day years from the earliest flow.
fn npv(rate: f64, flows: &[(f64, f64)]) -> f64 {
    flows
        .iter()
        .map(|(years, amount)| amount / (1.0 + rate).powf(*years))
        .sum()
}

/// Annualized money-weighted return for irregularly dated cash flows, as a
/// percentage. Negative amounts are outflows (buys), positive are inflows
/// (sells or a terminal valuation). Input order does not matter.
///
/// Returns `None` for fewer than two flows, fewer than two distinct dates,
/// or when the solver lands outside the sane-rate window.
pub fn xirr(cashflows: &[CashFlow]) -> Option<f64> {
    if cashflows.len() < 2 {
        return None;
    }
    let mut sorted = cashflows.to_vec();
    sorted.sort_by_key(|cf| cf.date);
    let anchor = sorted[0].date;
    if sorted[sorted.len() - 1].date == anchor {
        return None;
    }

    let flows: Vec<(f64, f64)> = sorted
        .iter()
        .map(|cf| ((cf.date - anchor).num_days() as f64 / 365.0, cf.amount))
        .collect();

    let mut rate = INITIAL_GUESS;
    for _ in 0..MAX_ITERATIONS {
        let value = npv(rate, &flows);
        if value.abs() < NPV_TOLERANCE {
            break;
        }
        let derivative = (npv(rate + FD_STEP, &flows) - value) / FD_STEP;
        if derivative.abs() < DERIVATIVE_FLOOR {
            // Flat region, further steps are numerically meaningless.
            break;
        }
        let next = (rate - value / derivative).clamp(RATE_MIN, RATE_MAX);
        if (next - rate).abs() < STEP_TOLERANCE {
            rate = next;
            break;
        }
        rate = next;
    }

    let percent = rate * 100.0;
    if !percent.is_finite() || percent.abs() >= MAX_SANE_PERCENT {
        tracing::debug!(percent, "xirr outside sane window, reporting non-convergence");
        return None;
    }
    Some(percent)
}

/// Compound annual growth rate between two point values, as a percentage.
pub fn cagr(begin_value: f64, end_value: f64, years: f64) -> Option<f64> {
    if begin_value <= 0.0 || end_value < 0.0 || years <= 0.0 {
        return None;
    }
    Some(((end_value / begin_value).powf(1.0 / years) - 1.0) * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(offset)
    }

    #[test]
    fn one_year_double_digit_gain() {
        let flows = vec![
            CashFlow::new(day(0), -1000.0),
            CashFlow::new(day(365), 1200.0),
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate - 20.0).abs() < 0.5);
    }

    #[test]
    fn one_year_loss() {
        let flows = vec![
            CashFlow::new(day(0), -1000.0),
            CashFlow::new(day(365), 800.0),
        ];
        let rate = xirr(&flows).unwrap();
        assert!((rate + 20.0).abs() < 0.5);
    }

    #[test]
    fn multiple_buys_then_sale() {
        let flows = vec![
            CashFlow::new(day(0), -1000.0),
            CashFlow::new(day(182), -1000.0),
            CashFlow::new(day(365), 2200.0),
        ];
        let rate = xirr(&flows).unwrap();
        // Roughly 13-14% annualized for this schedule.
        assert!(rate > 10.0 && rate < 18.0);
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = vec![
            CashFlow::new(day(0), -1000.0),
            CashFlow::new(day(365), 1200.0),
        ];
        let b = vec![a[1], a[0]];
        assert_eq!(xirr(&a), xirr(&b));
    }

    #[test]
    fn too_few_flows_or_dates() {
        assert_eq!(xirr(&[]), None);
        assert_eq!(xirr(&[CashFlow::new(day(0), -1000.0)]), None);

        let same_day = vec![
            CashFlow::new(day(0), -1000.0),
            CashFlow::new(day(0), 1200.0),
        ];
        assert_eq!(xirr(&same_day), None);
    }

    #[test]
    fn pathological_ratio_reports_non_convergence() {
        // A 500x gain over ten days has no sane annualized rate; the solver
        // pins at the clamp and must report None, not the outlier.
        let flows = vec![
            CashFlow::new(day(0), -1000.0),
            CashFlow::new(day(10), 500_000.0),
        ];
        assert_eq!(xirr(&flows), None);
    }

    #[test]
    fn cagr_basic() {
        assert!((cagr(100.0, 200.0, 1.0).unwrap() - 100.0).abs() < 0.001);
        assert!((cagr(100.0, 121.0, 2.0).unwrap() - 10.0).abs() < 0.001);
    }

    #[test]
    fn cagr_rejects_bad_input() {
        assert_eq!(cagr(0.0, 100.0, 1.0), None);
        assert_eq!(cagr(100.0, 200.0, 0.0), None);
        assert_eq!(cagr(-10.0, 200.0, 1.0), None);
    }
}
