use chrono::{Datelike, FixedOffset, NaiveDateTime, Timelike, Utc, Weekday};

const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

// Exchange session: Mon-Fri 09:15-15:30 IST.
const OPEN_MINUTE: u32 = 9 * 60 + 15;
const CLOSE_MINUTE: u32 = 15 * 60 + 30;

/// Whether the exchange is currently in its trading session.
pub fn is_market_open() -> bool {
    let offset = FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range");
    is_market_open_at(Utc::now().with_timezone(&offset).naive_local())
}

/// Session check against an explicit local timestamp, used by the cache and
/// by simulated-time tests.
pub fn is_market_open_at(local: NaiveDateTime) -> bool {
    match local.weekday() {
        Weekday::Sat | Weekday::Sun => return false,
        _ => {}
    }
    let minute_of_day = local.time().hour() * 60 + local.time().minute();
    (OPEN_MINUTE..=CLOSE_MINUTE).contains(&minute_of_day)
}
