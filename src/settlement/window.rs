use chrono::{DateTime, Duration, FixedOffset, Months, Utc};
use serde::{Deserialize, Serialize};

/// Reporting window for settlement queries.
///
/// Membership is evaluated against `[window_start, now]`, a closed interval
/// on both ends. `now` carries the reporting timezone as a fixed offset so
/// that `Today` starts at the seller's local midnight rather than UTC
/// midnight.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementWindow {
    Today,
    Last3Days,
    Last7Days,
    Last15Days,
    /// One calendar month back from `now` (not 30 days).
    LastMonth,
    /// Three calendar months back from `now`.
    Last3Months,
    AllTime,
    /// Explicit inclusive range, both bounds in UTC.
    Custom {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}

impl SettlementWindow {
    /// Parses the dashboard window tokens. `Custom` is assembled by the
    /// caller from explicit bounds and has no token form.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "3d" | "3days" => Some(Self::Last3Days),
            "7d" | "7days" => Some(Self::Last7Days),
            "15d" | "15days" => Some(Self::Last15Days),
            "month" | "1m" => Some(Self::LastMonth),
            "3m" | "3months" => Some(Self::Last3Months),
            "all" | "lifetime" => Some(Self::AllTime),
            _ => None,
        }
    }

    /// Inclusive bounds of the window, or `None` for `AllTime`.
    pub fn bounds(&self, now: DateTime<FixedOffset>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let now_utc = now.with_timezone(&Utc);
        match *self {
            Self::Today => {
                // Midnight of `now`'s date in the reporting offset.
                let since_midnight = now.time() - chrono::NaiveTime::MIN;
                Some((now_utc - since_midnight, now_utc))
            }
            Self::Last3Days => Some((now_utc - Duration::days(3), now_utc)),
            Self::Last7Days => Some((now_utc - Duration::days(7), now_utc)),
            Self::Last15Days => Some((now_utc - Duration::days(15), now_utc)),
            Self::LastMonth => Some((sub_months(now, 1), now_utc)),
            Self::Last3Months => Some((sub_months(now, 3), now_utc)),
            Self::AllTime => None,
            Self::Custom { from, to } => Some((from, to)),
        }
    }

    /// Closed-interval membership test for an order date.
    pub fn contains(&self, order_date: DateTime<Utc>, now: DateTime<FixedOffset>) -> bool {
        match self.bounds(now) {
            None => true,
            Some((start, end)) => order_date >= start && order_date <= end,
        }
    }
}

/// Calendar-month subtraction with correct year rollover. Falls back to the
/// epoch lower bound on (unreachable in practice) out-of-range dates.
fn sub_months(now: DateTime<FixedOffset>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months))
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
