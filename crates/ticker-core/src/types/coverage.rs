//! Coverage start dates implied by span requests.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::span::{normalize, CanonicalSpan, SpanRequest};
use crate::error::SpanError;

/// Earliest instant a price history reaches back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Coverage {
    /// No lower bound.
    Unbounded,
    /// Reaches back to this midnight.
    Since(DateTime<Utc>),
}

impl Coverage {
    /// The lower bound, if there is one.
    pub fn start(&self) -> Option<DateTime<Utc>> {
        match self {
            Coverage::Unbounded => None,
            Coverage::Since(start) => Some(*start),
        }
    }

    /// Whether data held with this coverage contains everything `required` asks for.
    ///
    /// An unbounded requirement is only met by unbounded coverage. A finite
    /// requirement is met when it starts on or after the held start.
    pub fn satisfies(&self, required: &Coverage) -> bool {
        match (self, required) {
            (Coverage::Unbounded, _) => true,
            (Coverage::Since(_), Coverage::Unbounded) => false,
            (Coverage::Since(held), Coverage::Since(needed)) => needed >= held,
        }
    }
}

/// Midnight of the earliest date a `span` of history ending at `now` must include.
///
/// Day spans subtract calendar days; month and year spans subtract calendar
/// months, clamping to the last day of shorter months. Year-to-date is
/// January 1st of `now`'s year.
pub fn coverage_start(span: CanonicalSpan, now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.date_naive();

    let start = match span {
        CanonicalSpan::OneDay => today.checked_sub_days(Days::new(1)),
        CanonicalSpan::FiveDays => today.checked_sub_days(Days::new(5)),
        CanonicalSpan::OneMonth => today.checked_sub_months(Months::new(1)),
        CanonicalSpan::ThreeMonths => today.checked_sub_months(Months::new(3)),
        CanonicalSpan::SixMonths => today.checked_sub_months(Months::new(6)),
        CanonicalSpan::OneYear => today.checked_sub_months(Months::new(12)),
        CanonicalSpan::TwoYears => today.checked_sub_months(Months::new(24)),
        CanonicalSpan::FiveYears => today.checked_sub_months(Months::new(60)),
        CanonicalSpan::TenYears => today.checked_sub_months(Months::new(120)),
        CanonicalSpan::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
    }
    .unwrap_or(NaiveDate::MIN);

    start.and_time(NaiveTime::MIN).and_utc()
}

/// Coverage a history must have to satisfy `request` at `now`.
///
/// Requests without a canonical span (unbounded, or longer than ten years)
/// require [`Coverage::Unbounded`].
pub fn min_coverage_date(
    request: &SpanRequest,
    now: DateTime<Utc>,
) -> Result<Coverage, SpanError> {
    let coverage = match normalize(request)? {
        Some(span) => Coverage::Since(coverage_start(span, now)),
        None => Coverage::Unbounded,
    };
    Ok(coverage)
}
