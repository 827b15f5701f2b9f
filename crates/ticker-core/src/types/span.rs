//! Span requests and the canonical spans a history provider supports.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::error::SpanError;

/// Unit of a counted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanUnit {
    Day,
    Month,
    Year,
}

impl SpanUnit {
    /// Suffix used in span specifiers.
    pub fn suffix(&self) -> &'static str {
        match self {
            SpanUnit::Day => "d",
            SpanUnit::Month => "mo",
            SpanUnit::Year => "y",
        }
    }
}

/// A raw span of history as requested by a user.
///
/// Parsed from specifiers such as `""`, `"max"`, `"ytd"`, `"6d"`, `"2mo"` or `"3y"`.
/// A `Count` with a zero count can be constructed directly but is rejected by
/// [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpanRequest {
    /// No lower bound (`""` or `"max"`).
    #[default]
    Unbounded,
    /// From January 1st of the reference year (`"ytd"`).
    YearToDate,
    /// `count` units back from the reference instant.
    Count { count: u64, unit: SpanUnit },
}

impl SpanRequest {
    /// Create a counted span request.
    pub fn count(count: u64, unit: SpanUnit) -> Self {
        SpanRequest::Count { count, unit }
    }

    /// Round this request to a canonical span. See [`normalize`].
    pub fn normalize(&self) -> Result<Option<CanonicalSpan>, SpanError> {
        normalize(self)
    }
}

impl fmt::Display for SpanRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpanRequest::Unbounded => write!(f, "max"),
            SpanRequest::YearToDate => write!(f, "ytd"),
            SpanRequest::Count { count, unit } => write!(f, "{}{}", count, unit.suffix()),
        }
    }
}

impl FromStr for SpanRequest {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "max" => return Ok(SpanRequest::Unbounded),
            "ytd" => return Ok(SpanRequest::YearToDate),
            _ => {}
        }

        let invalid = || SpanError::InvalidFormat(s.to_string());

        let split = s.find(|c: char| !c.is_ascii_digit()).ok_or_else(invalid)?;
        let (digits, suffix) = s.split_at(split);
        if digits.is_empty() || digits.starts_with('0') {
            return Err(invalid());
        }

        let unit = match suffix {
            "d" => SpanUnit::Day,
            "mo" => SpanUnit::Month,
            "y" => SpanUnit::Year,
            _ => return Err(invalid()),
        };

        // Counts past u64 are far beyond any canonical span, so they saturate.
        let count = match digits.parse::<u64>() {
            Ok(count) => count,
            Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
            Err(_) => return Err(invalid()),
        };

        Ok(SpanRequest::count(count, unit))
    }
}

/// Span lengths supported by the history provider.
///
/// "Unbounded" is not a variant: it is represented as `None` wherever a
/// canonical span is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalSpan {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "10y")]
    TenYears,
    #[serde(rename = "ytd")]
    YearToDate,
}

impl CanonicalSpan {
    /// Specifier accepted by the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalSpan::OneDay => "1d",
            CanonicalSpan::FiveDays => "5d",
            CanonicalSpan::OneMonth => "1mo",
            CanonicalSpan::ThreeMonths => "3mo",
            CanonicalSpan::SixMonths => "6mo",
            CanonicalSpan::OneYear => "1y",
            CanonicalSpan::TwoYears => "2y",
            CanonicalSpan::FiveYears => "5y",
            CanonicalSpan::TenYears => "10y",
            CanonicalSpan::YearToDate => "ytd",
        }
    }

    /// The request this canonical span stands for.
    pub fn request(&self) -> SpanRequest {
        match self {
            CanonicalSpan::OneDay => SpanRequest::count(1, SpanUnit::Day),
            CanonicalSpan::FiveDays => SpanRequest::count(5, SpanUnit::Day),
            CanonicalSpan::OneMonth => SpanRequest::count(1, SpanUnit::Month),
            CanonicalSpan::ThreeMonths => SpanRequest::count(3, SpanUnit::Month),
            CanonicalSpan::SixMonths => SpanRequest::count(6, SpanUnit::Month),
            CanonicalSpan::OneYear => SpanRequest::count(1, SpanUnit::Year),
            CanonicalSpan::TwoYears => SpanRequest::count(2, SpanUnit::Year),
            CanonicalSpan::FiveYears => SpanRequest::count(5, SpanUnit::Year),
            CanonicalSpan::TenYears => SpanRequest::count(10, SpanUnit::Year),
            CanonicalSpan::YearToDate => SpanRequest::YearToDate,
        }
    }

    /// Get all canonical spans.
    pub fn all() -> &'static [CanonicalSpan] {
        &[
            CanonicalSpan::OneDay,
            CanonicalSpan::FiveDays,
            CanonicalSpan::OneMonth,
            CanonicalSpan::ThreeMonths,
            CanonicalSpan::SixMonths,
            CanonicalSpan::OneYear,
            CanonicalSpan::TwoYears,
            CanonicalSpan::FiveYears,
            CanonicalSpan::TenYears,
            CanonicalSpan::YearToDate,
        ]
    }
}

impl From<CanonicalSpan> for SpanRequest {
    fn from(span: CanonicalSpan) -> Self {
        span.request()
    }
}

impl fmt::Display for CanonicalSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalSpan {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CanonicalSpan::all()
            .iter()
            .copied()
            .find(|span| span.as_str() == s)
            .ok_or_else(|| SpanError::InvalidFormat(s.to_string()))
    }
}

/// Round a span request up to the canonical span that covers it.
///
/// Returns `Ok(None)` for unbounded requests and for spans longer than ten
/// years, which have no canonical bucket. Spans shorter than a year are
/// rounded up to at most one year.
///
/// # Errors
/// [`SpanError::InvalidFormat`] when a counted request has a zero count.
pub fn normalize(request: &SpanRequest) -> Result<Option<CanonicalSpan>, SpanError> {
    let (count, unit) = match *request {
        SpanRequest::Unbounded => return Ok(None),
        SpanRequest::YearToDate => return Ok(Some(CanonicalSpan::YearToDate)),
        SpanRequest::Count { count: 0, .. } => {
            return Err(SpanError::InvalidFormat(request.to_string()))
        }
        SpanRequest::Count { count, unit } => (Decimal::from(count), unit),
    };

    let (days, months, years) = match unit {
        SpanUnit::Day => (count, count / dec!(30), count / dec!(365)),
        SpanUnit::Month => (Decimal::ZERO, count, count / dec!(12)),
        SpanUnit::Year => (Decimal::ZERO, Decimal::ZERO, count),
    };

    let span = if years >= Decimal::ONE {
        if years == dec!(1) && months.is_zero() {
            Some(CanonicalSpan::OneYear)
        } else if years == dec!(2) && months.is_zero() {
            Some(CanonicalSpan::TwoYears)
        } else if years <= dec!(5) {
            Some(CanonicalSpan::FiveYears)
        } else if years <= dec!(10) {
            Some(CanonicalSpan::TenYears)
        } else {
            None
        }
    } else if months >= Decimal::ONE {
        if months == Decimal::ONE {
            Some(CanonicalSpan::OneMonth)
        } else if months <= dec!(3) {
            Some(CanonicalSpan::ThreeMonths)
        } else if months <= dec!(6) {
            Some(CanonicalSpan::SixMonths)
        } else {
            Some(CanonicalSpan::OneYear)
        }
    } else if days >= Decimal::ONE {
        if days == Decimal::ONE {
            Some(CanonicalSpan::OneDay)
        } else if days <= dec!(5) {
            Some(CanonicalSpan::FiveDays)
        } else {
            Some(CanonicalSpan::OneMonth)
        }
    } else {
        None
    };

    Ok(span)
}

/// Parse and normalize a span specifier in one step.
pub fn normalize_str(spec: &str) -> Result<Option<CanonicalSpan>, SpanError> {
    spec.parse::<SpanRequest>()?.normalize()
}
