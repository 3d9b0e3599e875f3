//! Customer activity snapshot: the single input shape shared by the scorer
//! and the churn explainer.

use crate::{
    activity::{FeedbackRating, OrderRecord, SupportTicket},
    error::ScoreError,
    types::round2,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage format for every timestamp the store writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const ACCEPTED_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A last-order date as it reaches the scorer.
///
/// Persisted rows and external callers may hand over a full timestamp, a bare
/// date, or raw text that still needs parsing. Resolution is deferred to
/// scoring time so a bad value degrades the assessment instead of failing the
/// read that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OrderTimestamp {
    At(NaiveDateTime),
    Day(NaiveDate),
    Text(String),
}

impl OrderTimestamp {
    pub fn resolve(&self) -> Result<NaiveDateTime, ScoreError> {
        match self {
            Self::At(at) => Ok(*at),
            Self::Day(day) => day
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| ScoreError::TimestampOutOfRange(day.to_string())),
            Self::Text(raw) => parse_timestamp(raw),
        }
    }

    /// Text form written to the store.
    pub fn to_storage(&self) -> String {
        match self {
            Self::At(at) => at.format(TIMESTAMP_FORMAT).to_string(),
            Self::Day(day) => day.format("%Y-%m-%d").to_string(),
            Self::Text(raw) => raw.clone(),
        }
    }

    /// Inverse of `to_storage`. Never fails: unparseable text is kept as-is.
    pub fn from_storage(raw: &str) -> Self {
        match parse_timestamp(raw) {
            Ok(at) => Self::At(at),
            Err(_) => Self::Text(raw.to_string()),
        }
    }
}

impl From<NaiveDateTime> for OrderTimestamp {
    fn from(at: NaiveDateTime) -> Self {
        Self::At(at)
    }
}

impl From<NaiveDate> for OrderTimestamp {
    fn from(day: NaiveDate) -> Self {
        Self::Day(day)
    }
}

/// Parse ISO-8601 text: timestamp to hour, minute or second precision (T or
/// space separated, optional fraction), bare date, or RFC 3339 with an offset
/// (converted to UTC).
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ScoreError> {
    let s = raw.trim();
    for fmt in ACCEPTED_DATETIME_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(at);
        }
    }
    if let Some(at) = parse_date_hour(s) {
        return Ok(at);
    }
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| ScoreError::TimestampOutOfRange(raw.to_string()));
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Ok(at.naive_utc());
    }
    Err(ScoreError::MalformedDate(raw.to_string()))
}

// chrono will not build a time from an hour alone.
fn parse_date_hour(s: &str) -> Option<NaiveDateTime> {
    let (date, hour) = s.split_once(['T', ' '])?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(hour.parse().ok()?, 0, 0)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerActivitySnapshot {
    /// `None` means the customer never ordered.
    pub last_order_date: Option<OrderTimestamp>,
    /// Completed orders only.
    pub total_orders:    u32,
    /// Revenue from completed orders only.
    pub total_spent:     f64,
    /// Tickets of any status.
    pub support_tickets: u32,
    /// Mean feedback rating in [0, 5]; 0 without feedback.
    pub avg_rating:      f64,
}

impl CustomerActivitySnapshot {
    /// Aggregate raw rows into a snapshot.
    ///
    /// `last_order_date` considers every order regardless of status, while the
    /// order count and spend only include completed ones.
    pub fn from_activity(
        orders: &[OrderRecord],
        tickets: &[SupportTicket],
        feedback: &[FeedbackRating],
    ) -> Self {
        let completed = orders.iter().filter(|o| o.is_completed());
        let (total_orders, total_spent) =
            completed.fold((0u32, 0.0f64), |(n, sum), o| (n + 1, sum + o.total_amount));

        let last_order_date = orders
            .iter()
            .map(|o| o.order_date)
            .max()
            .map(OrderTimestamp::At);

        let avg_rating = if feedback.is_empty() {
            0.0
        } else {
            let sum: u32 = feedback.iter().map(|f| f.rating as u32).sum();
            round2(sum as f64 / feedback.len() as f64)
        };

        Self {
            last_order_date,
            total_orders,
            total_spent: round2(total_spent),
            support_tickets: tickets.len() as u32,
            avg_rating,
        }
    }

    pub(crate) fn check_finite(&self) -> Result<(), ScoreError> {
        if !self.total_spent.is_finite() {
            return Err(ScoreError::NonFiniteInput { field: "total_spent" });
        }
        if !self.avg_rating.is_finite() {
            return Err(ScoreError::NonFiniteInput { field: "avg_rating" });
        }
        Ok(())
    }
}
