use std::fmt;
use std::ops::Bound;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::postgres::types::PgRange;

use crate::Error;

/// A half-open stay window: check-in is included, check-out is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, Error> {
        if start >= end {
            return Err(Error::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Half-open overlap. Sharing a boundary (back-to-back stays) is not an
    /// overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})", self.start, self.end)
    }
}

impl From<DateRange> for PgRange<NaiveDate> {
    fn from(range: DateRange) -> Self {
        PgRange {
            start: Bound::Included(range.start),
            end: Bound::Excluded(range.end),
        }
    }
}

impl TryFrom<PgRange<NaiveDate>> for DateRange {
    type Error = Error;

    /// Postgres normalizes a daterange to `[lower, upper)`, so only finite
    /// inclusive-lower / exclusive-upper bounds are expected back.
    fn try_from(range: PgRange<NaiveDate>) -> Result<Self, Self::Error> {
        let start = match range.start {
            Bound::Included(d) => d,
            _ => return Err(Error::InvalidRange),
        };
        let end = match range.end {
            Bound::Excluded(d) => d,
            _ => return Err(Error::InvalidRange),
        };
        DateRange::new(start, end)
    }
}
