use std::str::FromStr;

use chrono::NaiveDate;
use regex::Regex;

/// Conflict details surfaced by a rejected reservation.
///
/// When the overlap is detected in Postgres, the information is recovered by
/// parsing the detail line of the exclusion constraint violation. If the
/// detail cannot be parsed we still surface the raw message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationConflictInfo {
    Parsed(ReservationConflict),
    Unparsed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationConflict {
    pub new: ReservationWindow,
    pub old: ReservationWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationWindow {
    pub rid: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<&str> for ReservationConflictInfo {
    fn from(s: &str) -> Self {
        s.parse()
            .map(ReservationConflictInfo::Parsed)
            .unwrap_or_else(|_| ReservationConflictInfo::Unparsed(s.to_string()))
    }
}

impl FromStr for ReservationConflict {
    type Err = ();

    /// Parses a detail line shaped like:
    /// `Key (room_id, stay)=(room-713, [2024-06-11,2024-06-13)) conflicts
    /// with existing key (room_id, stay)=(room-713, [2024-06-10,2024-06-12)).`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let re = Regex::new(r"=\(([^,]+),\s*\[([0-9-]+),([0-9-]+)\)\)").map_err(|_| ())?;
        let mut windows = re.captures_iter(s).filter_map(|caps| {
            Some(ReservationWindow {
                rid: caps.get(1)?.as_str().trim().to_string(),
                start: parse_date(caps.get(2)?.as_str())?,
                end: parse_date(caps.get(3)?.as_str())?,
            })
        });
        let new = windows.next().ok_or(())?;
        let old = windows.next().ok_or(())?;
        Ok(Self { new, old })
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
