//! Canonical in-memory representation of one CDI sample.
//!
//! An [`Observation`] is what the append store persists. A [`Sample`] is what
//! the [`Sampler`](crate::sampler::Sampler) hands back: the observation plus
//! where its rate came from. The origin only ever reaches logs and reports,
//! never the persisted file.

use std::fmt;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// `strftime` pattern of the persisted `data` column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `strftime` pattern of the persisted `hora` column.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A single (date, time, rate) triple.
///
/// All three fields are always present; there is no way to build a partial
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    /// Calendar date of capture (local time).
    pub date: NaiveDate,

    /// Wall-clock time of capture, truncated to whole seconds.
    pub time: NaiveTime,

    /// Rate in percent.
    pub rate: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, time: NaiveTime, rate: f64) -> Self {
        Self {
            date,
            time: time.with_nanosecond(0).unwrap_or(time),
            rate,
        }
    }

    /// Builds an observation stamped with the given local timestamp.
    pub fn at(stamp: NaiveDateTime, rate: f64) -> Self {
        Self::new(stamp.date(), stamp.time(), rate)
    }

    /// Builds an observation stamped with the current local date and time.
    pub fn now(rate: f64) -> Self {
        Self::at(Local::now().naive_local(), rate)
    }

    /// The `data` column value, e.g. `2024-01-01`.
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// The `hora` column value, e.g. `10:00:00`.
    pub fn time_string(&self) -> String {
        self.time.format(TIME_FORMAT).to_string()
    }
}

/// Where the rate of a [`Sample`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Reported by the remote source.
    Live,
    /// Fabricated locally because the remote source was unreachable.
    Synthetic,
}

impl Origin {
    pub fn as_str(self) -> &'static str {
        match self {
            Origin::Live => "live",
            Origin::Synthetic => "synthetic",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observation together with its [`Origin`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub observation: Observation,
    pub origin: Origin,
}

impl Sample {
    pub fn is_synthetic(&self) -> bool {
        self.origin == Origin::Synthetic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_columns() {
        let obs = Observation::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            13.25,
        );
        assert_eq!(obs.date_string(), "2024-01-01");
        assert_eq!(obs.time_string(), "10:00:00");
    }

    #[test]
    fn drops_sub_second_precision() {
        let time = NaiveTime::from_hms_milli_opt(9, 30, 15, 999).unwrap();
        let obs = Observation::new(NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(), time, 13.0);
        assert_eq!(obs.time, NaiveTime::from_hms_opt(9, 30, 15).unwrap());
        assert_eq!(obs.time_string(), "09:30:15");
    }

    #[test]
    fn now_is_stamped_with_today() {
        let before = Local::now().date_naive();
        let obs = Observation::now(12.9);
        let after = Local::now().date_naive();
        assert!(obs.date == before || obs.date == after);
        assert_eq!(obs.time.nanosecond(), 0);
    }
}
