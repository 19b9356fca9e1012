//! In-memory trip and weather collections for one analysis run.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::parser::{TimestampPolicy, load_trips, load_weather};
use crate::records::{TripRecord, WeatherRecord};

/// First hour of the day counted as daytime.
pub const DAYTIME_START_HOUR: u32 = 6;
/// Last hour of the day counted as daytime (inclusive).
pub const DAYTIME_END_HOUR: u32 = 22;

pub fn is_daytime(ts: NaiveDateTime) -> bool {
    (DAYTIME_START_HOUR..=DAYTIME_END_HOUR).contains(&ts.hour())
}

/// Read-only view of everything loaded for a report run.
#[derive(Debug, Default, Clone)]
pub struct Dataset {
    pub trips: Vec<TripRecord>,
    pub weather: Vec<WeatherRecord>,
}

impl Dataset {
    pub fn new(trips: Vec<TripRecord>, weather: Vec<WeatherRecord>) -> Self {
        Self { trips, weather }
    }

    /// Loads both input files.
    pub fn load(trips_path: &Path, weather_path: &Path, policy: TimestampPolicy) -> Result<Self> {
        let trips = load_trips(trips_path, policy)?;
        let weather = load_weather(weather_path, policy)?;
        info!(
            trips = trips.len(),
            weather = weather.len(),
            "Dataset ready"
        );
        Ok(Self::new(trips, weather))
    }

    /// Earliest and latest trip start.
    ///
    /// # Errors
    ///
    /// Fails when there are no trips, since the range is undefined.
    pub fn trip_start_range(&self) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let mut starts = self.trips.iter().map(|t| t.started_at);
        let Some(first) = starts.next() else {
            bail!("no trips loaded, cannot derive the trip date range");
        };
        Ok(starts.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts))))
    }

    /// Number of distinct calendar dates on which trips started.
    pub fn distinct_trip_dates(&self) -> usize {
        self.trips
            .iter()
            .map(|t| t.started_at.date())
            .collect::<HashSet<NaiveDate>>()
            .len()
    }

    /// Weather observations inside the trip start range that fall on a daytime hour.
    ///
    /// Recomputed on every call from the full trip set.
    pub fn daytime_window(&self) -> Result<Vec<&WeatherRecord>> {
        let (from, to) = self.trip_start_range()?;
        Ok(self
            .weather
            .iter()
            .filter(|w| w.time >= from && w.time <= to)
            .filter(|w| is_daytime(w.time))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{at, trip, weather};

    #[test]
    fn test_trip_start_range() {
        let db = Dataset::new(
            vec![
                trip("r1", "A", "B", at(2, 9, 0), 5),
                trip("r2", "A", "B", at(1, 17, 30), 5),
                trip("r3", "A", "B", at(3, 7, 45), 5),
            ],
            vec![],
        );
        assert_eq!(db.trip_start_range().unwrap(), (at(1, 17, 30), at(3, 7, 45)));
    }

    #[test]
    fn test_trip_start_range_empty_is_error() {
        let err = Dataset::default().trip_start_range().unwrap_err();
        assert!(err.to_string().contains("no trips"));
    }

    #[test]
    fn test_distinct_trip_dates() {
        let db = Dataset::new(
            vec![
                trip("r1", "A", "B", at(1, 9, 0), 5),
                trip("r2", "A", "B", at(1, 23, 0), 5),
                trip("r3", "A", "B", at(4, 7, 0), 5),
            ],
            vec![],
        );
        assert_eq!(db.distinct_trip_dates(), 2);
        assert_eq!(Dataset::default().distinct_trip_dates(), 0);
    }

    #[test]
    fn test_daytime_window_bounds() {
        let db = Dataset::new(
            vec![
                trip("r1", "A", "B", at(1, 5, 30), 5),
                trip("r2", "A", "B", at(2, 23, 30), 5),
            ],
            vec![
                weather(at(1, 5, 0)), // before first trip
                weather(at(1, 6, 0)), // daytime start
                weather(at(1, 22, 0)), // daytime end, inclusive
                weather(at(1, 23, 0)), // night
                weather(at(2, 12, 0)),
                weather(at(3, 12, 0)), // after last trip
            ],
        );

        let times: Vec<_> = db.daytime_window().unwrap().iter().map(|w| w.time).collect();
        assert_eq!(times, vec![at(1, 6, 0), at(1, 22, 0), at(2, 12, 0)]);
    }

    #[test]
    fn test_daytime_window_without_trips_fails() {
        let db = Dataset::new(vec![], vec![weather(at(1, 9, 0))]);
        assert!(db.daytime_window().is_err());
    }
}
