//! Grouping and join keys.
//!
//! Keys borrow from the records they were derived from and compare strings
//! exactly (case-sensitive).

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::queries::bands::RainCondition;
use crate::records::TripRecord;

/// Ordered (start station, end station) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteKey<'a> {
    pub start: &'a str,
    pub end: &'a str,
}

impl<'a> RouteKey<'a> {
    pub fn of(trip: &'a TripRecord) -> Self {
        Self {
            start: &trip.start_station_name,
            end: &trip.end_station_name,
        }
    }

    pub fn has_both_stations(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }

    pub fn label(&self) -> String {
        format!("{} -> {}", self.start, self.end)
    }
}

/// Calendar date plus hour of day; a timestamp truncated to the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HourKey {
    pub date: NaiveDate,
    pub hour: u32,
}

impl HourKey {
    pub fn of(ts: NaiveDateTime) -> Self {
        Self {
            date: ts.date(),
            hour: ts.hour(),
        }
    }
}

/// Weather condition and rider category, ordered condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConditionKey<'a> {
    pub condition: RainCondition,
    pub user: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{at, trip};

    #[test]
    fn test_hour_key_truncates_minutes() {
        assert_eq!(HourKey::of(at(1, 8, 59)), HourKey::of(at(1, 8, 0)));
        assert_ne!(HourKey::of(at(1, 8, 0)), HourKey::of(at(2, 8, 0)));
        assert_ne!(HourKey::of(at(1, 8, 0)), HourKey::of(at(1, 9, 0)));
    }

    #[test]
    fn test_route_key_is_directional_and_case_sensitive() {
        let ab = trip("r1", "A", "B", at(1, 8, 0), 5);
        let ba = trip("r2", "B", "A", at(1, 8, 0), 5);
        let lower = trip("r3", "a", "B", at(1, 8, 0), 5);
        assert_ne!(RouteKey::of(&ab), RouteKey::of(&ba));
        assert_ne!(RouteKey::of(&ab), RouteKey::of(&lower));
        assert_eq!(RouteKey::of(&ab).label(), "A -> B");
    }

    #[test]
    fn test_route_key_requires_both_names() {
        let dockless = trip("r1", "A", "", at(1, 8, 0), 5);
        assert!(!RouteKey::of(&dockless).has_both_stations());
    }

    #[test]
    fn test_condition_key_orders_condition_then_user() {
        let mut keys = vec![
            ConditionKey {
                condition: RainCondition::Raining,
                user: "casual",
            },
            ConditionKey {
                condition: RainCondition::NotRaining,
                user: "member",
            },
            ConditionKey {
                condition: RainCondition::NotRaining,
                user: "casual",
            },
        ];
        keys.sort();
        assert_eq!(keys[0].user, "casual");
        assert_eq!(keys[0].condition, RainCondition::NotRaining);
        assert_eq!(keys[1].user, "member");
        assert_eq!(keys[2].condition, RainCondition::Raining);
    }
}
