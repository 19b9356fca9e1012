//! Typed trip and weather records.

use chrono::NaiveDateTime;
use std::fmt;

/// Kind of vehicle used for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RideableType {
    Classic,
    Electric,
    Other(String),
}

impl RideableType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "classic_bike" => RideableType::Classic,
            "electric_bike" => RideableType::Electric,
            other => RideableType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RideableType::Classic => "classic_bike",
            RideableType::Electric => "electric_bike",
            RideableType::Other(raw) => raw,
        }
    }
}

/// Rider category. Unknown values are kept verbatim so they still group on their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MemberType {
    Casual,
    Member,
    Other(String),
}

impl MemberType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "member" => MemberType::Member,
            "casual" => MemberType::Casual,
            other => MemberType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MemberType::Member => "member",
            MemberType::Casual => "casual",
            MemberType::Other(raw) => raw,
        }
    }
}

/// A single bike-share trip.
///
/// Station names and ids are empty for dockless trips that started or ended
/// at a bare GPS position.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    pub ride_id: String,
    pub rideable_type: RideableType,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub start_station_name: String,
    pub start_station_id: String,
    pub end_station_name: String,
    pub end_station_id: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub end_lat: f64,
    pub end_lng: f64,
    pub member_casual: MemberType,
}

impl TripRecord {
    /// Trip length in minutes. Zero or negative for malformed rows.
    pub fn duration_minutes(&self) -> f64 {
        (self.ended_at - self.started_at).num_milliseconds() as f64 / 60_000.0
    }

    /// `"start -> end"` label used by the route reports.
    pub fn route_label(&self) -> String {
        format!("{} -> {}", self.start_station_name, self.end_station_name)
    }

    pub fn is_round_trip(&self) -> bool {
        !self.start_station_id.is_empty() && self.start_station_id == self.end_station_id
    }
}

fn station_or_gps(name: &str) -> &str {
    if name.is_empty() { "[GPS Location]" } else { name }
}

impl fmt::Display for TripRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Trip ID: {} ---", self.ride_id)?;
        writeln!(
            f,
            "Type: {} | User: {}",
            self.rideable_type.as_str(),
            self.member_casual.as_str()
        )?;
        writeln!(
            f,
            "Time: {} -> {} ({:.2} minutes)",
            self.started_at.format("%Y-%m-%d %H:%M"),
            self.ended_at.format("%Y-%m-%d %H:%M"),
            self.duration_minutes()
        )?;
        writeln!(f, "Route: {}", station_or_gps(&self.start_station_name))?;
        writeln!(f, "  ->  {}", station_or_gps(&self.end_station_name))?;
        writeln!(
            f,
            "Coords: [{:.4}, {:.4}] -> [{:.4}, {:.4}]",
            self.start_lat, self.start_lng, self.end_lat, self.end_lng
        )
    }
}

/// One hourly weather observation.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub precipitation: f64,
    pub rain: f64,
    /// Total cloud cover, percent.
    pub cloud_cover: f64,
    pub cloud_cover_low: f64,
    pub cloud_cover_mid: f64,
    pub cloud_cover_high: f64,
    /// km/h
    pub wind_speed: f64,
    pub wind_direction: f64,
}

impl WeatherRecord {
    pub fn is_raining(&self) -> bool {
        self.rain > 0.0 || self.precipitation > 0.0
    }
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C, Rain: {}mm, Wind: {}km/h",
            self.time.format("%Y-%m-%d %H:%M"),
            self.temperature,
            self.rain,
            self.wind_speed
        )
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_duration_minutes() {
        let t = trip("r1", "A", "B", at(1, 8, 0), 15);
        assert_eq!(t.duration_minutes(), 15.0);
    }

    #[test]
    fn test_negative_duration_is_tolerated() {
        let t = trip("r1", "A", "B", at(1, 8, 0), -3);
        assert_eq!(t.duration_minutes(), -3.0);
    }

    #[test]
    fn test_round_trip_requires_station_id() {
        assert!(trip("r1", "A", "A", at(1, 8, 0), 5).is_round_trip());
        assert!(!trip("r2", "", "", at(1, 8, 0), 5).is_round_trip());
        assert!(!trip("r3", "A", "B", at(1, 8, 0), 5).is_round_trip());
    }

    #[test]
    fn test_category_parsing_is_case_sensitive() {
        assert_eq!(MemberType::parse("member"), MemberType::Member);
        assert_eq!(
            MemberType::parse("Member"),
            MemberType::Other("Member".to_string())
        );
        assert_eq!(RideableType::parse("electric_bike"), RideableType::Electric);
        assert_eq!(RideableType::parse("docked_bike").as_str(), "docked_bike");
    }

    #[test]
    fn test_trip_display_marks_gps_locations() {
        let t = trip("r1", "", "B", at(1, 8, 0), 10);
        let text = t.to_string();
        assert!(text.contains("--- Trip ID: r1 ---"));
        assert!(text.contains("Route: [GPS Location]"));
        assert!(text.contains("  ->  B"));
        assert!(text.contains("(10.00 minutes)"));
    }

    #[test]
    fn test_weather_display() {
        let w = weather(at(1, 9, 0));
        assert_eq!(w.to_string(), "2022-06-01 09:00: 20°C, Rain: 0mm, Wind: 5km/h");
    }

    #[test]
    fn test_is_raining() {
        let mut w = weather(at(1, 9, 0));
        assert!(!w.is_raining());
        w.precipitation = 0.1;
        assert!(w.is_raining());
    }
}
