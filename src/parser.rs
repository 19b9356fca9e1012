//! CSV parsing for trip and weather exports.
//!
//! Both readers are permissive: short rows are dropped, blank or garbled
//! numbers become `0.0`. Timestamps are the one field without a fallback, see
//! [`TimestampPolicy`].

use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

use crate::records::{MemberType, RideableType, TripRecord, WeatherRecord};

pub const TRIP_FIELDS: usize = 13;
pub const WEATHER_FIELDS: usize = 10;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// What to do with a row whose timestamp cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TimestampPolicy {
    /// Abort the whole load.
    #[default]
    Fail,
    /// Drop the row and keep going.
    Skip,
}

struct BadTimestamp {
    column: &'static str,
    value: String,
}

/// Parses a timestamp in any of the layouts seen in trip and weather exports.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
}

/// Parses a float, falling back to `0.0` for blank, invalid or non-finite input.
pub fn parse_number(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn field<'r>(record: &'r StringRecord, idx: usize) -> &'r str {
    record.get(idx).unwrap_or("").trim().trim_matches('"').trim()
}

fn timestamp(
    record: &StringRecord,
    idx: usize,
    column: &'static str,
) -> Result<NaiveDateTime, BadTimestamp> {
    let raw = field(record, idx);
    parse_timestamp(raw).ok_or_else(|| BadTimestamp {
        column,
        value: raw.to_string(),
    })
}

fn parse_rows<R, T, F>(
    reader: R,
    min_fields: usize,
    policy: TimestampPolicy,
    kind: &str,
    mut build: F,
) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&StringRecord) -> Result<T, BadTimestamp>,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut short_rows = 0usize;
    let mut unreadable_rows = 0usize;
    let mut skipped_timestamps = 0usize;

    for result in rdr.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => {
                return Err(e).with_context(|| format!("reading {kind} rows"));
            }
            Err(e) => {
                debug!(kind, error = %e, "Dropping unreadable row");
                unreadable_rows += 1;
                continue;
            }
        };

        if record.len() < min_fields {
            short_rows += 1;
            continue;
        }

        let line = record.position().map(|p| p.line()).unwrap_or_default();
        match build(&record) {
            Ok(row) => rows.push(row),
            Err(bad) => match policy {
                TimestampPolicy::Fail => bail!(
                    "{kind} row at line {line}: invalid {} timestamp {:?}",
                    bad.column,
                    bad.value
                ),
                TimestampPolicy::Skip => {
                    warn!(
                        kind,
                        line,
                        column = bad.column,
                        value = %bad.value,
                        "Skipping row with invalid timestamp"
                    );
                    skipped_timestamps += 1;
                }
            },
        }
    }

    debug!(
        kind,
        parsed = rows.len(),
        short_rows,
        unreadable_rows,
        skipped_timestamps,
        "Finished parsing rows"
    );
    Ok(rows)
}

/// Parses a trip export (header line first).
pub fn parse_trips<R: Read>(reader: R, policy: TimestampPolicy) -> Result<Vec<TripRecord>> {
    parse_rows(reader, TRIP_FIELDS, policy, "trip", |r| {
        Ok(TripRecord {
            ride_id: field(r, 0).to_string(),
            rideable_type: RideableType::parse(field(r, 1)),
            started_at: timestamp(r, 2, "started_at")?,
            ended_at: timestamp(r, 3, "ended_at")?,
            start_station_name: field(r, 4).to_string(),
            start_station_id: field(r, 5).to_string(),
            end_station_name: field(r, 6).to_string(),
            end_station_id: field(r, 7).to_string(),
            start_lat: parse_number(field(r, 8)),
            start_lng: parse_number(field(r, 9)),
            end_lat: parse_number(field(r, 10)),
            end_lng: parse_number(field(r, 11)),
            member_casual: MemberType::parse(field(r, 12)),
        })
    })
}

/// Parses an hourly weather export (header line first).
///
/// Cloud layers are taken in header order: low, mid, high.
pub fn parse_weather<R: Read>(reader: R, policy: TimestampPolicy) -> Result<Vec<WeatherRecord>> {
    parse_rows(reader, WEATHER_FIELDS, policy, "weather", |r| {
        Ok(WeatherRecord {
            time: timestamp(r, 0, "time")?,
            temperature: parse_number(field(r, 1)),
            precipitation: parse_number(field(r, 2)),
            rain: parse_number(field(r, 3)),
            cloud_cover: parse_number(field(r, 4)),
            cloud_cover_low: parse_number(field(r, 5)),
            cloud_cover_mid: parse_number(field(r, 6)),
            cloud_cover_high: parse_number(field(r, 7)),
            wind_speed: parse_number(field(r, 8)),
            wind_direction: parse_number(field(r, 9)),
        })
    })
}

/// Opens a data file, gunzipping it on the fly when the name ends in `.gz`.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        Ok(Box::new(MultiGzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_trips(path: &Path, policy: TimestampPolicy) -> Result<Vec<TripRecord>> {
    let trips = parse_trips(open_input(path)?, policy)
        .with_context(|| format!("parsing trips from {}", path.display()))?;
    info!(count = trips.len(), "Loaded trips");
    Ok(trips)
}

#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_weather(path: &Path, policy: TimestampPolicy) -> Result<Vec<WeatherRecord>> {
    let weather = parse_weather(open_input(path)?, policy)
        .with_context(|| format!("parsing weather from {}", path.display()))?;
    info!(count = weather.len(), "Loaded weather observations");
    Ok(weather)
}
