//! The nine trip and weather reports.
//!
//! Weather reports join daytime trips to observations on (date, hour) and
//! normalize trip counts by the number of matching hours inside the daytime
//! window, see [`Dataset::daytime_window`].

use anyhow::Result;
use chrono::Timelike;
use std::collections::HashMap;
use std::hash::Hash;

use crate::dataset::{Dataset, is_daytime};
use crate::duration::format_duration;
use crate::queries::bands::{CloudCover, RainCondition, TimeOfDay, WindSpeed};
use crate::queries::keys::{ConditionKey, HourKey, RouteKey};
use crate::queries::primitives::{count_by, group_by, inner_join};
use crate::queries::types::ResultRow;
use crate::queries::utility::{pct, ratio, round1};
use crate::records::{RideableType, TripRecord, WeatherRecord};

pub const TOP_ROUTES: usize = 5;
pub const TOP_DEFICIT_STATIONS: usize = 5;
pub const TOP_ROUND_TRIPS: usize = 3;
pub const TOP_ELECTRIC_STATIONS: usize = 3;

/// A daytime trip paired with the observation for its hour.
type TripHour<'a> = (&'a TripRecord, &'a WeatherRecord);

fn daytime_trip_hours(db: &Dataset) -> Vec<TripHour<'_>> {
    inner_join(
        db.trips.iter().filter(|t| is_daytime(t.started_at)),
        &db.weather,
        |t| HourKey::of(t.started_at),
        |w| HourKey::of(w.time),
    )
}

/// Window hours per band.
fn window_hours<B, F>(db: &Dataset, classify: F) -> Result<HashMap<B, usize>>
where
    B: Eq + Hash,
    F: Fn(&WeatherRecord) -> B,
{
    if db.trips.is_empty() {
        return Ok(HashMap::new());
    }
    let window = db.daytime_window()?;
    Ok(count_by(window.iter().copied(), |w| classify(w)))
}

fn trips_per_hour(trips: usize, hours: usize) -> f64 {
    round1(ratio(trips, hours))
}

/// Most frequent station-to-station routes.
pub fn popular_routes(db: &Dataset) -> Result<Vec<ResultRow>> {
    let mut groups = group_by(
        db.trips.iter().filter(|t| RouteKey::of(t).has_both_stations()),
        RouteKey::of,
    );
    groups.sort_by(|a, b| b.count().cmp(&a.count()));

    Ok(groups
        .iter()
        .take(TOP_ROUTES)
        .map(|g| {
            ResultRow::new()
                .with("route", g.key.label())
                .with("count", g.count())
                .with(
                    "avg_time",
                    format_duration(g.mean_of(TripRecord::duration_minutes).unwrap_or_default()),
                )
        })
        .collect())
}

/// Stations losing the most bikes (arrivals minus departures, lowest first).
///
/// Only stations seen both as a start and as an end are considered.
pub fn station_flow_balance(db: &Dataset) -> Result<Vec<ResultRow>> {
    let departures = group_by(&db.trips, |t| t.start_station_name.as_str());
    let arrivals = group_by(&db.trips, |t| t.end_station_name.as_str());

    let mut balance: Vec<(&str, usize, usize, i64)> =
        inner_join(&departures, &arrivals, |d| d.key, |a| a.key)
            .into_iter()
            .map(|(d, a)| {
                let (departed, arrived) = (d.count(), a.count());
                (d.key, departed, arrived, arrived as i64 - departed as i64)
            })
            .collect();
    balance.sort_by_key(|(_, _, _, diff)| *diff);

    Ok(balance
        .into_iter()
        .take(TOP_DEFICIT_STATIONS)
        .map(|(station, departed, arrived, diff)| {
            ResultRow::new()
                .with("station", station)
                .with("departures", departed)
                .with("arrivals", arrived)
                .with("difference", diff)
        })
        .collect())
}

/// Longest trips that ended at the station they started from.
pub fn longest_round_trips(db: &Dataset) -> Result<Vec<ResultRow>> {
    let mut round_trips: Vec<&TripRecord> =
        db.trips.iter().filter(|t| t.is_round_trip()).collect();
    round_trips.sort_by(|a, b| b.duration_minutes().total_cmp(&a.duration_minutes()));

    Ok(round_trips
        .into_iter()
        .take(TOP_ROUND_TRIPS)
        .map(|t| {
            ResultRow::new()
                .with("ride_id", t.ride_id.as_str())
                .with("route", t.route_label())
                .with("minutes", format!("{:.1} min", t.duration_minutes()))
        })
        .collect())
}

/// Trip count and average duration per rider category.
pub fn member_vs_casual(db: &Dataset) -> Result<Vec<ResultRow>> {
    Ok(group_by(&db.trips, |t| t.member_casual.as_str())
        .iter()
        .map(|g| {
            ResultRow::new()
                .with("user_type", g.key)
                .with("count", g.count())
                .with(
                    "avg_duration",
                    format_duration(g.mean_of(TripRecord::duration_minutes).unwrap_or_default()),
                )
        })
        .collect())
}

/// Start stations with the highest share of electric bike trips.
pub fn electric_bike_usage(db: &Dataset) -> Result<Vec<ResultRow>> {
    let mut shares: Vec<(&str, f64)> = group_by(&db.trips, |t| t.start_station_name.as_str())
        .iter()
        .map(|g| {
            let electric = g.count_where(|t| t.rideable_type == RideableType::Electric);
            (g.key, pct(electric, g.count()))
        })
        .collect();
    shares.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(shares
        .into_iter()
        .take(TOP_ELECTRIC_STATIONS)
        .map(|(station, share)| {
            ResultRow::new()
                .with("station", station)
                .with("share", format!("{share:.1}%"))
        })
        .collect())
}

/// Total and average daily trips per part of the day.
pub fn time_of_day_volume(db: &Dataset) -> Result<Vec<ResultRow>> {
    let days = db.distinct_trip_dates();
    if days == 0 {
        return Ok(Vec::new());
    }

    Ok(group_by(&db.trips, |t| TimeOfDay::of_hour(t.started_at.hour()))
        .iter()
        .map(|g| {
            ResultRow::new()
                .with("time_of_day", g.key.label())
                .with("total_trips", g.count())
                .with("avg_daily_trips", round1(ratio(g.count(), days)))
        })
        .collect())
}

/// Daytime trips in rain versus dry hours, split by rider category.
pub fn weather_condition_impact(db: &Dataset) -> Result<Vec<ResultRow>> {
    let hours = window_hours(db, RainCondition::of)?;
    let joined = daytime_trip_hours(db);

    Ok(group_by(&joined, |(t, w)| ConditionKey {
        condition: RainCondition::of(w),
        user: t.member_casual.as_str(),
    })
    .iter()
    .map(|g| {
        let observed = hours.get(&g.key.condition).copied().unwrap_or(0);
        let avg_temp = g.mean_of(|(_, w)| w.temperature).unwrap_or_default();
        ResultRow::new()
            .with("conditions", g.key.condition.label())
            .with("user_type", g.key.user)
            .with("number_of_trips", g.count())
            .with("hours_analyzed", observed)
            .with("trips_per_hour", trips_per_hour(g.count(), observed))
            .with(
                "avg_time",
                format_duration(g.mean_of(|(t, _)| t.duration_minutes()).unwrap_or_default()),
            )
            .with("avg_temperature", format!("{} C", round1(avg_temp)))
    })
    .collect())
}

/// Daytime trips per cloud-cover band.
///
/// `share` is relative to every loaded trip, not just the joined ones.
pub fn cloud_cover_impact(db: &Dataset) -> Result<Vec<ResultRow>> {
    let classify = |w: &WeatherRecord| CloudCover::of_percent(w.cloud_cover);
    let hours = window_hours(db, classify)?;
    let joined = daytime_trip_hours(db);
    let total_trips = db.trips.len();

    Ok(group_by(&joined, |(_, w)| classify(*w))
        .iter()
        .map(|g| {
            let observed = hours.get(&g.key).copied().unwrap_or(0);
            ResultRow::new()
                .with("sky_condition", g.key.label())
                .with("trips_count", g.count())
                .with("hours_analyzed", observed)
                .with("trips_per_hour", trips_per_hour(g.count(), observed))
                .with("share", format!("{}%", round1(pct(g.count(), total_trips))))
        })
        .collect())
}

/// Daytime trips and their average duration per wind-speed band.
pub fn wind_speed_impact(db: &Dataset) -> Result<Vec<ResultRow>> {
    let classify = |w: &WeatherRecord| WindSpeed::of_kmh(w.wind_speed);
    let hours = window_hours(db, classify)?;
    let joined = daytime_trip_hours(db);

    Ok(group_by(&joined, |(_, w)| classify(*w))
        .iter()
        .map(|g| {
            let observed = hours.get(&g.key).copied().unwrap_or(0);
            ResultRow::new()
                .with("wind_condition", g.key.label())
                .with("number_of_trips", g.count())
                .with("hours_observed", observed)
                .with("trips_per_hour", trips_per_hour(g.count(), observed))
                .with(
                    "avg_duration",
                    format_duration(g.mean_of(|(t, _)| t.duration_minutes()).unwrap_or_default()),
                )
        })
        .collect())
}
