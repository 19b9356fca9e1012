use anyhow::Result;
use tracing::{error, info};

use crate::dataset::Dataset;
use crate::queries::reports::{
    cloud_cover_impact, electric_bike_usage, longest_round_trips, member_vs_casual,
    popular_routes, station_flow_balance, time_of_day_volume, weather_condition_impact,
    wind_speed_impact,
};
use crate::queries::types::{Report, ResultRow};

pub type ReportFn = fn(&Dataset) -> Result<Vec<ResultRow>>;

/// Every report, in output order.
pub static REPORTS: &[(&str, ReportFn)] = &[
    ("1. Top 5 Popular Routes", popular_routes),
    ("2. Stations Losing Bicycles", station_flow_balance),
    ("3. Longest Round Trips", longest_round_trips),
    ("4. User Stats", member_vs_casual),
    ("5. Highest Electric Bike Usage Stations", electric_bike_usage),
    ("6. Average Daily Trips by Time of Day", time_of_day_volume),
    ("7. Weather Condition Impact (Daytime only)", weather_condition_impact),
    ("8. Cloud Cover Impact (Daytime only)", cloud_cover_impact),
    ("9. Wind Speed Impact (Daytime only)", wind_speed_impact),
];

/// Runs one report, turning a failure into an empty report carrying the error.
pub fn run_report(db: &Dataset, title: &'static str, query: ReportFn) -> Report {
    match query(db) {
        Ok(rows) => {
            info!(report = title, rows = rows.len(), "Report complete");
            Report::new(title, rows)
        }
        Err(e) => {
            error!(report = title, error = %e, "Report failed");
            Report::failed(title, &e)
        }
    }
}

/// Runs every report against `db`. A failing report does not stop the rest.
#[tracing::instrument(skip_all, fields(trips = db.trips.len(), weather = db.weather.len()))]
pub fn run_all(db: &Dataset) -> Vec<Report> {
    REPORTS
        .iter()
        .map(|&(title, query)| run_report(db, title, query))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::test_support::{at, trip, weather};

    #[test]
    fn test_run_all_produces_every_report() {
        let db = Dataset::new(
            vec![trip("r1", "A", "B", at(1, 8, 0), 10)],
            vec![weather(at(1, 8, 0))],
        );
        let reports = run_all(&db);

        assert_eq!(reports.len(), 9);
        assert!(reports.iter().all(|r| r.error.is_none()));
        assert_eq!(reports[0].title, "1. Top 5 Popular Routes");
        assert_eq!(reports[8].rows.len(), 1);
    }

    #[test]
    fn test_empty_dataset_yields_empty_reports() {
        let reports = run_all(&Dataset::default());

        assert_eq!(reports.len(), 9);
        for report in &reports {
            assert!(report.error.is_none(), "{}", report.title);
            assert!(report.rows.is_empty(), "{}", report.title);
        }
    }

    fn always_fails(_: &Dataset) -> Result<Vec<ResultRow>> {
        anyhow::bail!("source unavailable")
    }

    #[test]
    fn test_failed_report_does_not_stop_others() {
        let db = Dataset::new(
            vec![trip("r1", "A", "B", at(1, 8, 0), 10)],
            vec![weather(at(1, 8, 0))],
        );
        let queries: [(&'static str, ReportFn); 2] =
            [("broken", always_fails), ("routes", REPORTS[0].1)];
        let reports: Vec<Report> = queries
            .iter()
            .map(|&(title, query)| run_report(&db, title, query))
            .collect();

        assert_eq!(reports[0].error.as_deref(), Some("source unavailable"));
        assert!(reports[0].rows.is_empty());
        assert!(reports[1].error.is_none());
        assert_eq!(reports[1].rows.len(), 1);
    }
}
