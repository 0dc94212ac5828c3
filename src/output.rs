//! Output formatting, CSV export, and the headless renderer.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

use crate::dashboard::{ChartRenderer, MapRenderer};
use crate::projection::{ChartSpec, TableRow, TripMarker};
use crate::stats::TripStats;

/// Logs the stats using Rust's debug pretty-print format.
pub fn print_pretty(stats: &TripStats) {
    debug!("{:#?}", stats);
}

/// Writes any serializable result to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends table rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn write_table_csv(path: &str, rows: &[TableRow]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, rows = rows.len(), "Writing trips CSV");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Renderer that logs chart series and marker churn instead of drawing,
/// for headless runs.
#[derive(Debug, Default)]
pub struct LogRenderer {
    markers: usize,
}

impl ChartRenderer for LogRenderer {
    fn draw(&mut self, spec: &ChartSpec) {
        info!(
            view = ?spec.view,
            kind = ?spec.kind,
            points = spec.values.len(),
            "Chart updated"
        );
    }
}

impl MapRenderer for LogRenderer {
    fn clear_markers(&mut self) {
        if self.markers > 0 {
            debug!(removed = self.markers, "Map markers cleared");
        }
        self.markers = 0;
    }

    fn add_marker(&mut self, marker: &TripMarker) {
        debug!(title = %marker.title, lat = marker.latitude, lng = marker.longitude, "Marker added");
        self.markers += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_row(trip_id: &str) -> TableRow {
        TableRow {
            trip_id: trip_id.to_string(),
            pickup_datetime: "2016-03-14 17:24:55".to_string(),
            dropoff_datetime: "2016-03-14 17:32:30".to_string(),
            trip_distance_km: 1.5,
            trip_duration_min: 7.6,
            trip_speed_kmh: 11.9,
            vendor_id: 1,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let stats = TripStats::from_records(&[]);
        print_pretty(&stats);
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let stats = TripStats::from_records(&[]);
        print_json(&stats).unwrap();
    }

    #[test]
    fn test_write_table_csv_creates_file() {
        let path = temp_path("ride_dashboard_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        write_table_csv(&path, &[sample_row("id1")]).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("id1"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_table_csv_writes_header_once() {
        let path = temp_path("ride_dashboard_test_header.csv");
        let _ = fs::remove_file(&path);

        write_table_csv(&path, &[sample_row("id1")]).unwrap();
        write_table_csv(&path, &[sample_row("id2")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("trip_id")).count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);

        fs::remove_file(&path).unwrap();
    }
}
