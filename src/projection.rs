//! Projections of aggregates and subsets into renderable shapes.
//!
//! Everything here is a pure function of its inputs: chart label/value
//! series in the canonical orders, marker pairs for the map, table rows, and
//! the option descriptors a UI binds its filter controls to.

use serde::Serialize;

use crate::catalog::FilterCatalog;
use crate::record::{DISTANCE_CATEGORIES, RideRecord};
use crate::stats::TripStats;

/// Identity of an aggregate view. Renderers discard any prior chart
/// instance for the same view before drawing a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    DurationByWeekday,
    SpeedByMonth,
    SpeedByHour,
    DistanceCategories,
    PassengerCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Doughnut,
}

/// Style hints passed through, uninterpreted, to the chart collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub color: &'static str,
    pub fill: bool,
}

/// One fully specified chart: identity, kind, and ordered labels/values.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub view: ChartView,
    pub kind: ChartKind,
    pub label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub style: ChartStyle,
}

/// Builds the five aggregate chart specs from one stats computation, in the
/// canonical label orders the aggregation engine guarantees.
pub fn chart_specs(stats: &TripStats) -> Vec<ChartSpec> {
    vec![
        ChartSpec {
            view: ChartView::DurationByWeekday,
            kind: ChartKind::Bar,
            label: "Avg Duration (min)".to_string(),
            labels: stats.duration_by_weekday.keys().cloned().collect(),
            values: stats.duration_by_weekday.values().copied().collect(),
            style: ChartStyle {
                color: "#5865f2",
                fill: false,
            },
        },
        ChartSpec {
            view: ChartView::SpeedByMonth,
            kind: ChartKind::Line,
            label: "Avg Speed (km/h)".to_string(),
            labels: stats.speed_by_month.keys().cloned().collect(),
            values: stats.speed_by_month.values().copied().collect(),
            style: ChartStyle {
                color: "#8b5cf6",
                fill: true,
            },
        },
        ChartSpec {
            view: ChartView::SpeedByHour,
            kind: ChartKind::Line,
            label: "Avg Speed (km/h)".to_string(),
            labels: stats.speed_by_hour.keys().map(|h| h.to_string()).collect(),
            values: stats.speed_by_hour.values().copied().collect(),
            style: ChartStyle {
                color: "#ff6600",
                fill: false,
            },
        },
        ChartSpec {
            view: ChartView::DistanceCategories,
            kind: ChartKind::Doughnut,
            label: "Trips".to_string(),
            labels: stats
                .distance_categories
                .keys()
                .map(|c| title_case(c))
                .collect(),
            values: stats
                .distance_categories
                .values()
                .map(|n| *n as f64)
                .collect(),
            style: ChartStyle {
                color: "#ec4899",
                fill: true,
            },
        },
        ChartSpec {
            view: ChartView::PassengerCounts,
            kind: ChartKind::Pie,
            label: "Trips".to_string(),
            labels: stats
                .passenger_distribution
                .keys()
                .map(|p| p.to_string())
                .collect(),
            values: stats
                .passenger_distribution
                .values()
                .map(|n| *n as f64)
                .collect(),
            style: ChartStyle {
                color: "#0077cc",
                fill: true,
            },
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Pickup,
    Dropoff,
}

/// One map marker with its display metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct TripMarker {
    pub trip_id: String,
    pub kind: MarkerKind,
    pub latitude: f64,
    pub longitude: f64,
    pub title: String,
    /// Formatted distance/duration/speed summary for the marker popup.
    pub info: String,
}

/// Maps each record in the subset to its pickup and dropoff markers.
pub fn trip_markers(records: &[RideRecord]) -> Vec<TripMarker> {
    let mut markers = Vec::with_capacity(records.len() * 2);

    for record in records {
        let info = format!(
            "{}: {:.2} km, {:.1} min, {:.1} km/h",
            record.trip_id,
            record.trip_distance_km,
            record.trip_duration / 60.0,
            record.trip_speed_kmh,
        );

        markers.push(TripMarker {
            trip_id: record.trip_id.clone(),
            kind: MarkerKind::Pickup,
            latitude: record.pickup_latitude,
            longitude: record.pickup_longitude,
            title: format!("Pickup: {}", record.trip_id),
            info: info.clone(),
        });
        markers.push(TripMarker {
            trip_id: record.trip_id.clone(),
            kind: MarkerKind::Dropoff,
            latitude: record.dropoff_latitude,
            longitude: record.dropoff_longitude,
            title: format!("Dropoff: {}", record.trip_id),
            info,
        });
    }

    markers
}

/// One row of the trips table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableRow {
    pub trip_id: String,
    pub pickup_datetime: String,
    pub dropoff_datetime: String,
    pub trip_distance_km: f64,
    pub trip_duration_min: f64,
    pub trip_speed_kmh: f64,
    pub vendor_id: i64,
}

impl TableRow {
    fn from_record(record: &RideRecord) -> Self {
        TableRow {
            trip_id: record.trip_id.clone(),
            pickup_datetime: record.pickup_datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            dropoff_datetime: record
                .dropoff_datetime
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            trip_distance_km: record.trip_distance_km,
            trip_duration_min: record.trip_duration / 60.0,
            trip_speed_kmh: record.trip_speed_kmh,
            vendor_id: record.vendor_id,
        }
    }
}

/// Table rows in the subset's own order.
pub fn table_rows(records: &[RideRecord]) -> Vec<TableRow> {
    records.iter().map(TableRow::from_record).collect()
}

/// Table rows sorted ascending by trip duration.
pub fn table_rows_by_duration(records: &[RideRecord]) -> Vec<TableRow> {
    let mut sorted: Vec<&RideRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.trip_duration.total_cmp(&b.trip_duration));
    sorted.into_iter().map(TableRow::from_record).collect()
}

/// Option descriptor for one selectable filter value.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// Option lists for every filter control.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterOptions {
    pub vendors: Vec<SelectOption>,
    pub months: Vec<SelectOption>,
    pub weekdays: Vec<SelectOption>,
    pub categories: Vec<SelectOption>,
}

/// Maps the catalog to option descriptors. Vendor/month/weekday options come
/// from the data in first-seen order; category options are the fixed set.
pub fn filter_options(catalog: &FilterCatalog) -> FilterOptions {
    FilterOptions {
        vendors: catalog
            .vendors
            .iter()
            .map(|id| SelectOption {
                value: id.to_string(),
                label: format!("Vendor {id}"),
            })
            .collect(),
        months: catalog
            .months
            .iter()
            .map(|m| SelectOption {
                value: m.clone(),
                label: m.clone(),
            })
            .collect(),
        weekdays: catalog
            .weekdays
            .iter()
            .map(|d| SelectOption {
                value: d.clone(),
                label: d.clone(),
            })
            .collect(),
        categories: DISTANCE_CATEGORIES
            .iter()
            .map(|c| SelectOption {
                value: c.to_string(),
                label: title_case(c),
            })
            .collect(),
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
