//! Aggregate statistics over a trip subset.
//!
//! Every figure is recomputed wholesale from whatever subset it is given;
//! nothing is incremental. Grouped aggregates always carry their full
//! canonical label set with zeros for empty groups, so a sparse or empty
//! subset never changes the shape of a downstream view.

use indexmap::IndexMap;
use serde::Serialize;

use crate::record::{DISTANCE_CATEGORIES, MONTHS, RideRecord, WEEKDAYS};

/// The full set of derived figures for one record subset.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TripStats {
    pub total_trips: usize,
    pub avg_distance_km: f64,
    /// Mean trip duration in seconds.
    pub avg_duration_s: f64,
    pub avg_speed_kmh: f64,
    pub max_speed_kmh: f64,
    pub max_duration_s: f64,

    /// Mean trip duration in minutes per weekday, Monday through Sunday.
    pub duration_by_weekday: IndexMap<String, f64>,
    /// Mean trip speed per month, January through December.
    pub speed_by_month: IndexMap<String, f64>,
    /// Mean trip speed per pickup hour, 0 through 23.
    pub speed_by_hour: IndexMap<u32, f64>,
    /// Trip counts over the recognized distance categories. Records with an
    /// unrecognized category are excluded here but still count in
    /// `total_trips`.
    pub distance_categories: IndexMap<String, usize>,
    /// Trip counts per passenger count, keys in first-encountered order.
    pub passenger_distribution: IndexMap<u32, usize>,
}

impl TripStats {
    /// Computes every aggregate in a single pass over the subset.
    pub fn from_records(records: &[RideRecord]) -> Self {
        let mut distance_sum = 0.0;
        let mut duration_sum = 0.0;
        let mut speed_sum = 0.0;
        let mut max_speed = 0.0f64;
        let mut max_duration = 0.0f64;

        let mut weekday_sums = [0.0; 7];
        let mut weekday_counts = [0usize; 7];
        let mut month_sums = [0.0; 12];
        let mut month_counts = [0usize; 12];
        let mut hour_sums = [0.0; 24];
        let mut hour_counts = [0usize; 24];
        let mut category_counts = [0usize; 3];
        let mut passenger_distribution: IndexMap<u32, usize> = IndexMap::new();

        for record in records {
            distance_sum += record.trip_distance_km;
            duration_sum += record.trip_duration;
            speed_sum += record.trip_speed_kmh;
            max_speed = max_speed.max(record.trip_speed_kmh);
            max_duration = max_duration.max(record.trip_duration);

            if let Some(i) = WEEKDAYS
                .iter()
                .position(|d| *d == record.pickup_day_of_week)
            {
                weekday_sums[i] += record.trip_duration;
                weekday_counts[i] += 1;
            }
            if let Some(i) = MONTHS.iter().position(|m| *m == record.pickup_month) {
                month_sums[i] += record.trip_speed_kmh;
                month_counts[i] += 1;
            }

            let hour = record.pickup_hour() as usize;
            hour_sums[hour] += record.trip_speed_kmh;
            hour_counts[hour] += 1;

            if let Some(category) = &record.trip_distance_category {
                if let Some(i) = DISTANCE_CATEGORIES.iter().position(|c| c == category) {
                    category_counts[i] += 1;
                }
            }

            *passenger_distribution
                .entry(record.passenger_count)
                .or_insert(0) += 1;
        }

        let count = records.len();

        TripStats {
            total_trips: count,
            avg_distance_km: mean(distance_sum, count),
            avg_duration_s: mean(duration_sum, count),
            avg_speed_kmh: mean(speed_sum, count),
            max_speed_kmh: max_speed,
            max_duration_s: max_duration,
            duration_by_weekday: WEEKDAYS
                .iter()
                .enumerate()
                .map(|(i, day)| {
                    (
                        day.to_string(),
                        mean(weekday_sums[i], weekday_counts[i]) / 60.0,
                    )
                })
                .collect(),
            speed_by_month: MONTHS
                .iter()
                .enumerate()
                .map(|(i, month)| (month.to_string(), mean(month_sums[i], month_counts[i])))
                .collect(),
            speed_by_hour: (0..24)
                .map(|h| (h as u32, mean(hour_sums[h], hour_counts[h])))
                .collect(),
            distance_categories: DISTANCE_CATEGORIES
                .iter()
                .enumerate()
                .map(|(i, category)| (category.to_string(), category_counts[i]))
                .collect(),
            passenger_distribution,
        }
    }
}

/// Arithmetic mean from a pre-accumulated sum. Zero when the group is empty,
/// never NaN.
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
