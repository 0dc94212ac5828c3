//! Filter option catalog derived from the loaded record set.

use indexmap::IndexSet;

use crate::record::RideRecord;

/// Distinct selectable values per filter dimension, in first-seen order.
///
/// Built exactly once per load from the full record set, never from a
/// filtered subset, so every option stays offered no matter how the current
/// view is narrowed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterCatalog {
    pub vendors: IndexSet<i64>,
    pub months: IndexSet<String>,
    pub weekdays: IndexSet<String>,
}

impl FilterCatalog {
    pub fn from_records(records: &[RideRecord]) -> Self {
        let mut catalog = FilterCatalog::default();

        for record in records {
            catalog.vendors.insert(record.vendor_id);
            if !catalog.months.contains(&record.pickup_month) {
                catalog.months.insert(record.pickup_month.clone());
            }
            if !catalog.weekdays.contains(&record.pickup_day_of_week) {
                catalog.weekdays.insert(record.pickup_day_of_week.clone());
            }
        }

        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RideRecord;
    use chrono::NaiveDate;

    fn record(trip_id: &str, vendor_id: i64, month: &str, weekday: &str) -> RideRecord {
        let pickup = NaiveDate::from_ymd_opt(2016, 3, 14)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap();
        RideRecord {
            trip_id: trip_id.to_string(),
            vendor_id,
            pickup_datetime: pickup,
            dropoff_datetime: pickup,
            pickup_month: month.to_string(),
            pickup_day_of_week: weekday.to_string(),
            pickup_time: "17:00:00".to_string(),
            pickup_latitude: 40.76,
            pickup_longitude: -73.98,
            dropoff_latitude: 40.75,
            dropoff_longitude: -73.96,
            passenger_count: 1,
            trip_distance_km: 1.0,
            trip_distance_category: Some("short".to_string()),
            trip_duration: 600.0,
            trip_speed_kmh: 6.0,
            store_and_fwd_flag: None,
        }
    }

    #[test]
    fn test_distinct_values_in_first_seen_order() {
        let records = vec![
            record("a", 2, "March", "Monday"),
            record("b", 1, "January", "Friday"),
            record("c", 2, "March", "Monday"),
            record("d", 1, "June", "Monday"),
        ];

        let catalog = FilterCatalog::from_records(&records);

        assert_eq!(catalog.vendors.iter().collect::<Vec<_>>(), [&2, &1]);
        assert_eq!(
            catalog.months.iter().collect::<Vec<_>>(),
            ["March", "January", "June"]
        );
        assert_eq!(
            catalog.weekdays.iter().collect::<Vec<_>>(),
            ["Monday", "Friday"]
        );
    }

    #[test]
    fn test_empty_records_give_empty_catalog() {
        let catalog = FilterCatalog::from_records(&[]);
        assert!(catalog.vendors.is_empty());
        assert!(catalog.months.is_empty());
        assert!(catalog.weekdays.is_empty());
    }
}
