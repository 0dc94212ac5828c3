//! Filter criteria state and the conjunctive record matcher.
//!
//! Criteria are set from raw UI values one dimension at a time. A value that
//! does not validate for its dimension is rejected whole; prior state is
//! never partially updated.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::errors::InvalidCriterionError;
use crate::record::{self, DISTANCE_CATEGORIES, MONTHS, RideRecord, WEEKDAYS};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One filterable dimension. The date range is exposed as its two bounds,
/// matching the two date inputs on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDimension {
    Vendor,
    PassengerCount,
    Month,
    Weekday,
    DistanceCategory,
    StartDate,
    EndDate,
}

/// Conjunctive filter criteria. Every field is optional; unset means "no
/// constraint" for that dimension.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterCriteria {
    vendor: Option<i64>,
    passenger_count: Option<u32>,
    month: Option<String>,
    weekday: Option<String>,
    distance_category: Option<String>,
    start_date: Option<NaiveDateTime>,
    end_date: Option<NaiveDateTime>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and installs one criterion from its raw selected value.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCriterionError`] when the value does not validate
    /// for the dimension; no criterion changes in that case.
    pub fn set_criterion(
        &mut self,
        dimension: FilterDimension,
        raw: &str,
    ) -> Result<(), InvalidCriterionError> {
        match dimension {
            FilterDimension::Vendor => {
                let id = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| InvalidCriterionError::Vendor(raw.to_string()))?;
                self.vendor = Some(id);
            }
            FilterDimension::PassengerCount => {
                let count = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| InvalidCriterionError::PassengerCount(raw.to_string()))?;
                self.passenger_count = Some(count);
            }
            FilterDimension::Month => {
                let label = raw.trim();
                if !MONTHS.contains(&label) {
                    return Err(InvalidCriterionError::Month(raw.to_string()));
                }
                self.month = Some(label.to_string());
            }
            FilterDimension::Weekday => {
                let label = raw.trim();
                if !WEEKDAYS.contains(&label) {
                    return Err(InvalidCriterionError::Weekday(raw.to_string()));
                }
                self.weekday = Some(label.to_string());
            }
            FilterDimension::DistanceCategory => {
                let normalized = record::normalize_category(raw);
                if !DISTANCE_CATEGORIES.contains(&normalized.as_str()) {
                    return Err(InvalidCriterionError::DistanceCategory(raw.to_string()));
                }
                self.distance_category = Some(normalized);
            }
            FilterDimension::StartDate => {
                self.start_date = Some(parse_bound(raw, false)?);
            }
            FilterDimension::EndDate => {
                self.end_date = Some(parse_bound(raw, true)?);
            }
        }

        Ok(())
    }

    /// Removes the constraint for one dimension.
    pub fn clear_criterion(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Vendor => self.vendor = None,
            FilterDimension::PassengerCount => self.passenger_count = None,
            FilterDimension::Month => self.month = None,
            FilterDimension::Weekday => self.weekday = None,
            FilterDimension::DistanceCategory => self.distance_category = None,
            FilterDimension::StartDate => self.start_date = None,
            FilterDimension::EndDate => self.end_date = None,
        }
    }

    /// Clears every constraint.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    /// `true` iff the record satisfies every set criterion.
    pub fn matches(&self, record: &RideRecord) -> bool {
        if let Some(vendor) = self.vendor {
            if record.vendor_id != vendor {
                return false;
            }
        }
        if let Some(count) = self.passenger_count {
            if record.passenger_count != count {
                return false;
            }
        }
        if let Some(month) = &self.month {
            if record.pickup_month != *month {
                return false;
            }
        }
        if let Some(weekday) = &self.weekday {
            if record.pickup_day_of_week != *weekday {
                return false;
            }
        }
        if let Some(category) = &self.distance_category {
            match &record.trip_distance_category {
                Some(c) if c == category => {}
                _ => return false,
            }
        }
        if let Some(start) = self.start_date {
            if record.pickup_datetime < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if record.pickup_datetime > end {
                return false;
            }
        }

        true
    }

    /// Pure projection of `records` through the current criteria. Empty
    /// criteria yield the input unchanged.
    pub fn apply(&self, records: &[RideRecord]) -> Vec<RideRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// A date-only end bound covers its whole day so the range stays inclusive.
fn parse_bound(raw: &str, end_of_day: bool) -> Result<NaiveDateTime, InvalidCriterionError> {
    let raw = raw.trim();

    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT) {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        let time = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        } else {
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        };
        return Ok(date.and_time(time));
    }

    Err(InvalidCriterionError::DateBound(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(trip_id: &str, vendor_id: i64, weekday: &str, category: &str) -> RideRecord {
        let pickup = NaiveDate::from_ymd_opt(2016, 3, 14)
            .unwrap()
            .and_hms_opt(17, 24, 55)
            .unwrap();
        RideRecord {
            trip_id: trip_id.to_string(),
            vendor_id,
            pickup_datetime: pickup,
            dropoff_datetime: pickup,
            pickup_month: "March".to_string(),
            pickup_day_of_week: weekday.to_string(),
            pickup_time: "17:24:55".to_string(),
            pickup_latitude: 40.76,
            pickup_longitude: -73.98,
            dropoff_latitude: 40.75,
            dropoff_longitude: -73.96,
            passenger_count: 1,
            trip_distance_km: 1.5,
            trip_distance_category: Some(record::normalize_category(category)),
            trip_duration: 455.0,
            trip_speed_kmh: 11.9,
            store_and_fwd_flag: None,
        }
    }

    fn sample_records() -> Vec<RideRecord> {
        vec![
            record("a", 1, "Monday", "short"),
            record("b", 2, "Monday", " Short "),
            record("c", 2, "Friday", "long"),
        ]
    }

    #[test]
    fn test_empty_criteria_are_identity() {
        let records = sample_records();
        let criteria = FilterCriteria::new();

        assert_eq!(criteria.apply(&records), records);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let records = sample_records();
        let mut criteria = FilterCriteria::new();
        criteria
            .set_criterion(FilterDimension::Weekday, "Monday")
            .unwrap();

        let once = criteria.apply(&records);
        let twice = criteria.apply(&once);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let records = sample_records();
        let mut criteria = FilterCriteria::new();
        criteria.set_criterion(FilterDimension::Vendor, "2").unwrap();
        criteria
            .set_criterion(FilterDimension::Weekday, "Monday")
            .unwrap();

        let filtered = criteria.apply(&records);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].trip_id, "b");
    }

    #[test]
    fn test_category_matching_ignores_case_and_whitespace() {
        let records = sample_records();
        let mut criteria = FilterCriteria::new();
        criteria
            .set_criterion(FilterDimension::DistanceCategory, "short")
            .unwrap();

        // "b" carries " Short " in the payload; it still matches.
        let filtered = criteria.apply(&records);
        let ids: Vec<_> = filtered.iter().map(|r| r.trip_id.as_str()).collect();

        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_invalid_vendor_is_rejected_atomically() {
        let mut criteria = FilterCriteria::new();
        criteria.set_criterion(FilterDimension::Vendor, "1").unwrap();

        let err = criteria
            .set_criterion(FilterDimension::Vendor, "acme")
            .unwrap_err();

        assert_eq!(err, InvalidCriterionError::Vendor("acme".to_string()));
        // Prior value survives the rejected update.
        assert!(criteria.matches(&record("x", 1, "Monday", "short")));
    }

    #[test]
    fn test_unknown_weekday_and_category_are_rejected() {
        let mut criteria = FilterCriteria::new();

        assert!(
            criteria
                .set_criterion(FilterDimension::Weekday, "Funday")
                .is_err()
        );
        assert!(
            criteria
                .set_criterion(FilterDimension::DistanceCategory, "extreme")
                .is_err()
        );
        assert_eq!(criteria, FilterCriteria::new());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let records = sample_records();
        let mut criteria = FilterCriteria::new();
        criteria
            .set_criterion(FilterDimension::StartDate, "2016-03-14")
            .unwrap();
        criteria
            .set_criterion(FilterDimension::EndDate, "2016-03-14")
            .unwrap();

        // All pickups are at 17:24:55 on the bound day itself.
        assert_eq!(criteria.apply(&records).len(), 3);

        criteria
            .set_criterion(FilterDimension::EndDate, "2016-03-13")
            .unwrap();
        assert!(criteria.apply(&records).is_empty());
    }

    #[test]
    fn test_bad_date_bound_is_rejected() {
        let mut criteria = FilterCriteria::new();

        assert!(
            criteria
                .set_criterion(FilterDimension::StartDate, "last tuesday")
                .is_err()
        );
    }

    #[test]
    fn test_reset_restores_full_set() {
        let records = sample_records();
        let mut criteria = FilterCriteria::new();
        criteria.set_criterion(FilterDimension::Vendor, "2").unwrap();
        criteria
            .set_criterion(FilterDimension::Weekday, "Friday")
            .unwrap();
        criteria.clear_criterion(FilterDimension::Vendor);
        criteria.reset_all();

        assert_eq!(criteria.apply(&records), records);
    }
}
