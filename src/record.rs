//! Trip record model: validation, normalization, and derived fields.
//!
//! A record enters the working set only if its identifier, timestamps, and
//! coordinates are present and sane. Fields the upstream pipeline usually
//! precomputes (weekday and month names, time of day, distance, speed) are
//! taken from the payload when present and derived from the timestamps and
//! coordinates otherwise.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;

use crate::errors::MalformedRecordError;

/// Canonical weekday labels, in the fixed order every aggregate uses.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Canonical month labels, January through December.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Recognized distance categories, in display order.
pub const DISTANCE_CATEGORIES: [&str; 3] = ["short", "medium", "long"];

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const EARTH_RADIUS_KM: f64 = 6371.0;

/// One completed trip. Immutable once loaded.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RideRecord {
    pub trip_id: String,
    pub vendor_id: i64,
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    pub pickup_month: String,
    pub pickup_day_of_week: String,
    pub pickup_time: String,
    pub pickup_latitude: f64,
    pub pickup_longitude: f64,
    pub dropoff_latitude: f64,
    pub dropoff_longitude: f64,
    pub passenger_count: u32,
    pub trip_distance_km: f64,
    /// Normalized (trimmed, lowercased) category, `None` when absent.
    /// Unrecognized values are kept; the category aggregate ignores them.
    pub trip_distance_category: Option<String>,
    /// Trip duration in seconds.
    pub trip_duration: f64,
    pub trip_speed_kmh: f64,
    pub store_and_fwd_flag: Option<String>,
}

impl RideRecord {
    /// Validates one raw payload element into a [`RideRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`MalformedRecordError`] when the identifier, a timestamp, or
    /// a coordinate is missing or unusable, or when a numeric field is
    /// negative. The caller is expected to exclude the record and continue.
    pub fn from_value(value: &Value) -> Result<Self, MalformedRecordError> {
        let trip_id = match &value["trip_id"] {
            Value::String(s) if !s.trim().is_empty() => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => return Err(MalformedRecordError::MissingId),
        };

        let pickup_datetime = datetime_field(value, &trip_id, "pickup_datetime")?;
        let dropoff_datetime = datetime_field(value, &trip_id, "dropoff_datetime")?;

        let pickup_latitude = coordinate_field(value, &trip_id, "pickup_latitude", 90.0)?;
        let pickup_longitude = coordinate_field(value, &trip_id, "pickup_longitude", 180.0)?;
        let dropoff_latitude = coordinate_field(value, &trip_id, "dropoff_latitude", 90.0)?;
        let dropoff_longitude = coordinate_field(value, &trip_id, "dropoff_longitude", 180.0)?;

        let vendor_id = integer_field(value, &trip_id, "vendor_id")?;
        let passenger_count = non_negative_integer_field(value, &trip_id, "passenger_count")? as u32;

        let trip_duration = non_negative_field(value, &trip_id, "trip_duration")?;

        let trip_distance_km = match optional_number(value, "trip_distance_km") {
            Some(d) if d >= 0.0 => d,
            Some(_) => {
                return Err(field_error(&trip_id, "negative trip_distance_km"));
            }
            None => haversine_km(
                pickup_latitude,
                pickup_longitude,
                dropoff_latitude,
                dropoff_longitude,
            ),
        };

        let trip_speed_kmh = match optional_number(value, "trip_speed_kmh") {
            Some(s) if s >= 0.0 => s,
            Some(_) => return Err(field_error(&trip_id, "negative trip_speed_kmh")),
            None if trip_duration > 0.0 => trip_distance_km / (trip_duration / 3600.0),
            None => 0.0,
        };

        let pickup_month = optional_string(value, "pickup_month")
            .unwrap_or_else(|| pickup_datetime.format("%B").to_string());
        let pickup_day_of_week = optional_string(value, "pickup_day_of_week")
            .unwrap_or_else(|| pickup_datetime.format("%A").to_string());
        let pickup_time = optional_string(value, "pickup_time")
            .unwrap_or_else(|| pickup_datetime.format("%H:%M:%S").to_string());

        Ok(RideRecord {
            trip_id,
            vendor_id,
            pickup_datetime,
            dropoff_datetime,
            pickup_month,
            pickup_day_of_week,
            pickup_time,
            pickup_latitude,
            pickup_longitude,
            dropoff_latitude,
            dropoff_longitude,
            passenger_count,
            trip_distance_km,
            trip_distance_category: optional_string(value, "trip_distance_category")
                .map(|raw| normalize_category(&raw)),
            trip_duration,
            trip_speed_kmh,
            store_and_fwd_flag: optional_string(value, "store_and_fwd_flag"),
        })
    }

    /// Pickup hour of day, 0 through 23.
    pub fn pickup_hour(&self) -> u32 {
        self.pickup_datetime.hour()
    }
}

/// Canonical form of a distance category for comparison: trimmed, lowercased.
pub fn normalize_category(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Great-circle distance in kilometers between two (lat, lon) points.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (rlat1, rlat2) = (lat1.to_radians(), lat2.to_radians());
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + rlat1.cos() * rlat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

fn field_error(trip_id: &str, reason: impl Into<String>) -> MalformedRecordError {
    MalformedRecordError::Field {
        trip_id: trip_id.to_string(),
        reason: reason.into(),
    }
}

/// Numeric payload fields may arrive as JSON numbers or numeric strings.
fn optional_number(value: &Value, name: &str) -> Option<f64> {
    match &value[name] {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn optional_string(value: &Value, name: &str) -> Option<String> {
    value[name]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn number_field(value: &Value, trip_id: &str, name: &str) -> Result<f64, MalformedRecordError> {
    optional_number(value, name)
        .ok_or_else(|| field_error(trip_id, format!("missing or non-numeric {name}")))
}

fn non_negative_field(
    value: &Value,
    trip_id: &str,
    name: &str,
) -> Result<f64, MalformedRecordError> {
    let n = number_field(value, trip_id, name)?;
    if n < 0.0 {
        return Err(field_error(trip_id, format!("negative {name}")));
    }
    Ok(n)
}

fn integer_field(value: &Value, trip_id: &str, name: &str) -> Result<i64, MalformedRecordError> {
    let n = number_field(value, trip_id, name)?;
    if n.fract() != 0.0 {
        return Err(field_error(trip_id, format!("{name} is not an integer")));
    }
    Ok(n as i64)
}

fn non_negative_integer_field(
    value: &Value,
    trip_id: &str,
    name: &str,
) -> Result<i64, MalformedRecordError> {
    let n = integer_field(value, trip_id, name)?;
    if n < 0 {
        return Err(field_error(trip_id, format!("negative {name}")));
    }
    Ok(n)
}

fn coordinate_field(
    value: &Value,
    trip_id: &str,
    name: &str,
    limit: f64,
) -> Result<f64, MalformedRecordError> {
    let c = number_field(value, trip_id, name)?;
    if !c.is_finite() || c < -limit || c > limit {
        return Err(field_error(trip_id, format!("{name} {c} is out of range")));
    }
    Ok(c)
}

fn datetime_field(
    value: &Value,
    trip_id: &str,
    name: &str,
) -> Result<NaiveDateTime, MalformedRecordError> {
    let raw = value[name]
        .as_str()
        .ok_or_else(|| field_error(trip_id, format!("missing {name}")))?
        .trim();

    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| field_error(trip_id, format!("unparseable {name} {raw:?}")))
}
