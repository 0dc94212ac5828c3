//! Error taxonomy for the dashboard core.
//!
//! None of these are fatal to the process: a data-source failure leaves any
//! previously loaded records intact, a malformed record is excluded while the
//! load continues, and a bad criterion value is rejected without touching
//! prior filter state.

use thiserror::Error;

/// Failure to retrieve or decode the trip payload.
#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("invalid trips url: {0}")]
    BadUrl(String),
    #[error("failed to construct http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("payload is not a JSON array of trip records: {0}")]
    Payload(#[from] serde_json::Error),
}

/// A single trip record that cannot enter the working set.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedRecordError {
    #[error("record has no trip id")]
    MissingId,
    #[error("trip {trip_id}: {reason}")]
    Field { trip_id: String, reason: String },
}

/// A filter value rejected at set time; prior criteria are unchanged.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidCriterionError {
    #[error("vendor id must be an integer, got {0:?}")]
    Vendor(String),
    #[error("passenger count must be a non-negative integer, got {0:?}")]
    PassengerCount(String),
    #[error("unknown month name {0:?}")]
    Month(String),
    #[error("unknown weekday name {0:?}")]
    Weekday(String),
    #[error("unknown distance category {0:?}")]
    DistanceCategory(String),
    #[error("date bound {0:?} is not YYYY-MM-DD or YYYY-MM-DD HH:MM:SS")]
    DateBound(String),
}
