//! JSON parser for trip payloads.

use serde_json::Value;
use tracing::warn;

use crate::errors::DataSourceError;
use crate::record::RideRecord;

/// Result of decoding one payload: the working set plus how many records
/// were excluded as malformed.
#[derive(Debug)]
pub struct ParsedTrips {
    pub records: Vec<RideRecord>,
    pub skipped: usize,
}

/// Decodes a JSON array of trip records from raw bytes.
///
/// A payload that is not a JSON array fails as a whole with
/// [`DataSourceError`]; a single malformed element is logged and excluded
/// while the rest of the load continues.
pub fn parse_trips(bytes: &[u8]) -> Result<ParsedTrips, DataSourceError> {
    let values: Vec<Value> = serde_json::from_slice(bytes)?;

    let mut records = Vec::with_capacity(values.len());
    let mut skipped = 0;

    for value in &values {
        match RideRecord::from_value(value) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!(error = %e, "Excluding malformed trip record");
                skipped += 1;
            }
        }
    }

    Ok(ParsedTrips { records, skipped })
}
