//! Dashboard state: owns the record set, criteria, and derived views.
//!
//! All mutation is synchronous; the only await point is the payload fetch.
//! The filtered subset and stats are disposable computed values, rebuilt in
//! full on every change, so no view can observe a half-updated state.

use tracing::{info, warn};

use crate::catalog::FilterCatalog;
use crate::errors::{DataSourceError, InvalidCriterionError};
use crate::fetch::{self, HttpClient};
use crate::filter::{FilterCriteria, FilterDimension};
use crate::parser::{self, ParsedTrips};
use crate::projection::{self, ChartSpec, TableRow, TripMarker};
use crate::record::RideRecord;
use crate::stats::TripStats;

/// Chart collaborator. Implementations own the underlying chart instances
/// and must discard any prior instance for `spec.view` before drawing.
pub trait ChartRenderer {
    fn draw(&mut self, spec: &ChartSpec);
}

/// Map collaborator. `clear_markers` is always called before the markers of
/// a new subset are added.
pub trait MapRenderer {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: &TripMarker);
}

/// The in-memory dashboard core.
#[derive(Debug)]
pub struct Dashboard {
    records: Vec<RideRecord>,
    catalog: FilterCatalog,
    criteria: FilterCriteria,
    filtered: Vec<RideRecord>,
    stats: TripStats,
}

impl Dashboard {
    pub fn new() -> Self {
        Dashboard {
            records: Vec::new(),
            catalog: FilterCatalog::default(),
            criteria: FilterCriteria::new(),
            filtered: Vec::new(),
            stats: TripStats::from_records(&[]),
        }
    }

    /// Fetches and installs a fresh record set from `url`.
    ///
    /// On any failure the previously loaded records, catalog, and criteria
    /// are left untouched; retry happens only by calling again.
    pub async fn load_from_url<C: HttpClient>(
        &mut self,
        client: &C,
        url: &str,
    ) -> Result<usize, DataSourceError> {
        let bytes = fetch::fetch_trip_bytes(client, url).await?;
        let parsed = parser::parse_trips(&bytes)?;
        Ok(self.install(parsed))
    }

    /// Installs a record set from an already retrieved payload.
    pub fn load_from_bytes(&mut self, bytes: &[u8]) -> Result<usize, DataSourceError> {
        let parsed = parser::parse_trips(bytes)?;
        Ok(self.install(parsed))
    }

    fn install(&mut self, parsed: ParsedTrips) -> usize {
        if parsed.skipped > 0 {
            warn!(skipped = parsed.skipped, "Excluded malformed trip records");
        }

        self.records = parsed.records;
        self.catalog = FilterCatalog::from_records(&self.records);
        self.recompute();

        info!(total = self.records.len(), "Trip records loaded");
        self.records.len()
    }

    /// Sets one filter criterion and recomputes every derived view.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCriterionError`] for a value that does not validate;
    /// the subset and stats are left as they were.
    pub fn set_filter(
        &mut self,
        dimension: FilterDimension,
        raw: &str,
    ) -> Result<(), InvalidCriterionError> {
        self.criteria.set_criterion(dimension, raw)?;
        self.recompute();
        Ok(())
    }

    pub fn clear_filter(&mut self, dimension: FilterDimension) {
        self.criteria.clear_criterion(dimension);
        self.recompute();
    }

    pub fn reset_filters(&mut self) {
        self.criteria.reset_all();
        self.recompute();
    }

    fn recompute(&mut self) {
        self.filtered = self.criteria.apply(&self.records);
        self.stats = TripStats::from_records(&self.filtered);
    }

    pub fn records(&self) -> &[RideRecord] {
        &self.records
    }

    pub fn filtered(&self) -> &[RideRecord] {
        &self.filtered
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> &TripStats {
        &self.stats
    }

    pub fn chart_specs(&self) -> Vec<ChartSpec> {
        projection::chart_specs(&self.stats)
    }

    pub fn markers(&self) -> Vec<TripMarker> {
        projection::trip_markers(&self.filtered)
    }

    pub fn table(&self) -> Vec<TableRow> {
        projection::table_rows(&self.filtered)
    }

    /// Pushes the current views to the collaborators: one draw per aggregate
    /// view, and all prior markers removed before the new subset's markers
    /// are added.
    pub fn render(&self, charts: &mut dyn ChartRenderer, map: &mut dyn MapRenderer) {
        for spec in self.chart_specs() {
            charts.draw(&spec);
        }

        map.clear_markers();
        for marker in self.markers() {
            map.add_marker(&marker);
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}
