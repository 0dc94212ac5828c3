use ride_dashboard::dashboard::Dashboard;
use ride_dashboard::filter::FilterDimension;
use ride_dashboard::parser::parse_trips;
use ride_dashboard::projection;
use ride_dashboard::stats::TripStats;

const FIXTURE: &[u8] = include_bytes!("fixtures/sample_trips.json");

#[test]
fn test_full_pipeline() {
    let parsed = parse_trips(FIXTURE).expect("failed to parse fixture");

    // The fixture carries one unusable record (bad date, no coordinates).
    assert_eq!(parsed.records.len(), 6);
    assert_eq!(parsed.skipped, 1);

    let stats = TripStats::from_records(&parsed.records);
    assert_eq!(stats.total_trips, 6);
    assert!(stats.avg_speed_kmh > 0.0);

    // Whitespace/case variants normalize into the same category; the
    // unrecognized one is left out of this aggregate only.
    assert_eq!(stats.distance_categories["short"], 3);
    assert_eq!(stats.distance_categories["medium"], 1);
    assert_eq!(stats.distance_categories["long"], 1);
}

#[test]
fn test_dashboard_filtering_and_views() {
    let mut dashboard = Dashboard::new();
    dashboard.load_from_bytes(FIXTURE).expect("failed to load fixture");

    assert_eq!(dashboard.records().len(), 6);

    // Catalog options reflect the full set, first-seen order.
    let options = projection::filter_options(dashboard.catalog());
    assert_eq!(options.vendors.len(), 2);
    assert_eq!(options.vendors[0].label, "Vendor 2");

    dashboard.set_filter(FilterDimension::Vendor, "2").unwrap();
    assert_eq!(dashboard.filtered().len(), 4);

    dashboard
        .set_filter(FilterDimension::DistanceCategory, "Short")
        .unwrap();
    assert_eq!(dashboard.filtered().len(), 2);

    // Markers come in pickup/dropoff pairs for the filtered subset.
    assert_eq!(dashboard.markers().len(), 4);

    dashboard.reset_filters();
    assert_eq!(dashboard.filtered().len(), 6);
}

#[test]
fn test_export_rows_sorted_by_duration() {
    let mut dashboard = Dashboard::new();
    dashboard.load_from_bytes(FIXTURE).expect("failed to load fixture");

    let rows = projection::table_rows_by_duration(dashboard.filtered());

    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].trip_id, "id0801584");
    assert_eq!(rows[5].trip_id, "id2181028");
    let durations: Vec<f64> = rows.iter().map(|r| r.trip_duration_min).collect();
    assert!(durations.windows(2).all(|w| w[0] <= w[1]));
}
