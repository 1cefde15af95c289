//! Integration test: cleaning, encoding and splitting booking frames

use hotel_cancel::error::CancelError;
use hotel_cancel::pipeline::load_csv;
use hotel_cancel::preprocessing::schema::column_f64;
use hotel_cancel::preprocessing::{
    reindex, train_test_split, validate_bookings, CleaningConfig, DataPreparer, OneHotEncoder, SplitConfig,
};
use polars::prelude::*;

fn bookings() -> DataFrame {
    df!(
        "Booking_ID" => &["INN00001", "INN00002", "INN00003", "INN00004", "INN00005", "INN00006", "INN00007", "INN00008"],
        "no_of_adults" => &[2i64, 2, 1, 2, 3, 2, 1, 2],
        "no_of_children" => &[0i64, 1, 0, 9, 2, 0, 10, 3],
        "no_of_weekend_nights" => &[1i64, 2, 0, 1, 0, 2, 1, 0],
        "no_of_week_nights" => &[2i64, 3, 1, 4, 2, 1, 3, 2],
        "type_of_meal_plan" => &["Meal Plan 1", "Not Selected", "Meal Plan 1", "Meal Plan 2", "Meal Plan 1", "Not Selected", "Meal Plan 1", "Meal Plan 2"],
        "required_car_parking_space" => &[0i64, 0, 1, 0, 0, 1, 0, 0],
        "room_type_reserved" => &["Room_Type 1", "Room_Type 4", "Room_Type 1", "Room_Type 1", "Room_Type 4", "Room_Type 1", "Room_Type 2", "Room_Type 1"],
        "lead_time" => &[224i64, 5, 1, 211, 48, 346, 34, 83],
        "arrival_year" => &[2017i64, 2018, 2018, 2018, 2018, 2018, 2017, 2018],
        "arrival_month" => &[10i64, 11, 2, 5, 4, 9, 10, 12],
        "arrival_date" => &[2i64, 6, 28, 20, 11, 13, 15, 26],
        "market_segment_type" => &["Offline", "Online", "Online", "Online", "Online", "Online", "Offline", "Corporate"],
        "repeated_guest" => &[0i64, 0, 0, 0, 0, 0, 0, 1],
        "no_of_previous_cancellations" => &[0i64, 0, 0, 0, 0, 0, 0, 1],
        "no_of_previous_bookings_not_canceled" => &[0i64, 0, 0, 0, 0, 0, 0, 5],
        "avg_price_per_room" => &[100.0, 80.0, 120.0, 90.0, 110.0, 95.0, 300.0, 540.0],
        "no_of_special_requests" => &[0i64, 1, 0, 0, 0, 1, 2, 0],
        "booking_status" => &["Not_Canceled", "Not_Canceled", "Canceled", "Canceled", "Canceled", "Canceled", "Not_Canceled", "Not_Canceled"]
    )
    .unwrap()
}

// Q1 = 93.75, Q3 = 165, upper whisker = 165 + 1.5 * 71.25
const UPPER: f64 = 271.875;

#[test]
fn test_schema_validation() {
    let df = bookings();
    assert!(validate_bookings(&df).is_ok());

    let missing = df.drop("lead_time").unwrap();
    match validate_bookings(&missing) {
        Err(CancelError::FeatureNotFound(name)) => assert_eq!(name, "lead_time"),
        other => panic!("expected a missing column error, got {:?}", other),
    }
}

#[test]
fn test_clean_with_sentinel() {
    let (cleaned, summary) = DataPreparer::new(CleaningConfig::default()).prepare(&bookings()).unwrap();

    assert!(cleaned.column("Booking_ID").is_err());
    assert_eq!(summary.dropped_columns, vec!["Booking_ID"]);

    let children = column_f64(&cleaned, "no_of_children").unwrap();
    assert_eq!(children, vec![0.0, 1.0, 0.0, 3.0, 2.0, 0.0, 3.0, 3.0]);
    assert_eq!(summary.remapped_values, 2);

    let bounds = summary.price_bounds.unwrap();
    assert!((bounds.upper - UPPER).abs() < 1e-9);
    let price = column_f64(&cleaned, "avg_price_per_room").unwrap();
    // Only the sentinel-high value moves
    assert_eq!(price[6], 300.0);
    assert!((price[7] - UPPER).abs() < 1e-9);
    assert_eq!(summary.capped_values, 1);

    let status = column_f64(&cleaned, "booking_status").unwrap();
    assert_eq!(status, vec![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0]);
    assert_eq!(summary.positive_rate, 0.5);
}

#[test]
fn test_clean_strict_whisker() {
    let config = CleaningConfig::default().with_price_sentinel(None);
    let (cleaned, summary) = DataPreparer::new(config).prepare(&bookings()).unwrap();

    let price = column_f64(&cleaned, "avg_price_per_room").unwrap();
    assert!(price.iter().all(|&p| p <= UPPER + 1e-9));
    assert_eq!(summary.capped_values, 2);
}

#[test]
fn test_clean_rejects_unknown_label() {
    let mut df = bookings();
    let labels: Column = Series::new(
        "booking_status".into(),
        &["Canceled", "Maybe", "Canceled", "Canceled", "Canceled", "Canceled", "Canceled", "Canceled"],
    )
    .into();
    df.with_column(labels).unwrap();
    assert!(matches!(
        DataPreparer::new(CleaningConfig::default()).prepare(&df),
        Err(CancelError::DataError(_))
    ));
}

#[test]
fn test_encoding_layout_and_determinism() {
    let (cleaned, _) = DataPreparer::new(CleaningConfig::default()).prepare(&bookings()).unwrap();

    let mut encoder = OneHotEncoder::new();
    let (x, y) = encoder.fit_transform(&cleaned, "booking_status").unwrap();
    assert_eq!(y.len(), 8);

    // 14 numeric columns, then indicators without each reference level
    assert_eq!(x.columns[0], "no_of_adults");
    assert_eq!(
        &x.columns[14..],
        &[
            "type_of_meal_plan_Meal Plan 2",
            "type_of_meal_plan_Not Selected",
            "room_type_reserved_Room_Type 2",
            "room_type_reserved_Room_Type 4",
            "market_segment_type_Offline",
            "market_segment_type_Online",
        ]
    );
    assert!(!x.columns.iter().any(|c| c == "booking_status"));

    let again = encoder.transform(&cleaned).unwrap();
    assert_eq!(x, again);
}

#[test]
fn test_transform_unseen_level_and_reindex() {
    let (cleaned, _) = DataPreparer::new(CleaningConfig::default()).prepare(&bookings()).unwrap();
    let mut encoder = OneHotEncoder::new();
    encoder.fit(&cleaned, "booking_status").unwrap();

    let mut unseen = cleaned.head(Some(1));
    let segment: Column = Series::new("market_segment_type".into(), &["Aviation"]).into();
    unseen.with_column(segment).unwrap();

    let x = encoder.transform(&unseen).unwrap();
    let online = x.column_index("market_segment_type_Online").unwrap();
    let offline = x.column_index("market_segment_type_Offline").unwrap();
    assert_eq!(x.data[[0, online]], 0.0);
    assert_eq!(x.data[[0, offline]], 0.0);

    let narrowed = x.select(&["lead_time".to_string()]).unwrap();
    let widened = reindex(&narrowed, &x.columns);
    assert_eq!(widened.columns, x.columns);
    assert_eq!(widened.data[[0, x.column_index("lead_time").unwrap()]], 224.0);
    assert_eq!(widened.data[[0, online]], 0.0);
}

#[test]
fn test_split_is_seeded_disjoint_and_covering() {
    let (cleaned, _) = DataPreparer::new(CleaningConfig::default()).prepare(&bookings()).unwrap();
    let (x, y) = OneHotEncoder::new().fit_transform(&cleaned, "booking_status").unwrap();

    let config = SplitConfig::default();
    let first = train_test_split(&x, &y, &config).unwrap();
    let second = train_test_split(&x, &y, &config).unwrap();
    assert_eq!(first.partition, second.partition);

    // ceil(8 * 0.3) rows held out
    assert_eq!(first.partition.test.len(), 3);
    assert_eq!(first.partition.train.len(), 5);
    let mut all: Vec<usize> = first.partition.train.iter().chain(&first.partition.test).copied().collect();
    all.sort_unstable();
    assert_eq!(all, (0..8).collect::<Vec<_>>());
    assert_eq!(first.x_train.columns, first.x_test.columns);
}

#[test]
fn test_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookings.csv");
    let mut df = bookings();
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();

    let loaded = load_csv(&path).unwrap();
    assert_eq!(loaded.shape(), (8, 19));
    assert!(validate_bookings(&loaded).is_ok());

    let (cleaned, _) = DataPreparer::new(CleaningConfig::default()).prepare(&loaded).unwrap();
    assert_eq!(column_f64(&cleaned, "no_of_children").unwrap()[3], 3.0);

    assert!(matches!(load_csv(dir.path().join("missing.csv")), Err(CancelError::IoError(_))));
}
