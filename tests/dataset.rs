//! End-to-end checks against the bundled sample dataset.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use skyline_atlas::data::charts::{self, Category};
use skyline_atlas::data::export::write_parquet;
use skyline_atlas::data::filter::{filter, filter_rows, CitySearch, PredicateSet};
use skyline_atlas::data::geo::{self, GeoPoint, LocationFilter, DEFAULT_REFERENCE};
use skyline_atlas::data::loader::load_file;
use skyline_atlas::data::stats::{extremum, Extreme, Facts};
use skyline_atlas::data::model::FEET_PER_METRE;
use skyline_atlas::data::{CellValue, Column, DataError, StructureTable, Unit};

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/structures.csv")
}

fn sample() -> StructureTable {
    load_file(&sample_path()).expect("bundled dataset loads")
}

#[test]
fn sample_facts() {
    let table = sample();
    assert_eq!(table.len(), 36);

    let facts = Facts::compute(&table, Unit::Metres).unwrap();
    assert_eq!(facts.tallest_height, 828.0);
    assert_eq!(
        facts.tallest,
        vec![("Burj Khalifa".to_string(), "United Arab Emirates".to_string())]
    );
    assert!((facts.mean_height - 489.555_555).abs() < 1e-3);
    assert_eq!(facts.top_country, "China");
    assert_eq!(facts.top_country_count, 12);
    assert_eq!(facts.top_type, "Skyscraper");
    assert_eq!(facts.built_since_2000, 22);
    assert_eq!((facts.first_year, facts.last_year), (1931, 2020));
}

#[test]
fn petronas_towers_tie_in_kuala_lumpur() {
    let table = sample();
    let preds = PredicateSet::new().country("Malaysia").city("Kuala Lumpur");
    let kl = filter_rows(&table, &preds).unwrap();
    assert_eq!(kl.len(), 3);

    let tallest = extremum(&kl, Column::Metres, Extreme::Max).unwrap();
    assert_eq!(tallest.value, 452.0);
    let names: Vec<&str> = tallest
        .structures(&kl)
        .into_iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, ["Petronas Tower 1", "Petronas Tower 2"]);
}

#[test]
fn structures_near_midtown_manhattan() {
    let table = sample();
    let map = geo::proximity(&table, DEFAULT_REFERENCE, Unit::Feet).unwrap();
    let mut names: Vec<&str> = map.points.iter().map(|p| p.name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        ["Central Park Tower", "Empire State Building", "One World Trade Center"]
    );
    assert_eq!(map.view.center, DEFAULT_REFERENCE);

    let ocean = geo::proximity(&table, GeoPoint::new(-40.0, -30.0), Unit::Metres).unwrap();
    assert!(ocean.is_empty());
}

#[test]
fn chicago_location_map_respects_height_cap() {
    let table = sample();
    let filter = LocationFilter::new("United States", "Chicago");
    let range = filter.height_range(&table, Unit::Metres).unwrap().unwrap();
    assert_eq!((range.lo, range.hi), (423, 442));

    let capped = geo::location(&table, &filter.with_height_upper(430.0), Unit::Metres).unwrap();
    assert_eq!(capped.len(), 1);
    assert_eq!(capped.points[0].name, "Trump International Hotel and Tower");
    assert_eq!(capped.points[0].elevation, 423.0 * geo::ELEVATION_SCALE);
}

#[test]
fn histogram_covers_every_structure() {
    let table = sample();
    let histogram = charts::year_histogram(&table);
    assert_eq!(histogram.bins.len(), 6);
    assert_eq!(histogram.outside, 0);
    assert_eq!(histogram.total(), table.len());
    // 2020 lands in the closed last bin.
    assert_eq!(histogram.bins[5].start, 2005);
    assert!(histogram.bins[5].count >= 1);

    let types = charts::category_distribution(&table, Category::Type);
    assert_eq!(types[0], ("Skyscraper".to_string(), 24));
}

#[test]
fn top_three_in_feet() {
    let table = sample();
    let top = charts::top_n(&table, Unit::Feet, 3);
    let names: Vec<&str> = top.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["Burj Khalifa", "Tokyo Skytree", "Shanghai Tower"]);
    assert_eq!(top[0].1, 2717.0);
}

#[test]
fn city_search_in_dubai() {
    let table = sample();
    let mut search = CitySearch::new("United Arab Emirates", "Dubai");
    search.columns = vec![Column::Name, Column::Year];
    search.year_upper = Some(2005);
    let result = search.run(&table).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result.rows[0][0], CellValue::from("Emirates Office Tower"));
}

#[test]
fn unknown_column_is_rejected() {
    let table = sample();
    let err = "Architect".parse::<Column>().unwrap_err();
    assert!(matches!(err, DataError::InvalidParameter(_)));

    let projection = filter(&table, &PredicateSet::new().country("Atlantis"), &[Column::Name]).unwrap();
    assert!(projection.is_empty());
}

#[test]
fn parquet_export_loads_back() {
    let table = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("structures.parquet");
    write_parquet(&table, &path).unwrap();

    let reloaded = load_file(&path).unwrap();
    assert_eq!(reloaded.len(), table.len());
    let names = |t: &StructureTable| t.iter().map(|s| s.name.clone()).collect::<Vec<_>>();
    assert_eq!(names(&reloaded), names(&table));
    assert_eq!(reloaded.get(0).map(|s| s.feet), Some(2717.0));
}

#[test]
fn json_records_load_with_derived_feet() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[{{"Name": "Tower", "Metres": 100, "Year": 1999, "Country": "X", "City": "Y", "Lat": 1.5, "Lon": 2.5}}]"#
    )
    .unwrap();

    let table = load_file(file.path()).unwrap();
    assert_eq!(table.len(), 1);
    let tower = &table.rows()[0];
    assert!((tower.feet - 328.083_989_5).abs() < 1e-6);
    assert_eq!(tower.year, 1999);
}

#[test]
fn missing_file_and_bad_extension_fail_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let missing = load_file(&dir.path().join("nope.csv"));
    assert!(matches!(missing, Err(DataError::Load(_))));

    let txt = dir.path().join("structures.txt");
    std::fs::write(&txt, "Name\n").unwrap();
    assert!(matches!(load_file(&txt), Err(DataError::Load(_))));
}

// ---------------------------------------------------------------------------
// Parquet sources not written by `write_parquet`
// ---------------------------------------------------------------------------

fn write_batch(path: &Path, columns: Vec<(&str, ArrayRef)>) {
    let batch = RecordBatch::try_from_iter(columns).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

fn load_error(path: &Path) -> String {
    match load_file(path) {
        Err(e @ DataError::Load(_)) => e.to_string(),
        other => panic!("expected a load error, got {other:?}"),
    }
}

#[test]
fn parquet_schema_without_rows_is_still_checked() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("names_only.parquet");
    let schema = Arc::new(Schema::new(vec![Field::new("Name", DataType::Utf8, false)]));
    let file = std::fs::File::create(&path).unwrap();
    ArrowWriter::try_new(file, schema, None).unwrap().close().unwrap();

    let message = load_error(&path);
    assert!(message.contains("missing required column"), "{message}");
    assert!(message.contains("Metres"), "{message}");
}

#[test]
fn parquet_accepts_narrow_and_large_arrow_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("narrow.parquet");
    write_batch(
        &path,
        vec![
            ("name", Arc::new(LargeStringArray::from(vec!["Petronas Tower 1"])) as ArrayRef),
            ("METRES", Arc::new(Float32Array::from(vec![452.0_f32])) as ArrayRef),
            ("Year", Arc::new(Int32Array::from(vec![1998])) as ArrayRef),
            ("Country", Arc::new(StringArray::from(vec!["Malaysia"])) as ArrayRef),
            ("City", Arc::new(LargeStringArray::from(vec!["Kuala Lumpur"])) as ArrayRef),
            ("Lat", Arc::new(Float64Array::from(vec![3.1579])) as ArrayRef),
            ("Lon", Arc::new(Int64Array::from(vec![101_i64])) as ArrayRef),
        ],
    );

    let table = load_file(&path).unwrap();
    assert_eq!(table.len(), 1);
    let tower = &table.rows()[0];
    assert_eq!(tower.name, "Petronas Tower 1");
    assert_eq!(tower.metres, 452.0);
    assert!((tower.feet - 452.0 * FEET_PER_METRE).abs() < 1e-9);
    assert_eq!(tower.year, 1998);
    assert_eq!(tower.city, "Kuala Lumpur");
    assert_eq!(tower.lon, 101.0);
}

fn required_columns(lat: Float64Array, metres: ArrayRef) -> Vec<(&'static str, ArrayRef)> {
    vec![
        ("Name", Arc::new(StringArray::from(vec!["A", "B"])) as ArrayRef),
        ("Metres", metres),
        ("Year", Arc::new(Int64Array::from(vec![2000, 2001])) as ArrayRef),
        ("Country", Arc::new(StringArray::from(vec!["X", "X"])) as ArrayRef),
        ("City", Arc::new(StringArray::from(vec!["Y", "Y"])) as ArrayRef),
        ("Lat", Arc::new(lat) as ArrayRef),
        ("Lon", Arc::new(Float64Array::from(vec![2.0, 2.0])) as ArrayRef),
    ]
}

#[test]
fn parquet_null_in_required_column_names_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("null_lat.parquet");
    write_batch(
        &path,
        required_columns(
            Float64Array::from(vec![Some(1.0), None]),
            Arc::new(Float64Array::from(vec![300.0, 310.0])),
        ),
    );

    let message = load_error(&path);
    assert!(message.contains("Row 2: 'Lat' is null"), "{message}");
}

#[test]
fn parquet_text_in_numeric_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("text_metres.parquet");
    write_batch(
        &path,
        required_columns(
            Float64Array::from(vec![1.0, 1.5]),
            Arc::new(StringArray::from(vec!["300", "310"])),
        ),
    );

    let message = load_error(&path);
    assert!(message.contains("Expected a numeric column"), "{message}");
}
