use std::sync::Arc;

use arrow::array::{Date32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::{Format, Workbook};

use county_dashboard::data::loader::{load_csv_reader, load_file};
use county_dashboard::{Gender, LoadError};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn load_csv_fixture_happy_path() {
    let report = load_file("tests/fixtures/sessions.csv".as_ref()).unwrap();

    assert_eq!(report.total_rows, 6);
    assert_eq!(report.len(), 4);
    assert_eq!(report.dropped_rows(), 2);
    assert_eq!(report.warnings[0].row, 4);
    assert_eq!(report.warnings[1].row, 6);

    let first = &report.records[0];
    assert_eq!(first.date, ymd(2024, 1, 10));
    assert_eq!(first.county, "Nairobi");
    assert_eq!(first.officer, "Wanjiru");
    assert_eq!(first.gender, Gender::Female);
    assert_eq!(first.ta_type, "Business plan");
    assert_eq!(first.age, Some(27));
    assert_eq!(first.extra["Phone"], "0700000001");

    // Day-first slash date, trailing space trimmed from the county.
    let third = &report.records[2];
    assert_eq!(third.date, ymd(2024, 3, 5));
    assert_eq!(third.county, "nairobi");
    assert_eq!(third.age, None);
}

#[test]
fn malformed_date_drops_exactly_one_row() {
    let input = "date,county\n2024-01-10,Nairobi\nnot-a-date,Kisumu\n2024-02-01,Mombasa\n";
    let report = load_csv_reader(input.as_bytes()).unwrap();
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.len(), 2);
}

#[test]
fn missing_county_column_is_fatal() {
    let err = load_file("tests/fixtures/missing_county.csv".as_ref()).unwrap_err();
    assert!(matches!(err, LoadError::MissingColumn(ref c) if c == "county"));
    assert_eq!(err.to_string(), "required column 'county' missing");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_file("tests/fixtures/does_not_exist.csv".as_ref()).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn load_json_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    std::fs::write(
        &path,
        r#"[
            {"date": "2024-01-10", "county": "Nairobi", "gender": "female", "age": 24, "ta_type": null},
            {"date": "2024-13-01", "county": "Kisumu"},
            {"county": "Mombasa", "date": "2024-02-01T08:00:00", "officer": "Chebet"}
        ]"#,
    )
    .unwrap();

    let report = load_file(&path).unwrap();
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.len(), 2);
    assert_eq!(report.records[0].age, Some(24));
    assert_eq!(report.records[0].ta_type, "");
    assert_eq!(report.records[1].date, ymd(2024, 2, 1));
    assert_eq!(report.records[1].officer, "Chebet");
}

#[test]
fn json_must_be_an_array() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.json");
    std::fs::write(&path, r#"{"date": "2024-01-10"}"#).unwrap();
    assert!(matches!(load_file(&path), Err(LoadError::Malformed(_))));
}

#[test]
fn load_parquet_with_date32_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.parquet");

    let epoch = ymd(1970, 1, 1);
    let days = |d: NaiveDate| (d - epoch).num_days() as i32;
    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Date32, true),
        Field::new("County", DataType::Utf8, true),
        Field::new("TA_Type", DataType::Utf8, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Date32Array::from(vec![
                Some(days(ymd(2024, 1, 10))),
                None,
                Some(days(ymd(2024, 2, 1))),
            ])),
            Arc::new(StringArray::from(vec![Some("Nairobi"), Some("Kisumu"), Some("Kisumu")])),
            Arc::new(StringArray::from(vec![Some("business plan"), None, Some("market access")])),
        ],
    )
    .unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let report = load_file(&path).unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(report.dropped_rows(), 1);
    assert_eq!(report.records[0].date, ymd(2024, 1, 10));
    assert_eq!(report.records[1].county, "Kisumu");
    assert_eq!(report.records[1].ta_type, "market access");
}

#[test]
fn load_xlsx_with_form_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.xlsx");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    // Row 0 left blank: the header is the first non-empty row.
    ws.write_string(1, 0, "Date of session").unwrap();
    ws.write_string(1, 1, "County").unwrap();
    ws.write_string(1, 2, "Gender of the Participant").unwrap();
    ws.write_string(1, 3, "Age of the Participant").unwrap();
    ws.write_string(1, 4, "Type of TA").unwrap();

    ws.write_number_with_format(2, 0, 45301.0, &date_format).unwrap();
    ws.write_string(2, 1, "Nairobi").unwrap();
    ws.write_string(2, 2, "Female").unwrap();
    ws.write_number(2, 3, 27.0).unwrap();
    ws.write_string(2, 4, "Business plan").unwrap();

    ws.write_string(3, 0, "05/03/2024").unwrap();
    ws.write_string(3, 1, "Kisumu").unwrap();
    ws.write_string(3, 2, "male").unwrap();
    ws.write_string(3, 3, "31.0").unwrap();

    ws.write_string(4, 0, "pending").unwrap();
    ws.write_string(4, 1, "Mombasa").unwrap();

    wb.save(&path).unwrap();

    let report = load_file(&path).unwrap();
    assert_eq!(report.total_rows, 3);
    assert_eq!(report.len(), 2);
    assert_eq!(report.dropped_rows(), 1);
    assert!(report.warnings[0].reason.contains("pending"));

    let first = &report.records[0];
    assert_eq!(first.date, ymd(2024, 1, 10));
    assert_eq!(first.county, "Nairobi");
    assert_eq!(first.gender, Gender::Female);
    assert_eq!(first.age, Some(27));
    assert_eq!(first.ta_type, "Business plan");

    let second = &report.records[1];
    assert_eq!(second.date, ymd(2024, 3, 5));
    assert_eq!(second.gender, Gender::Male);
    assert_eq!(second.age, Some(31));
    assert_eq!(second.ta_type, "");
}
