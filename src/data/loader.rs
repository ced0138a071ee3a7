use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Days, NaiveDate};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Gender, LoadReport, RowWarning, SessionRecord};
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a session log from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt`            – header row + comma-separated cells
/// * `.xlsx` / `.xls` / `.ods`  – first sheet, first non-empty row is the header
/// * `.json`                    – `[{ "date": "...", "county": "...", ... }, ...]`
/// * `.parquet`                 – any flat schema, cells rendered as text
pub fn load_file(path: &Path) -> Result<LoadReport, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" | "txt" => read_csv(File::open(path)?)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_excel(path)?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    records_from_table(table)
}

/// Load CSV from any reader, e.g. an in-memory upload buffer.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<LoadReport, LoadError> {
    records_from_table(read_csv(reader)?)
}

// ---------------------------------------------------------------------------
// Raw table: every format is lowered to header + text cells first
// ---------------------------------------------------------------------------

/// Untyped view of a source: one header row and rows of cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// The schema columns the loader knows how to interpret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    County,
    Officer,
    Gender,
    TaType,
    Age,
}

impl Column {
    const REQUIRED: [(Column, &'static str); 2] = [(Column::Date, "date"), (Column::County, "county")];
}

/// Map a header to a schema column.
///
/// Matching is case-insensitive, `_`/`-` count as spaces, and the long
/// labels used on the programme's collection forms are accepted.
fn resolve_column(header: &str) -> Option<Column> {
    let key = header
        .replace(|c: char| c == '_' || c == '-', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    match key.as_str() {
        "date" | "session date" | "date of session" | "date of the session" => Some(Column::Date),
        "county" | "county name" => Some(Column::County),
        "officer" | "field officer" | "officer name" | "name of field officer" => {
            Some(Column::Officer)
        }
        "gender" | "sex" | "gender of the participant" => Some(Column::Gender),
        "ta type" | "type of ta" | "technical assistance" | "type of technical assistance" => {
            Some(Column::TaType)
        }
        "age" | "age of the participant" => Some(Column::Age),
        _ => None,
    }
}

/// Validate the header row and convert rows into [`SessionRecord`]s.
///
/// Missing `date` or `county` columns fail the whole load. Rows with an
/// unparsable date or a blank county are dropped with a warning. Completely
/// blank rows are skipped and not counted.
pub fn records_from_table(table: RawTable) -> Result<LoadReport, LoadError> {
    if table.headers.iter().all(|h| h.trim().is_empty()) {
        return Err(LoadError::Empty);
    }

    // First header that resolves to a column wins; the rest are extras.
    let mut columns: BTreeMap<usize, Column> = BTreeMap::new();
    let mut extras: Vec<(usize, String)> = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
        let header = header.trim();
        match resolve_column(header) {
            Some(col) if !columns.values().any(|c| *c == col) => {
                columns.insert(idx, col);
            }
            _ if !header.is_empty() => extras.push((idx, header.to_string())),
            _ => {}
        }
    }

    let index_of = |wanted: Column| {
        columns
            .iter()
            .find(|(_, c)| **c == wanted)
            .map(|(idx, _)| *idx)
    };
    for (col, name) in Column::REQUIRED {
        if index_of(col).is_none() {
            return Err(LoadError::MissingColumn(name.to_string()));
        }
    }
    let date_idx = index_of(Column::Date);
    let county_idx = index_of(Column::County);
    let officer_idx = index_of(Column::Officer);
    let gender_idx = index_of(Column::Gender);
    let ta_idx = index_of(Column::TaType);
    let age_idx = index_of(Column::Age);

    let mut report = LoadReport::default();

    for (row_idx0, row) in table.rows.iter().enumerate() {
        // 1-based, header is row 1.
        let user_row = row_idx0 + 2;
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        report.total_rows += 1;

        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).map(|s| s.trim()).unwrap_or("");

        let raw_date = cell(date_idx);
        let Some(date) = parse_date(raw_date) else {
            let reason = format!("invalid date '{raw_date}'");
            log::warn!("Skipping row {user_row}: {reason}");
            report.warnings.push(RowWarning { row: user_row, reason });
            continue;
        };

        let county = cell(county_idx);
        if county.is_empty() {
            let reason = "missing county".to_string();
            log::warn!("Skipping row {user_row}: {reason}");
            report.warnings.push(RowWarning { row: user_row, reason });
            continue;
        }

        let mut record = SessionRecord::new(date, county)
            .with_officer(cell(officer_idx))
            .with_gender(Gender::parse(cell(gender_idx)))
            .with_ta_type(cell(ta_idx));
        record.age = parse_age(cell(age_idx));
        for (idx, header) in &extras {
            let value = row.get(*idx).map(|s| s.trim()).unwrap_or("");
            record
                .extra
                .entry(header.clone())
                .or_insert_with(|| value.to_string());
        }

        report.records.push(record);
    }

    Ok(report)
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

/// Date layouts accepted in text cells, tried in order. Day-first wins for
/// ambiguous slash dates.
const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d %b %Y",
    "%B %d, %Y",
];

/// Parse a calendar date from a cell. Date-time values keep their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Some(d) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }

    let (head, tail) = s.rsplit_once(|c: char| c == 'T' || c.is_whitespace())?;
    if !tail.contains(':') {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(head, fmt).ok())
}

/// Ages arrive as integers, floats (`"27.0"` from spreadsheets) or junk.
fn parse_age(raw: &str) -> Option<u32> {
    if let Ok(age) = raw.parse::<u32>() {
        return Some(age);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => {
            Some(f as u32)
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    // Byte records so a stray cp1252 byte is replaced instead of failing the load.
    let lossy = |cell: &[u8]| String::from_utf8_lossy(cell).into_owned();
    let headers: Vec<String> = rdr.byte_headers()?.iter().map(lossy).collect();
    let mut rows = Vec::new();
    for result in rdr.byte_records() {
        let record = result?;
        rows.push(record.iter().map(lossy).collect());
    }

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Excel reader
// ---------------------------------------------------------------------------

/// Days between the Excel epoch (1899-12-30) and a serial date.
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(serial.floor() as u64))
}

fn excel_cell_to_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_date(dt.as_f64())
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => String::new(),
    }
}

/// Read the first sheet; the first non-empty row is the header.
fn read_excel(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let Some(sheet) = workbook.sheet_names().first().cloned() else {
        return Err(LoadError::Empty);
    };
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));
    let Some(header_row) = rows.next() else {
        return Err(LoadError::Empty);
    };

    let headers = header_row.iter().map(excel_cell_to_text).collect();
    let rows = rows
        .map(|row| row.iter().map(excel_cell_to_text).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (the default `df.to_json(orient='records')`).
/// Columns are the union of keys in first-seen order.
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;
    let records = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected top-level JSON array".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| match obj.get(h) {
                    None | Some(JsonValue::Null) => String::new(),
                    Some(JsonValue::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                })
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Any flat Parquet schema. Cells are rendered with Arrow's display
/// formatting, so `Date32` columns come through as `YYYY-MM-DD`.
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for col in batch.columns() {
                if col.is_null(row) {
                    cells.push(String::new());
                } else {
                    cells.push(array_value_to_string(col, row)?);
                }
            }
            rows.push(cells);
        }
    }

    Ok(RawTable { headers, rows })
}
