use std::io::Write;
use std::path::Path;

use super::model::SessionRecord;
use crate::error::ExportError;

/// Schema columns, in the order they are written.
pub const BASE_COLUMNS: [&str; 5] = ["date", "county", "officer", "gender", "ta_type"];

/// Write `records` as CSV with the loader's column schema.
///
/// `age` is written only when at least one record carries an age. Extra
/// columns follow in first-seen order; records missing one get a blank cell.
pub fn write_csv<W: Write>(writer: W, records: &[SessionRecord]) -> Result<(), ExportError> {
    let with_age = records.iter().any(|r| r.age.is_some());
    let mut extra_columns: Vec<&str> = Vec::new();
    for r in records {
        for key in r.extra.keys() {
            if !extra_columns.contains(&key.as_str()) {
                extra_columns.push(key);
            }
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = BASE_COLUMNS.to_vec();
    if with_age {
        header.push("age");
    }
    header.extend(extra_columns.iter().copied());
    wtr.write_record(&header)?;

    for r in records {
        let mut row: Vec<String> = vec![
            r.date.format("%Y-%m-%d").to_string(),
            r.county.clone(),
            r.officer.clone(),
            r.gender.to_string(),
            r.ta_type.clone(),
        ];
        if with_age {
            row.push(r.age.map(|a| a.to_string()).unwrap_or_default());
        }
        for col in &extra_columns {
            row.push(r.extra.get(*col).cloned().unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write `records` to a CSV file at `path`, replacing any existing file.
pub fn export_csv(path: &Path, records: &[SessionRecord]) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_csv(std::io::BufWriter::new(file), records)?;
    log::info!("Exported {} rows to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Gender;
    use chrono::NaiveDate;

    #[test]
    fn writes_header_and_rows() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let mut a = SessionRecord::new(d, "Nairobi")
            .with_officer("Wanjiru")
            .with_gender(Gender::Female)
            .with_ta_type("business plan");
        a.extra.insert("Phone".to_string(), "0700".to_string());
        let b = SessionRecord::new(d, "Kisumu").with_age(30);

        let mut buf = Vec::new();
        write_csv(&mut buf, &[a, b]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,county,officer,gender,ta_type,age,Phone");
        assert_eq!(lines[1], "2024-01-10,Nairobi,Wanjiru,female,business plan,,0700");
        assert_eq!(lines[2], "2024-01-10,Kisumu,,other,,30,");
    }

    #[test]
    fn extra_columns_follow_input_order() {
        let input = "date,county,Zone,Phone\n2024-01-10,Nairobi,East,0700\n2024-01-11,Kisumu,West,0711\n";
        let report = crate::data::loader::load_csv_reader(input.as_bytes()).unwrap();

        let mut buf = Vec::new();
        write_csv(&mut buf, &report.records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,county,officer,gender,ta_type,Zone,Phone");
        assert_eq!(lines[2], "2024-01-11,Kisumu,,other,,West,0711");
    }

    #[test]
    fn empty_input_still_writes_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "date,county,officer,gender,ta_type\n");
    }
}
