use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

use county_dashboard::data::export::write_csv;
use county_dashboard::data::model::{Gender, SessionRecord};
use county_dashboard::data::registry::CountyRegistry;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }
}

const TA_TYPES: [&str; 4] = ["Business plan", "Market access", "Record keeping", "Access to finance"];
const OFFICERS: [&str; 5] = ["Wanjiru", "Otieno", "Chebet", "Mwangi", "Achieng"];
const SESSIONS: usize = 400;

/// Sessions spread over the first half of 2024, covering roughly two
/// thirds of the counties so the coverage alert has something to show.
fn generate(rng: &mut SimpleRng) -> Vec<SessionRecord> {
    let registry = CountyRegistry::kenya();
    let counties: Vec<&str> = registry.names().filter(|_| rng.below(3) != 0).collect();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    (0..SESSIONS)
        .map(|i| {
            let date = start
                .checked_add_days(Days::new(rng.below(182) as u64))
                .unwrap_or(start);
            let gender = match rng.below(10) {
                0..=4 => Gender::Female,
                5..=8 => Gender::Male,
                _ => Gender::Other,
            };
            let mut rec = SessionRecord::new(date, *rng.pick(&counties))
                .with_officer(*rng.pick(&OFFICERS))
                .with_gender(gender)
                .with_ta_type(*rng.pick(&TA_TYPES))
                .with_age(18 + rng.below(40) as u32);
            rec.extra
                .insert("session_id".to_string(), format!("S{:04}", i + 1));
            rec
        })
        .collect()
}

fn write_parquet(path: &str, records: &[SessionRecord]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("epoch")?;
    let dates = Date32Array::from(
        records
            .iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let strings = |f: fn(&SessionRecord) -> String| {
        StringArray::from(records.iter().map(f).collect::<Vec<_>>())
    };
    let ages = Int64Array::from(
        records
            .iter()
            .map(|r| r.age.map(i64::from))
            .collect::<Vec<_>>(),
    );

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("county", DataType::Utf8, false),
        Field::new("officer", DataType::Utf8, false),
        Field::new("gender", DataType::Utf8, false),
        Field::new("ta_type", DataType::Utf8, false),
        Field::new("age", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates),
            Arc::new(strings(|r| r.county.clone())),
            Arc::new(strings(|r| r.officer.clone())),
            Arc::new(strings(|r| r.gender.to_string())),
            Arc::new(strings(|r| r.ta_type.clone())),
            Arc::new(ages),
        ],
    )
    .context("building record batch")?;

    arrow::util::pretty::print_batches(&[batch.slice(0, batch.num_rows().min(5))])
        .context("printing preview")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let records = generate(&mut rng);

    let csv_path = "sample_sessions.csv";
    let mut buf = Vec::new();
    write_csv(&mut buf, &records).context("encoding CSV")?;
    // Two malformed rows so the skipped-row warning can be seen.
    buf.extend_from_slice(b"not-a-date,Nairobi,Wanjiru,female,Business plan,25,S9998\n");
    buf.extend_from_slice(b"2024-03-01,,Otieno,male,Market access,30,S9999\n");
    std::fs::write(csv_path, buf).with_context(|| format!("writing {csv_path}"))?;

    let parquet_path = "sample_sessions.parquet";
    write_parquet(parquet_path, &records)?;

    println!(
        "Wrote {} sessions to {csv_path} (plus 2 malformed rows) and {parquet_path}",
        records.len()
    );
    Ok(())
}
