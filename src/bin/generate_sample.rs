use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, Int32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const FIRST_YEAR: i32 = 1981;
const LAST_YEAR: i32 = 2020;
/// Education tables start later than the sex tables.
const FIRST_EDUCATION_YEAR: i32 = 1988;
const OUTPUT_DIR: &str = "data";

/// One flat output row: `year` plus sparse count columns.
#[derive(Serialize)]
struct Row {
    year: i32,
    #[serde(flatten)]
    counts: BTreeMap<String, f64>,
}

impl Row {
    fn new(year: i32) -> Self {
        Row {
            year,
            counts: BTreeMap::new(),
        }
    }

    fn set(&mut self, column: &str, value: f64) {
        self.counts.insert(column.to_string(), value.round().max(0.0));
    }
}

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

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Rough shape of registered emigrants: growth to a late-80s plateau, a dip
/// around 2000 and a slow decline after 2010.
fn yearly_total(year: i32, rng: &mut SimpleRng) -> f64 {
    let t = (year - FIRST_YEAR) as f64;
    let base = 48_000.0 + 1_500.0 * t - 35.0 * t * t;
    (base * rng.gauss(1.0, 0.05)).max(1_000.0)
}

fn generate(rng: &mut SimpleRng) -> (Vec<Row>, BTreeMap<i32, Row>) {
    let mut rows = Vec::new();
    let mut yearly = BTreeMap::new();

    for year in FIRST_YEAR..=LAST_YEAR {
        let total = yearly_total(year, rng);
        let female_share = rng.gauss(0.58, 0.02).clamp(0.5, 0.7);

        // Sex table
        let mut sex = Row::new(year);
        sex.set("male", total * (1.0 - female_share));
        sex.set("female", total * female_share);
        rows.push(sex);

        // Education table; column names changed in 2000
        if year >= FIRST_EDUCATION_YEAR {
            let legacy = year < 2000;
            let mut edu = Row::new(year);
            let shares = [
                (if legacy { "elementary" } else { "elementary_graduate" }, 0.10),
                (if legacy { "high_school" } else { "high_school_graduate" }, 0.27),
                (if legacy { "college" } else { "college_graduate" }, 0.44),
                ("vocational", 0.11),
                ("post_graduate", 0.05),
                ("no_education", 0.03),
            ];
            for (column, share) in shares {
                edu.set(column, total * share * rng.gauss(1.0, 0.08));
            }
            rows.push(edu);
        }

        // Civil status table; `never_married`/`separated` before 1995
        let legacy = year < 1995;
        let mut civil = Row::new(year);
        let shares = [
            (if legacy { "never_married" } else { "single" }, 0.46),
            ("married", 0.44),
            ("widowed", 0.04),
            (if legacy { "separated" } else { "divorced" }, 0.03),
            ("other", 0.005),
        ];
        for (column, share) in shares {
            civil.set(column, total * share * rng.gauss(1.0, 0.06));
        }
        rows.push(civil);

        let mut agg = Row::new(year);
        agg.set("total", total);
        agg.set("male", total * (1.0 - female_share));
        agg.set("female", total * female_share);
        yearly.insert(year, agg);
    }

    (rows, yearly)
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let columns: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.counts.keys().map(String::as_str))
        .collect();

    let mut fields = vec![Field::new("year", DataType::Int32, false)];
    let mut arrays: Vec<ArrayRef> = vec![Arc::new(Int32Array::from(
        rows.iter().map(|r| r.year).collect::<Vec<_>>(),
    ))];

    for column in &columns {
        let mut builder = Float64Builder::new();
        for row in rows {
            builder.append_option(row.counts.get(*column).copied());
        }
        fields.push(Field::new(*column, DataType::Float64, true));
        arrays.push(Arc::new(builder.finish()));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = std::fs::File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = SimpleRng::new(42);
    let (rows, yearly) = generate(&mut rng);

    let dir = Path::new(OUTPUT_DIR);
    std::fs::create_dir_all(dir)?;

    let records_json = dir.join("records.json");
    serde_json::to_writer_pretty(std::fs::File::create(&records_json)?, &rows)?;

    let records_parquet = dir.join("records.parquet");
    write_parquet(&rows, &records_parquet)?;

    // Keyed by year as a string, like the remote by-year mapping.
    let yearly_json = dir.join("yearly.json");
    let keyed: BTreeMap<String, &BTreeMap<String, f64>> = yearly
        .iter()
        .map(|(year, row)| (year.to_string(), &row.counts))
        .collect();
    serde_json::to_writer_pretty(std::fs::File::create(&yearly_json)?, &keyed)?;

    println!(
        "Wrote {} records ({FIRST_YEAR}-{LAST_YEAR}) to {} and {}, {} yearly aggregates to {}",
        rows.len(),
        records_json.display(),
        records_parquet.display(),
        yearly.len(),
        yearly_json.display()
    );
    Ok(())
}
