use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const CITIES: [(&str, u64); 8] = [
    ("Cairo", 40),
    ("Giza", 20),
    ("Alexandria", 12),
    ("New Cairo", 10),
    ("6th of October", 8),
    ("Mansoura", 4),
    ("Tanta", 3),
    ("Remote", 3),
];

const COMPANIES: [&str; 10] = [
    "Vodafone Egypt",
    "Orange Business",
    "Valeo",
    "IBM Egypt",
    "Fawry",
    "Instabug",
    "Swvl",
    "Paymob",
    "Talabat",
    "Raya IT",
];

const TITLES: [&str; 10] = [
    "Software Engineer",
    "Senior Software Engineer",
    "Data Analyst",
    "Backend Developer",
    "Frontend Developer",
    "QA Engineer",
    "Accountant",
    "Sales Representative",
    "HR Specialist",
    "DevOps Engineer",
];

const LEVELS: [(&str, i64); 5] = [
    ("Internship", 3_000),
    ("Entry Level", 7_000),
    ("Experienced", 14_000),
    ("Manager", 25_000),
    ("Senior Management", 40_000),
];

/// Minimal deterministic PRNG (splitmix64).
struct SplitMix(u64);

impl SplitMix {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Pick from `(item, weight)` pairs proportionally to weight.
    fn weighted<'a>(&mut self, items: &[(&'a str, u64)]) -> &'a str {
        let total: u64 = items.iter().map(|(_, w)| w).sum();
        let mut roll = self.next_u64() % total;
        for (item, w) in items {
            if roll < *w {
                return *item;
            }
            roll -= w;
        }
        items[items.len() - 1].0
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SplitMix(42);
    let n_rows = 500;

    let mut locations = Vec::with_capacity(n_rows);
    let mut companies = Vec::with_capacity(n_rows);
    let mut titles = Vec::with_capacity(n_rows);
    let mut levels = Vec::with_capacity(n_rows);
    let mut salaries: Vec<Option<i64>> = Vec::with_capacity(n_rows);

    for _ in 0..n_rows {
        locations.push(rng.weighted(&CITIES));
        companies.push(COMPANIES[rng.below(COMPANIES.len())]);
        titles.push(TITLES[rng.below(TITLES.len())]);

        let (level, base) = LEVELS[rng.below(LEVELS.len())];
        levels.push(level);
        // Roughly a third of postings keep the salary confidential.
        salaries.push(if rng.below(3) == 0 {
            None
        } else {
            Some(base + (rng.below(20) as i64) * 250)
        });
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("Location", DataType::Utf8, false),
        Field::new("Company", DataType::Utf8, false),
        Field::new("Job Title", DataType::Utf8, false),
        Field::new("Experience Required", DataType::Utf8, false),
        Field::new("Salary", DataType::Int64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(locations)),
            Arc::new(StringArray::from(companies)),
            Arc::new(StringArray::from(titles)),
            Arc::new(StringArray::from(levels)),
            Arc::new(Int64Array::from(salaries)),
        ],
    )
    .context("building record batch")?;

    let output_path = "sample_jobs.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    log::info!("Wrote {n_rows} postings to {output_path}");
    println!("Wrote {n_rows} postings to {output_path}");
    println!("Run with JOBS_DASHBOARD_DATA={output_path} to open it.");
    Ok(())
}
