use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

#[path = "../format.rs"]
mod format;

const HEADERS: [&str; 9] = [
    "Type",
    "Config",
    "Layout Name",
    "BUA (in sqft)",
    "Plot Size (in sqft)",
    "Launched Price (in AED)",
    "BUA PSF (in AED Per sqft)",
    "Plot PSF (in AED Per sqft)",
    "Factors",
];

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

    fn range(&mut self, low: f64, high: f64) -> f64 {
        low + (high - low) * self.next_f64()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

/// `12500.0` → `"12,500"`, the way the viewer prints it.
fn grouped(v: f64) -> String {
    format::format_number(Some(v))
}

/// One family of layouts: (type, code prefix, bedrooms, BUA range, plot range, AED psf).
type Family = (&'static str, &'static str, &'static [u32], (f64, f64), Option<(f64, f64)>, f64);

const FAMILIES: [Family; 4] = [
    ("Beach Villa", "BV", &[5, 6], (6500.0, 9000.0), Some((9000.0, 14000.0)), 2600.0),
    ("Coral Villa", "CV", &[4, 5], (4200.0, 6000.0), Some((6000.0, 9000.0)), 2300.0),
    ("Townhouse", "TH", &[3, 4], (2400.0, 3200.0), None, 1900.0),
    ("Plots", "PL", &[], (0.0, 0.0), Some((12000.0, 30000.0)), 0.0),
];

fn generate_rows(rng: &mut SimpleRng) -> Vec<[String; 9]> {
    let mut rows = Vec::new();

    for &(ty, code, beds, bua_range, plot_range, psf) in &FAMILIES {
        for n in 1..=6 {
            let config = match beds {
                [] => String::new(),
                _ => {
                    let b = beds[n % beds.len()];
                    if rng.chance(0.5) {
                        format!("{b} Bed + Maid")
                    } else {
                        format!("{b} Bed")
                    }
                }
            };

            let bua = (bua_range.1 > 0.0).then(|| rng.range(bua_range.0, bua_range.1));
            let bua_text = bua.map(grouped).unwrap_or_default();

            let plot_text = match plot_range {
                Some((lo, hi)) if rng.chance(0.3) => {
                    let a = rng.range(lo, hi);
                    format!("{}-{}", grouped(a), grouped(a + 2000.0))
                }
                Some((lo, hi)) if rng.chance(0.3) => format!("~{}", grouped(rng.range(lo, hi))),
                Some((lo, hi)) => grouped(rng.range(lo, hi)),
                None => String::new(),
            };

            let price = match bua {
                Some(area) => area * psf * rng.range(0.9, 1.1),
                None => rng.range(8.0e6, 25.0e6),
            };
            let price_text = if rng.chance(0.6) {
                format::format_millions(Some(price / 1.0e6))
            } else {
                grouped(price)
            };

            let bua_psf_text = match bua {
                Some(_) if rng.chance(0.3) => format!("~{} (avg)", grouped(psf)),
                Some(_) => format!("{}-{}", grouped(psf - 150.0), grouped(psf + 150.0)),
                None => String::new(),
            };
            let plot_psf_text = match plot_range {
                Some((lo, hi)) => grouped(price / ((lo + hi) / 2.0)),
                None => String::new(),
            };

            let factors = if rng.chance(0.5) { "Sea view" } else { "Park facing" };

            rows.push([
                ty.to_string(),
                config,
                format!("{code}-{n}"),
                bua_text,
                plot_text,
                price_text,
                bua_psf_text,
                plot_psf_text,
                factors.to_string(),
            ]);
        }
    }

    // A trailing row with no type; it must be dropped on load.
    rows.push(Default::default());
    rows
}

fn write_csv(path: &str, rows: &[[String; 9]]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[[String; 9]]) -> Result<()> {
    let schema = Arc::new(Schema::new(
        HEADERS
            .iter()
            .map(|h| Field::new(*h, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ));

    let arrays: Vec<ArrayRef> = (0..HEADERS.len())
        .map(|col| {
            let values: Vec<&str> = rows.iter().map(|r| r[col].as_str()).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv("sample_layouts.csv", &rows)?;
    write_parquet("sample_layouts.parquet", &rows)?;

    println!(
        "Wrote {} layouts to sample_layouts.csv and sample_layouts.parquet",
        rows.len()
    );
    Ok(())
}
