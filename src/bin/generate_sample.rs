use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Write a small housing-style CSV for trying out the explorer: numeric
/// features with gaps, a categorical column and a constant column.
#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
struct Args {
    /// Where to write the CSV
    #[arg(default_value = "sample_data.csv")]
    output: PathBuf,

    /// Number of rows
    #[arg(long, default_value_t = 200)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Probability that a feature cell is left empty
    #[arg(long, default_value_t = 0.05)]
    missing: f64,
}

/// Roughly normal noise: sum of uniforms (Irwin–Hall), centred.
fn noise(rng: &mut impl Rng, scale: f64) -> f64 {
    let s: f64 = (0..12).map(|_| rng.gen::<f64>()).sum();
    (s - 6.0) * scale
}

fn maybe_missing(rng: &mut impl Rng, p: f64, value: String) -> String {
    if rng.gen::<f64>() < p {
        String::new()
    } else {
        value
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let districts = [("north", 40.0), ("south", 10.0), ("harbour", 75.0)];

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(["price", "area", "rooms", "age", "district", "useless_feature"])?;

    for _ in 0..args.rows {
        let area: f64 = rng.gen_range(30.0..180.0);
        let rooms: i64 = ((area / 35.0).round() as i64).max(1);
        let age: i64 = rng.gen_range(0..80);
        let (district, premium) = districts[rng.gen_range(0..districts.len())];

        let price = 50.0 + 2.4 * area + 8.0 * rooms as f64 - 0.6 * age as f64
            + premium
            + noise(&mut rng, 15.0);

        let area_cell = maybe_missing(&mut rng, args.missing, format!("{area:.1}"));
        let age_cell = maybe_missing(&mut rng, args.missing, age.to_string());

        writer.write_record([
            format!("{price:.2}"),
            area_cell,
            rooms.to_string(),
            age_cell,
            district.to_string(),
            "1".to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    log::info!("Wrote {} rows to {}", args.rows, args.output.display());
    println!("Wrote {} rows to {}", args.rows, args.output.display());
    Ok(())
}
