use anyhow::Context;
use clap::Parser;
use csv::ReaderBuilder;
use ndarray::{Array2, ArrayView1};
use std::fs::File;

use betobox::{report, MultiStart, N_FREE};

/// Search for high-strength concrete mixtures starting from observed ones
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV of observed mixtures (one header line, then six free proportions
    /// per row: cement, slag, fly ash, water, superplasticizer, coarse
    /// aggregate), already filtered to the curing age of interest
    #[arg(short, long, default_value = "demos/mixtures28.csv")]
    data: String,
    /// Curing age in days
    #[arg(short, long, default_value_t = 28.0)]
    age: f64,
    /// Per-run iteration budget
    #[arg(short, long, default_value_t = 5000)]
    max_iters: usize,
    /// Number of top-ranked mixtures to display
    #[arg(short, long, default_value_t = 10)]
    top: usize,
    /// Optional path to dump all ranked results as JSON
    #[arg(short, long)]
    json: Option<String>,
}

/// Stand-in for the externally trained regression model (model training is
/// out of scope here): a smooth strength surface driven by binder content,
/// water/binder ratio and maturity.
fn toy_strength(features: &ArrayView1<f64>) -> f64 {
    let cement = features[0];
    let slag = features[1];
    let fly_ash = features[2];
    let water = features[3];
    let superplasticizer = features[4];
    let age = features[7];

    let binder = cement + 0.9 * slag + 0.7 * fly_ash;
    let wb = (water / binder.max(1e-3)).max(0.25);
    let maturity = (1. + age / 28.).ln();
    // Unworkable aggregate contents rate poorly, as a trained model would
    let packing = 400. * (features[6] - 0.30).powi(2);
    (25. * binder / wb + 300. * superplasticizer) * maturity - packing
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let file = File::open(&args.data).with_context(|| format!("cannot open {}", args.data))?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .from_reader(file);
    let mut rows: Vec<f64> = Vec::new();
    let mut n_rows = 0;
    for record in reader.deserialize() {
        let row: Vec<f64> = record?;
        anyhow::ensure!(
            row.len() == N_FREE,
            "expected {} columns in {}, got {}",
            N_FREE,
            args.data,
            row.len()
        );
        rows.extend(row);
        n_rows += 1;
    }
    let starts = Array2::from_shape_vec((n_rows, N_FREE), rows)?;

    let results = MultiStart::new(&toy_strength, &starts)
        .age(args.age)
        .max_iters(args.max_iters)
        .run()?;

    println!("{}", report(&results, args.top));

    if let Some(path) = args.json {
        let out = File::create(&path).with_context(|| format!("cannot create {path}"))?;
        serde_json::to_writer_pretty(out, &results)?;
        println!("full ranking written to {path}");
    }
    Ok(())
}
