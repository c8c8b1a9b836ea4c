use anyhow::Result;
use num_format::{Locale, ToFormattedString};
use rand::SeedableRng;
use rand_pcg::Pcg64;

use encore::config::AppConfig;
use encore::evaluation;
use encore::knn::utility_index::UtilityIndex;
use encore::metrics::precision::Precision;
use encore::metrics::RankingMetric;
use encore::stopwatch::Stopwatch;

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path);

    let neighborhood_size_k = config.model.neighborhood_size_k;
    let holdout_size = config.evaluation.holdout_size;
    let num_trials = config.evaluation.num_trials;

    let index = UtilityIndex::new_from_csv(&config.data.training_data_path)?;
    println!(
        "Index ready: {} users, {} items.",
        index.num_users().to_formatted_string(&Locale::en),
        index.num_items().to_formatted_string(&Locale::en),
    );

    let mut rng = Pcg64::seed_from_u64(config.evaluation.seed);
    let mut precision = Precision::new(holdout_size);
    let mut stopwatch = Stopwatch::new();

    for _ in 0..num_trials {
        stopwatch.start();
        let trial = evaluation::run_holdout_trial(&index, neighborhood_size_k, holdout_size, &mut rng)?;
        stopwatch.stop();
        precision.add(&trial.recommended, &trial.held_out);
    }

    println!("===============================================================");
    println!("===              START EVALUATING HOLDOUT TRIALS           ====");
    println!("===============================================================");
    println!("{}", precision.get_name());
    println!("{:.4}", precision.result());
    println!("Qty holdout trials: {}", stopwatch.get_n());
    println!("Trial latency");
    println!("p90 (microseconds): {}", stopwatch.get_percentile_in_micros(90.0));
    println!("p95 (microseconds): {}", stopwatch.get_percentile_in_micros(95.0));
    println!("p99.5 (microseconds): {}", stopwatch.get_percentile_in_micros(99.5));

    Ok(())
}
