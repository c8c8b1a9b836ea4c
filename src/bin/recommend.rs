use anyhow::{bail, Context, Result};
use num_format::{Locale, ToFormattedString};

use encore::config::AppConfig;
use encore::io::ItemIndex;
use encore::knn;
use encore::knn::utility_index::UtilityIndex;

/// Prints ranked recommendations for either an existing user position or an
/// ad-hoc list of item labels.
///
/// Usage:
///   recommend <config> <user-position>
///   recommend <config> <label> [<label> ...]
fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(config_path);

    let neighborhood_size_k = config.model.neighborhood_size_k;
    let num_recommendations = config.model.num_recommendations;

    let index = UtilityIndex::new_from_csv(&config.data.training_data_path)?;
    println!(
        "Index ready: {} users, {} items.",
        index.num_users().to_formatted_string(&Locale::en),
        index.num_items().to_formatted_string(&Locale::en),
    );

    let query_args: Vec<String> = std::env::args().skip(2).collect();
    if query_args.is_empty() {
        bail!("expected a user position or a list of item labels");
    }

    let ranking = if query_args.len() == 1 && query_args[0].chars().all(|c| c.is_ascii_digit()) {
        let position: usize = query_args[0].parse().context("unable to parse user position")?;
        let ranking = knn::recommend(&index, position, neighborhood_size_k)?;
        println!("Recommendations for user '{}':", index.user_id(position));
        ranking
    } else {
        let mut query_items: Vec<ItemIndex> = Vec::with_capacity(query_args.len());
        for label in &query_args {
            match index.lookup_item(label) {
                Some(item) => query_items.push(item),
                None => eprintln!("'{}' is not in the system and was skipped.", label),
            }
        }
        if query_items.is_empty() {
            bail!("none of the given items are known to the index");
        }
        knn::recommend_for_items(&index, &query_items, None, neighborhood_size_k)?
    };

    let labeled = knn::resolve_labels(&index, &ranking);
    let how_many = num_recommendations.min(labeled.len());
    println!("Top {} results:", how_many);
    for (rank, (label, score)) in labeled.iter().take(how_many).enumerate() {
        println!("{}) {}  ({:.4})", rank + 1, label, score);
    }

    Ok(())
}
