use std::cmp::Ordering;

use crate::error::RecommendError;
use crate::io::{ItemIndex, UserPos};
use crate::knn::similarity::ranked_neighbors;
use crate::knn::utility_index::UtilityIndex;

pub mod similarity;
pub mod utility_index;

#[derive(PartialEq, Debug)]
pub struct ItemScore {
    pub item: ItemIndex,
    pub score: f64,
}

impl ItemScore {
    fn new(item: ItemIndex, score: f64) -> Self {
        ItemScore { item, score }
    }
}

impl Eq for ItemScore {}

impl Ord for ItemScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // descending by score, ties broken by ascending item index
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Less) => Ordering::Greater,
            Some(Ordering::Greater) => Ordering::Less,
            _ => self.item.cmp(&other.item),
        }
    }
}

impl PartialOrd for ItemScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ranks every item the user at `query_user` has not interacted with, by the
/// summed Jaccard similarity of the `k` nearest neighbors holding the item.
pub fn recommend(
    index: &UtilityIndex,
    query_user: UserPos,
    k: usize,
) -> Result<Vec<ItemScore>, RecommendError> {
    if query_user >= index.num_users() {
        return Err(RecommendError::InvalidUser {
            position: query_user,
            num_users: index.num_users(),
        });
    }

    recommend_for_items(index, index.items_for_user(query_user), Some(query_user), k)
}

/// The pure form of the recommender: scores candidates for an arbitrary item
/// set against the immutable index, without that set having to live in the
/// index. Ad-hoc queries and holdout evaluation both go through here, so no
/// shared state is ever mutated and rolled back.
///
/// `k == 0` is rejected as an invalid parameter. A `k` larger than the number
/// of available neighbors is clamped with a warning and all neighbors are
/// used. Candidates nobody voted for stay in the result with score zero.
pub fn recommend_for_items(
    index: &UtilityIndex,
    query_items: &[ItemIndex],
    exclude: Option<UserPos>,
    k: usize,
) -> Result<Vec<ItemScore>, RecommendError> {
    if k == 0 {
        return Err(RecommendError::InvalidParameter(
            "neighborhood size k must be positive".to_string(),
        ));
    }

    let mut query: Vec<ItemIndex> = query_items.to_vec();
    query.sort_unstable();
    query.dedup();

    let neighbors = ranked_neighbors(index, &query, exclude);
    let k = if k > neighbors.len() {
        eprintln!("k set to max: {}", neighbors.len());
        neighbors.len()
    } else {
        k
    };
    let nearest = &neighbors[..k];

    let mut scores: Vec<ItemScore> = Vec::with_capacity(index.num_items().saturating_sub(query.len()));
    for item in 0..index.num_items() {
        if query.binary_search(&item).is_ok() {
            continue;
        }
        let score: f64 = nearest
            .iter()
            .filter(|neighbor| index.items_for_user(neighbor.user).binary_search(&item).is_ok())
            .map(|neighbor| neighbor.score)
            .sum();
        scores.push(ItemScore::new(item, score));
    }

    scores.sort_unstable();
    Ok(scores)
}

/// Projects a ranking onto item labels. Same order, different payload.
pub fn resolve_labels<'a>(index: &'a UtilityIndex, ranking: &[ItemScore]) -> Vec<(&'a str, f64)> {
    ranking
        .iter()
        .map(|scored| (index.item_label(scored.item), scored.score))
        .collect()
}
