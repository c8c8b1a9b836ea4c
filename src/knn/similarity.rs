use std::cmp::Ordering;

use rayon::prelude::*;

use crate::io::{ItemIndex, UserPos};
use crate::knn::utility_index::UtilityIndex;

#[derive(PartialEq, Debug)]
pub struct NeighborScore {
    pub user: UserPos,
    pub score: f64,
}

impl NeighborScore {
    pub fn new(user: UserPos, score: f64) -> Self {
        NeighborScore { user, score }
    }
}

impl Eq for NeighborScore {}

impl Ord for NeighborScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // descending by score, ties broken by ascending user position
        match self.score.partial_cmp(&other.score) {
            Some(Ordering::Less) => Ordering::Greater,
            Some(Ordering::Greater) => Ordering::Less,
            _ => self.user.cmp(&other.user),
        }
    }
}

impl PartialOrd for NeighborScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Jaccard coefficient of two sorted, duplicate-free index slices.
///
/// Returns 0.0 when either set is empty, so the empty union can never turn
/// into a division error.
pub fn jaccard(a: &[ItemIndex], b: &[ItemIndex]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let mut i = 0;
    let mut j = 0;
    let mut intersection = 0_usize;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                intersection += 1;
                i += 1;
                j += 1;
            }
        }
    }

    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Scores every user in the index against `query_items`, excluding the query
/// user itself when it lives in the index. The per-candidate computations are
/// independent reads over the finished index, so they run data-parallel; the
/// final sort fixes the deterministic order: descending similarity, ties by
/// ascending user position.
pub fn ranked_neighbors(
    index: &UtilityIndex,
    query_items: &[ItemIndex],
    exclude: Option<UserPos>,
) -> Vec<NeighborScore> {
    let mut neighbors: Vec<NeighborScore> = (0..index.num_users())
        .into_par_iter()
        .filter(|position| Some(*position) != exclude)
        .map(|position| NeighborScore::new(position, jaccard(query_items, index.items_for_user(position))))
        .collect();

    neighbors.sort_unstable();
    neighbors
}

#[cfg(test)]
mod similarity_test {
    use float_cmp::approx_eq;

    use super::*;
    use crate::io::InteractionRecord;

    fn record(user_id: &str, items: &[&str]) -> InteractionRecord {
        InteractionRecord {
            user_id: user_id.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn three_user_index() -> UtilityIndex {
        // items A=0, B=1, C=2, D=3
        UtilityIndex::from_records(&[
            record("u0", &["A", "B"]),
            record("u1", &["A", "B", "C"]),
            record("u2", &["D"]),
        ])
    }

    #[test]
    fn should_compute_jaccard_coefficient() {
        assert!(approx_eq!(f64, 2.0 / 3.0, jaccard(&[0, 1], &[0, 1, 2]), ulps = 2));
        assert!(approx_eq!(f64, 0.0, jaccard(&[0, 1], &[3]), ulps = 2));
        assert!(approx_eq!(f64, 1.0, jaccard(&[4, 7], &[4, 7]), ulps = 2));
        assert!(approx_eq!(f64, 0.25, jaccard(&[0, 1, 2], &[2, 3]), ulps = 2));
    }

    #[test]
    fn should_be_symmetric() {
        let index = three_user_index();
        for a in 0..index.num_users() {
            for b in 0..index.num_users() {
                let ab = jaccard(index.items_for_user(a), index.items_for_user(b));
                let ba = jaccard(index.items_for_user(b), index.items_for_user(a));
                assert!(approx_eq!(f64, ab, ba, ulps = 2));
                assert!((0.0..=1.0).contains(&ab));
            }
        }
    }

    #[test]
    fn should_score_empty_sets_as_zero() {
        assert!(approx_eq!(f64, 0.0, jaccard(&[], &[0, 1]), ulps = 2));
        assert!(approx_eq!(f64, 0.0, jaccard(&[], &[]), ulps = 2));
    }

    #[test]
    fn should_exclude_query_user_from_neighbors() {
        let index = three_user_index();
        let neighbors = ranked_neighbors(&index, index.items_for_user(0), Some(0));
        assert_eq!(2, neighbors.len());
        assert!(neighbors.iter().all(|n| n.user != 0));
    }

    #[test]
    fn should_rank_neighbors_by_descending_similarity() {
        let index = three_user_index();
        let neighbors = ranked_neighbors(&index, index.items_for_user(0), Some(0));
        assert_eq!(1, neighbors[0].user);
        assert!(approx_eq!(f64, 2.0 / 3.0, neighbors[0].score, ulps = 2));
        assert_eq!(2, neighbors[1].user);
        assert!(approx_eq!(f64, 0.0, neighbors[1].score, ulps = 2));
    }

    #[test]
    fn should_break_score_ties_by_ascending_position() {
        // u1 and u2 both share one of two items with the query
        let index = UtilityIndex::from_records(&[
            record("u0", &["A", "B"]),
            record("u1", &["A"]),
            record("u2", &["B"]),
        ]);
        let neighbors = ranked_neighbors(&index, index.items_for_user(0), Some(0));
        assert_eq!(vec![1, 2], neighbors.iter().map(|n| n.user).collect::<Vec<_>>());
    }
}
