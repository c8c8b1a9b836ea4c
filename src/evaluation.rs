use hashbrown::HashSet;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::RecommendError;
use crate::io::{ItemIndex, UserPos};
use crate::knn::utility_index::UtilityIndex;
use crate::knn::{self, ItemScore};

/// Outcome of one holdout trial: the top-n recommended items computed from a
/// training subsample of a real user's history, and the items that were held
/// back. Feed both into a `RankingMetric` to score the trial.
#[derive(Debug)]
pub struct HoldoutTrial {
    pub user: UserPos,
    pub recommended: Vec<ItemIndex>,
    pub held_out: Vec<ItemIndex>,
}

/// Runs one holdout trial: uniformly picks a user with at least `2 * n`
/// interactions, samples `n` of their items as training input and recommends
/// against the remainder.
///
/// The recommendation runs through the pure item-set entry point, so the
/// index is never mutated and there is nothing to roll back if scoring fails.
/// The random source is injected so tests and reproducible evaluation runs
/// can seed it.
pub fn run_holdout_trial<R: Rng>(
    index: &UtilityIndex,
    k: usize,
    n: usize,
    rng: &mut R,
) -> Result<HoldoutTrial, RecommendError> {
    if n == 0 {
        return Err(RecommendError::InvalidParameter(
            "holdout size n must be positive".to_string(),
        ));
    }
    if index.num_users() == 0 {
        return Err(RecommendError::InvalidParameter(
            "index holds no users".to_string(),
        ));
    }
    let eligible = (0..index.num_users()).any(|user| index.items_for_user(user).len() >= 2 * n);
    if !eligible {
        return Err(RecommendError::InvalidParameter(format!(
            "no user has the {} interactions required for a holdout of {}",
            2 * n,
            n
        )));
    }

    let user = loop {
        let candidate = rng.gen_range(0..index.num_users());
        if index.items_for_user(candidate).len() >= 2 * n {
            break candidate;
        }
    };

    let full_history = index.items_for_user(user);
    let mut training: Vec<ItemIndex> = full_history.choose_multiple(rng, n).copied().collect();
    training.sort_unstable();

    let training_set: HashSet<ItemIndex> = training.iter().copied().collect();
    let held_out: Vec<ItemIndex> = full_history
        .iter()
        .filter(|item| !training_set.contains(item))
        .copied()
        .collect();

    let ranking = knn::recommend_for_items(index, &training, Some(user), k)?;
    let recommended: Vec<ItemIndex> = ranking
        .iter()
        .take(n)
        .map(|scored: &ItemScore| scored.item)
        .collect();

    Ok(HoldoutTrial {
        user,
        recommended,
        held_out,
    })
}

#[cfg(test)]
mod evaluation_test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::io::InteractionRecord;
    use crate::metrics::precision::Precision;
    use crate::metrics::RankingMetric;

    fn record(user_id: &str, items: &[&str]) -> InteractionRecord {
        InteractionRecord {
            user_id: user_id.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn should_recover_held_out_items_from_identical_twins() {
        // every user has the same four items, so whatever is held out is
        // exactly what the neighbors vote for
        let index = UtilityIndex::from_records(&[
            record("u0", &["A", "B", "C", "D"]),
            record("u1", &["A", "B", "C", "D"]),
            record("u2", &["A", "B", "C", "D"]),
        ]);

        let mut rng = Pcg64::seed_from_u64(42);
        let mut precision = Precision::new(2);
        for _ in 0..10 {
            let trial = run_holdout_trial(&index, 2, 2, &mut rng).unwrap();
            assert_eq!(2, trial.held_out.len());
            precision.add(&trial.recommended, &trial.held_out);
        }
        assert_eq!(1.0, precision.result());
    }

    #[test]
    fn should_only_pick_users_with_enough_history() {
        let index = UtilityIndex::from_records(&[
            record("u0", &["A"]),
            record("u1", &["A", "B", "C", "D", "E"]),
            record("u2", &["B"]),
        ]);

        let mut rng = Pcg64::seed_from_u64(7);
        for _ in 0..5 {
            let trial = run_holdout_trial(&index, 2, 2, &mut rng).unwrap();
            assert_eq!(1, trial.user);
        }
    }

    #[test]
    fn should_yield_precision_from_the_expected_grid() {
        let index = UtilityIndex::from_records(&[
            record("u0", &["A", "B", "C", "D"]),
            record("u1", &["A", "C", "E", "F"]),
            record("u2", &["B", "D", "G"]),
        ]);

        let mut rng = Pcg64::seed_from_u64(13);
        for _ in 0..20 {
            let trial = run_holdout_trial(&index, 2, 2, &mut rng).unwrap();
            let mut precision = Precision::new(2);
            precision.add(&trial.recommended, &trial.held_out);
            let p = precision.result();
            assert!(p == 0.0 || p == 0.5 || p == 1.0);
        }
    }

    #[test]
    fn should_reject_holdout_nobody_can_satisfy() {
        let index = UtilityIndex::from_records(&[record("u0", &["A", "B"])]);
        let mut rng = Pcg64::seed_from_u64(1);
        assert!(matches!(
            run_holdout_trial(&index, 2, 5, &mut rng),
            Err(RecommendError::InvalidParameter(_))
        ));
    }

    #[test]
    fn should_reject_zero_holdout_size() {
        let index = UtilityIndex::from_records(&[record("u0", &["A", "B"])]);
        let mut rng = Pcg64::seed_from_u64(1);
        assert!(matches!(
            run_holdout_trial(&index, 2, 0, &mut rng),
            Err(RecommendError::InvalidParameter(_))
        ));
    }

    #[test]
    fn should_leave_the_index_unchanged() {
        let index = UtilityIndex::from_records(&[
            record("u0", &["A", "B", "C", "D"]),
            record("u1", &["A", "B", "C", "D"]),
        ]);
        let mut rng = Pcg64::seed_from_u64(99);
        run_holdout_trial(&index, 1, 2, &mut rng).unwrap();

        assert_eq!(2, index.num_users());
        assert_eq!(&[0, 1, 2, 3], index.items_for_user(0));
        assert_eq!(&[0, 1, 2, 3], index.items_for_user(1));
    }
}
