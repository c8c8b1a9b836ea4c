use std::cmp;

use hashbrown::HashSet;

use crate::metrics::RankingMetric;

pub struct Precision {
    sum_of_scores: f64,
    qty: usize,
    length: usize,
}

impl Precision {
    /// Returns a Precision evaluation metric.
    /// Precision quantifies how many of the top recommended items were
    /// actually relevant.
    ///
    /// # Arguments
    ///
    /// * `length` - the length aka 'n' that will be used for evaluation.
    ///
    pub fn new(length: usize) -> Precision {
        Precision {
            sum_of_scores: 0_f64,
            qty: 0,
            length,
        }
    }
}

impl RankingMetric for Precision {
    fn add(&mut self, recommendations: &[usize], relevant_items: &[usize]) {
        self.qty += 1;
        let top_recos: HashSet<&usize> = recommendations
            .iter()
            .take(cmp::min(recommendations.len(), self.length))
            .collect();

        let relevant_items: HashSet<&usize> = relevant_items.iter().collect();

        let intersection = top_recos.intersection(&relevant_items);

        self.sum_of_scores += intersection.count() as f64 / self.length as f64
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        format!("Precision@{}", self.length)
    }
}
