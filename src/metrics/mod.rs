pub mod precision;

pub trait RankingMetric {
    fn add(&mut self, recommendations: &[usize], relevant_items: &[usize]);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}
