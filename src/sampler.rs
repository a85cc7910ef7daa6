use rand::distributions::Distribution;
use rand::Rng;

use crate::transform::TransformSet;


/// Picks transform indices in proportion to their probabilities.
///
/// The cumulative distribution is built once in [`WeightedSampler::new`] and
/// reused for every draw.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSampler {
    cumulative: Vec<f64>,
}


impl WeightedSampler {
    pub fn new(set: &TransformSet) -> WeightedSampler {
        let cumulative = set
            .probabilities()
            .iter()
            .scan(0.0, |running, &p| {
                *running += p;
                Some(*running)
            })
            .collect();

        WeightedSampler { cumulative }
    }

    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Smallest index whose partial sum is at least `u`.
    ///
    /// If rounding left the final partial sum below `u`, the last index is
    /// returned. An empty sampler always yields 0.
    pub fn index_for(&self, u: f64) -> usize {
        self.cumulative
            .iter()
            .position(|&partial| u <= partial)
            .unwrap_or_else(|| self.cumulative.len().saturating_sub(1))
    }
}


impl Distribution<usize> for WeightedSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        // Standard f64 is uniform on [0, 1)
        self.index_for(rng.gen::<f64>())
    }
}
