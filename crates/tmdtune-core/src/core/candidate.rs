use std::cmp::Ordering;

/// A point in the search space together with its internal fitness.
///
/// Fitness is always maximization-oriented: the engine flips the sign of the external
/// objective before storing it here when the caller asked for minimization.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// One value per search dimension, in bound order.
    pub params: Vec<f64>,
    /// Internal, maximization-oriented score.
    pub fitness: f64,
}

impl Candidate {
    pub fn new(params: Vec<f64>, fitness: f64) -> Self {
        Self { params, fitness }
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.params.len()
    }

    /// Strict improvement test. NaN never beats anything and anything finite beats NaN.
    #[inline]
    pub fn is_better_than(&self, other: &Candidate) -> bool {
        rank_key(self.fitness) > rank_key(other.fitness)
    }
}

#[inline]
fn rank_key(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}

/// Descending order by fitness, NaN last.
pub fn by_fitness_desc(a: &Candidate, b: &Candidate) -> Ordering {
    rank_key(b.fitness).total_cmp(&rank_key(a.fitness))
}

/// Stable sort, best first. Equal fitness keeps insertion order.
pub fn sort_by_fitness_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(by_fitness_desc);
}
