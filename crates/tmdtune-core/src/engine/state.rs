use crate::core::candidate::Candidate;

/// An owned copy of the best candidate seen so far.
///
/// A snapshot never aliases the working population: it is copied out when taken and only ever
/// replaced wholesale, when a later generation produces a strictly better candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct BestSnapshot {
    candidate: Candidate,
}

impl BestSnapshot {
    pub fn of(candidate: &Candidate) -> Self {
        Self {
            candidate: candidate.clone(),
        }
    }

    /// Returns a replacement snapshot if `candidate` strictly improves on this one.
    pub fn improved_by(&self, candidate: &Candidate) -> Option<Self> {
        candidate
            .is_better_than(&self.candidate)
            .then(|| Self::of(candidate))
    }

    pub fn params(&self) -> &[f64] {
        &self.candidate.params
    }

    /// Internal, maximization-oriented fitness.
    pub fn fitness(&self) -> f64 {
        self.candidate.fitness
    }

    pub fn into_params(self) -> Vec<f64> {
        self.candidate.params
    }
}

/// Per-iteration history of a run, in true objective units.
///
/// One entry is appended to each sequence per generation; entries are never rewritten.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    best_fitness_history: Vec<f64>,
    mean_fitness_history: Vec<f64>,
    best_solution_history: Vec<Vec<f64>>,
}

/// A borrowed view of one generation's statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationRecord<'a> {
    pub iteration: usize,
    pub best_value: f64,
    pub mean_value: f64,
    pub best_params: &'a [f64],
}

impl RunStatistics {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            best_fitness_history: Vec::with_capacity(capacity),
            mean_fitness_history: Vec::with_capacity(capacity),
            best_solution_history: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn record(&mut self, best_value: f64, mean_value: f64, best_params: Vec<f64>) {
        self.best_fitness_history.push(best_value);
        self.mean_fitness_history.push(mean_value);
        self.best_solution_history.push(best_params);
    }

    /// Best objective value found so far, after each generation.
    pub fn best_fitness_history(&self) -> &[f64] {
        &self.best_fitness_history
    }

    /// Mean objective value of each generation's population.
    pub fn mean_fitness_history(&self) -> &[f64] {
        &self.mean_fitness_history
    }

    /// Best parameter vector found so far, after each generation.
    pub fn best_solution_history(&self) -> &[Vec<f64>] {
        &self.best_solution_history
    }

    pub fn len(&self) -> usize {
        self.best_fitness_history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness_history.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = IterationRecord<'_>> {
        self.best_fitness_history
            .iter()
            .zip(&self.mean_fitness_history)
            .zip(&self.best_solution_history)
            .enumerate()
            .map(|(iteration, ((&best_value, &mean_value), params))| IterationRecord {
                iteration,
                best_value,
                mean_value,
                best_params: params,
            })
    }
}

/// Result of a completed optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationOutcome {
    pub best_params: Vec<f64>,
    /// True (unsigned) objective value at `best_params`.
    pub best_value: f64,
    pub statistics: RunStatistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_copies_candidate_instead_of_aliasing_it() {
        let mut candidate = Candidate::new(vec![1.0, 2.0], 5.0);
        let snapshot = BestSnapshot::of(&candidate);
        candidate.params[0] = 99.0;
        assert_eq!(snapshot.params(), &[1.0, 2.0]);
    }

    #[test]
    fn snapshot_is_replaced_only_on_strict_improvement() {
        let snapshot = BestSnapshot::of(&Candidate::new(vec![0.0], 1.0));
        assert!(
            snapshot
                .improved_by(&Candidate::new(vec![1.0], 1.0))
                .is_none()
        );
        assert!(
            snapshot
                .improved_by(&Candidate::new(vec![1.0], 0.5))
                .is_none()
        );
        let next = snapshot
            .improved_by(&Candidate::new(vec![2.0], 1.5))
            .unwrap();
        assert_eq!(next.params(), &[2.0]);
        assert_eq!(next.fitness(), 1.5);
    }

    #[test]
    fn statistics_keep_parallel_sequences_in_step() {
        let mut stats = RunStatistics::with_capacity(2);
        assert!(stats.is_empty());
        stats.record(3.0, 4.0, vec![0.1]);
        stats.record(2.0, 3.5, vec![0.2]);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats.best_fitness_history(), &[3.0, 2.0]);
        assert_eq!(stats.mean_fitness_history(), &[4.0, 3.5]);
        assert_eq!(stats.best_solution_history(), &[vec![0.1], vec![0.2]]);

        let records: Vec<_> = stats.iter().collect();
        assert_eq!(records[1].iteration, 1);
        assert_eq!(records[1].best_value, 2.0);
        assert_eq!(records[1].best_params, &[0.2]);
    }
}
