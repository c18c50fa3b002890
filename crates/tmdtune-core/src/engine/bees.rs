use super::config::{BeesConfig, ConfigError};
use super::error::EngineError;
use super::objective::{Direction, Objective, SignedObjective};
use super::progress::{Progress, ProgressReporter};
use super::state::{BestSnapshot, OptimizationOutcome, RunStatistics};
use super::utils::sampling;
use crate::core::bounds::Bound;
use crate::core::candidate::{self, Candidate};
use rand::Rng;
use tracing::{debug, info, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const VERBOSE_REPORT_INTERVAL: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub direction: Direction,
    /// Emit a progress line every few generations.
    pub verbose: bool,
}

impl SearchOptions {
    pub fn minimize() -> Self {
        Self {
            direction: Direction::Minimize,
            verbose: false,
        }
    }

    pub fn maximize() -> Self {
        Self {
            direction: Direction::Maximize,
            verbose: false,
        }
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// The Bees Algorithm (Pham et al., 2006) over a box-bounded continuous space.
#[derive(Debug, Clone, PartialEq)]
pub struct BeesAlgorithm {
    config: BeesConfig,
}

impl BeesAlgorithm {
    pub fn new(config: BeesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &BeesConfig {
        &self.config
    }

    /// Runs the search for exactly `max_iterations` generations.
    ///
    /// Returns the best parameter vector found, its true objective value and one statistics
    /// entry per generation. Fails only on invalid input, before the objective is evaluated.
    #[instrument(skip_all, name = "bees_optimize", fields(dimensions = bounds.len(), direction = ?options.direction))]
    pub fn optimize<O>(
        &self,
        objective: &O,
        bounds: &[Bound],
        options: SearchOptions,
        reporter: &ProgressReporter,
    ) -> Result<OptimizationOutcome, EngineError>
    where
        O: Objective + Sync + ?Sized,
    {
        if bounds.is_empty() {
            return Err(ConfigError::EmptyBounds.into());
        }

        let config = &self.config;
        let objective = SignedObjective::new(objective, options.direction);
        let mut rng = config.rng();

        info!(
            n = config.n,
            m = config.m,
            e = config.e,
            nep = config.nep,
            nsp = config.nsp,
            ngh = config.ngh,
            max_iterations = config.max_iterations,
            "Starting Bees Algorithm search."
        );
        reporter.report(Progress::PhaseStart {
            name: "Bees Search",
        });

        let mut population = scout_batch(&objective, bounds, config.n, &mut rng);
        candidate::sort_by_fitness_desc(&mut population);
        let mut best = BestSnapshot::of(&population[0]);
        let mut statistics = RunStatistics::with_capacity(config.max_iterations);

        reporter.report(Progress::TaskStart {
            total_steps: config.max_iterations as u64,
        });

        for iteration in 0..config.max_iterations {
            if options.verbose && iteration % VERBOSE_REPORT_INTERVAL == 0 {
                let best_value = objective.objective_value(best.fitness());
                info!(iteration, best_value, "Bees search progress.");
                reporter.report(Progress::StatusUpdate {
                    text: format!(
                        "Iteration {}/{}, best: {:.6}",
                        iteration, config.max_iterations, best_value
                    ),
                });
            }

            let patch = sampling::patch_width(config.ngh, iteration, config.max_iterations);
            population = self.next_generation(&objective, bounds, &population, patch, &mut rng);

            if let Some(improved) = best.improved_by(&population[0]) {
                debug!(
                    iteration,
                    best_value = objective.objective_value(improved.fitness()),
                    "Global best improved."
                );
                best = improved;
            }

            let best_value = objective.objective_value(best.fitness());
            let mean_value = population
                .iter()
                .map(|c| objective.objective_value(c.fitness))
                .sum::<f64>()
                / population.len() as f64;
            trace!(iteration, best_value, mean_value, patch, "Generation complete.");

            statistics.record(best_value, mean_value, best.params().to_vec());
            reporter.report(Progress::TaskIncrement);
        }

        reporter.report(Progress::TaskFinish);
        reporter.report(Progress::PhaseFinish);

        let best_value = objective.objective_value(best.fitness());
        info!(best_value, "Bees Algorithm search finished.");

        Ok(OptimizationOutcome {
            best_params: best.into_params(),
            best_value,
            statistics,
        })
    }

    /// Elite sites, then the other selected sites, then fresh scouts; sorted best first.
    fn next_generation<O>(
        &self,
        objective: &SignedObjective<'_, O>,
        bounds: &[Bound],
        population: &[Candidate],
        patch: f64,
        rng: &mut impl Rng,
    ) -> Vec<Candidate>
    where
        O: Objective + Sync + ?Sized,
    {
        let config = &self.config;
        let (elite, others) = population[..config.m].split_at(config.e);

        let mut next = Vec::with_capacity(config.n);
        for site in elite {
            next.push(search_patch(objective, bounds, site, config.nep, patch, rng));
        }
        for site in others {
            next.push(search_patch(objective, bounds, site, config.nsp, patch, rng));
        }
        next.extend(scout_batch(objective, bounds, config.n - config.m, rng));

        candidate::sort_by_fitness_desc(&mut next);
        next
    }
}

/// Recruits `recruits - 1` bees around `site` and returns the best of the site and its recruits.
/// The site wins ties.
fn search_patch<O>(
    objective: &SignedObjective<'_, O>,
    bounds: &[Bound],
    site: &Candidate,
    recruits: usize,
    patch: f64,
    rng: &mut impl Rng,
) -> Candidate
where
    O: Objective + Sync + ?Sized,
{
    let neighbors: Vec<Vec<f64>> = (1..recruits)
        .map(|_| sampling::recruit(&site.params, bounds, patch, rng))
        .collect();

    evaluate_batch(objective, neighbors)
        .into_iter()
        .fold(site.clone(), |best, bee| {
            if bee.is_better_than(&best) { bee } else { best }
        })
}

fn scout_batch<O>(
    objective: &SignedObjective<'_, O>,
    bounds: &[Bound],
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Candidate>
where
    O: Objective + Sync + ?Sized,
{
    let scouts: Vec<Vec<f64>> = (0..count)
        .map(|_| sampling::scout(bounds, rng))
        .collect();
    evaluate_batch(objective, scouts)
}

/// Parameter vectors are drawn beforehand from the single RNG, so evaluating them in parallel
/// yields exactly the sequential result.
fn evaluate_batch<O>(objective: &SignedObjective<'_, O>, batch: Vec<Vec<f64>>) -> Vec<Candidate>
where
    O: Objective + Sync + ?Sized,
{
    #[cfg(not(feature = "parallel"))]
    let iterator = batch.into_iter();

    #[cfg(feature = "parallel")]
    let iterator = batch.into_par_iter();

    iterator
        .map(|params| {
            let fitness = objective.fitness(&params);
            Candidate::new(params, fitness)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::BeesConfigBuilder;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bounds(pairs: &[(f64, f64)]) -> Vec<Bound> {
        pairs
            .iter()
            .map(|&(min, max)| Bound::new(min, max).unwrap())
            .collect()
    }

    fn squared_distance_to(target: &'static [f64]) -> impl Fn(&[f64]) -> f64 + Sync {
        move |params: &[f64]| {
            params
                .iter()
                .zip(target)
                .map(|(x, t)| (x - t).powi(2))
                .sum()
        }
    }

    fn seeded(builder: BeesConfigBuilder, seed: u64) -> BeesAlgorithm {
        BeesAlgorithm::new(builder.seed(seed).build().unwrap()).unwrap()
    }

    #[test]
    fn every_evaluated_candidate_lies_within_bounds() {
        let box_bounds = bounds(&[(0.01, 0.25), (0.01, 0.5), (0.5, 1.0)]);
        let seen = Mutex::new(Vec::new());
        let objective = |params: &[f64]| {
            seen.lock().unwrap().push(params.to_vec());
            params[0] - params[1] + params[2]
        };

        let bees = seeded(BeesConfigBuilder::new().max_iterations(30).ngh(0.5), 1);
        let outcome = bees
            .optimize(
                &objective,
                &box_bounds,
                SearchOptions::maximize(),
                &ProgressReporter::new(),
            )
            .unwrap();

        let seen = seen.into_inner().unwrap();
        assert!(!seen.is_empty());
        for params in seen.iter().chain(outcome.statistics.best_solution_history()) {
            assert_eq!(params.len(), 3);
            for (value, bound) in params.iter().zip(&box_bounds) {
                assert!(bound.contains(*value), "{} escaped {}", value, bound);
            }
        }
    }

    #[test]
    fn identical_seed_reproduces_identical_outcome() {
        let box_bounds = bounds(&[(-3.0, 3.0), (-3.0, 3.0)]);
        let objective = squared_distance_to(&[1.0, -2.0]);
        let run = || {
            seeded(BeesConfigBuilder::new().max_iterations(25), 1234)
                .optimize(
                    &objective,
                    &box_bounds,
                    SearchOptions::minimize(),
                    &ProgressReporter::new(),
                )
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn best_value_history_never_worsens_when_minimizing() {
        let box_bounds = bounds(&[(-5.0, 5.0); 3]);
        let outcome = seeded(BeesConfigBuilder::new().max_iterations(60), 8)
            .optimize(
                &squared_distance_to(&[0.3, -1.2, 2.0]),
                &box_bounds,
                SearchOptions::minimize(),
                &ProgressReporter::new(),
            )
            .unwrap();

        let history = outcome.statistics.best_fitness_history();
        assert_eq!(history.len(), 60);
        assert!(history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(*history.last().unwrap(), outcome.best_value);
    }

    #[test]
    fn best_value_history_never_worsens_when_maximizing() {
        let box_bounds = bounds(&[(0.0, 1.0); 2]);
        let objective = |p: &[f64]| -(p[0] - 0.5).powi(2) - (p[1] - 0.25).powi(2);
        let outcome = seeded(BeesConfigBuilder::new().max_iterations(40), 21)
            .optimize(
                &objective,
                &box_bounds,
                SearchOptions::maximize(),
                &ProgressReporter::new(),
            )
            .unwrap();

        let history = outcome.statistics.best_fitness_history();
        assert!(history.windows(2).all(|w| w[1] >= w[0]));
        assert!(outcome.best_value <= 0.0);
        assert_eq!(outcome.best_value, objective(outcome.best_params.as_slice()));
    }

    #[test]
    fn converges_on_convex_objective_with_default_hyperparameters() {
        const TARGET: &[f64] = &[0.3, -1.2, 2.0];
        let box_bounds = bounds(&[(-5.0, 5.0); 3]);
        let outcome = seeded(BeesConfigBuilder::new(), 42)
            .optimize(
                &squared_distance_to(TARGET),
                &box_bounds,
                SearchOptions::minimize(),
                &ProgressReporter::new(),
            )
            .unwrap();

        assert_eq!(outcome.statistics.len(), 100);
        for (found, expected) in outcome.best_params.iter().zip(TARGET) {
            assert!(
                (found - expected).abs() < 1e-2,
                "expected {} but found {}",
                expected,
                found
            );
        }
        assert!(outcome.best_value < 1e-3);
    }

    #[test]
    fn mean_history_is_reported_in_true_objective_units() {
        let box_bounds = bounds(&[(1.0, 2.0)]);
        let outcome = seeded(BeesConfigBuilder::new().max_iterations(5), 3)
            .optimize(
                &|p: &[f64]| p[0],
                &box_bounds,
                SearchOptions::minimize(),
                &ProgressReporter::new(),
            )
            .unwrap();

        for (&mean, &best) in outcome
            .statistics
            .mean_fitness_history()
            .iter()
            .zip(outcome.statistics.best_fitness_history())
        {
            assert!((1.0..=2.0).contains(&mean));
            assert!(best <= mean);
        }
    }

    #[test]
    fn elite_count_equal_to_selected_count_runs() {
        let box_bounds = bounds(&[(0.0, 1.0); 2]);
        let outcome = seeded(BeesConfigBuilder::new().m(4).e(4).max_iterations(10), 5)
            .optimize(
                &squared_distance_to(&[0.2, 0.8]),
                &box_bounds,
                SearchOptions::minimize(),
                &ProgressReporter::new(),
            )
            .unwrap();
        assert_eq!(outcome.statistics.len(), 10);
        assert!(outcome.best_value.is_finite());
    }

    #[test]
    fn evaluation_count_follows_site_layout() {
        let counter = AtomicUsize::new(0);
        let objective = |p: &[f64]| {
            counter.fetch_add(1, Ordering::Relaxed);
            p[0]
        };
        let box_bounds = bounds(&[(0.0, 1.0)]);
        let (n, m, e, nep, nsp, iterations) = (12, 5, 2, 4, 3, 7);
        seeded(
            BeesConfigBuilder::new()
                .n(n)
                .m(m)
                .e(e)
                .nep(nep)
                .nsp(nsp)
                .max_iterations(iterations),
            9,
        )
        .optimize(
            &objective,
            &box_bounds,
            SearchOptions::minimize(),
            &ProgressReporter::new(),
        )
        .unwrap();

        let per_generation = e * (nep - 1) + (m - e) * (nsp - 1) + (n - m);
        assert_eq!(
            counter.load(Ordering::Relaxed),
            n + iterations * per_generation
        );
    }

    #[test]
    fn selected_count_equal_to_population_generates_no_scouts() {
        let counter = AtomicUsize::new(0);
        let objective = |p: &[f64]| {
            counter.fetch_add(1, Ordering::Relaxed);
            (p[0] - 0.5).abs()
        };
        let box_bounds = bounds(&[(0.0, 1.0)]);
        let outcome = seeded(
            BeesConfigBuilder::new()
                .n(10)
                .m(10)
                .e(4)
                .nep(3)
                .nsp(2)
                .max_iterations(6),
            17,
        )
        .optimize(
            &objective,
            &box_bounds,
            SearchOptions::minimize(),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert_eq!(outcome.statistics.len(), 6);
        assert_eq!(counter.load(Ordering::Relaxed), 10 + 6 * (4 * 2 + 6));
    }

    #[test]
    fn empty_bounds_fail_before_any_evaluation() {
        let counter = AtomicUsize::new(0);
        let objective = |_: &[f64]| {
            counter.fetch_add(1, Ordering::Relaxed);
            0.0
        };
        let err = seeded(BeesConfigBuilder::new(), 0)
            .optimize(
                &objective,
                &[],
                SearchOptions::minimize(),
                &ProgressReporter::new(),
            )
            .unwrap_err();
        assert_eq!(err, EngineError::Config(ConfigError::EmptyBounds));
        assert_eq!(counter.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn new_rejects_invalid_configuration() {
        let config = BeesConfig {
            e: 11,
            ..BeesConfig::default()
        };
        assert_eq!(
            BeesAlgorithm::new(config),
            Err(ConfigError::EliteExceedsSelected { e: 11, m: 10 })
        );
    }

    #[test]
    fn verbose_run_reports_status_every_ten_generations() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        seeded(BeesConfigBuilder::new().max_iterations(25), 2)
            .optimize(
                &|p: &[f64]| p[0],
                &bounds(&[(0.0, 1.0)]),
                SearchOptions::minimize().verbose(true),
                &reporter,
            )
            .unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        let status_updates = events
            .iter()
            .filter(|e| matches!(e, Progress::StatusUpdate { .. }))
            .count();
        let increments = events
            .iter()
            .filter(|e| matches!(e, Progress::TaskIncrement))
            .count();
        assert_eq!(status_updates, 3);
        assert_eq!(increments, 25);
        assert_eq!(
            events.first(),
            Some(&Progress::PhaseStart {
                name: "Bees Search"
            })
        );
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
    }
}
