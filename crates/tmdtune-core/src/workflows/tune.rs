use super::scan::{self, DesignRatios};
use crate::core::absorber::AbsorberProperties;
use crate::core::response::{ResponseModel, ScanGrid};
use crate::engine::bees::{BeesAlgorithm, SearchOptions};
use crate::engine::config::{Algorithm, TuningConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::RunStatistics;
use tracing::{info, instrument};

/// An optimized absorber design and the run that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningResult {
    pub mass_ratio: f64,
    pub damping_ratio: f64,
    pub frequency_ratio: f64,
    pub absorber: AbsorberProperties,
    /// Peak response over the scan grid at the optimized design (lower is better).
    pub peak_response: f64,
    pub statistics: RunStatistics,
}

impl TuningResult {
    pub fn design(&self) -> DesignRatios {
        DesignRatios::new(self.mass_ratio, self.damping_ratio, self.frequency_ratio)
    }
}

/// Tunes the three absorber ratios against a response model.
///
/// The objective of a design is its worst-case (peak) response over a dense grid of forcing
/// frequency ratios, and it is always minimized.
pub struct DamperTuner<'a, M: ResponseModel + ?Sized> {
    model: &'a M,
    grid: ScanGrid,
}

impl<'a, M> DamperTuner<'a, M>
where
    M: ResponseModel + Sync + ?Sized,
{
    pub fn new(model: &'a M) -> Self {
        Self {
            model,
            grid: ScanGrid::default(),
        }
    }

    pub fn with_grid(mut self, grid: ScanGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn grid(&self) -> &ScanGrid {
        &self.grid
    }

    /// Objective value of a design given as `[mass_ratio, damping_ratio, frequency_ratio]`.
    pub fn peak_response(&self, params: &[f64]) -> f64 {
        match DesignRatios::from_params(params) {
            Some(design) => scan::peak_response(self.model, design, &self.grid),
            None => f64::NAN,
        }
    }

    #[instrument(skip_all, name = "tuning_workflow", fields(main_mass = config.main_mass, main_frequency = config.main_frequency))]
    pub fn optimize_search(
        &self,
        config: &TuningConfig,
        reporter: &ProgressReporter,
    ) -> Result<TuningResult, EngineError> {
        config.validate()?;
        let bounds = config.search_space.bounds();
        info!(
            mass_ratio = %bounds[0],
            damping_ratio = %bounds[1],
            frequency_ratio = %bounds[2],
            "Starting absorber tuning."
        );

        let objective = |params: &[f64]| self.peak_response(params);
        let options = SearchOptions::minimize().verbose(config.verbose);

        let outcome = match &config.algorithm {
            Algorithm::Bees(bees_config) => BeesAlgorithm::new(bees_config.clone())?.optimize(
                &objective,
                &bounds,
                options,
                reporter,
            )?,
        };

        let design = DesignRatios::from_params(&outcome.best_params).ok_or(
            EngineError::DimensionMismatch {
                expected: bounds.len(),
                found: outcome.best_params.len(),
            },
        )?;

        let absorber = AbsorberProperties::from_ratios(
            design.mass_ratio,
            design.damping_ratio,
            design.frequency_ratio,
            config.main_mass,
            config.main_frequency,
        );

        info!(
            mass_ratio = design.mass_ratio,
            damping_ratio = design.damping_ratio,
            frequency_ratio = design.frequency_ratio,
            peak_response = outcome.best_value,
            "Absorber tuning complete."
        );
        reporter.report(Progress::Message(format!(
            "Peak response {:.4} (mass ratio {:.4}, damping ratio {:.4}, frequency ratio {:.4})",
            outcome.best_value, design.mass_ratio, design.damping_ratio, design.frequency_ratio
        )));

        Ok(TuningResult {
            mass_ratio: design.mass_ratio,
            damping_ratio: design.damping_ratio,
            frequency_ratio: design.frequency_ratio,
            absorber,
            peak_response: outcome.best_value,
            statistics: outcome.statistics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::Transmissibility;
    use crate::engine::config::{BeesConfigBuilder, ConfigError, TuningConfigBuilder};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn bees(builder: BeesConfigBuilder) -> Algorithm {
        Algorithm::Bees(builder.build().unwrap())
    }

    fn end_to_end_config() -> TuningConfig {
        TuningConfigBuilder::new()
            .main_mass(1000.0)
            .main_frequency(10.0)
            .algorithm(bees(
                BeesConfigBuilder::new()
                    .n(20)
                    .m(10)
                    .e(4)
                    .nep(10)
                    .nsp(10)
                    .ngh(0.02)
                    .max_iterations(50)
                    .seed(2024),
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn peak_response_takes_the_maximum_over_the_grid() {
        let model = |_: f64, _: f64, _: f64, r: f64| r;
        let tuner = DamperTuner::new(&model);
        assert_eq!(tuner.peak_response(&[0.1, 0.1, 0.9]), 2.5);

        let tuner = tuner.with_grid(ScanGrid::new(0.0, 1.0, 11));
        assert_eq!(tuner.peak_response(&[0.1, 0.1, 0.9]), 1.0);
    }

    #[test]
    fn peak_response_scans_one_hundred_points() {
        let calls = AtomicUsize::new(0);
        let model = |_: f64, _: f64, _: f64, _: f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            1.0
        };
        DamperTuner::new(&model).peak_response(&[0.1, 0.1, 0.9]);
        assert_eq!(calls.load(Ordering::Relaxed), 100);
    }

    #[test]
    fn end_to_end_tuning_respects_bounds_and_derives_consistent_stiffness() {
        let model = Transmissibility::default();
        let config = end_to_end_config();
        let result = DamperTuner::new(&model)
            .optimize_search(&config, &ProgressReporter::new())
            .unwrap();

        let space = &config.search_space;
        assert!(space.mass_ratio.contains(result.mass_ratio));
        assert!(space.damping_ratio.contains(result.damping_ratio));
        assert!(space.frequency_ratio.contains(result.frequency_ratio));

        assert_eq!(
            result.absorber.stiffness,
            (result.frequency_ratio * 10.0).powi(2) * (result.mass_ratio * 1000.0)
        );
        assert_eq!(result.absorber.mass, result.mass_ratio * 1000.0);
        assert_eq!(
            result.absorber.natural_frequency,
            result.frequency_ratio * 10.0
        );
        assert_eq!(
            result.absorber.damping,
            2.0 * result.damping_ratio * result.absorber.mass * result.absorber.natural_frequency
        );
        assert_eq!(result.statistics.len(), 50);
        assert_eq!(
            result.peak_response,
            DamperTuner::new(&model).peak_response(&[
                result.mass_ratio,
                result.damping_ratio,
                result.frequency_ratio
            ])
        );
    }

    #[test]
    fn tuned_absorber_beats_the_untreated_resonance_peak() {
        let model = Transmissibility::default();
        let result = DamperTuner::new(&model)
            .optimize_search(&end_to_end_config(), &ProgressReporter::new())
            .unwrap();
        // Without an absorber the main system peaks at 1 / (2 * 0.05) = 10.
        assert!(result.peak_response < 10.0);
        let history = result.statistics.best_fitness_history();
        assert!(history.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn unsupported_algorithm_names_fail_before_evaluating() {
        let calls = AtomicUsize::new(0);
        let model = |_: f64, _: f64, _: f64, _: f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            1.0
        };
        let tuner = DamperTuner::new(&model);

        let run = |name: &str| -> Result<TuningResult, EngineError> {
            let algorithm = Algorithm::from_name(name, BeesConfigBuilder::new().seed(1))?;
            let config = TuningConfigBuilder::new()
                .main_mass(1000.0)
                .main_frequency(10.0)
                .algorithm(algorithm)
                .build()?;
            tuner.optimize_search(&config, &ProgressReporter::new())
        };

        assert_eq!(
            run("genetic").unwrap_err(),
            EngineError::NotImplemented {
                algorithm: "genetic"
            }
        );
        assert_eq!(
            run("unknown").unwrap_err(),
            EngineError::UnknownAlgorithm {
                name: "unknown".to_string()
            }
        );
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn invalid_bounds_fail_before_evaluating() {
        let err = TuningConfigBuilder::new()
            .main_mass(1000.0)
            .main_frequency(10.0)
            .frequency_ratio_bounds((1.0, 0.5))
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidBound {
                parameter: "frequency_ratio",
                ..
            }
        ));
    }

    #[test]
    fn hand_built_config_with_invalid_main_system_fails_before_evaluating() {
        let calls = AtomicUsize::new(0);
        let model = |_: f64, _: f64, _: f64, _: f64| {
            calls.fetch_add(1, Ordering::Relaxed);
            1.0
        };
        let tuner = DamperTuner::new(&model);

        let mut config = end_to_end_config();
        config.main_mass = -1.0;
        assert_eq!(
            tuner
                .optimize_search(&config, &ProgressReporter::new())
                .unwrap_err(),
            EngineError::Config(ConfigError::NotPositive {
                parameter: "main_mass",
                value: -1.0,
            })
        );

        let mut config = end_to_end_config();
        config.main_frequency = f64::NAN;
        assert!(matches!(
            tuner.optimize_search(&config, &ProgressReporter::new()),
            Err(EngineError::Config(ConfigError::NotPositive {
                parameter: "main_frequency",
                ..
            }))
        ));
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn same_seed_gives_same_design() {
        let model = Transmissibility::default();
        let config = end_to_end_config();
        let tuner = DamperTuner::new(&model);
        let first = tuner
            .optimize_search(&config, &ProgressReporter::new())
            .unwrap();
        let second = tuner
            .optimize_search(&config, &ProgressReporter::new())
            .unwrap();
        assert_eq!(first, second);
    }
}
