use crate::core::bounds::{Bound, BoundError};
use super::error::EngineError;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Parameter '{parameter}' must be greater than zero")]
    ZeroCount { parameter: &'static str },

    #[error("Selected sites m ({m}) cannot exceed the scout population n ({n})")]
    SelectedExceedsPopulation { m: usize, n: usize },

    #[error("Elite sites e ({e}) cannot exceed the selected sites m ({m})")]
    EliteExceedsSelected { e: usize, m: usize },

    #[error("Parameter '{parameter}' must be a positive finite number, got {value}")]
    NotPositive { parameter: &'static str, value: f64 },

    #[error("Bound for '{parameter}' is invalid: {source}")]
    InvalidBound {
        parameter: &'static str,
        #[source]
        source: BoundError,
    },

    #[error("At least one bound is required")]
    EmptyBounds,
}

/// Hyperparameters of the Bees Algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct BeesConfig {
    /// Scout population size per generation.
    pub n: usize,
    /// Number of top sites kept for neighborhood search.
    pub m: usize,
    /// Number of the selected sites treated as elite.
    pub e: usize,
    /// Bees recruited around each elite site (the site itself included).
    pub nep: usize,
    /// Bees recruited around each non-elite selected site (the site itself included).
    pub nsp: usize,
    /// Initial neighborhood half-width as a fraction of each dimension's range.
    pub ngh: f64,
    /// Number of generations to run.
    pub max_iterations: usize,
    /// Seed for the random number generator; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl BeesConfig {
    pub const DEFAULT_N: usize = 20;
    pub const DEFAULT_M: usize = 10;
    pub const DEFAULT_E: usize = 4;
    pub const DEFAULT_NEP: usize = 10;
    pub const DEFAULT_NSP: usize = 10;
    pub const DEFAULT_NGH: f64 = 0.02;
    pub const DEFAULT_MAX_ITERATIONS: usize = 100;

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (parameter, value) in [
            ("n", self.n),
            ("m", self.m),
            ("nep", self.nep),
            ("nsp", self.nsp),
            ("max_iterations", self.max_iterations),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroCount { parameter });
            }
        }
        if self.m > self.n {
            return Err(ConfigError::SelectedExceedsPopulation {
                m: self.m,
                n: self.n,
            });
        }
        if self.e > self.m {
            return Err(ConfigError::EliteExceedsSelected {
                e: self.e,
                m: self.m,
            });
        }
        if !(self.ngh.is_finite() && self.ngh > 0.0) {
            return Err(ConfigError::NotPositive {
                parameter: "ngh",
                value: self.ngh,
            });
        }
        Ok(())
    }

    pub(crate) fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for BeesConfig {
    fn default() -> Self {
        Self {
            n: Self::DEFAULT_N,
            m: Self::DEFAULT_M,
            e: Self::DEFAULT_E,
            nep: Self::DEFAULT_NEP,
            nsp: Self::DEFAULT_NSP,
            ngh: Self::DEFAULT_NGH,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

/// Caller overrides for [`BeesConfig`]; unset fields fall back to the algorithm defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BeesConfigBuilder {
    n: Option<usize>,
    m: Option<usize>,
    e: Option<usize>,
    nep: Option<usize>,
    nsp: Option<usize>,
    ngh: Option<f64>,
    max_iterations: Option<usize>,
    seed: Option<u64>,
}

impl BeesConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn n(mut self, n: usize) -> Self {
        self.n = Some(n);
        self
    }
    pub fn m(mut self, m: usize) -> Self {
        self.m = Some(m);
        self
    }
    pub fn e(mut self, e: usize) -> Self {
        self.e = Some(e);
        self
    }
    pub fn nep(mut self, nep: usize) -> Self {
        self.nep = Some(nep);
        self
    }
    pub fn nsp(mut self, nsp: usize) -> Self {
        self.nsp = Some(nsp);
        self
    }
    pub fn ngh(mut self, ngh: f64) -> Self {
        self.ngh = Some(ngh);
        self
    }
    pub fn max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<BeesConfig, ConfigError> {
        let defaults = BeesConfig::default();
        let config = BeesConfig {
            n: self.n.unwrap_or(defaults.n),
            m: self.m.unwrap_or(defaults.m),
            e: self.e.unwrap_or(defaults.e),
            nep: self.nep.unwrap_or(defaults.nep),
            nsp: self.nsp.unwrap_or(defaults.nsp),
            ngh: self.ngh.unwrap_or(defaults.ngh),
            max_iterations: self.max_iterations.unwrap_or(defaults.max_iterations),
            seed: self.seed.or(defaults.seed),
        };
        config.validate()?;
        Ok(config)
    }
}

/// The three-dimensional box searched by the tuning workflow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSpace {
    pub mass_ratio: Bound,
    pub damping_ratio: Bound,
    pub frequency_ratio: Bound,
}

impl SearchSpace {
    pub const DEFAULT_MASS_RATIO: (f64, f64) = (0.01, 0.25);
    pub const DEFAULT_DAMPING_RATIO: (f64, f64) = (0.01, 0.5);
    pub const DEFAULT_FREQUENCY_RATIO: (f64, f64) = (0.5, 1.0);

    pub fn from_pairs(
        mass_ratio: (f64, f64),
        damping_ratio: (f64, f64),
        frequency_ratio: (f64, f64),
    ) -> Result<Self, ConfigError> {
        let bound = |parameter: &'static str, (min, max): (f64, f64)| {
            Bound::new(min, max).map_err(|source| ConfigError::InvalidBound { parameter, source })
        };
        Ok(Self {
            mass_ratio: bound("mass_ratio", mass_ratio)?,
            damping_ratio: bound("damping_ratio", damping_ratio)?,
            frequency_ratio: bound("frequency_ratio", frequency_ratio)?,
        })
    }

    /// Bounds in optimizer dimension order: mass ratio, damping ratio, frequency ratio.
    pub fn bounds(&self) -> [Bound; 3] {
        [self.mass_ratio, self.damping_ratio, self.frequency_ratio]
    }
}

impl Default for SearchSpace {
    fn default() -> Self {
        let bound = |(min, max): (f64, f64)| Bound::from_ordered(min, max);
        Self {
            mass_ratio: bound(Self::DEFAULT_MASS_RATIO),
            damping_ratio: bound(Self::DEFAULT_DAMPING_RATIO),
            frequency_ratio: bound(Self::DEFAULT_FREQUENCY_RATIO),
        }
    }
}

/// Names accepted by the string-keyed algorithm lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmKind {
    Bees,
}

impl FromStr for AlgorithmKind {
    type Err = EngineError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "bees" => Ok(Self::Bees),
            "genetic" => Err(EngineError::NotImplemented {
                algorithm: "genetic",
            }),
            _ => Err(EngineError::UnknownAlgorithm {
                name: name.to_string(),
            }),
        }
    }
}

/// A supported optimization algorithm together with its validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Algorithm {
    Bees(BeesConfig),
}

impl Algorithm {
    /// Resolves an algorithm by name, applying the caller's hyperparameter overrides.
    pub fn from_name(name: &str, params: BeesConfigBuilder) -> Result<Self, EngineError> {
        match name.parse::<AlgorithmKind>()? {
            AlgorithmKind::Bees => Ok(Self::Bees(params.build()?)),
        }
    }

    pub fn kind(&self) -> AlgorithmKind {
        match self {
            Self::Bees(_) => AlgorithmKind::Bees,
        }
    }
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Bees(BeesConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuningConfig {
    /// Main-system mass in kg.
    pub main_mass: f64,
    /// Main-system natural frequency in rad/s.
    pub main_frequency: f64,
    pub search_space: SearchSpace,
    pub algorithm: Algorithm,
    pub verbose: bool,
}

impl TuningConfig {
    /// Re-checks the invariants the builder enforces. The fields are public, so a
    /// config assembled by hand has to pass through here before a search starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_main_system(self.main_mass, self.main_frequency)?;
        match &self.algorithm {
            Algorithm::Bees(config) => config.validate(),
        }
    }
}

fn validate_main_system(main_mass: f64, main_frequency: f64) -> Result<(), ConfigError> {
    for (parameter, value) in [("main_mass", main_mass), ("main_frequency", main_frequency)] {
        if !(value.is_finite() && value > 0.0) {
            return Err(ConfigError::NotPositive { parameter, value });
        }
    }
    Ok(())
}

#[derive(Default)]
pub struct TuningConfigBuilder {
    main_mass: Option<f64>,
    main_frequency: Option<f64>,
    mass_ratio_bounds: Option<(f64, f64)>,
    damping_ratio_bounds: Option<(f64, f64)>,
    frequency_ratio_bounds: Option<(f64, f64)>,
    algorithm: Option<Algorithm>,
    verbose: bool,
}

impl TuningConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn main_mass(mut self, mass: f64) -> Self {
        self.main_mass = Some(mass);
        self
    }
    pub fn main_frequency(mut self, frequency: f64) -> Self {
        self.main_frequency = Some(frequency);
        self
    }
    pub fn mass_ratio_bounds(mut self, bounds: (f64, f64)) -> Self {
        self.mass_ratio_bounds = Some(bounds);
        self
    }
    pub fn damping_ratio_bounds(mut self, bounds: (f64, f64)) -> Self {
        self.damping_ratio_bounds = Some(bounds);
        self
    }
    pub fn frequency_ratio_bounds(mut self, bounds: (f64, f64)) -> Self {
        self.frequency_ratio_bounds = Some(bounds);
        self
    }
    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn build(self) -> Result<TuningConfig, ConfigError> {
        let main_mass = self
            .main_mass
            .ok_or(ConfigError::MissingParameter("main_mass"))?;
        let main_frequency = self
            .main_frequency
            .ok_or(ConfigError::MissingParameter("main_frequency"))?;
        validate_main_system(main_mass, main_frequency)?;

        let search_space = SearchSpace::from_pairs(
            self.mass_ratio_bounds
                .unwrap_or(SearchSpace::DEFAULT_MASS_RATIO),
            self.damping_ratio_bounds
                .unwrap_or(SearchSpace::DEFAULT_DAMPING_RATIO),
            self.frequency_ratio_bounds
                .unwrap_or(SearchSpace::DEFAULT_FREQUENCY_RATIO),
        )?;

        let algorithm = self.algorithm.unwrap_or_default();
        match &algorithm {
            Algorithm::Bees(config) => config.validate()?,
        }

        Ok(TuningConfig {
            main_mass,
            main_frequency,
            search_space,
            algorithm,
            verbose: self.verbose,
        })
    }
}
