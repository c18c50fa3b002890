use tmdtune::core::response::DEFAULT_MAIN_DAMPING_RATIO;
use tmdtune::engine::config::SearchSpace;

pub struct DefaultsConfig {
    pub algorithm: String,
    pub main_damping_ratio: f64,
    pub mass_ratio_bounds: (f64, f64),
    pub damping_ratio_bounds: (f64, f64),
    pub frequency_ratio_bounds: (f64, f64),
    pub verbose_search: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            algorithm: "bees".to_string(),
            main_damping_ratio: DEFAULT_MAIN_DAMPING_RATIO,
            mass_ratio_bounds: SearchSpace::DEFAULT_MASS_RATIO,
            damping_ratio_bounds: SearchSpace::DEFAULT_DAMPING_RATIO,
            frequency_ratio_bounds: SearchSpace::DEFAULT_FREQUENCY_RATIO,
            verbose_search: false,
        }
    }
}
