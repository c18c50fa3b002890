use std::path::PathBuf;
use tmdtune::core::tool_holder::{MainSystem, ToolHolder};
use tmdtune::engine::config::TuningConfig;

/// Fully merged settings for one `tune` run.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub tuning: TuningConfig,
    pub main_damping_ratio: f64,
    /// Tool holder the main system was derived from, if one was configured.
    pub tool: Option<(ToolHolder, MainSystem)>,
    pub history_path: Option<PathBuf>,
}
