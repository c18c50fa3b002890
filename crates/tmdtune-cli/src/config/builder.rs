use super::defaults::DefaultsConfig;
use super::file::{FileBeesConfig, FileConfig, FileToolConfig};
use super::models::AppConfig;
use crate::cli::TuneArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use std::str::FromStr;
use tmdtune::core::tool_holder::{Material, ToolHolder};
use tmdtune::engine::config::{Algorithm, BeesConfigBuilder, TuningConfigBuilder};
use tmdtune::engine::error::EngineError;
use tracing::{debug, info, warn};

/// Merges built-in defaults, the config file, `--set` values and CLI flags, in increasing
/// order of precedence, into a validated tuning configuration.
pub fn build_config(args: &TuneArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let system_file = file_config.system.take().unwrap_or_default();
    let bounds_file = file_config.bounds.take().unwrap_or_default();
    let bees_file = file_config.bees.take().unwrap_or_default();

    let main_damping_ratio = args
        .main_damping
        .or(system_file.main_damping_ratio)
        .unwrap_or(defaults.main_damping_ratio);
    if !(main_damping_ratio.is_finite() && main_damping_ratio >= 0.0) {
        return Err(CliError::Config(format!(
            "Main-system damping ratio must be a non-negative finite number, got {}",
            main_damping_ratio
        )));
    }

    let tool = resolve_tool(args, file_config.tool.take())?
        .map(|holder| (holder, holder.to_main_system(main_damping_ratio)));
    let explicit_mass = args.main_mass.or(system_file.main_mass);
    let explicit_frequency = args.main_frequency.or(system_file.main_frequency);
    if tool.is_some() && (explicit_mass.is_some() || explicit_frequency.is_some()) {
        warn!("Explicit main-system values take precedence over the tool holder model.");
    }
    let tool_system = tool.map(|(_, system)| system);

    let algorithm_name = args
        .algorithm
        .as_deref()
        .or(file_config.algorithm.as_deref())
        .unwrap_or(&defaults.algorithm);
    let algorithm = Algorithm::from_name(algorithm_name, merge_bees(args, bees_file))?;

    let pair = |value: Option<[f64; 2]>| value.map(|[min, max]| (min, max));
    let mut builder = TuningConfigBuilder::new()
        .mass_ratio_bounds(
            args.mass_ratio_bounds
                .or(pair(bounds_file.mass_ratio))
                .unwrap_or(defaults.mass_ratio_bounds),
        )
        .damping_ratio_bounds(
            args.damping_ratio_bounds
                .or(pair(bounds_file.damping_ratio))
                .unwrap_or(defaults.damping_ratio_bounds),
        )
        .frequency_ratio_bounds(
            args.frequency_ratio_bounds
                .or(pair(bounds_file.frequency_ratio))
                .unwrap_or(defaults.frequency_ratio_bounds),
        )
        .algorithm(algorithm)
        .verbose(
            args.verbose_search
                || file_config
                    .verbose_search
                    .unwrap_or(defaults.verbose_search),
        );
    if let Some(mass) = explicit_mass.or(tool_system.map(|system| system.mass)) {
        builder = builder.main_mass(mass);
    }
    if let Some(frequency) =
        explicit_frequency.or(tool_system.map(|system| system.natural_frequency))
    {
        builder = builder.main_frequency(frequency);
    }

    let tuning = builder.build().map_err(EngineError::from)?;
    debug!("Merged tuning configuration: {:?}", tuning);

    Ok(AppConfig {
        tuning,
        main_damping_ratio,
        tool,
        history_path: args.history.clone(),
    })
}

/// A tool holder is used when `--tool`, any `--tool-*` option or a `[tool]` table is present.
/// Without an explicit mass the reference holder keeps its measured 3.94 kg and any other
/// holder is weighed from its material density.
fn resolve_tool(args: &TuneArgs, file: Option<FileToolConfig>) -> Result<Option<ToolHolder>> {
    let requested = args.tool
        || args.tool_length.is_some()
        || args.tool_diameter.is_some()
        || args.tool_material.is_some()
        || args.tool_mass.is_some()
        || file.is_some();
    if !requested {
        return Ok(None);
    }

    let file = file.unwrap_or_default();
    let length = args
        .tool_length
        .or(file.length)
        .unwrap_or(ToolHolder::DEFAULT_LENGTH_MM);
    let diameter = args
        .tool_diameter
        .or(file.diameter)
        .unwrap_or(ToolHolder::DEFAULT_DIAMETER_MM);
    let material = args
        .tool_material
        .as_deref()
        .or(file.material.as_deref())
        .map(Material::from_str)
        .transpose()?
        .unwrap_or_default();

    let is_reference = length == ToolHolder::DEFAULT_LENGTH_MM
        && diameter == ToolHolder::DEFAULT_DIAMETER_MM
        && material == Material::default();
    let mass = args
        .tool_mass
        .or(file.mass)
        .or(is_reference.then_some(ToolHolder::DEFAULT_MASS));

    let holder = ToolHolder::new(length, diameter, material, mass)?;
    info!(
        length_mm = length,
        diameter_mm = diameter,
        %material,
        mass = holder.mass(),
        "Using tool holder as the main system."
    );
    Ok(Some(holder))
}

fn merge_bees(args: &TuneArgs, file: FileBeesConfig) -> BeesConfigBuilder {
    let mut params = BeesConfigBuilder::new();
    if let Some(n) = args.scouts.or(file.n) {
        params = params.n(n);
    }
    if let Some(m) = args.selected_sites.or(file.m) {
        params = params.m(m);
    }
    if let Some(e) = args.elite_sites.or(file.e) {
        params = params.e(e);
    }
    if let Some(nep) = args.elite_recruits.or(file.nep) {
        params = params.nep(nep);
    }
    if let Some(nsp) = args.selected_recruits.or(file.nsp) {
        params = params.nsp(nsp);
    }
    if let Some(ngh) = args.patch_size.or(file.ngh) {
        params = params.ngh(ngh);
    }
    if let Some(iterations) = args.max_iterations.or(file.max_iterations) {
        params = params.max_iterations(iterations);
    }
    if let Some(seed) = args.seed.or(file.seed) {
        params = params.seed(seed);
    }
    params
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn parse_bounds(key: &str, value: &str) -> Result<[f64; 2]> {
    let (min, max) = parser::parse_bound_pair(value)
        .map_err(|e| CliError::Config(format!("Invalid value for {}: {}", key, e)))?;
    Ok([min, max])
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "algorithm" => config.algorithm = Some(value_str.trim().to_string()),
            "verbose-search" => {
                config.verbose_search = Some(parse_value(key, value_str, "boolean")?)
            }
            "system.main-mass" | "system.main-frequency" | "system.main-damping-ratio" => {
                let value = Some(parse_value(key, value_str, "float")?);
                let system = config.system.get_or_insert_with(Default::default);
                match key {
                    "system.main-mass" => system.main_mass = value,
                    "system.main-frequency" => system.main_frequency = value,
                    _ => system.main_damping_ratio = value,
                }
            }
            "tool.material" => {
                config.tool.get_or_insert_with(Default::default).material =
                    Some(value_str.trim().to_string());
            }
            "tool.length" | "tool.diameter" | "tool.mass" => {
                let value = Some(parse_value(key, value_str, "float")?);
                let tool = config.tool.get_or_insert_with(Default::default);
                match key {
                    "tool.length" => tool.length = value,
                    "tool.diameter" => tool.diameter = value,
                    _ => tool.mass = value,
                }
            }
            "bounds.mass-ratio" | "bounds.damping-ratio" | "bounds.frequency-ratio" => {
                let value = Some(parse_bounds(key, value_str)?);
                let bounds = config.bounds.get_or_insert_with(Default::default);
                match key {
                    "bounds.mass-ratio" => bounds.mass_ratio = value,
                    "bounds.damping-ratio" => bounds.damping_ratio = value,
                    _ => bounds.frequency_ratio = value,
                }
            }
            "bees.ngh" => {
                config.bees.get_or_insert_with(Default::default).ngh =
                    Some(parse_value(key, value_str, "float")?);
            }
            "bees.seed" => {
                config.bees.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "bees.n" | "bees.m" | "bees.e" | "bees.nep" | "bees.nsp" | "bees.max-iterations" => {
                let value = Some(parse_value(key, value_str, "integer")?);
                let bees = config.bees.get_or_insert_with(Default::default);
                match key {
                    "bees.n" => bees.n = value,
                    "bees.m" => bees.m = value,
                    "bees.e" => bees.e = value,
                    "bees.nep" => bees.nep = value,
                    "bees.nsp" => bees.nsp = value,
                    _ => bees.max_iterations = value,
                }
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
