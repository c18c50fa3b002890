use crate::cli::TuneArgs;
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use std::path::Path;
use tmdtune::{
    core::response::Transmissibility,
    engine::{progress::ProgressReporter, state::RunStatistics},
    workflows::tune::{DamperTuner, TuningResult},
};
use tracing::info;

pub fn run(args: TuneArgs, show_progress: bool) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args)?;

    let result = tune(&app_config, show_progress)?;
    print_summary(&app_config, &result);

    if let Some(path) = &app_config.history_path {
        info!("Writing run history to {:?}", path);
        write_history(path, &result.statistics)?;
        println!(
            "✓ History of {} generations written to: {}",
            result.statistics.len(),
            path.display()
        );
    }

    Ok(())
}

fn tune(app_config: &AppConfig, show_progress: bool) -> Result<TuningResult> {
    let model = Transmissibility::new(app_config.main_damping_ratio);

    let progress_handler = if show_progress {
        CliProgressHandler::new()
    } else {
        CliProgressHandler::hidden()
    };
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting absorber tuning...");
    info!("Invoking the core tuning workflow...");
    let result = DamperTuner::new(&model).optimize_search(&app_config.tuning, &reporter)?;
    Ok(result)
}

fn print_summary(app_config: &AppConfig, result: &TuningResult) {
    let tuning = &app_config.tuning;
    if let Some((holder, system)) = &app_config.tool {
        println!(
            "Tool holder: {} x {} mm {}, {:.4} kg, first mode {:.2} Hz, stiffness {:.1} N/m",
            holder.length() * 1000.0,
            holder.diameter() * 1000.0,
            holder.material(),
            holder.mass(),
            holder.natural_frequencies()[0],
            system.stiffness
        );
    }
    println!(
        "Main system: mass {:.4} kg, natural frequency {:.4} rad/s, damping ratio {:.4}",
        tuning.main_mass, tuning.main_frequency, app_config.main_damping_ratio
    );
    println!("✓ Optimized ratios:");
    println!("  mass ratio      {:.6}", result.mass_ratio);
    println!("  damping ratio   {:.6}", result.damping_ratio);
    println!("  frequency ratio {:.6}", result.frequency_ratio);
    println!("  peak response   {:.6}", result.peak_response);
    println!("✓ Absorber properties:");
    println!("  mass               {:.4} kg", result.absorber.mass);
    println!(
        "  natural frequency  {:.4} rad/s",
        result.absorber.natural_frequency
    );
    println!("  stiffness          {:.4} N/m", result.absorber.stiffness);
    println!("  damping            {:.4} N·s/m", result.absorber.damping);
}

/// Writes one CSV row per generation: index, best and mean objective values, and the best
/// parameter vector.
pub fn write_history(path: &Path, statistics: &RunStatistics) -> Result<()> {
    let csv_error = |source: csv::Error| CliError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_error)?;
    writer
        .write_record([
            "iteration",
            "best_value",
            "mean_value",
            "mass_ratio",
            "damping_ratio",
            "frequency_ratio",
        ])
        .map_err(csv_error)?;

    for record in statistics.iter() {
        let mut row = vec![
            record.iteration.to_string(),
            record.best_value.to_string(),
            record.mean_value.to_string(),
        ];
        row.extend(record.best_params.iter().map(f64::to_string));
        writer.write_record(&row).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}
