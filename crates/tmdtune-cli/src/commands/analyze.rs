use super::scan::{FORCING_RATIO_COLUMN, grid_and_model};
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use std::io;
use std::path::PathBuf;
use tmdtune::workflows::analysis::{self, ResponseFamily};
use tracing::info;

pub fn run(args: AnalyzeArgs) -> Result<()> {
    let family = analyze(&args)?;
    print_summary(&family);

    match &args.output {
        Some(path) => {
            info!("Writing response family to {:?}", path);
            let csv_error = |source: csv::Error| CliError::Csv {
                path: path.to_path_buf(),
                source,
            };
            let writer = csv::Writer::from_path(path).map_err(csv_error)?;
            write_family(writer, &family).map_err(csv_error)?;
            println!(
                "✓ {} curves written to: {}",
                family.curves.len(),
                path.display()
            );
        }
        None => write_family(csv::Writer::from_writer(io::stdout()), &family).map_err(
            |source| CliError::Csv {
                path: PathBuf::from("<stdout>"),
                source,
            },
        )?,
    }

    Ok(())
}

fn analyze(args: &AnalyzeArgs) -> Result<ResponseFamily> {
    if !(args.mass_ratio.is_finite() && args.mass_ratio > 0.0) {
        return Err(CliError::Argument(format!(
            "Mass ratio must be a positive finite number, got {}",
            args.mass_ratio
        )));
    }
    let (grid, model) = grid_and_model(args.range, args.points, args.main_damping)?;
    Ok(analysis::sweep(
        &model,
        args.sweep.into(),
        args.mass_ratio,
        &grid,
    ))
}

fn print_summary(family: &ResponseFamily) {
    let reference = &family.reference;
    println!(
        "Optimal design at mass ratio {:.4}: frequency ratio {:.6}, damping ratio {:.6}",
        reference.mass_ratio, reference.frequency_ratio, reference.damping_ratio
    );
    for (value, peak) in family.peaks() {
        println!("  {} {:<8.4} peak {:.4}", family.swept, value, peak);
    }
    if let Some((value, peak)) = family.lowest_peak() {
        println!(
            "✓ Lowest peak {:.4} at {} {:.4}",
            peak, family.swept, value
        );
    }
}

/// One row per forcing ratio, one response column per curve.
fn write_family<W: io::Write>(
    mut writer: csv::Writer<W>,
    family: &ResponseFamily,
) -> csv::Result<()> {
    let mut header = vec![FORCING_RATIO_COLUMN.to_string()];
    header.extend(
        family
            .curves
            .iter()
            .map(|curve| format!("{}={}", family.swept, family.swept.value_of(&curve.design))),
    );
    writer.write_record(&header)?;

    if let Some(first) = family.curves.first() {
        for (i, point) in first.points.iter().enumerate() {
            let mut row = vec![point.scanned_variable.to_string()];
            row.extend(
                family
                    .curves
                    .iter()
                    .map(|curve| curve.points[i].response.to_string()),
            );
            writer.write_record(&row)?;
        }
    }
    writer.flush()?;
    Ok(())
}
