use crate::cli::ScanArgs;
use crate::error::{CliError, Result};
use std::io;
use std::path::PathBuf;
use tmdtune::core::bounds::Bound;
use tmdtune::core::response::{ScanGrid, Transmissibility};
use tmdtune::workflows::scan::{self, DesignRatios, ResponseCurve};
use tracing::info;

/// Column holding the scanned forcing frequency ratio r, distinct from the absorber's
/// tuning frequency ratio.
pub(crate) const FORCING_RATIO_COLUMN: &str = "forcing_ratio";

pub fn run(args: ScanArgs) -> Result<()> {
    let curve = scan_curve(&args)?;

    match curve.peak() {
        Some(peak) => println!(
            "✓ Peak response {:.6} at forcing frequency ratio {:.4}",
            peak.response, peak.scanned_variable
        ),
        None => println!("Warning: the response curve contains no finite values."),
    }

    match &args.output {
        Some(path) => {
            info!("Writing response curve to {:?}", path);
            let writer = csv::Writer::from_path(path).map_err(|source| CliError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            write_curve(writer, &curve).map_err(|source| CliError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            println!(
                "✓ {} points written to: {}",
                curve.points.len(),
                path.display()
            );
        }
        None => write_curve(csv::Writer::from_writer(io::stdout()), &curve).map_err(|source| {
            CliError::Csv {
                path: PathBuf::from("<stdout>"),
                source,
            }
        })?,
    }

    Ok(())
}

fn scan_curve(args: &ScanArgs) -> Result<ResponseCurve> {
    let (grid, model) = grid_and_model(args.range, args.points, args.main_damping)?;
    let design = DesignRatios::new(args.mass_ratio, args.damping_ratio, args.frequency_ratio);
    Ok(scan::run(&model, design, &grid))
}

/// Validates the scan options shared by `scan` and `analyze`.
pub(crate) fn grid_and_model(
    (start, end): (f64, f64),
    points: usize,
    main_damping: f64,
) -> Result<(ScanGrid, Transmissibility)> {
    let range = Bound::new(start, end)
        .map_err(|e| CliError::Argument(format!("Invalid scan range: {}", e)))?;
    if points < 2 {
        return Err(CliError::Argument(format!(
            "A scan needs at least 2 points, got {}",
            points
        )));
    }
    if !(main_damping.is_finite() && main_damping >= 0.0) {
        return Err(CliError::Argument(format!(
            "Main-system damping ratio must be a non-negative finite number, got {}",
            main_damping
        )));
    }
    Ok((
        ScanGrid::new(range.min(), range.max(), points),
        Transmissibility::new(main_damping),
    ))
}

fn write_curve<W: io::Write>(mut writer: csv::Writer<W>, curve: &ResponseCurve) -> csv::Result<()> {
    writer.write_record([FORCING_RATIO_COLUMN, "response"])?;
    for point in &curve.points {
        writer.write_record([
            point.scanned_variable.to_string(),
            point.response.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn scan_args(output: Option<PathBuf>) -> ScanArgs {
        ScanArgs {
            mass_ratio: 0.1,
            damping_ratio: 0.1,
            frequency_ratio: 0.9,
            main_damping: 0.05,
            range: (0.1, 2.5),
            points: 100,
            output,
        }
    }

    #[test]
    fn scan_curve_spans_the_requested_range() {
        let curve = scan_curve(&scan_args(None)).unwrap();
        assert_eq!(curve.points.len(), 100);
        assert_eq!(curve.points[0].scanned_variable, 0.1);
        assert_eq!(curve.points[99].scanned_variable, 2.5);

        let peak = curve.peak().unwrap();
        assert!(peak.response > 1.0);
        assert!(peak.scanned_variable > 0.5 && peak.scanned_variable < 1.5);
    }

    #[test]
    fn scan_rejects_degenerate_grids() {
        let mut args = scan_args(None);
        args.points = 1;
        assert!(matches!(scan_curve(&args), Err(CliError::Argument(_))));

        let mut args = scan_args(None);
        args.range = (2.5, 0.1);
        assert!(matches!(scan_curve(&args), Err(CliError::Argument(_))));
    }

    #[test]
    fn run_writes_curve_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        let mut args = scan_args(Some(path.clone()));
        args.points = 11;

        run(args).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "forcing_ratio");
        assert_eq!(&headers[1], "response");
        let rows: Vec<(f64, f64)> = reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].parse().unwrap(), r[1].parse().unwrap())
            })
            .collect();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[10].0, 2.5);
        assert!(rows.iter().all(|&(_, response)| response > 0.0));
    }
}
