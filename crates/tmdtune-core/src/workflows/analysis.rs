use super::scan::{self, DesignRatios, ResponseCurve};
use crate::core::response::{ResponseModel, ScanGrid};
use std::fmt;
use tracing::{debug, instrument};

/// Forcing frequency ratios 0.1 to 2.0 in steps of 0.005.
pub const ANALYSIS_GRID: ScanGrid = ScanGrid::new(0.1, 2.0, 381);

pub const FREQUENCY_RATIOS: [f64; 6] = [0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

/// Fixed damping ratios; the optimum for the mass ratio is added to these.
pub const DAMPING_RATIOS: [f64; 4] = [0.1, 0.3, 0.6, 0.99];

pub const MASS_RATIO_STEP: f64 = 0.05;
pub const MASS_RATIO_COUNT: usize = 11;

/// Den Hartog optimal tuning, `β = 1 / (1 + μ)`.
pub fn optimal_frequency_ratio(mass_ratio: f64) -> f64 {
    1.0 / (1.0 + mass_ratio)
}

/// Optimal absorber damping, `ζ = √(3μ / (8 (1 + μ)))`.
pub fn optimal_damping_ratio(mass_ratio: f64) -> f64 {
    (3.0 * mass_ratio / (8.0 * (1.0 + mass_ratio))).sqrt()
}

pub fn optimal_design(mass_ratio: f64) -> DesignRatios {
    DesignRatios::new(
        mass_ratio,
        optimal_damping_ratio(mass_ratio),
        optimal_frequency_ratio(mass_ratio),
    )
}

/// The design ratio varied across a family of response curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweptParameter {
    FrequencyRatio,
    DampingRatio,
    MassRatio,
}

impl SweptParameter {
    pub fn name(self) -> &'static str {
        match self {
            SweptParameter::FrequencyRatio => "frequency_ratio",
            SweptParameter::DampingRatio => "damping_ratio",
            SweptParameter::MassRatio => "mass_ratio",
        }
    }

    /// Reads the swept ratio out of a design.
    pub fn value_of(self, design: &DesignRatios) -> f64 {
        match self {
            SweptParameter::FrequencyRatio => design.frequency_ratio,
            SweptParameter::DampingRatio => design.damping_ratio,
            SweptParameter::MassRatio => design.mass_ratio,
        }
    }
}

impl fmt::Display for SweptParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Response curves that differ only in one design ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseFamily {
    pub swept: SweptParameter,
    /// Optimal design at the mass ratio the family was built for.
    pub reference: DesignRatios,
    pub curves: Vec<ResponseCurve>,
}

impl ResponseFamily {
    /// `(swept value, peak response)` for each curve, in curve order.
    pub fn peaks(&self) -> Vec<(f64, f64)> {
        self.curves
            .iter()
            .filter_map(|curve| {
                curve
                    .peak()
                    .map(|peak| (self.swept.value_of(&curve.design), peak.response))
            })
            .collect()
    }

    /// The curve whose peak response is lowest.
    pub fn lowest_peak(&self) -> Option<(f64, f64)> {
        self.peaks()
            .into_iter()
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Varies the frequency ratio at the optimal damping for `mass_ratio`.
#[instrument(skip_all, name = "frequency_ratio_sweep", fields(mass_ratio = mass_ratio))]
pub fn frequency_ratio_sweep<M>(model: &M, mass_ratio: f64, grid: &ScanGrid) -> ResponseFamily
where
    M: ResponseModel + ?Sized,
{
    let reference = optimal_design(mass_ratio);
    let designs = FREQUENCY_RATIOS.iter().map(|&frequency_ratio| DesignRatios {
        frequency_ratio,
        ..reference
    });
    family(model, SweptParameter::FrequencyRatio, reference, designs, grid)
}

/// Varies the damping ratio at the optimal tuning for `mass_ratio`.
#[instrument(skip_all, name = "damping_ratio_sweep", fields(mass_ratio = mass_ratio))]
pub fn damping_ratio_sweep<M>(model: &M, mass_ratio: f64, grid: &ScanGrid) -> ResponseFamily
where
    M: ResponseModel + ?Sized,
{
    let reference = optimal_design(mass_ratio);
    let mut damping_ratios = DAMPING_RATIOS.to_vec();
    damping_ratios.push(reference.damping_ratio);
    damping_ratios.sort_by(f64::total_cmp);
    let designs = damping_ratios.into_iter().map(|damping_ratio| DesignRatios {
        damping_ratio,
        ..reference
    });
    family(model, SweptParameter::DampingRatio, reference, designs, grid)
}

/// Varies the mass ratio from 0.05 to 0.55, each curve optimally tuned and damped.
#[instrument(skip_all, name = "mass_ratio_sweep", fields(mass_ratio = mass_ratio))]
pub fn mass_ratio_sweep<M>(model: &M, mass_ratio: f64, grid: &ScanGrid) -> ResponseFamily
where
    M: ResponseModel + ?Sized,
{
    let designs = (1..=MASS_RATIO_COUNT).map(|i| optimal_design(MASS_RATIO_STEP * i as f64));
    family(
        model,
        SweptParameter::MassRatio,
        optimal_design(mass_ratio),
        designs,
        grid,
    )
}

pub fn sweep<M>(
    model: &M,
    swept: SweptParameter,
    mass_ratio: f64,
    grid: &ScanGrid,
) -> ResponseFamily
where
    M: ResponseModel + ?Sized,
{
    match swept {
        SweptParameter::FrequencyRatio => frequency_ratio_sweep(model, mass_ratio, grid),
        SweptParameter::DampingRatio => damping_ratio_sweep(model, mass_ratio, grid),
        SweptParameter::MassRatio => mass_ratio_sweep(model, mass_ratio, grid),
    }
}

fn family<M>(
    model: &M,
    swept: SweptParameter,
    reference: DesignRatios,
    designs: impl Iterator<Item = DesignRatios>,
    grid: &ScanGrid,
) -> ResponseFamily
where
    M: ResponseModel + ?Sized,
{
    let curves: Vec<ResponseCurve> = designs.map(|design| scan::run(model, design, grid)).collect();
    debug!(%swept, curves = curves.len(), "Response family complete.");
    ResponseFamily {
        swept,
        reference,
        curves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::response::Transmissibility;

    #[test]
    fn optimal_ratios_at_five_percent_mass() {
        assert!((optimal_frequency_ratio(0.05) - 0.952_381).abs() < 1e-6);
        assert!((optimal_damping_ratio(0.05) - 0.133_631).abs() < 1e-6);
        assert_eq!(optimal_design(0.05).mass_ratio, 0.05);
    }

    #[test]
    fn analysis_grid_steps_by_half_a_percent() {
        assert_eq!(ANALYSIS_GRID.value_at(0), 0.1);
        assert!((ANALYSIS_GRID.value_at(1) - 0.105).abs() < 1e-12);
        assert_eq!(ANALYSIS_GRID.value_at(380), 2.0);
    }

    #[test]
    fn sweeps_produce_one_curve_per_swept_value() {
        let model = Transmissibility::default();
        for (swept, count) in [
            (SweptParameter::FrequencyRatio, 6),
            (SweptParameter::DampingRatio, 5),
            (SweptParameter::MassRatio, 11),
        ] {
            let family = sweep(&model, swept, 0.05, &ANALYSIS_GRID);
            assert_eq!(family.swept, swept);
            assert_eq!(family.curves.len(), count);
            assert!(family.curves.iter().all(|c| c.points.len() == 381));
        }
    }

    #[test]
    fn frequency_sweep_holds_mass_and_damping_at_reference() {
        let family = frequency_ratio_sweep(&Transmissibility::default(), 0.05, &ANALYSIS_GRID);
        let values: Vec<f64> = family.peaks().iter().map(|&(beta, _)| beta).collect();
        assert_eq!(values, FREQUENCY_RATIOS.to_vec());
        for curve in &family.curves {
            assert_eq!(curve.design.mass_ratio, 0.05);
            assert_eq!(curve.design.damping_ratio, family.reference.damping_ratio);
        }
        // 0.9 is the listed ratio closest to the 0.952 optimum.
        assert_eq!(family.lowest_peak().unwrap().0, 0.9);
    }

    #[test]
    fn optimal_damping_gives_the_lowest_peak() {
        let family = damping_ratio_sweep(&Transmissibility::default(), 0.05, &ANALYSIS_GRID);
        let (zeta, peak) = family.lowest_peak().unwrap();
        assert_eq!(zeta, optimal_damping_ratio(0.05));
        assert!((peak - 4.4007).abs() < 1e-3);
        let values: Vec<f64> = family.peaks().iter().map(|&(z, _)| z).collect();
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn heavier_optimal_absorbers_lower_the_peak() {
        let family = mass_ratio_sweep(&Transmissibility::default(), 0.1, &ANALYSIS_GRID);
        let peaks = family.peaks();
        assert!((peaks[0].0 - 0.05).abs() < 1e-12);
        assert!((peaks[10].0 - 0.55).abs() < 1e-12);
        assert!(peaks.windows(2).all(|w| w[1].1 < w[0].1));
        assert_eq!(family.reference, optimal_design(0.1));
    }
}
