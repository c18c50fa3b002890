use crate::core::response::{ResponseModel, ScanGrid};
use tracing::{debug, instrument};

/// A fixed absorber design in dimensionless form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignRatios {
    pub mass_ratio: f64,
    pub damping_ratio: f64,
    pub frequency_ratio: f64,
}

impl DesignRatios {
    pub fn new(mass_ratio: f64, damping_ratio: f64, frequency_ratio: f64) -> Self {
        Self {
            mass_ratio,
            damping_ratio,
            frequency_ratio,
        }
    }

    /// Reads ratios in optimizer dimension order: mass, damping, frequency.
    pub fn from_params(params: &[f64]) -> Option<Self> {
        match *params {
            [mass_ratio, damping_ratio, frequency_ratio] => {
                Some(Self::new(mass_ratio, damping_ratio, frequency_ratio))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsePoint {
    pub scanned_variable: f64,
    pub response: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseCurve {
    pub design: DesignRatios,
    pub points: Vec<ResponsePoint>,
}

impl ResponseCurve {
    /// The point with the largest response; NaN responses are ignored.
    pub fn peak(&self) -> Option<ResponsePoint> {
        self.points
            .iter()
            .filter(|p| !p.response.is_nan())
            .copied()
            .fold(None, |peak: Option<ResponsePoint>, point| match peak {
                Some(current) if current.response >= point.response => Some(current),
                _ => Some(point),
            })
    }
}

/// Largest response over the grid, starting from zero as the floor.
pub fn peak_response<M>(model: &M, design: DesignRatios, grid: &ScanGrid) -> f64
where
    M: ResponseModel + ?Sized,
{
    grid.values()
        .map(|r| {
            model.evaluate_response(
                design.mass_ratio,
                design.damping_ratio,
                design.frequency_ratio,
                r,
            )
        })
        .fold(0.0, |peak, response| if response > peak { response } else { peak })
}

#[instrument(skip_all, name = "response_scan", fields(points = grid.points))]
pub fn run<M>(model: &M, design: DesignRatios, grid: &ScanGrid) -> ResponseCurve
where
    M: ResponseModel + ?Sized,
{
    let points: Vec<ResponsePoint> = grid
        .values()
        .map(|r| ResponsePoint {
            scanned_variable: r,
            response: model.evaluate_response(
                design.mass_ratio,
                design.damping_ratio,
                design.frequency_ratio,
                r,
            ),
        })
        .collect();
    debug!(?design, "Response scan complete.");
    ResponseCurve { design, points }
}
