/// Default main-system damping ratio used by [`Transmissibility`].
pub const DEFAULT_MAIN_DAMPING_RATIO: f64 = 0.05;

/// A physics evaluator mapping an absorber design and a scanned variable to a scalar response.
///
/// The scanned variable is the forcing-to-main-natural-frequency ratio `r`. Implementations are
/// expected to be pure: identical inputs give identical outputs, with no side effects.
pub trait ResponseModel {
    fn evaluate_response(
        &self,
        mass_ratio: f64,
        damping_ratio: f64,
        frequency_ratio: f64,
        scanned_variable: f64,
    ) -> f64;
}

impl<F> ResponseModel for F
where
    F: Fn(f64, f64, f64, f64) -> f64,
{
    #[inline]
    fn evaluate_response(
        &self,
        mass_ratio: f64,
        damping_ratio: f64,
        frequency_ratio: f64,
        scanned_variable: f64,
    ) -> f64 {
        self(mass_ratio, damping_ratio, frequency_ratio, scanned_variable)
    }
}

/// Force transmissibility of a damped main system carrying a damped tuned mass damper.
///
/// With `r` the forcing frequency ratio, `β` the absorber frequency ratio, `μ` the mass ratio,
/// `ζa` the absorber damping ratio and `ζb` the main-system damping ratio:
///
/// ```text
///            (β² − r²)² + 4 r² ζa²
/// T² = ───────────────────────────────────────────────────────────────────────
///      ((1 − r²)(β² − r²) − μ β² r² − 4 ζa ζb r²)² + 4 r² (ζa(1 − r² − μ r²) + ζb(β² − r²))²
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transmissibility {
    pub main_damping_ratio: f64,
}

impl Transmissibility {
    pub fn new(main_damping_ratio: f64) -> Self {
        Self { main_damping_ratio }
    }

    pub fn at(&self, r: f64, beta: f64, mu: f64, zeta_a: f64) -> f64 {
        let zeta_b = self.main_damping_ratio;
        let r2 = r * r;
        let beta2 = beta * beta;

        let numerator = (beta2 - r2).powi(2) + 4.0 * r2 * zeta_a * zeta_a;

        let real = (1.0 - r2) * (beta2 - r2) - mu * beta2 * r2 - 4.0 * zeta_a * zeta_b * r2;
        let imag = zeta_a * (1.0 - r2 - mu * r2) + zeta_b * (beta2 - r2);
        let denominator = real * real + 4.0 * r2 * imag * imag;

        (numerator / denominator).sqrt()
    }
}

impl Default for Transmissibility {
    fn default() -> Self {
        Self::new(DEFAULT_MAIN_DAMPING_RATIO)
    }
}

impl ResponseModel for Transmissibility {
    fn evaluate_response(
        &self,
        mass_ratio: f64,
        damping_ratio: f64,
        frequency_ratio: f64,
        scanned_variable: f64,
    ) -> f64 {
        self.at(scanned_variable, frequency_ratio, mass_ratio, damping_ratio)
    }
}

/// An evenly spaced grid over the scanned variable, both ends included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanGrid {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl ScanGrid {
    pub const DEFAULT_START: f64 = 0.1;
    pub const DEFAULT_END: f64 = 2.5;
    pub const DEFAULT_POINTS: usize = 100;

    pub const fn new(start: f64, end: f64, points: usize) -> Self {
        Self { start, end, points }
    }

    pub fn value_at(&self, index: usize) -> f64 {
        if self.points <= 1 {
            return self.start;
        }
        if index + 1 == self.points {
            return self.end;
        }
        let step = (self.end - self.start) / (self.points - 1) as f64;
        self.start + step * index as f64
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.points).map(move |i| self.value_at(i))
    }
}

impl Default for ScanGrid {
    fn default() -> Self {
        Self::new(Self::DEFAULT_START, Self::DEFAULT_END, Self::DEFAULT_POINTS)
    }
}
