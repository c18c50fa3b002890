use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ToolHolderError {
    #[error("Unknown tool material '{name}' (expected steel, aluminum or carbide)")]
    UnknownMaterial { name: String },

    #[error("Tool parameter '{parameter}' must be a positive finite number, got {value}")]
    NotPositive { parameter: &'static str, value: f64 },
}

/// Bar stock a tool holder is machined from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Material {
    #[default]
    Steel,
    Aluminum,
    Carbide,
}

impl Material {
    pub const ALL: [Material; 3] = [Material::Steel, Material::Aluminum, Material::Carbide];

    /// Density in kg/m³.
    pub fn density(self) -> f64 {
        match self {
            Material::Steel => 7850.0,
            Material::Aluminum => 2700.0,
            Material::Carbide => 15000.0,
        }
    }

    /// Young's modulus in Pa.
    pub fn youngs_modulus(self) -> f64 {
        match self {
            Material::Steel => 210e9,
            Material::Aluminum => 69e9,
            Material::Carbide => 550e9,
        }
    }

    pub fn poissons_ratio(self) -> f64 {
        match self {
            Material::Steel => 0.3,
            Material::Aluminum => 0.33,
            Material::Carbide => 0.24,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Material::Steel => "steel",
            Material::Aluminum => "aluminum",
            Material::Carbide => "carbide",
        }
    }
}

impl FromStr for Material {
    type Err = ToolHolderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Material::ALL
            .into_iter()
            .find(|material| material.name().eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ToolHolderError::UnknownMaterial {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single-degree-of-freedom main system the absorber is tuned against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MainSystem {
    /// kg
    pub mass: f64,
    /// N/m
    pub stiffness: f64,
    /// N·s/m
    pub damping: f64,
    /// rad/s
    pub natural_frequency: f64,
}

impl MainSystem {
    /// Damping ratio recovered from the damping coefficient, `c / (2 m ω)`.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * self.mass * self.natural_frequency)
    }
}

/// A slender cylindrical tool holder treated as a cantilevered Euler-Bernoulli beam.
///
/// Lengths are given in millimetres at construction and stored in metres. When no mass is
/// supplied it is taken from the material density and the bar volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolHolder {
    length: f64,
    diameter: f64,
    material: Material,
    mass: f64,
}

impl ToolHolder {
    pub const DEFAULT_LENGTH_MM: f64 = 808.0;
    pub const DEFAULT_DIAMETER_MM: f64 = 20.0;
    pub const DEFAULT_MASS: f64 = 3.94;

    /// `(βL)²` for the first five bending modes of a cantilever.
    pub const MODE_CONSTANTS: [f64; 5] = [3.52, 22.0, 61.7, 121.0, 200.0];

    pub fn new(
        length_mm: f64,
        diameter_mm: f64,
        material: Material,
        mass: Option<f64>,
    ) -> Result<Self, ToolHolderError> {
        let positive = |parameter: &'static str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(ToolHolderError::NotPositive { parameter, value })
            }
        };
        let length = positive("length", length_mm)? / 1000.0;
        let diameter = positive("diameter", diameter_mm)? / 1000.0;
        let mass = match mass {
            Some(mass) => positive("mass", mass)?,
            None => material.density() * PI * (diameter / 2.0).powi(2) * length,
        };
        Ok(Self {
            length,
            diameter,
            material,
            mass,
        })
    }

    /// Length in m.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Diameter in m.
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn material(&self) -> Material {
        self.material
    }

    /// Mass in kg.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Cross-sectional area in m².
    pub fn area(&self) -> f64 {
        PI * (self.diameter / 2.0).powi(2)
    }

    /// Second moment of area in m⁴.
    pub fn moment_of_inertia(&self) -> f64 {
        PI * (self.diameter / 2.0).powi(4) / 4.0
    }

    /// Mass per unit length in kg/m.
    pub fn mass_per_length(&self) -> f64 {
        self.mass / self.length
    }

    /// Bending natural frequencies in Hz, one per entry of [`Self::MODE_CONSTANTS`].
    ///
    /// `f = K / (2π) · √(E I / (m' L⁴))` with `m'` the mass per length.
    pub fn natural_frequencies(&self) -> [f64; 5] {
        let base = (self.material.youngs_modulus() * self.moment_of_inertia()
            / (self.mass_per_length() * self.length.powi(4)))
        .sqrt();
        Self::MODE_CONSTANTS.map(|k| k / (2.0 * PI) * base)
    }

    /// First bending mode in rad/s.
    pub fn fundamental_frequency(&self) -> f64 {
        2.0 * PI * self.natural_frequencies()[0]
    }

    /// Static tip stiffness of the cantilever, `3 E I / L³`, in N/m.
    pub fn stiffness(&self) -> f64 {
        3.0 * self.material.youngs_modulus() * self.moment_of_inertia() / self.length.powi(3)
    }

    /// Viscous damping coefficient at the first mode for a given damping ratio.
    pub fn damping_coefficient(&self, damping_ratio: f64) -> f64 {
        2.0 * damping_ratio * self.mass * self.fundamental_frequency()
    }

    /// Reduces the holder to the main system seen by the absorber.
    pub fn to_main_system(&self, damping_ratio: f64) -> MainSystem {
        MainSystem {
            mass: self.mass,
            stiffness: self.stiffness(),
            damping: self.damping_coefficient(damping_ratio),
            natural_frequency: self.fundamental_frequency(),
        }
    }
}

impl Default for ToolHolder {
    fn default() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH_MM / 1000.0,
            diameter: Self::DEFAULT_DIAMETER_MM / 1000.0,
            material: Material::default(),
            mass: Self::DEFAULT_MASS,
        }
    }
}
