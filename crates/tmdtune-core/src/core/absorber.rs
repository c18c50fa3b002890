/// Physical properties of a tuned mass damper derived from its dimensionless design ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsorberProperties {
    /// Absorber mass in kg (`μ · m₁`).
    pub mass: f64,
    /// Absorber natural frequency in rad/s (`β · ω₁`).
    pub natural_frequency: f64,
    /// Absorber stiffness in N/m (`ω₂² · m₂`).
    pub stiffness: f64,
    /// Absorber viscous damping coefficient in N·s/m (`2 ζ m₂ ω₂`).
    pub damping: f64,
}

impl AbsorberProperties {
    /// Translates the optimized ratios using the main system's mass (kg) and natural
    /// frequency (rad/s).
    pub fn from_ratios(
        mass_ratio: f64,
        damping_ratio: f64,
        frequency_ratio: f64,
        main_mass: f64,
        main_frequency: f64,
    ) -> Self {
        let mass = mass_ratio * main_mass;
        let natural_frequency = frequency_ratio * main_frequency;
        let stiffness = natural_frequency.powi(2) * mass;
        let damping = 2.0 * damping_ratio * mass * natural_frequency;
        Self {
            mass,
            natural_frequency,
            stiffness,
            damping,
        }
    }
}
