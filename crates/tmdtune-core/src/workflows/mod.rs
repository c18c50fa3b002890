//! # Workflows Module
//!
//! High-level entry points that tie the domain-agnostic [`crate::engine`] to the damper
//! physics in [`crate::core`].
//!
//! ## Architecture
//!
//! - **Tuning Workflow** ([`tune`]) - Builds the peak-response objective, runs the selected
//!   algorithm over the mass/damping/frequency ratio box and translates the optimum into
//!   absorber mass, stiffness, damping and natural frequency.
//! - **Response Scan** ([`scan`]) - Evaluates a response model over a grid of forcing
//!   frequency ratios for a fixed design and reports the curve and its peak.
//! - **Parameter Analysis** ([`analysis`]) - Families of response curves around the optimal
//!   tuning, varying one of frequency, damping or mass ratio at a time.

pub mod analysis;
pub mod scan;
pub mod tune;
