//! # Core Module
//!
//! Stateless building blocks shared by the optimization engine and the tuning workflows.
//!
//! ## Architecture
//!
//! - **Search Space Primitives** ([`bounds`], [`candidate`]) - Validated per-dimension boxes
//!   and scored parameter vectors
//! - **Physics Collaborator** ([`response`]) - The `ResponseModel` capability and the
//!   force-transmissibility model of a main system fitted with an absorber
//! - **Design Translation** ([`absorber`]) - Conversion of dimensionless ratios into absorber
//!   mass, stiffness, damping and natural frequency
//! - **Main-System Source** ([`tool_holder`]) - A cantilevered tool holder reduced to the
//!   mass, stiffness and damping of the system the absorber is fitted to
//!
//! ## Scientific Foundation
//!
//! The response model is the classical two-degree-of-freedom description of a damped main
//! system carrying a damped secondary mass. Its peak transmissibility over a band of forcing
//! frequencies is the worst-case criterion minimized by the tuning workflow.

pub mod absorber;
pub mod bounds;
pub mod candidate;
pub mod response;
pub mod tool_holder;
