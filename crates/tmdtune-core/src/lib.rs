//! # tmdtune Core Library
//!
//! A population-based stochastic optimizer (the Bees Algorithm) and the workflow that uses it
//! to tune a tuned mass damper (TMD): the mass ratio, damping ratio and frequency ratio of a
//! secondary absorber attached to a vibrating main system.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless value types (`Bound`, `Candidate`), the
//!   `ResponseModel` collaborator trait with its transmissibility implementation, the
//!   closed-form translation from optimized ratios to physical absorber properties, and the
//!   tool-holder beam model that can stand in for the main system.
//!
//! - **[`engine`]: The Logic Core.** The domain-agnostic Bees Algorithm. It knows nothing about
//!   dampers; it sees only an objective function and a box of numeric bounds. Configuration,
//!   validation, run statistics and progress reporting live here.
//!
//! - **[`workflows`]: The Public API.** Builds the peak-response objective, configures the
//!   search space and algorithm, runs the engine and derives the physical absorber design.
//!   Response scans and one-ratio-at-a-time analyses around the optimal tuning sit beside it.

pub mod core;
pub mod engine;
pub mod workflows;
