//! # Engine Module
//!
//! This module implements the Bees Algorithm, a population-based stochastic optimizer that
//! searches a box-bounded continuous space for the extremum of a scalar objective.
//!
//! ## Overview
//!
//! Each generation the engine keeps the best `m` sites of its scout population, recruits a
//! neighborhood of bees around each of them (more around the `e` elite sites than around the
//! others) and replaces the rest of the population with fresh random scouts. The neighborhood
//! half-width shrinks linearly over the run, moving the search from exploration towards
//! exploitation, while the fresh scouts keep injecting global exploration.
//!
//! ## Architecture
//!
//! - **Algorithm** ([`bees`]) - The generation loop and neighborhood search
//! - **Configuration** ([`config`]) - Hyperparameters, search space, algorithm selection and validation
//! - **Objective** ([`objective`]) - The objective capability and the sign-wrapped internal fitness
//! - **State Tracking** ([`state`]) - Global-best snapshots, run statistics and the run outcome
//! - **Progress Monitoring** ([`progress`]) - Optional callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level error taxonomy
//!
//! ## Key Capabilities
//!
//! - **Fail-fast validation** of every hyperparameter and bound before any evaluation
//! - **Deterministic runs** for a fixed seed
//! - **Optional parallel evaluation** (`parallel` feature) without changing results

pub mod bees;
pub mod config;
pub mod error;
pub mod objective;
pub mod progress;
pub mod state;
pub(crate) mod utils;
