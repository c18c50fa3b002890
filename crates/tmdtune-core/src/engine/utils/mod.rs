//! Shared helpers for the optimization engine.

pub mod sampling;
