//! HeartRisk - heart disease risk prediction with per-feature explanations.
//!
//! A thin HTTP service over a gradient-boosted tree classifier. The model is
//! trained offline by the `train` binary, persisted as a single JSON
//! artifact, and loaded once at server startup. Every prediction request
//! returns the hard class, the positive-class probability, and an additive
//! per-feature attribution for that single record.

pub mod app;
pub mod config;
pub mod dataset;
pub mod error;
pub mod explain;
pub mod features;
pub mod handlers;
pub mod model;
pub mod training;

pub use error::{AppError, AppResult};
