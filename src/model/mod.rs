//! Tree-ensemble model: training, persistence, serving.

pub mod artifact;
pub mod booster;
pub mod engine;
pub mod tree;

// Re-export common types
pub use artifact::{ArtifactError, ModelArtifact};
pub use booster::{BoosterParams, FitError, GradientBooster};
pub use engine::{RiskAssessment, RiskEngine};
pub use tree::RegressionTree;
