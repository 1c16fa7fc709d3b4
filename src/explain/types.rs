use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Raw attribution on the margin (log-odds) scale, indexed by feature
/// position. `baseline + values.sum() == margin`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribution {
    /// Expected score before seeing any feature: bias plus tree root values.
    pub baseline: f64,
    /// The model's raw score for the attributed record.
    pub margin: f64,
    pub values: Vec<f64>,
}

impl Attribution {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// A single feature's push on the score. Positive pushes risk higher,
/// negative pushes it lower.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub name: String,
    pub value: f64,
}

/// Named view of an attribution, ready for the response payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    pub baseline: f64,
    pub margin: f64,
    pub contributions: Vec<FeatureContribution>,
}

impl Explanation {
    pub fn named(attribution: Attribution, names: &[&str]) -> Self {
        let contributions = names
            .iter()
            .zip(attribution.values.iter())
            .map(|(name, value)| FeatureContribution {
                name: (*name).to_string(),
                value: *value,
            })
            .collect();

        Self {
            baseline: attribution.baseline,
            margin: attribution.margin,
            contributions,
        }
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        self.contributions
            .iter()
            .map(|c| (c.name.clone(), c.value))
            .collect()
    }
}
