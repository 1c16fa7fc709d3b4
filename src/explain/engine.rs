//! Decision-path attribution.
//!
//! Walks each tree with the record. Whenever a split routes the record to a
//! child, the change in node value is credited to the split's feature. The
//! per-split changes telescope, so the decomposition is exact:
//! `baseline + contributions == margin`, where the baseline is the bias plus
//! every tree's root value.

use ndarray::ArrayView1;

use crate::model::tree::Node;
use crate::model::GradientBooster;

use super::types::Attribution;

pub fn attribute(booster: &GradientBooster, x: ArrayView1<'_, f64>) -> Attribution {
    let mut values = vec![0.0; x.len()];
    let mut baseline = booster.bias;

    for tree in &booster.trees {
        let nodes = tree.nodes();
        baseline += nodes[0].value();

        let mut index = 0;
        loop {
            match &nodes[index] {
                Node::Leaf { .. } => break,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    value,
                } => {
                    let next = if x[*feature] < *threshold { *left } else { *right };
                    values[*feature] += nodes[next].value() - value;
                    index = next;
                }
            }
        }
    }

    let margin = baseline + values.iter().sum::<f64>();
    Attribution {
        baseline,
        margin,
        values,
    }
}
