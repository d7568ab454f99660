use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::feature::{Label, LabeledFeatures};
use crate::knn::squared_distance;

pub const DEFAULT_K: usize = 3;

// Field order matters: neighbors order by distance first, then by training index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Neighbor {
    pub distance: u64,
    pub index: usize,
}

// Reject inputs that can't produce a label, then check every training vector
// against the query length before any distance is computed
pub(crate) fn validate(query: &[u8], train: &[LabeledFeatures], k: usize) -> Result<()> {
    if k == 0 {
        return Err(AppError::InvalidK.into());
    }
    if train.is_empty() {
        return Err(AppError::EmptyTrainingSet.into());
    }
    match train.iter().position(|item| item.features.len() != query.len()) {
        Some(index) => Err(AppError::FeatureLength {
            index,
            actual: train[index].features.len(),
            expected: query.len(),
        }
        .into()),
        None => Ok(()),
    }
}

// Distances for a contiguous run of training items starting at `offset`,
// sorted nearest first. The sort is stable, so ties stay in training order.
pub(crate) fn sorted_neighbors(
    query: &[u8],
    train: &[LabeledFeatures],
    offset: usize,
) -> Vec<Neighbor> {
    let mut neighbors: Vec<Neighbor> = train
        .iter()
        .enumerate()
        .map(|(i, item)| Neighbor {
            distance: squared_distance(query, &item.features),
            index: offset + i,
        })
        .collect();
    neighbors.sort_by_key(|neighbor| neighbor.distance);
    neighbors
}

/// The `k` training items closest to `query`, nearest first.
///
/// If `k` exceeds the size of the training set, every item is returned.
pub fn nearest(query: &[u8], train: &[LabeledFeatures], k: usize) -> Result<Vec<Neighbor>> {
    validate(query, train, k)?;
    let mut neighbors = sorted_neighbors(query, train, 0);
    neighbors.truncate(k);
    Ok(neighbors)
}

/// Most common label among `neighbors`, scanned nearest first.
///
/// A label only takes the lead when its count strictly exceeds the current
/// leader's, so ties go to the label that reached the count first. The
/// returned index is where the winning label reached its final count.
pub fn majority_vote(neighbors: &[Neighbor], train: &[LabeledFeatures]) -> (Label, usize) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let (mut max_count, mut max_label, mut max_index) = (0, "", 0);
    for neighbor in neighbors {
        let label = train[neighbor.index].label.as_str();
        let count = counts.entry(label).or_insert(0);
        *count += 1;
        if *count > max_count {
            max_count = *count;
            max_label = label;
            max_index = neighbor.index;
        }
    }
    (max_label.to_string(), max_index)
}

/// Classify `query` by majority vote among its `k` nearest training items.
///
/// Returns the winning label and a representative training index.
///
/// Errors:
/// - `BAD_FORMAT`: a training vector's length differs from the query's
///   (reported for the first such index), or the training set is empty.
/// - `BAD_VALUE`: `k` is zero.
pub fn classify(query: &[u8], train: &[LabeledFeatures], k: usize) -> Result<(Label, usize)> {
    let neighbors = nearest(query, train, k)?;
    Ok(majority_vote(&neighbors, train))
}
