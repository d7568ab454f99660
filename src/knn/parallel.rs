use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rayon::prelude::*;

use crate::error::Result;
use crate::feature::{Label, LabeledFeatures};
use crate::knn::classify::{majority_vote, sorted_neighbors, validate, Neighbor};

// Merge per-partition candidate lists (each sorted by distance, then index)
// and keep the k smallest overall
fn merge_smallest(candidates: Vec<Vec<Neighbor>>, k: usize) -> Vec<Neighbor> {
    let mut lists: Vec<_> = candidates.into_iter().map(Vec::into_iter).collect();
    let mut heap = BinaryHeap::with_capacity(lists.len());
    for (list, iter) in lists.iter_mut().enumerate() {
        if let Some(neighbor) = iter.next() {
            heap.push(Reverse((neighbor, list)));
        }
    }

    let mut merged = Vec::with_capacity(k);
    while merged.len() < k {
        let Some(Reverse((neighbor, list))) = heap.pop() else {
            break;
        };
        merged.push(neighbor);
        if let Some(next) = lists[list].next() {
            heap.push(Reverse((next, list)));
        }
    }
    merged
}

/// Same result as [`classify`](crate::knn::classify), but the training set is split
/// into `partitions` contiguous chunks whose k nearest candidates are found in parallel.
///
/// Candidates are merged by distance with ties broken by training index, which is
/// exactly the order the sequential stable sort produces.
pub fn classify_par(
    query: &[u8],
    train: &[LabeledFeatures],
    k: usize,
    partitions: usize,
) -> Result<(Label, usize)> {
    validate(query, train, k)?;

    let chunk_size = train.len().div_ceil(partitions.max(1));
    let candidates: Vec<Vec<Neighbor>> = train
        .par_chunks(chunk_size)
        .enumerate()
        .map(|(partition, chunk)| {
            let mut neighbors = sorted_neighbors(query, chunk, partition * chunk_size);
            neighbors.truncate(k);
            neighbors
        })
        .collect();

    let neighbors = merge_smallest(candidates, k);
    Ok(majority_vote(&neighbors, train))
}
