use std::fmt;
use std::ops::Range;

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::feature::{Label, LabeledFeatures};
use crate::knn::{classify, classify_par};

/// How a batch of classifications is spread across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    // One test item per task, each classified sequentially
    PerItem,
    // Test items in order, each one's training scan split into this many partitions
    PartitionedTrain(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub test_index: usize,
    pub expected: Label,
    pub predicted: Label,
    pub train_index: usize,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.expected == self.predicted
    }
}

// Report line: misses are flagged with a leading '*'
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:>5} '{}': {:>6} '{}'",
            if self.is_ok() { ' ' } else { '*' },
            self.test_index,
            self.expected,
            self.train_index,
            self.predicted
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Evaluation {
    pub outcomes: Vec<Outcome>,
}

impl Evaluation {
    pub fn n_ok(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_ok()).count()
    }

    // Percentage of correctly classified items; 0 for an empty batch
    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.n_ok() as f64 * 100.0 / self.outcomes.len() as f64
    }

    pub fn misses(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_ok())
    }
}

fn outcome(test_index: usize, item: &LabeledFeatures, result: (Label, usize)) -> Outcome {
    let (predicted, train_index) = result;
    Outcome {
        test_index,
        expected: item.label.clone(),
        predicted,
        train_index,
    }
}

/// Classify every test item whose index lies in `range` against `train`.
///
/// The range is clamped to the test set. Outcomes come back in test index
/// order; the first failing classification fails the whole batch.
pub fn evaluate(
    test: &[LabeledFeatures],
    train: &[LabeledFeatures],
    range: Range<usize>,
    k: usize,
    strategy: Strategy,
) -> Result<Evaluation> {
    let end = range.end.min(test.len());
    let start = range.start.min(end);
    debug!(
        "Classifying test items {}..{} against {} training items (k = {}, {:?})",
        start,
        end,
        train.len(),
        k,
        strategy
    );

    let outcomes = match strategy {
        Strategy::PerItem => test[start..end]
            .par_iter()
            .enumerate()
            .map(|(offset, item)| {
                classify(&item.features, train, k)
                    .map(|result| outcome(start + offset, item, result))
            })
            .collect::<Result<Vec<_>>>()?,
        Strategy::PartitionedTrain(partitions) => test[start..end]
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                classify_par(&item.features, train, k, partitions)
                    .map(|result| outcome(start + offset, item, result))
            })
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(Evaluation { outcomes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::knn::DEFAULT_K;

    // Items along a line, labeled by which third of the line they fall in
    fn line(n: usize) -> Vec<LabeledFeatures> {
        (0..n)
            .map(|i| {
                let value = (i * 255 / n) as u8;
                LabeledFeatures::new(vec![value, value], (i * 3 / n).to_string())
            })
            .collect()
    }

    #[test]
    fn test_separable_set_is_fully_correct() {
        let train = line(90);
        let test = vec![
            LabeledFeatures::new(vec![10_u8, 10], "0"),
            LabeledFeatures::new(vec![128_u8, 128], "1"),
            LabeledFeatures::new(vec![250_u8, 250], "2"),
        ];
        for strategy in [Strategy::PerItem, Strategy::PartitionedTrain(4)] {
            let evaluation = evaluate(&test, &train, 0..3, DEFAULT_K, strategy).unwrap();
            assert_eq!(evaluation.n_ok(), 3);
            assert_eq!(evaluation.accuracy(), 100.0);
            assert_eq!(evaluation.misses().count(), 0);
        }
    }

    #[test]
    fn test_range_is_clamped_and_ordered() {
        let train = line(30);
        let test = line(10);
        let evaluation = evaluate(&test, &train, 4..200, 1, Strategy::PerItem).unwrap();
        let indexes: Vec<usize> = evaluation.outcomes.iter().map(|o| o.test_index).collect();
        assert_eq!(indexes, vec![4, 5, 6, 7, 8, 9]);

        let empty = evaluate(&test, &train, 20..30, 1, Strategy::PerItem).unwrap();
        assert!(empty.outcomes.is_empty());
        assert_eq!(empty.accuracy(), 0.0);
    }

    #[test]
    fn test_strategies_agree() {
        let train = line(50);
        let test = line(17);
        let a = evaluate(&test, &train, 0..17, 5, Strategy::PerItem).unwrap();
        let b = evaluate(&test, &train, 0..17, 5, Strategy::PartitionedTrain(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_failure_fails_batch() {
        let train = line(10);
        let test = vec![
            LabeledFeatures::new(vec![1_u8, 1], "0"),
            LabeledFeatures::new(vec![1_u8, 1, 1], "0"),
        ];
        let errors = evaluate(&test, &train, 0..2, DEFAULT_K, Strategy::PerItem).unwrap_err();
        assert_eq!(errors.code(), ErrorCode::BadFormat);
    }

    #[test]
    fn test_report_line() {
        let miss = Outcome {
            test_index: 12,
            expected: "7".into(),
            predicted: "1".into(),
            train_index: 345,
        };
        assert_eq!(miss.to_string(), "*   12 '7':    345 '1'");
        let hit = Outcome {
            predicted: "7".into(),
            ..miss
        };
        assert_eq!(hit.to_string(), "    12 '7':    345 '7'");
    }
}
