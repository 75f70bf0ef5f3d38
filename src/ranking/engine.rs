//! Probability vector ranking.

use std::cmp::Ordering;

use super::types::RankedEntry;
use crate::error::{ConfigError, InputError};

/// Turns a probability vector into a totally ordered ranking.
///
/// Entries are sorted by confidence, highest first. Exactly equal
/// confidences are ordered by ascending class id, so two calls with the
/// same vector always produce the same ranking.
///
/// # Examples
///
/// ```
/// use u_calibrate::ranking::Ranker;
///
/// let ranker = Ranker::new(4);
/// let ranked = ranker.rank(&[0.1, 0.4, 0.1, 0.4]).unwrap();
/// let ids: Vec<usize> = ranked.iter().map(|e| e.class_id).collect();
/// assert_eq!(ids, vec![1, 3, 0, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranker {
    num_classes: usize,
    sum_tolerance: Option<f64>,
}

impl Ranker {
    /// Creates a ranker for vectors of exactly `num_classes` entries.
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            sum_tolerance: None,
        }
    }

    /// Rejects vectors whose sum differs from 1 by more than `tolerance`.
    ///
    /// `tolerance` must be finite and positive.
    pub fn with_sum_tolerance(mut self, tolerance: f64) -> Result<Self, ConfigError> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InconsistentThresholds(format!(
                "sum_tolerance must be positive, got {tolerance}"
            )));
        }
        self.sum_tolerance = Some(tolerance);
        Ok(self)
    }

    /// Number of entries every vector must have.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Validates the vector against the length and value contract.
    pub fn validate(&self, vector: &[f64]) -> Result<(), InputError> {
        if vector.is_empty() {
            return Err(InputError::Empty);
        }
        if vector.len() != self.num_classes {
            return Err(InputError::LengthMismatch {
                expected: self.num_classes,
                actual: vector.len(),
            });
        }
        for (class_id, &value) in vector.iter().enumerate() {
            check_confidence(class_id, value)?;
        }
        if let Some(tolerance) = self.sum_tolerance {
            let sum: f64 = vector.iter().sum();
            if (sum - 1.0).abs() > tolerance {
                return Err(InputError::BadSum { sum, tolerance });
            }
        }
        Ok(())
    }

    /// Ranks every class by confidence.
    ///
    /// Returns all `N` class ids paired with their confidence, in
    /// non-increasing confidence order.
    pub fn rank(&self, vector: &[f64]) -> Result<Vec<RankedEntry>, InputError> {
        self.validate(vector)?;
        Ok(sort_indices(vector)
            .into_iter()
            .map(|i| RankedEntry::new(i, vector[i]))
            .collect())
    }
}

/// Returns class ids ordered by descending confidence, ties by ascending id.
///
/// Values must already be finite.
fn sort_indices(vector: &[f64]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..vector.len()).collect();
    indices.sort_by(|&a, &b| {
        vector[b]
            .partial_cmp(&vector[a])
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(&b))
    });
    indices
}

pub(crate) fn check_confidence(class_id: usize, value: f64) -> Result<(), InputError> {
    if !value.is_finite() {
        return Err(InputError::NonFinite { class_id });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(InputError::OutOfRange { class_id, value });
    }
    Ok(())
}

/// Checks that `ranked` is a valid ranking over a taxonomy of `num_classes`.
///
/// A valid ranking has one entry per class, every id in range and used
/// once, every confidence in `[0, 1]`, and confidences non-increasing.
pub fn validate_ranking(ranked: &[RankedEntry], num_classes: usize) -> Result<(), InputError> {
    if ranked.is_empty() {
        return Err(InputError::Empty);
    }
    if ranked.len() != num_classes {
        return Err(InputError::LengthMismatch {
            expected: num_classes,
            actual: ranked.len(),
        });
    }

    let mut seen = vec![false; num_classes];
    let mut previous = f64::INFINITY;
    for entry in ranked {
        if entry.class_id >= num_classes || seen[entry.class_id] {
            return Err(InputError::UnknownClass {
                class_id: entry.class_id,
            });
        }
        seen[entry.class_id] = true;
        check_confidence(entry.class_id, entry.confidence)?;
        if entry.confidence > previous {
            return Err(InputError::Unordered {
                class_id: entry.class_id,
            });
        }
        previous = entry.confidence;
    }
    Ok(())
}
