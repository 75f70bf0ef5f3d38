//! Ranked classifier output.

use serde::{Deserialize, Serialize};

/// A class id paired with the confidence the classifier assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub class_id: usize,
    pub confidence: f64,
}

impl RankedEntry {
    pub fn new(class_id: usize, confidence: f64) -> Self {
        Self {
            class_id,
            confidence,
        }
    }
}
