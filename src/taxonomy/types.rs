//! Class taxonomy and known-bias registry.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest taxonomy the decision policy can operate on.
///
/// The known-bias rule inspects the top three ranked classes, so every
/// ranking must have at least three entries.
pub const MIN_CLASSES: usize = 3;

/// One `{class_id, label}` pair as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaxonomyEntry {
    pub class_id: usize,
    pub label: String,
}

/// Immutable mapping from class id (`0..N`) to canonical label.
///
/// Built once at startup and shared read-only between callers.
///
/// # Examples
///
/// ```
/// use u_calibrate::taxonomy::Taxonomy;
///
/// let taxonomy = Taxonomy::new(["Healthy", "Leaf_Spot", "Blight"]).unwrap();
/// assert_eq!(taxonomy.len(), 3);
/// assert_eq!(taxonomy.label(1), Some("Leaf_Spot"));
/// assert_eq!(taxonomy.class_id("Blight"), Some(2));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Taxonomy {
    labels: Vec<String>,
    by_label: HashMap<String, usize>,
}

impl Taxonomy {
    /// Builds a taxonomy from labels in class-id order.
    pub fn new<I, S>(labels: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        if labels.len() < MIN_CLASSES {
            return Err(ConfigError::TaxonomyTooSmall {
                min: MIN_CLASSES,
                actual: labels.len(),
            });
        }

        let mut by_label = HashMap::with_capacity(labels.len());
        for (class_id, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel { class_id });
            }
            if by_label.insert(label.clone(), class_id).is_some() {
                return Err(ConfigError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }

        Ok(Self { labels, by_label })
    }

    /// Builds a taxonomy from `{class_id, label}` entries in any order.
    ///
    /// The ids must cover `0..N` exactly once.
    pub fn from_entries(mut entries: Vec<TaxonomyEntry>) -> Result<Self, ConfigError> {
        entries.sort_by_key(|e| e.class_id);
        for (expected, entry) in entries.iter().enumerate() {
            if entry.class_id != expected {
                return Err(ConfigError::NonContiguousClassId {
                    expected,
                    actual: entry.class_id,
                });
            }
        }
        Self::new(entries.into_iter().map(|e| e.label))
    }

    /// Number of classes (N).
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always `false` for a constructed taxonomy; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the label for `class_id`, if it exists.
    pub fn label(&self, class_id: usize) -> Option<&str> {
        self.labels.get(class_id).map(String::as_str)
    }

    /// Returns the class id carrying `label`, if any.
    pub fn class_id(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// All labels in class-id order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterates `(class_id, label)` pairs in class-id order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.labels.iter().enumerate().map(|(i, l)| (i, l.as_str()))
    }

    /// Converts back to configuration entries.
    pub fn entries(&self) -> Vec<TaxonomyEntry> {
        self.iter()
            .map(|(class_id, label)| TaxonomyEntry {
                class_id,
                label: label.to_string(),
            })
            .collect()
    }
}

/// Immutable set of labels known to be over-predicted by the classifier.
///
/// Every label must exist in the taxonomy the registry was built against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BiasRegistry {
    labels: BTreeSet<String>,
}

impl BiasRegistry {
    /// Builds a registry, rejecting labels that the taxonomy does not know.
    pub fn new<I, S>(taxonomy: &Taxonomy, labels: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for label in labels {
            let label = label.into();
            if !taxonomy.contains(&label) {
                return Err(ConfigError::UnknownBiasLabel { label });
            }
            set.insert(label);
        }
        Ok(Self { labels: set })
    }

    /// A registry that flags nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Flagged labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}
