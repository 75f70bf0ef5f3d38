//! Class taxonomy and known-bias registry.
//!
//! Both structures are loaded once at startup, validated, and then shared
//! read-only for the life of the process. Neither exposes a mutating API,
//! so they are safe to share across threads behind a plain `Arc`.

mod presets;
mod types;

pub use presets::{
    plant_disease_bias_registry, plant_disease_taxonomy, PLANT_DISEASE_BIASED_LABELS,
    PLANT_DISEASE_LABELS,
};
pub use types::{BiasRegistry, Taxonomy, TaxonomyEntry, MIN_CLASSES};
