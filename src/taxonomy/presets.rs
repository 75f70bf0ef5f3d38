//! Built-in taxonomy for the 22-class plant disease model.

use super::types::{BiasRegistry, Taxonomy};

/// Canonical labels of the lightweight 22-class plant disease model,
/// in class-id order.
pub const PLANT_DISEASE_LABELS: [&str; 22] = [
    "Healthy_Leaf",
    "Apple_Scab",
    "Apple_Black_Rot",
    "Apple_Cedar_Rust",
    "Cherry_Powdery_Mildew",
    "Corn_Gray_Leaf_Spot",
    "Corn_Common_Rust",
    "Corn_Northern_Blight",
    "Grape_Black_Rot",
    "Grape_Esca",
    "Grape_Leaf_Blight",
    "Peach_Bacterial_Spot",
    "Pepper_Bacterial_Spot",
    "Potato_Early_Blight",
    "Potato_Late_Blight",
    "Strawberry_Leaf_Scorch",
    "Tomato_Bacterial_Spot",
    "Tomato_Early_Blight",
    "Tomato_Late_Blight",
    "Tomato_Leaf_Mold",
    "Tomato_Septoria_Leaf_Spot",
    "Tomato_Spider_Mites",
];

/// Labels the 22-class model is observed to over-predict.
pub const PLANT_DISEASE_BIASED_LABELS: [&str; 2] = ["Cherry_Powdery_Mildew", "Corn_Northern_Blight"];

/// Returns the 22-class plant disease taxonomy.
pub fn plant_disease_taxonomy() -> Taxonomy {
    Taxonomy::new(PLANT_DISEASE_LABELS).expect("built-in taxonomy is well-formed")
}

/// Returns the known-bias registry for [`plant_disease_taxonomy`].
pub fn plant_disease_bias_registry(taxonomy: &Taxonomy) -> BiasRegistry {
    BiasRegistry::new(taxonomy, PLANT_DISEASE_BIASED_LABELS)
        .expect("built-in bias labels belong to the built-in taxonomy")
}
