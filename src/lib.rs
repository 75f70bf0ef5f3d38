//! Deterministic calibration and bias-mitigation policy for image
//! classifier outputs.
//!
//! Sits between a pre-trained plant disease classifier and the API
//! response. The classifier is known to over-predict a handful of classes,
//! so its raw probability vector is passed through a fixed, explainable
//! policy before anything is reported:
//!
//! - **Ranking**: the vector is validated and ordered by confidence, ties
//!   broken by class id.
//! - **Decision**: an ordered rule table turns the ranking into one
//!   [`DecisionRecord`](decision::DecisionRecord).
//! - **Taxonomy**: class labels and the known-bias registry, loaded once
//!   and shared read-only.
//! - **Settings**: JSON and environment configuration for all of the above.
//!
//! # Architecture
//!
//! Everything here is pure and synchronous. Image preprocessing, model
//! inference, and treatment lookups live with the callers; this crate
//! only sees the probability vector and returns the record.
//!
//! ```
//! use u_calibrate::settings::CalibrationSettings;
//! use u_calibrate::decision::DecisionStatus;
//!
//! let engine = CalibrationSettings::plant_disease().into_engine().unwrap();
//! let mut vector = vec![0.0; 22];
//! vector[17] = 0.7;
//! vector[18] = 0.3;
//! let record = engine.classify_vector(&vector).unwrap();
//! assert_eq!(record.status, DecisionStatus::Normal);
//! assert_eq!(record.primary_label, "Tomato_Early_Blight");
//! ```

pub mod decision;
pub mod error;
pub mod ranking;
pub mod settings;
pub mod taxonomy;

pub use error::{CalibrationError, ConfigError, InputError, Result};
