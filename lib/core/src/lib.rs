//! # Diagnox Core
//!
//! Core library for the Diagnox symptom-to-disease prediction service.
//!
//! This crate provides the data model and the prediction pipeline:
//!
//! - [`IncidenceTable`] - Disease-by-symptom binary matrix, the symptom universe
//! - [`SpecialtyTable`] - Disease to medical specialty mapping
//! - [`DoctorTable`] - Practitioners with specialty, contact and city
//! - [`FeatureVector`] - Binary symptom encoding used as classifier input
//! - [`Classifier`] - Seam for any fitted probabilistic classifier
//! - [`Predictor`] - Top-5 ranking joined with symptoms, specialty and doctors
//!
//! ## Example
//!
//! ```rust,no_run
//! use diagnox_core::{Datasets, Predictor, Classifier};
//! use std::sync::Arc;
//!
//! fn serve(datasets: Datasets, model: Arc<dyn Classifier>) -> diagnox_core::Result<()> {
//!     let predictor = Predictor::new(Arc::new(datasets), model)?;
//!     for result in predictor.enrich(&["itching", "skin_rash"]) {
//!         println!("{} -> {:?}", result.disease, result.matched_symptoms);
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod feature;
pub mod incidence;
pub mod specialty;
pub mod doctor;
pub mod dataset;
pub mod classifier;
pub mod pipeline;

pub use error::{Error, Result};
pub use feature::{Disease, FeatureVector, Symptom};
pub use incidence::{IncidenceRecord, IncidenceTable};
pub use specialty::{SpecialtyRow, SpecialtyTable};
pub use doctor::{DoctorRecord, DoctorTable};
pub use dataset::Datasets;
pub use classifier::Classifier;
pub use pipeline::{EnrichedResult, Predictor, RankedDisease, TOP_K};
