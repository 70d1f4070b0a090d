//! # Diagnox
//!
//! Symptom-to-disease prediction service.
//!
//! Diagnox loads three tables at startup (disease-by-symptom incidence,
//! disease to specialty, doctor directory), fits a random forest on the
//! incidence table, and answers each request with the five most probable
//! diseases, their recorded symptoms, the reported symptoms that match,
//! the associated specialty and the doctors practicing it.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! PORT=5000 diagnox --data-dir ./data
//! curl -X POST localhost:5000/ -H 'content-type: application/json' \
//!      -d '{"list": ["itching", "skin_rash"]}'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use diagnox::prelude::*;
//!
//! let datasets = DatasetLoader::new("./data", DatasetFiles::default()).load().unwrap();
//! let (predictor, _report) = build_predictor(datasets, &ForestConfig::default(), 0.10).unwrap();
//! for result in predictor.enrich(&["itching", "skin_rash"]) {
//!     println!("{}: {:?}", result.disease, result.specialty);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `diagnox-core` - Tables, feature vectors, classifier seam, ranking and enrichment
//! - `diagnox-forest` - Random forest classifier, train/test split, accuracy
//! - `diagnox-storage` - CSV loading of the startup tables
//! - `diagnox-api` - actix-web REST endpoint

pub mod training;

// Re-export core types
pub use diagnox_core::{
    Classifier, Datasets, Disease, DoctorRecord, DoctorTable, EnrichedResult, Error,
    FeatureVector, IncidenceRecord, IncidenceTable, Predictor, RankedDisease, Result,
    SpecialtyRow, SpecialtyTable, Symptom, TOP_K,
};

// Re-export the model
pub use diagnox_forest::{ForestConfig, MaxFeatures, RandomForest};

// Re-export storage
pub use diagnox_storage::{DatasetFiles, DatasetLoader};

// Re-export API
pub use diagnox_api::{ApiError, RestApi};

pub use training::{build_predictor, train, TrainingReport};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        build_predictor, ApiError, Classifier, DatasetFiles, DatasetLoader, Datasets,
        EnrichedResult, Error, ForestConfig, Predictor, RandomForest, RestApi, Result,
        TrainingReport,
    };
}
