//! # Diagnox API
//!
//! HTTP surface of the prediction service.
//!
//! | Method | Path        | Description                                   |
//! |--------|-------------|-----------------------------------------------|
//! | POST   | `/`         | `{"list": [...]}` → ranked, enriched diseases |
//! | GET    | `/`         | Minimal HTML submission form                  |
//! | GET    | `/symptoms` | Known symptom universe                        |

pub mod error;
pub mod rest;

pub use error::ApiError;
pub use rest::RestApi;
