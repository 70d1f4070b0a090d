use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced to HTTP clients as `{"error": "..."}`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, empty or malformed symptom list
    #[error("{0}")]
    InvalidInput(String),

    /// The pipeline produced nothing usable or faulted
    #[error("{0}")]
    PredictionFailure(String),
}

impl ApiError {
    pub fn invalid_format() -> Self {
        ApiError::InvalidInput(
            "Invalid input format. 'list' should be an array of symptoms.".to_string(),
        )
    }

    pub fn empty_list() -> Self {
        ApiError::InvalidInput("Symptoms list cannot be empty.".to_string())
    }

    pub fn no_prediction() -> Self {
        ApiError::PredictionFailure("No prediction could be made.".to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::PredictionFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
