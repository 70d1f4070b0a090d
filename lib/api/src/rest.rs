use crate::ApiError;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use diagnox_core::{EnrichedResult, Predictor};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

const FORM_HTML: &str = r#"<form method="post" action="/">
    <label for="symptoms">Symptoms (comma-separated):</label>
    <input type="text" name="symptoms" id="symptoms">
    <input type="submit" value="Submit">
</form>
"#;

#[derive(Deserialize)]
struct PredictRequest {
    #[serde(default)]
    list: Vec<String>,
}

#[derive(Serialize)]
struct SymptomsResponse<'a> {
    symptoms: &'a [String],
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        predictor: Arc<Predictor>,
        host: String,
        port: u16,
    ) -> std::io::Result<()> {
        HttpServer::new(move || {
            App::new()
                .wrap(Self::cors())
                .app_data(web::Data::new(predictor.clone()))
                .configure(Self::configure)
        })
        .bind((host.as_str(), port))?
        .run()
        .await
    }

    /// Any origin, method and header
    pub fn cors() -> Cors {
        Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600)
    }

    /// Register routes and the JSON decoding policy
    ///
    /// Expects `web::Data<Arc<Predictor>>` to be registered on the app.
    pub fn configure(cfg: &mut web::ServiceConfig) {
        let json_config = web::JsonConfig::default().error_handler(|err, _req| {
            warn!("Rejected request body: {}", err);
            ApiError::invalid_format().into()
        });

        cfg.app_data(json_config)
            .route("/", web::post().to(predict))
            .route("/", web::get().to(form))
            .route("/symptoms", web::get().to(list_symptoms));
    }
}

async fn predict(
    predictor: web::Data<Arc<Predictor>>,
    req: web::Json<PredictRequest>,
) -> Result<HttpResponse, ApiError> {
    let request_id = Uuid::new_v4();
    let symptoms = req.into_inner().list;

    info_span!("predict", %request_id).in_scope(|| {
        debug!("Received symptoms: {:?}", symptoms);

        if symptoms.is_empty() {
            warn!("Symptoms list cannot be empty");
            return Err(ApiError::empty_list());
        }

        let results = run_pipeline(&predictor, &symptoms)?;
        if results.is_empty() {
            error!("No prediction made");
            return Err(ApiError::no_prediction());
        }

        info!(
            "Predicted {:?}",
            results.iter().map(|r| r.disease.as_str()).collect::<Vec<_>>()
        );
        Ok(HttpResponse::Ok().json(results))
    })
}

/// Run enrichment, turning a panic into a prediction failure
fn run_pipeline(predictor: &Predictor, symptoms: &[String]) -> Result<Vec<EnrichedResult>, ApiError> {
    panic::catch_unwind(AssertUnwindSafe(|| predictor.enrich(symptoms))).map_err(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "internal error during prediction".to_string());
        error!("Error in processing: {}", message);
        ApiError::PredictionFailure(message)
    })
}

async fn form() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(FORM_HTML))
}

async fn list_symptoms(predictor: web::Data<Arc<Predictor>>) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(SymptomsResponse {
        symptoms: predictor.known_symptoms(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use diagnox_core::{
        Classifier, Datasets, Disease, DoctorRecord, DoctorTable, FeatureVector, IncidenceRecord,
        IncidenceTable, SpecialtyRow, SpecialtyTable,
    };
    use serde_json::{json, Value};

    /// Puts all mass on the first class whose symptoms were all reported
    struct LookupClassifier {
        classes: Vec<Disease>,
        table: IncidenceTable,
    }

    impl Classifier for LookupClassifier {
        fn classes(&self) -> &[Disease] {
            &self.classes
        }

        fn n_features(&self) -> usize {
            self.table.dim()
        }

        fn predict_proba(&self, features: &FeatureVector) -> diagnox_core::Result<Vec<f32>> {
            Ok(self
                .classes
                .iter()
                .map(|c| {
                    let hit = self
                        .table
                        .symptoms_for(c)
                        .iter()
                        .any(|s| self.table.symptom_position(s).is_some_and(|i| features.is_set(i)));
                    if hit { 1.0 } else { 0.0 }
                })
                .collect())
        }
    }

    struct PanickingClassifier {
        classes: Vec<Disease>,
        dim: usize,
    }

    impl Classifier for PanickingClassifier {
        fn classes(&self) -> &[Disease] {
            &self.classes
        }

        fn n_features(&self) -> usize {
            self.dim
        }

        fn predict_proba(&self, _features: &FeatureVector) -> diagnox_core::Result<Vec<f32>> {
            panic!("model exploded")
        }
    }

    fn datasets() -> Arc<Datasets> {
        let incidence = IncidenceTable::new(
            vec!["itching".to_string(), "skin_rash".to_string(), "cough".to_string()],
            vec![
                IncidenceRecord::new("Fungal infection", vec![true, true, false]),
                IncidenceRecord::new("Common Cold", vec![false, false, true]),
            ],
        )
        .unwrap();
        let specialties = SpecialtyTable::new(vec![SpecialtyRow::new("Fungal infection", "Dermatologist")]);
        let doctors = DoctorTable::new(vec![DoctorRecord::new(
            "Dr. A",
            "Dermatologist",
            "111",
            "Nagpur",
        )]);
        Arc::new(Datasets::new(incidence, specialties, doctors))
    }

    fn predictor() -> Arc<Predictor> {
        let datasets = datasets();
        let classifier = Arc::new(LookupClassifier {
            classes: vec!["Common Cold".to_string(), "Fungal infection".to_string()],
            table: datasets.incidence.clone(),
        });
        Arc::new(Predictor::new(datasets, classifier).unwrap())
    }

    macro_rules! app {
        ($predictor:expr) => {
            test::init_service(
                App::new()
                    .wrap(RestApi::cors())
                    .app_data(web::Data::new($predictor))
                    .configure(RestApi::configure),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_predict_success() {
        let app = app!(predictor());
        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({"list": ["skin_rash", "itching"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["disease"], "Fungal infection");
        assert_eq!(results[0]["matched_symptoms"], json!(["skin_rash", "itching"]));
        assert_eq!(results[0]["all_symptoms"], json!(["itching", "skin_rash"]));
        assert_eq!(results[0]["specialty"], "Dermatologist");
        assert_eq!(results[0]["doctors"][0]["Specialty"], "Dermatologist");
        assert_eq!(results[1]["disease"], "Common Cold");
        assert_eq!(results[1]["specialty"], Value::Null);
        assert_eq!(results[1]["doctors"], json!([]));
    }

    #[actix_web::test]
    async fn test_empty_list_is_bad_request() {
        let app = app!(predictor());
        for body in [json!({"list": []}), json!({})] {
            let req = test::TestRequest::post().uri("/").set_json(body).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "Symptoms list cannot be empty.");
        }
    }

    #[actix_web::test]
    async fn test_non_array_list_is_bad_request() {
        let app = app!(predictor());
        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({"list": "itching"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid input format"));
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let app = app!(predictor());
        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_panic_becomes_server_error() {
        let datasets = datasets();
        let dim = datasets.incidence.dim();
        let classifier = Arc::new(PanickingClassifier {
            classes: vec!["Common Cold".to_string()],
            dim,
        });
        let predictor = Arc::new(Predictor::new(datasets, classifier).unwrap());
        let app = app!(predictor);

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({"list": ["cough"]}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "model exploded");
    }

    #[actix_web::test]
    async fn test_empty_list_skips_classifier() {
        let datasets = datasets();
        let dim = datasets.incidence.dim();
        let classifier = Arc::new(PanickingClassifier {
            classes: vec!["Common Cold".to_string()],
            dim,
        });
        let predictor = Arc::new(Predictor::new(datasets, classifier).unwrap());
        let app = app!(predictor);

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(json!({"list": []}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Symptoms list cannot be empty.");
    }

    #[actix_web::test]
    async fn test_list_symptoms() {
        let app = app!(predictor());
        let req = test::TestRequest::get().uri("/symptoms").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["symptoms"], json!(["itching", "skin_rash", "cough"]));
    }

    #[actix_web::test]
    async fn test_form() {
        let app = app!(predictor());
        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("<form"));
    }
}
