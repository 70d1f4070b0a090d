//! Ranking and enrichment pipeline
//!
//! Turns a list of reported symptoms into the most probable diseases and
//! joins each of them against the symptom, specialty and doctor tables.
//!
//! Lookups never fail: unknown diseases, missing specialties and empty
//! doctor matches all degrade to empty values. Only the classifier call
//! can fail, and [`Predictor::predict_top_5`] turns that into an empty
//! ranking after logging it.

use crate::{Classifier, Datasets, Disease, DoctorRecord, Error, FeatureVector, Result, Symptom};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of diseases returned per request
pub const TOP_K: usize = 5;

/// One ranked disease with its joined table data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedResult {
    pub disease: Disease,
    /// Every symptom recorded for the disease, in column order
    pub all_symptoms: Vec<Symptom>,
    /// Reported symptoms that belong to the disease, in input order
    pub matched_symptoms: Vec<Symptom>,
    pub doctors: Vec<DoctorRecord>,
    pub specialty: Option<String>,
}

/// A disease with its predicted probability
#[derive(Debug, Clone, PartialEq)]
pub struct RankedDisease {
    pub disease: Disease,
    pub probability: f32,
}

/// Immutable prediction context shared by every request
#[derive(Clone)]
pub struct Predictor {
    datasets: Arc<Datasets>,
    classifier: Arc<dyn Classifier>,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("symptoms", &self.datasets.incidence.dim())
            .field("classes", &self.classifier.classes().len())
            .finish()
    }
}

impl Predictor {
    /// Bind a fitted classifier to the tables it was trained from
    ///
    /// The classifier must accept feature vectors laid out by the
    /// incidence table's symptom columns.
    pub fn new(datasets: Arc<Datasets>, classifier: Arc<dyn Classifier>) -> Result<Self> {
        let expected = datasets.incidence.dim();
        let actual = classifier.n_features();
        if expected != actual {
            return Err(Error::InvalidDimension { expected, actual });
        }
        if classifier.classes().is_empty() {
            return Err(Error::Model("classifier has no classes".to_string()));
        }

        Ok(Self {
            datasets,
            classifier,
        })
    }

    #[inline]
    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }

    #[inline]
    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Symptom universe in feature order
    #[inline]
    pub fn known_symptoms(&self) -> &[Symptom] {
        self.datasets.incidence.symptoms()
    }

    /// Encode reported symptoms, ignoring unknown ones
    pub fn features<S: AsRef<str>>(&self, symptoms: &[S]) -> FeatureVector {
        self.datasets.incidence.encode(symptoms)
    }

    /// Rank every class by probability and keep the best `k`
    ///
    /// Ordering is probability descending, then label ascending, so equal
    /// probabilities always come back in the same order.
    pub fn rank<S: AsRef<str>>(&self, symptoms: &[S], k: usize) -> Result<Vec<RankedDisease>> {
        let features = self.features(symptoms);
        let probabilities = self.classifier.predict_proba(&features)?;
        let classes = self.classifier.classes();

        if probabilities.len() != classes.len() {
            return Err(Error::InvalidDimension {
                expected: classes.len(),
                actual: probabilities.len(),
            });
        }
        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite()) {
            return Err(Error::Model(format!("non-finite probability: {}", bad)));
        }

        let mut order: Vec<usize> = (0..classes.len()).collect();
        order.sort_by_key(|&i| (Reverse(OrderedFloat(probabilities[i])), classes[i].as_str()));
        order.truncate(k);

        Ok(order
            .into_iter()
            .map(|i| RankedDisease {
                disease: classes[i].clone(),
                probability: probabilities[i],
            })
            .collect())
    }

    /// The five most probable diseases, best first
    ///
    /// Returns an empty list when the classifier fails.
    pub fn predict_top_5<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<Disease> {
        match self.rank(symptoms, TOP_K) {
            Ok(ranked) => ranked.into_iter().map(|r| r.disease).collect(),
            Err(e) => {
                warn!("Top-{} prediction failed: {}", TOP_K, e);
                Vec::new()
            }
        }
    }

    /// The single most probable disease
    pub fn predict_one<S: AsRef<str>>(&self, symptoms: &[S]) -> Option<Disease> {
        match self.rank(symptoms, 1) {
            Ok(ranked) => ranked.into_iter().next().map(|r| r.disease),
            Err(e) => {
                warn!("Prediction failed: {}", e);
                None
            }
        }
    }

    /// Symptoms recorded for a disease (exact label match)
    pub fn symptoms_for(&self, disease: &str) -> Vec<Symptom> {
        let symptoms = self.datasets.incidence.symptoms_for(disease);
        if symptoms.is_empty() {
            debug!("No symptoms found for disease: {}", disease);
        }
        symptoms
    }

    /// Specialty of the first specialty row containing the disease name
    pub fn specialty_for(&self, disease: &str) -> Option<String> {
        self.datasets
            .specialties
            .specialty_for(disease)
            .map(str::to_string)
    }

    /// Doctors practicing the disease's specialty
    pub fn doctors_for(&self, disease: &str) -> Vec<DoctorRecord> {
        match self.datasets.specialties.specialty_for(disease) {
            Some(specialty) => self.datasets.doctors.with_specialty(specialty),
            None => Vec::new(),
        }
    }

    /// Rank the reported symptoms and enrich each predicted disease
    ///
    /// Result order follows prediction rank.
    pub fn enrich<S: AsRef<str>>(&self, symptoms: &[S]) -> Vec<EnrichedResult> {
        self.predict_top_5(symptoms)
            .into_iter()
            .map(|disease| {
                let all_symptoms = self.symptoms_for(&disease);
                let matched_symptoms = matched_symptoms(symptoms, &all_symptoms);
                let specialty = self.specialty_for(&disease);
                let doctors = self.doctors_for(&disease);
                debug!("Predicted disease: {}, symptoms: {:?}", disease, all_symptoms);

                EnrichedResult {
                    disease,
                    all_symptoms,
                    matched_symptoms,
                    doctors,
                    specialty,
                }
            })
            .collect()
    }
}

/// Reported symptoms present in `known`, in input order, first occurrence only
fn matched_symptoms<S: AsRef<str>>(reported: &[S], known: &[Symptom]) -> Vec<Symptom> {
    let mut matched: Vec<Symptom> = Vec::new();
    for symptom in reported {
        let symptom = symptom.as_ref();
        if known.iter().any(|k| k == symptom) && !matched.iter().any(|m| m == symptom) {
            matched.push(symptom.to_string());
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        DoctorTable, IncidenceRecord, IncidenceTable, SpecialtyRow, SpecialtyTable,
    };

    /// Scores each class by how many of its symptoms were reported
    struct OverlapClassifier {
        classes: Vec<Disease>,
        table: IncidenceTable,
    }

    impl OverlapClassifier {
        fn new(table: IncidenceTable) -> Self {
            let classes = table.diseases().into_iter().map(String::from).collect();
            Self { classes, table }
        }
    }

    impl Classifier for OverlapClassifier {
        fn classes(&self) -> &[Disease] {
            &self.classes
        }

        fn n_features(&self) -> usize {
            self.table.dim()
        }

        fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
            let scores: Vec<f32> = self
                .classes
                .iter()
                .map(|c| {
                    self.table
                        .symptoms_for(c)
                        .iter()
                        .filter(|s| {
                            self.table
                                .symptom_position(s)
                                .is_some_and(|i| features.is_set(i))
                        })
                        .count() as f32
                })
                .collect();
            let total: f32 = scores.iter().sum();
            if total == 0.0 {
                return Ok(vec![1.0 / scores.len() as f32; scores.len()]);
            }
            Ok(scores.into_iter().map(|s| s / total).collect())
        }
    }

    struct BrokenClassifier {
        classes: Vec<Disease>,
        dim: usize,
    }

    impl Classifier for BrokenClassifier {
        fn classes(&self) -> &[Disease] {
            &self.classes
        }

        fn n_features(&self) -> usize {
            self.dim
        }

        fn predict_proba(&self, _features: &FeatureVector) -> Result<Vec<f32>> {
            Err(Error::Model("boom".to_string()))
        }
    }

    fn sample_datasets() -> Datasets {
        let symptoms: Vec<Symptom> = ["itching", "skin_rash", "cough", "fever", "headache", "nausea"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row = |disease: &str, present: [u8; 6]| {
            IncidenceRecord::new(disease, present.iter().map(|v| *v == 1).collect())
        };
        let incidence = IncidenceTable::new(
            symptoms,
            vec![
                row("Fungal infection", [1, 1, 0, 0, 0, 0]),
                row("Allergy", [1, 0, 1, 0, 0, 0]),
                row("Common Cold", [0, 0, 1, 1, 0, 0]),
                row("Migraine", [0, 0, 0, 0, 1, 1]),
                row("Malaria", [0, 0, 0, 1, 1, 1]),
                row("Typhoid", [0, 0, 0, 1, 0, 1]),
                row("Gastroenteritis", [0, 0, 0, 0, 0, 1]),
            ],
        )
        .unwrap();

        let specialties = SpecialtyTable::new(vec![
            SpecialtyRow::new("Fungal infection", "Dermatologist"),
            SpecialtyRow::new("Common Cold", "General Physician"),
            SpecialtyRow::new("Malaria", "General Physician"),
        ]);

        let doctors = DoctorTable::new(vec![
            DoctorRecord::new("Dr. A", "Dermatologist", "111", "Nagpur"),
            DoctorRecord::new("Dr. B", " general physician", "222", "Nagpur"),
            DoctorRecord::new("Dr. C", "Cardiologist", "333", "Nagpur"),
        ]);

        Datasets::new(incidence, specialties, doctors)
    }

    fn sample_predictor() -> Predictor {
        let datasets = Arc::new(sample_datasets());
        let classifier = Arc::new(OverlapClassifier::new(datasets.incidence.clone()));
        Predictor::new(datasets, classifier).unwrap()
    }

    #[test]
    fn test_top_5_bounded_and_known() {
        let predictor = sample_predictor();
        let top = predictor.predict_top_5(&["itching", "skin_rash"]);
        assert_eq!(top.len(), TOP_K);
        for disease in &top {
            assert!(predictor.datasets().incidence.contains_disease(disease));
        }
        assert_eq!(top[0], "Fungal infection");
    }

    #[test]
    fn test_rank_tie_break_by_label() {
        let predictor = sample_predictor();
        // Nothing reported: every class scores the same
        let ranked = predictor.rank(&["unknown_symptom"], 7).unwrap();
        let labels: Vec<&str> = ranked.iter().map(|r| r.disease.as_str()).collect();
        let mut sorted = labels.clone();
        sorted.sort_unstable();
        assert_eq!(labels, sorted);
    }

    #[test]
    fn test_rank_descending() {
        let predictor = sample_predictor();
        let ranked = predictor.rank(&["fever", "nausea", "headache"], 5).unwrap();
        assert_eq!(ranked[0].disease, "Malaria");
        for pair in ranked.windows(2) {
            assert!(pair[0].probability >= pair[1].probability);
        }
    }

    #[test]
    fn test_unknown_symptoms_ignored() {
        let predictor = sample_predictor();
        let with_noise = predictor.predict_top_5(&["itching", "bogus", "skin_rash", "itching"]);
        let clean = predictor.predict_top_5(&["itching", "skin_rash"]);
        assert_eq!(with_noise, clean);
    }

    #[test]
    fn test_enrich_scenario() {
        let predictor = sample_predictor();
        let results = predictor.enrich(&["skin_rash", "itching", "not_real"]);
        assert!(results.len() <= TOP_K);

        let fungal = results
            .iter()
            .find(|r| r.disease == "Fungal infection")
            .expect("fungal infection ranked");
        assert_eq!(fungal.all_symptoms, vec!["itching", "skin_rash"]);
        assert_eq!(fungal.matched_symptoms, vec!["skin_rash", "itching"]);
        assert_eq!(fungal.specialty.as_deref(), Some("Dermatologist"));
        assert_eq!(fungal.doctors.len(), 1);
        assert_eq!(fungal.doctors[0].name, "Dr. A");
    }

    #[test]
    fn test_matched_subset_of_input_and_all() {
        let predictor = sample_predictor();
        let input = ["fever", "itching", "cough", "fever"];
        for result in predictor.enrich(&input) {
            assert!(result.matched_symptoms.len() <= 3);
            for symptom in &result.matched_symptoms {
                assert!(input.contains(&symptom.as_str()));
                assert!(result.all_symptoms.contains(symptom));
            }
            let positions: Vec<usize> = result
                .matched_symptoms
                .iter()
                .map(|s| input.iter().position(|i| i == s).unwrap())
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_missing_specialty_yields_no_doctors() {
        let predictor = sample_predictor();
        assert_eq!(predictor.specialty_for("Migraine"), None);
        assert!(predictor.doctors_for("Migraine").is_empty());

        let doctors = predictor.doctors_for("Common Cold");
        assert_eq!(doctors.len(), 1);
        assert_eq!(doctors[0].name, "Dr. B");
    }

    #[test]
    fn test_classifier_failure_is_soft() {
        let datasets = Arc::new(sample_datasets());
        let dim = datasets.incidence.dim();
        let classifier = Arc::new(BrokenClassifier {
            classes: vec!["Malaria".to_string()],
            dim,
        });
        let predictor = Predictor::new(datasets, classifier).unwrap();

        assert!(predictor.predict_top_5(&["fever"]).is_empty());
        assert!(predictor.predict_one(&["fever"]).is_none());
        assert!(predictor.enrich(&["fever"]).is_empty());
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let datasets = Arc::new(sample_datasets());
        let classifier = Arc::new(BrokenClassifier {
            classes: vec!["Malaria".to_string()],
            dim: 3,
        });
        let err = Predictor::new(datasets, classifier).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 6, actual: 3 }));
    }

    #[test]
    fn test_predict_one() {
        let predictor = sample_predictor();
        assert_eq!(
            predictor.predict_one(&["itching", "skin_rash"]).as_deref(),
            Some("Fungal infection")
        );
    }
}
