//! Disease-by-symptom incidence table
//!
//! One row per disease observation, one binary column per symptom. The
//! column set defines the symptom universe and the feature layout shared
//! by training and prediction.

use crate::{Disease, Error, FeatureVector, Result, Symptom};
use ahash::AHashMap;

/// One row of the incidence table
#[derive(Debug, Clone, PartialEq)]
pub struct IncidenceRecord {
    pub disease: Disease,
    /// Presence flag per symptom column, in column order
    pub present: Vec<bool>,
}

impl IncidenceRecord {
    pub fn new(disease: impl Into<Disease>, present: Vec<bool>) -> Self {
        Self {
            disease: disease.into(),
            present,
        }
    }

    /// Feature vector for this row
    pub fn features(&self) -> FeatureVector {
        FeatureVector::new(
            self.present
                .iter()
                .map(|p| if *p { 1.0 } else { 0.0 })
                .collect(),
        )
    }
}

/// Immutable incidence table with symptom and disease indexes
#[derive(Debug, Clone)]
pub struct IncidenceTable {
    symptoms: Vec<Symptom>,
    records: Vec<IncidenceRecord>,
    symptom_index: AHashMap<Symptom, usize>,
    disease_rows: AHashMap<Disease, Vec<usize>>,
}

impl IncidenceTable {
    /// Build a table from its symptom header and rows
    ///
    /// Fails when a symptom column is repeated or a row width does not
    /// match the header.
    pub fn new(symptoms: Vec<Symptom>, records: Vec<IncidenceRecord>) -> Result<Self> {
        let mut symptom_index = AHashMap::with_capacity(symptoms.len());
        for (idx, symptom) in symptoms.iter().enumerate() {
            if symptom_index.insert(symptom.clone(), idx).is_some() {
                return Err(Error::Schema(format!("duplicate symptom column: {}", symptom)));
            }
        }

        let mut disease_rows: AHashMap<Disease, Vec<usize>> = AHashMap::new();
        for (row, record) in records.iter().enumerate() {
            if record.present.len() != symptoms.len() {
                return Err(Error::InvalidDimension {
                    expected: symptoms.len(),
                    actual: record.present.len(),
                });
            }
            disease_rows.entry(record.disease.clone()).or_default().push(row);
        }

        Ok(Self {
            symptoms,
            records,
            symptom_index,
            disease_rows,
        })
    }

    /// Symptom universe in column order
    #[inline]
    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    /// Number of symptom columns (feature dimension)
    #[inline]
    pub fn dim(&self) -> usize {
        self.symptoms.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[IncidenceRecord] {
        &self.records
    }

    /// Column position of a symptom
    #[inline]
    pub fn symptom_position(&self, symptom: &str) -> Option<usize> {
        self.symptom_index.get(symptom).copied()
    }

    #[inline]
    pub fn contains_disease(&self, disease: &str) -> bool {
        self.disease_rows.contains_key(disease)
    }

    /// Distinct disease labels, sorted ascending
    pub fn diseases(&self) -> Vec<&str> {
        let mut diseases: Vec<&str> = self.disease_rows.keys().map(String::as_str).collect();
        diseases.sort_unstable();
        diseases
    }

    /// Encode reported symptoms as a feature vector
    ///
    /// Unknown symptoms and duplicates are ignored.
    pub fn encode<S: AsRef<str>>(&self, symptoms: &[S]) -> FeatureVector {
        let mut features = FeatureVector::zeros(self.dim());
        for symptom in symptoms {
            if let Some(idx) = self.symptom_position(symptom.as_ref()) {
                features.set(idx);
            }
        }
        features
    }

    /// Symptoms recorded for a disease
    ///
    /// Exact label match. Presence flags are unioned across every row of
    /// the disease and returned in column order, so the result does not
    /// depend on row order. Unknown diseases yield an empty list.
    pub fn symptoms_for(&self, disease: &str) -> Vec<Symptom> {
        let rows = match self.disease_rows.get(disease) {
            Some(rows) => rows,
            None => return Vec::new(),
        };

        let mut present = vec![false; self.dim()];
        for &row in rows {
            for (slot, flag) in present.iter_mut().zip(&self.records[row].present) {
                *slot |= *flag;
            }
        }

        self.symptoms
            .iter()
            .zip(present)
            .filter_map(|(symptom, flag)| flag.then(|| symptom.clone()))
            .collect()
    }

    /// Feature matrix and label column for model fitting
    pub fn training_data(&self) -> (Vec<FeatureVector>, Vec<Disease>) {
        self.records
            .iter()
            .map(|record| (record.features(), record.disease.clone()))
            .unzip()
    }
}
