//! Disease to medical specialty mapping

use serde::{Deserialize, Serialize};

/// One row of the specialty table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialtyRow {
    #[serde(rename = "Disease")]
    pub disease: String,
    #[serde(rename = "Specialty")]
    pub specialty: String,
}

impl SpecialtyRow {
    pub fn new(disease: impl Into<String>, specialty: impl Into<String>) -> Self {
        Self {
            disease: disease.into(),
            specialty: specialty.into(),
        }
    }
}

/// Ordered specialty table
///
/// Lookups are case-insensitive substring matches against the disease
/// column and return the first matching row in table order.
#[derive(Debug, Clone, Default)]
pub struct SpecialtyTable {
    rows: Vec<SpecialtyRow>,
    // lowercase disease column, parallel to `rows`
    folded: Vec<String>,
}

impl SpecialtyTable {
    pub fn new(rows: Vec<SpecialtyRow>) -> Self {
        let folded = rows.iter().map(|r| r.disease.to_lowercase()).collect();
        Self { rows, folded }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[SpecialtyRow] {
        &self.rows
    }

    /// Specialty of the first row whose disease column contains `disease`
    pub fn specialty_for(&self, disease: &str) -> Option<&str> {
        let needle = disease.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.folded
            .iter()
            .position(|d| d.contains(&needle))
            .map(|idx| self.rows[idx].specialty.as_str())
    }
}
