//! Doctor directory

use serde::{Deserialize, Serialize};

/// A practitioner listed in the doctor table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub name: String,
    #[serde(rename = "Specialty")]
    pub specialty: String,
    pub contact: String,
    pub city: String,
}

impl DoctorRecord {
    pub fn new(
        name: impl Into<String>,
        specialty: impl Into<String>,
        contact: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            specialty: specialty.into(),
            contact: contact.into(),
            city: city.into(),
        }
    }
}

#[inline]
fn normalize(specialty: &str) -> String {
    specialty.trim().to_lowercase()
}

/// Immutable doctor table
#[derive(Debug, Clone, Default)]
pub struct DoctorTable {
    doctors: Vec<DoctorRecord>,
    // normalized specialty column, parallel to `doctors`
    normalized: Vec<String>,
}

impl DoctorTable {
    pub fn new(doctors: Vec<DoctorRecord>) -> Self {
        let normalized = doctors.iter().map(|d| normalize(&d.specialty)).collect();
        Self {
            doctors,
            normalized,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.doctors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.doctors.is_empty()
    }

    #[inline]
    pub fn doctors(&self) -> &[DoctorRecord] {
        &self.doctors
    }

    /// Doctors whose normalized specialty contains the normalized `specialty`
    ///
    /// Table order is preserved. A blank specialty matches nobody.
    pub fn with_specialty(&self, specialty: &str) -> Vec<DoctorRecord> {
        let needle = normalize(specialty);
        if needle.is_empty() {
            return Vec::new();
        }

        self.doctors
            .iter()
            .zip(&self.normalized)
            .filter(|(_, s)| s.contains(&needle))
            .map(|(d, _)| d.clone())
            .collect()
    }
}
