use crate::csv_tables::{read_doctors, read_incidence, read_specialties};
use diagnox_core::{Datasets, Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_INCIDENCE_FILE: &str = "dis_sym_dataset_comb.csv";
pub const DEFAULT_SPECIALTY_FILE: &str = "disease_specialty.csv";
pub const DEFAULT_DOCTORS_FILE: &str = "doctors.csv";

/// File names of the three tables inside the data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    pub incidence: String,
    pub specialty: String,
    pub doctors: String,
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            incidence: DEFAULT_INCIDENCE_FILE.to_string(),
            specialty: DEFAULT_SPECIALTY_FILE.to_string(),
            doctors: DEFAULT_DOCTORS_FILE.to_string(),
        }
    }
}

/// Loads the startup tables from a data directory
pub struct DatasetLoader {
    data_dir: PathBuf,
    files: DatasetFiles,
}

impl DatasetLoader {
    pub fn new<P: AsRef<Path>>(data_dir: P, files: DatasetFiles) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            files,
        }
    }

    #[inline]
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[inline]
    pub fn incidence_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.incidence)
    }

    #[inline]
    pub fn specialty_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.specialty)
    }

    #[inline]
    pub fn doctors_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.doctors)
    }

    /// Read and validate all three tables
    pub fn load(&self) -> Result<Datasets> {
        let incidence_path = self.incidence_path();
        let incidence = read_incidence(open(&incidence_path)?).map_err(|e| with_path(&incidence_path, e))?;
        if incidence.is_empty() {
            return Err(Error::Dataset(format!(
                "{}: incidence table has no rows",
                incidence_path.display()
            )));
        }
        info!(
            "Loaded incidence table: {} rows, {} symptoms, {} diseases",
            incidence.len(),
            incidence.dim(),
            incidence.diseases().len()
        );

        let specialty_path = self.specialty_path();
        let specialties = read_specialties(open(&specialty_path)?).map_err(|e| with_path(&specialty_path, e))?;
        info!("Loaded specialty table: {} rows", specialties.len());

        let doctors_path = self.doctors_path();
        let doctors = read_doctors(open(&doctors_path)?).map_err(|e| with_path(&doctors_path, e))?;
        info!("Loaded doctor table: {} doctors", doctors.len());

        Ok(Datasets::new(incidence, specialties, doctors))
    }
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .map_err(|e| Error::Dataset(format!("cannot open {}: {}", path.display(), e)))?;
    Ok(BufReader::new(file))
}

fn with_path(path: &Path, e: Error) -> Error {
    match e {
        Error::Dataset(msg) => Error::Dataset(format!("{}: {}", path.display(), msg)),
        Error::Schema(msg) => Error::Schema(format!("{}: {}", path.display(), msg)),
        other => other,
    }
}
