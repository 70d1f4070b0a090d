pub mod csv_tables;
pub mod manager;

pub use csv_tables::{read_doctors, read_incidence, read_specialties};
pub use manager::{
    DatasetFiles, DatasetLoader, DEFAULT_DOCTORS_FILE, DEFAULT_INCIDENCE_FILE,
    DEFAULT_SPECIALTY_FILE,
};
