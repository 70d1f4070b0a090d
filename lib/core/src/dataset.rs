use crate::{DoctorTable, IncidenceTable, SpecialtyTable};

/// The three read-only tables loaded at startup
#[derive(Debug, Clone)]
pub struct Datasets {
    pub incidence: IncidenceTable,
    pub specialties: SpecialtyTable,
    pub doctors: DoctorTable,
}

impl Datasets {
    pub fn new(incidence: IncidenceTable, specialties: SpecialtyTable, doctors: DoctorTable) -> Self {
        Self {
            incidence,
            specialties,
            doctors,
        }
    }
}
