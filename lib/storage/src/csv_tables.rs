//! CSV decoding for the three tables
//!
//! Every reader trims surrounding whitespace from headers and fields.
//! Column contracts:
//!
//! - incidence: `<label>,<symptom>,<symptom>,...` with numeric cells,
//!   any value above zero meaning present
//! - specialty: `Disease,Specialty`
//! - doctors: `name,Specialty,contact,city`

use csv::{ReaderBuilder, StringRecord, Trim};
use diagnox_core::{
    DoctorRecord, DoctorTable, Error, IncidenceRecord, IncidenceTable, Result, SpecialtyRow,
    SpecialtyTable,
};
use std::io::Read;

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(input)
}

fn csv_error(table: &str, e: csv::Error) -> Error {
    Error::Dataset(format!("{} table: {}", table, e))
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Decode the disease-by-symptom incidence table
pub fn read_incidence<R: Read>(input: R) -> Result<IncidenceTable> {
    let mut rdr = reader(input);
    let headers = rdr.headers().map_err(|e| csv_error("incidence", e))?.clone();
    if headers.len() < 2 {
        return Err(Error::Schema(format!(
            "incidence table needs a label column and at least one symptom column, found {} columns",
            headers.len()
        )));
    }
    let symptoms: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| csv_error("incidence", e))?;
        let line = line_of(&record);

        let disease = record.get(0).unwrap_or_default();
        if disease.is_empty() {
            return Err(Error::Dataset(format!("incidence table line {}: empty disease label", line)));
        }

        let present = record
            .iter()
            .skip(1)
            .enumerate()
            .map(|(col, cell)| {
                cell.parse::<f64>().map(|v| v > 0.0).map_err(|_| {
                    Error::Dataset(format!(
                        "incidence table line {}: non-numeric value {:?} for symptom {}",
                        line, cell, symptoms[col]
                    ))
                })
            })
            .collect::<Result<Vec<bool>>>()?;

        records.push(IncidenceRecord::new(disease, present));
    }

    IncidenceTable::new(symptoms, records)
}

/// Decode the disease to specialty table
pub fn read_specialties<R: Read>(input: R) -> Result<SpecialtyTable> {
    let rows = reader(input)
        .deserialize::<SpecialtyRow>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| csv_error("specialty", e))?;
    Ok(SpecialtyTable::new(rows))
}

/// Decode the doctor table
pub fn read_doctors<R: Read>(input: R) -> Result<DoctorTable> {
    let doctors = reader(input)
        .deserialize::<DoctorRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| csv_error("doctors", e))?;
    Ok(DoctorTable::new(doctors))
}
