//! Patient record line parser.
//!
//! One line carries one (patient, report) pair:
//! `id,name,contactInfo,date,diagnosis,doctor,treatment`.

use csv::StringRecord;
use health_types::{HealthReport, Patient, PatientId};

use crate::parser::{check_field_count, parse, DelimitedRecord};
use crate::types::RecordResult;

/// Field order of a patient record line.
const PATIENT_ROW_FIELDS: &[&str] = &[
    "id",
    "name",
    "contactInfo",
    "date",
    "diagnosis",
    "doctor",
    "treatment",
];

/// One parsed line of the delimited format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientRow {
    /// Patient id.
    pub id: PatientId,
    /// Patient name, used only when the id is new to the store.
    pub name: String,
    /// Contact string, used only when the id is new to the store.
    pub contact_info: String,
    /// The visit carried by this line.
    pub report: HealthReport,
}

impl PatientRow {
    /// Creates a new patient carrying only this row's demographics.
    pub fn to_patient(&self) -> Patient {
        Patient::new(self.id, self.name.clone(), self.contact_info.clone())
    }

    fn from_fields(fields: &[&str]) -> RecordResult<Self> {
        check_field_count(fields.len(), Self::FIELD_COUNT)?;
        Ok(PatientRow {
            id: parse::patient_id(fields[0])?,
            name: fields[1].to_string(),
            contact_info: fields[2].to_string(),
            report: HealthReport::new(fields[3], fields[4], fields[5], fields[6]),
        })
    }
}

impl DelimitedRecord for PatientRow {
    const FIELD_COUNT: usize = PATIENT_ROW_FIELDS.len();

    fn from_record(record: &StringRecord) -> RecordResult<Self> {
        let fields: Vec<&str> = record.iter().collect();
        Self::from_fields(&fields)
    }
}
