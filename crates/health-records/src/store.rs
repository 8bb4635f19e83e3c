//! In-memory patient store.
//!
//! Patients are kept in insertion order. An id index remembers where the
//! *first* patient with each id lives, so lookups keep first-match
//! semantics when ids collide without scanning the whole sequence.

use std::collections::HashMap;

use health_types::{HealthReport, Patient, PatientId};

use crate::row::PatientRow;
use crate::types::{AddReportOutcome, RowEffect, Summary};

/// In-memory store for patients and their reports.
///
/// # Example
///
/// ```
/// use health_records::PatientStore;
/// use health_types::{HealthReport, Patient};
///
/// let mut store = PatientStore::new();
/// store.add_patient(Patient::new(1, "Bob", "bob@x.com"));
///
/// let outcome = store.add_report_to_patient(
///     1,
///     HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"),
/// );
/// assert!(outcome.is_added());
/// assert_eq!(store.summarize().reports, 1);
/// ```
#[derive(Clone, Default)]
pub struct PatientStore {
    /// Patients in insertion order.
    patients: Vec<Patient>,
    /// Position of the first patient added with each id.
    first_by_id: HashMap<PatientId, usize>,
}

impl std::fmt::Debug for PatientStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientStore")
            .field("patients", &self.patients.len())
            .field("first_by_id", &self.first_by_id.len())
            .finish()
    }
}

impl PatientStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a patient. Duplicate ids are accepted; the earlier patient
    /// keeps winning lookups.
    pub fn add_patient(&mut self, patient: Patient) {
        let position = self.patients.len();
        self.first_by_id.entry(patient.id()).or_insert(position);
        self.patients.push(patient);
    }

    /// Returns the first patient added with `id`.
    pub fn find_by_id(&self, id: PatientId) -> Option<&Patient> {
        self.first_by_id.get(&id).map(|&i| &self.patients[i])
    }

    /// Mutable variant of [`find_by_id`](Self::find_by_id).
    pub fn find_by_id_mut(&mut self, id: PatientId) -> Option<&mut Patient> {
        let i = *self.first_by_id.get(&id)?;
        self.patients.get_mut(i)
    }

    /// Returns every patient whose name equals `name`, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Vec<&Patient> {
        self.patients
            .iter()
            .filter(|p| p.name_matches(name))
            .collect()
    }

    /// Appends a report to the first patient with `id`.
    ///
    /// The store is left untouched if no patient has that id.
    pub fn add_report_to_patient(&mut self, id: PatientId, report: HealthReport) -> AddReportOutcome {
        match self.find_by_id_mut(id) {
            Some(patient) => {
                patient.add_report(report);
                AddReportOutcome::Added
            }
            None => AddReportOutcome::PatientNotFound(report),
        }
    }

    /// Renders the first patient with `id`, or `None` if there is none.
    pub fn render_reports_for(&self, id: PatientId) -> Option<String> {
        self.find_by_id(id).map(Patient::render)
    }

    /// Counts patients and reports with a full pass over the store.
    pub fn summarize(&self) -> Summary {
        Summary {
            patients: self.patients.len(),
            reports: self.patients.iter().map(Patient::report_count).sum(),
        }
    }

    /// Merges one imported row.
    ///
    /// A known id gets the report appended; an unseen id becomes a new
    /// patient built from the row's name and contact.
    pub fn apply_row(&mut self, row: PatientRow) -> RowEffect {
        if let Some(patient) = self.find_by_id_mut(row.id) {
            patient.add_report(row.report);
            return RowEffect::AppendedReport;
        }

        let mut patient = row.to_patient();
        patient.add_report(row.report);
        self.add_patient(patient);
        RowEffect::CreatedPatient
    }

    /// Iterates patients in insertion order.
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    /// Returns the number of patients.
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    /// Returns true if the store holds no patients.
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }
}
