//! Patient type.
//!
//! A `Patient` owns its visit history. Reports are appended in visit order
//! and never removed.

use crate::{HealthReport, PatientId, FIELD_DELIMITER};

/// Line printed between rendered reports.
pub const REPORT_DIVIDER: &str = "-------------------------";

/// Line printed in place of the report list when a patient has none.
pub const NO_REPORTS_NOTICE: &str = "No reports found.";

/// A patient and their visit history.
///
/// # Examples
///
/// ```
/// use health_types::{HealthReport, Patient};
///
/// let mut patient = Patient::new(2, "Carol", "c@x.com");
/// assert!(!patient.has_reports());
///
/// patient.add_report(HealthReport::new("2024-02-02", "cold", "Dr. Y", "fluids"));
/// assert_eq!(patient.report_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patient {
    id: PatientId,
    name: String,
    contact_info: String,
    reports: Vec<HealthReport>,
}

impl Patient {
    /// Creates a patient with an empty report history.
    pub fn new(id: PatientId, name: impl Into<String>, contact_info: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            contact_info: contact_info.into(),
            reports: Vec::new(),
        }
    }

    /// Externally assigned identifier.
    pub fn id(&self) -> PatientId {
        self.id
    }

    /// Patient name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form contact string.
    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    /// Reports in visit order.
    pub fn reports(&self) -> &[HealthReport] {
        &self.reports
    }

    /// Number of reports on file.
    pub fn report_count(&self) -> usize {
        self.reports.len()
    }

    /// Returns true if at least one report is on file.
    pub fn has_reports(&self) -> bool {
        !self.reports.is_empty()
    }

    /// Appends a report to the history.
    pub fn add_report(&mut self, report: HealthReport) {
        self.reports.push(report);
    }

    /// Returns true if `name` matches this patient's name, ignoring case.
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Renders the header line followed by every report.
    ///
    /// Each report is followed by [`REPORT_DIVIDER`]. A patient without
    /// reports gets [`NO_REPORTS_NOTICE`] instead of an empty list.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Patient ID: {}, Name: {}, Contact: {}\n",
            self.id, self.name, self.contact_info
        );

        if self.reports.is_empty() {
            out.push_str(NO_REPORTS_NOTICE);
            out.push('\n');
            return out;
        }

        for report in &self.reports {
            out.push_str(&report.render());
            out.push_str(REPORT_DIVIDER);
            out.push('\n');
        }
        out
    }

    /// Emits one newline-terminated line per report:
    /// `id,name,contact,date,diagnosis,doctor,treatment`.
    ///
    /// A patient with no reports yields an empty string, so their
    /// demographics are not exported.
    pub fn to_delimited(&self) -> String {
        let mut out = String::new();
        for report in &self.reports {
            out.push_str(&self.id.to_string());
            out.push(FIELD_DELIMITER);
            out.push_str(&self.name);
            out.push(FIELD_DELIMITER);
            out.push_str(&self.contact_info);
            out.push(FIELD_DELIMITER);
            out.push_str(&report.to_delimited());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bob() -> Patient {
        Patient::new(1, "Bob", "bob@x.com")
    }

    #[test]
    fn test_new_patient_has_no_reports() {
        let patient = make_bob();
        assert_eq!(patient.id(), 1);
        assert_eq!(patient.name(), "Bob");
        assert_eq!(patient.contact_info(), "bob@x.com");
        assert_eq!(patient.report_count(), 0);
        assert!(!patient.has_reports());
    }

    #[test]
    fn test_reports_keep_insertion_order() {
        let mut patient = make_bob();
        patient.add_report(HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"));
        patient.add_report(HealthReport::new("2024-02-01", "cough", "Dr. X", "syrup"));

        let dates: Vec<&str> = patient.reports().iter().map(|r| r.date()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-02-01"]);
    }

    #[test]
    fn test_render_with_report() {
        let mut patient = make_bob();
        patient.add_report(HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"));

        let expected = "Patient ID: 1, Name: Bob, Contact: bob@x.com\n\
                        Date: 2024-01-01\n\
                        Diagnosis: flu\n\
                        Doctor: Dr. X\n\
                        Treatment: rest\n\
                        -------------------------\n";
        assert_eq!(patient.render(), expected);
    }

    #[test]
    fn test_render_without_reports() {
        let rendered = make_bob().render();
        assert_eq!(
            rendered,
            "Patient ID: 1, Name: Bob, Contact: bob@x.com\nNo reports found.\n"
        );
    }

    #[test]
    fn test_to_delimited_one_line_per_report() {
        let mut patient = make_bob();
        patient.add_report(HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"));
        patient.add_report(HealthReport::new("2024-01-09", "flu", "Dr. X", "fluids"));

        assert_eq!(
            patient.to_delimited(),
            "1,Bob,bob@x.com,2024-01-01,flu,Dr. X,rest\n\
             1,Bob,bob@x.com,2024-01-09,flu,Dr. X,fluids\n"
        );
    }

    #[test]
    fn test_to_delimited_empty_without_reports() {
        assert_eq!(make_bob().to_delimited(), "");
    }

    #[test]
    fn test_name_matches_ignores_case() {
        let patient = Patient::new(5, "Alice", "a@x.com");
        assert!(patient.name_matches("ALICE"));
        assert!(patient.name_matches("alice"));
        assert!(!patient.name_matches("Alicia"));
    }
}
