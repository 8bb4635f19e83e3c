//! Health report type.
//!
//! A `HealthReport` is one dated clinical visit. Reports are never
//! mutated after construction.

/// Separator between fields in the delimited text format.
///
/// Field values are written verbatim, so a value containing this character
/// will not survive an export/import round trip.
pub const FIELD_DELIMITER: char = ',';

/// A single visit record.
///
/// # Examples
///
/// ```
/// use health_types::HealthReport;
///
/// let report = HealthReport::new("2024-01-01", "flu", "Dr. X", "rest");
/// assert_eq!(report.to_delimited(), "2024-01-01,flu,Dr. X,rest");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealthReport {
    date: String,
    diagnosis: String,
    doctor: String,
    treatment: String,
}

impl HealthReport {
    /// Creates a report. Any text is accepted, including empty strings.
    ///
    /// The date is expected as `YYYY-MM-DD` but is not validated.
    pub fn new(
        date: impl Into<String>,
        diagnosis: impl Into<String>,
        doctor: impl Into<String>,
        treatment: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            diagnosis: diagnosis.into(),
            doctor: doctor.into(),
            treatment: treatment.into(),
        }
    }

    /// Visit date.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Diagnosis text.
    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }

    /// Attending doctor.
    pub fn doctor(&self) -> &str {
        &self.doctor
    }

    /// Treatment text.
    pub fn treatment(&self) -> &str {
        &self.treatment
    }

    /// Renders the report as a labelled multi-line block.
    ///
    /// Every line, including the last, ends with a newline.
    pub fn render(&self) -> String {
        format!(
            "Date: {}\nDiagnosis: {}\nDoctor: {}\nTreatment: {}\n",
            self.date, self.diagnosis, self.doctor, self.treatment
        )
    }

    /// Joins the four fields with [`FIELD_DELIMITER`] in fixed order:
    /// date, diagnosis, doctor, treatment.
    ///
    /// No escaping is applied.
    pub fn to_delimited(&self) -> String {
        format!(
            "{}{d}{}{d}{}{d}{}",
            self.date,
            self.diagnosis,
            self.doctor,
            self.treatment,
            d = FIELD_DELIMITER
        )
    }
}
