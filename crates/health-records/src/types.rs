//! Store and transcoding types.

use std::fmt;

use health_types::HealthReport;
use thiserror::Error;

/// Errors that can occur while importing or exporting patient records.
#[derive(Error, Debug)]
pub enum RecordError {
    /// I/O error reading or writing a record file.
    #[error("IO error on record file: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text reader error.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: String,
    },

    /// The id field is not an integer.
    #[error("Invalid patient id: {value:?}")]
    InvalidPatientId {
        /// The invalid value that was encountered.
        value: String,
    },

    /// Line has fewer fields than a record needs.
    #[error("Missing fields: expected {expected}, found {found}")]
    MissingFields {
        /// Expected field count.
        expected: usize,
        /// Found field count.
        found: usize,
    },

    /// Line has more fields than a record holds.
    #[error("Too many fields: expected {expected}, found {found}")]
    TooManyFields {
        /// Expected field count.
        expected: usize,
        /// Found field count.
        found: usize,
    },

    /// Import aborted on a malformed line.
    #[error("Malformed line {line}: {source}")]
    MalformedLine {
        /// 1-based line number.
        line: u64,
        /// Why the line was rejected.
        #[source]
        source: Box<RecordError>,
    },
}

impl RecordError {
    /// True when the underlying reader failed, as opposed to a bad line.
    pub fn is_io_error(&self) -> bool {
        match self {
            RecordError::Io(_) => true,
            RecordError::Csv(e) => e.is_io_error(),
            _ => false,
        }
    }
}

/// Result type for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// Configuration for importing delimited text.
#[derive(Debug, Clone, Default)]
pub struct ImportConfig {
    /// Abort on the first malformed line instead of collecting failures.
    ///
    /// Lines before the malformed one stay applied.
    pub fail_fast: bool,
}

impl ImportConfig {
    /// Creates a config that stops at the first malformed line.
    pub fn fail_fast() -> Self {
        Self { fail_fast: true }
    }
}

/// A line that could not be imported.
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based line number.
    pub line: u64,
    /// Why the line was rejected.
    pub reason: RecordError,
}

impl fmt::Display for LineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Aggregate outcome of an import.
#[derive(Debug, Default)]
pub struct ImportReport {
    /// Lines merged into the store.
    pub rows_applied: usize,
    /// Patients created because their id was not yet in the store.
    pub patients_created: usize,
    /// Lines rejected, in file order.
    pub failures: Vec<LineFailure>,
}

impl ImportReport {
    /// Returns true if no line was rejected.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Reports appended to patients that already existed before their line.
    pub fn reports_appended_to_existing(&self) -> usize {
        self.rows_applied - self.patients_created
    }
}

/// Outcome of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Patients that contributed at least one line.
    pub patients_written: usize,
    /// Patients with no reports, which contribute nothing.
    pub patients_skipped: usize,
    /// Lines written.
    pub lines_written: usize,
}

/// Patient and report totals for a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Number of patients.
    pub patients: usize,
    /// Reports across all patients.
    pub reports: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Summary Report:")?;
        writeln!(f, "Total Patients: {}", self.patients)?;
        write!(f, "Total Reports: {}", self.reports)
    }
}

/// Result of adding a report to a patient looked up by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddReportOutcome {
    /// The report was appended.
    Added,
    /// No patient has that id. The report is handed back untouched.
    PatientNotFound(HealthReport),
}

impl AddReportOutcome {
    /// Returns true if the report was appended.
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added)
    }
}

/// What merging an imported row did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowEffect {
    /// A new patient was created and given the report.
    CreatedPatient,
    /// The report was appended to an existing patient.
    AppendedReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_config_default() {
        assert!(!ImportConfig::default().fail_fast);
        assert!(ImportConfig::fail_fast().fail_fast);
    }

    #[test]
    fn test_is_io_error() {
        let io = RecordError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.is_io_error());
        assert!(!RecordError::InvalidPatientId { value: "x".into() }.is_io_error());
        assert!(!RecordError::MissingFields { expected: 7, found: 2 }.is_io_error());
    }

    #[test]
    fn test_summary_display() {
        let summary = Summary {
            patients: 2,
            reports: 3,
        };
        assert_eq!(
            summary.to_string(),
            "Summary Report:\nTotal Patients: 2\nTotal Reports: 3"
        );
    }

    #[test]
    fn test_import_report_counts() {
        let report = ImportReport {
            rows_applied: 5,
            patients_created: 2,
            ..Default::default()
        };
        assert!(report.is_clean());
        assert_eq!(report.reports_appended_to_existing(), 3);
    }

    #[test]
    fn test_line_failure_display() {
        let failure = LineFailure {
            line: 4,
            reason: RecordError::MissingFields {
                expected: 7,
                found: 3,
            },
        };
        assert_eq!(
            failure.to_string(),
            "line 4: Missing fields: expected 7, found 3"
        );
    }
}
