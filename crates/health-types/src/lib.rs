//! # health-types
//!
//! Type definitions for patient health records.
//!
//! This crate provides the value types shared by the record store and the
//! interactive monitor: patients, their visit reports, and identifiers.
//!
//! ## Features
//!
//! - `serde` (default): Enables serialization/deserialization support via serde.
//!   Disable this feature for zero-dependency usage.
//!
//! ## Usage
//!
//! ```rust
//! use health_types::{HealthReport, Patient};
//!
//! let mut patient = Patient::new(1, "Bob", "bob@x.com");
//! patient.add_report(HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"));
//!
//! assert_eq!(patient.report_count(), 1);
//! assert_eq!(
//!     patient.to_delimited(),
//!     "1,Bob,bob@x.com,2024-01-01,flu,Dr. X,rest\n"
//! );
//! ```

#![warn(missing_docs)]

mod patient;
mod patient_id;
mod report;

// Re-export all public types at crate root
pub use patient::{Patient, NO_REPORTS_NOTICE, REPORT_DIVIDER};
pub use patient_id::PatientId;
pub use report::{HealthReport, FIELD_DELIMITER};
