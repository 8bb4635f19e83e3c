//! # health-records
//!
//! In-memory patient store with delimited-text import and export.
//!
//! ## Usage
//!
//! ```rust
//! use health_records::{export_to_writer, import_from_reader, ImportConfig, PatientStore};
//! use health_types::{HealthReport, Patient};
//!
//! let mut store = PatientStore::new();
//! store.add_patient(Patient::new(1, "Bob", "bob@x.com"));
//! store.add_report_to_patient(1, HealthReport::new("2024-01-01", "flu", "Dr. X", "rest"));
//!
//! let mut buf = Vec::new();
//! export_to_writer(&store, &mut buf).unwrap();
//!
//! let mut restored = PatientStore::new();
//! let report = import_from_reader(&mut restored, buf.as_slice(), &ImportConfig::default()).unwrap();
//! assert_eq!(report.rows_applied, 1);
//! assert_eq!(restored.summarize(), store.summarize());
//! ```
//!
//! ## Features
//!
//! - `parallel` (default): Enables [`import_from_path_parallel`], which parses
//!   lines on the rayon thread pool before merging them into the store.

#![warn(missing_docs)]

mod export;
mod import;
pub mod parser;
mod row;
mod store;
mod types;

pub use export::{export_to_path, export_to_writer};
#[cfg(feature = "parallel")]
pub use import::{import_from_path_parallel, parse_path_parallel};
pub use import::{apply_parsed, import_from_path, import_from_reader, parse_path, ParsedLine};
pub use parser::{DelimitedRecord, RawRecords, RecordParser};
pub use row::PatientRow;
pub use store::PatientStore;
pub use types::{
    AddReportOutcome, ExportStats, ImportConfig, ImportReport, LineFailure, RecordError,
    RecordResult, RowEffect, Summary,
};

// Re-export health-types for convenience
pub use health_types;
