//! Delimited-text export.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::store::PatientStore;
use crate::types::{ExportStats, RecordResult};

/// Writes every patient's lines to `writer`, in store order.
///
/// Patients without reports produce no lines and are counted as skipped.
pub fn export_to_writer<W: Write>(store: &PatientStore, writer: W) -> RecordResult<ExportStats> {
    let mut writer = BufWriter::new(writer);
    let mut stats = ExportStats::default();

    for patient in store.patients() {
        if !patient.has_reports() {
            tracing::debug!(
                patient_id = patient.id(),
                "Skipping patient without reports"
            );
            stats.patients_skipped += 1;
            continue;
        }

        writer.write_all(patient.to_delimited().as_bytes())?;
        stats.patients_written += 1;
        stats.lines_written += patient.report_count();
    }

    writer.flush()?;
    Ok(stats)
}

/// Writes the store to `path`, replacing any existing content.
pub fn export_to_path<P: AsRef<Path>>(store: &PatientStore, path: P) -> RecordResult<ExportStats> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let stats = export_to_writer(store, file)?;

    tracing::info!(
        "Exported {} lines for {} patients to {}",
        stats.lines_written,
        stats.patients_written,
        path.display()
    );
    Ok(stats)
}
