//! Delimited-text import.
//!
//! Each line is parsed into its own result. Malformed lines are collected
//! with their line numbers and the rest of the file is still applied,
//! unless [`ImportConfig::fail_fast`] asks for the first failure to abort.

use std::io::Read;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
use crate::parser::{DelimitedRecord, RawRecords};
use crate::parser::RecordParser;
use crate::row::PatientRow;
use crate::store::PatientStore;
use crate::types::{ImportConfig, ImportReport, LineFailure, RecordError, RecordResult, RowEffect};

/// One parsed line and its 1-based line number.
pub type ParsedLine = (u64, RecordResult<PatientRow>);

/// Imports lines from `reader` into `store`, merging as it reads.
///
/// # Errors
/// Returns an error on an I/O failure, or on the first malformed line when
/// `config.fail_fast` is set. Rows merged before the error stay merged.
pub fn import_from_reader<R: Read>(
    store: &mut PatientStore,
    reader: R,
    config: &ImportConfig,
) -> RecordResult<ImportReport> {
    let parser = RecordParser::<_, PatientRow>::from_reader(reader);
    let mut merge = Merge::new(store, config);

    for (line, parsed) in parser {
        merge.accept(line, parsed)?;
    }

    Ok(merge.finish())
}

/// Imports the file at `path` into `store`.
pub fn import_from_path<P: AsRef<Path>>(
    store: &mut PatientStore,
    path: P,
    config: &ImportConfig,
) -> RecordResult<ImportReport> {
    let path = path.as_ref();
    let parsed = parse_path(path)?;
    let report = apply_parsed(store, parsed, config)?;

    tracing::info!(
        "Imported {} rows ({} new patients, {} rejected) from {}",
        report.rows_applied,
        report.patients_created,
        report.failures.len(),
        path.display()
    );
    Ok(report)
}

/// Imports the file at `path`, parsing records on the rayon pool.
///
/// Records are read by the same reader as [`import_from_path`] and merged
/// in file order afterwards, so the resulting store and report are the same.
#[cfg(feature = "parallel")]
pub fn import_from_path_parallel<P: AsRef<Path>>(
    store: &mut PatientStore,
    path: P,
    config: &ImportConfig,
) -> RecordResult<ImportReport> {
    let path = path.as_ref();
    let parsed = parse_path_parallel(path)?;
    let report = apply_parsed(store, parsed, config)?;

    tracing::info!(
        "Imported {} rows ({} new patients, {} rejected) from {} in parallel",
        report.rows_applied,
        report.patients_created,
        report.failures.len(),
        path.display()
    );
    Ok(report)
}

/// Parses every line of the file at `path` without touching any store.
///
/// Reading stops after an I/O error, which is kept as the last entry.
pub fn parse_path<P: AsRef<Path>>(path: P) -> RecordResult<Vec<ParsedLine>> {
    let parser = RecordParser::<_, PatientRow>::from_path(path)?;
    Ok(take_through_io_error(parser))
}

/// Like [`parse_path`], but converts records to rows on the rayon pool.
#[cfg(feature = "parallel")]
pub fn parse_path_parallel<P: AsRef<Path>>(path: P) -> RecordResult<Vec<ParsedLine>> {
    let records = take_through_io_error(RawRecords::from_path(path)?);

    Ok(records
        .into_par_iter()
        .map(|(line, record)| (line, record.and_then(|r| PatientRow::from_record(&r))))
        .collect())
}

/// Merges lines produced by [`parse_path`] into `store`, in order.
///
/// # Errors
/// Same as [`import_from_reader`].
pub fn apply_parsed(
    store: &mut PatientStore,
    parsed: Vec<ParsedLine>,
    config: &ImportConfig,
) -> RecordResult<ImportReport> {
    let mut merge = Merge::new(store, config);
    for (line, result) in parsed {
        merge.accept(line, result)?;
    }
    Ok(merge.finish())
}

fn take_through_io_error<T, I>(lines: I) -> Vec<(u64, RecordResult<T>)>
where
    I: Iterator<Item = (u64, RecordResult<T>)>,
{
    let mut out = Vec::new();
    for (line, result) in lines {
        let stop = matches!(&result, Err(e) if e.is_io_error());
        out.push((line, result));
        if stop {
            break;
        }
    }
    out
}

/// Applies parsed rows to a store and tallies the outcome.
struct Merge<'a> {
    store: &'a mut PatientStore,
    fail_fast: bool,
    report: ImportReport,
}

impl<'a> Merge<'a> {
    fn new(store: &'a mut PatientStore, config: &ImportConfig) -> Self {
        Self {
            store,
            fail_fast: config.fail_fast,
            report: ImportReport::default(),
        }
    }

    fn accept(&mut self, line: u64, parsed: RecordResult<PatientRow>) -> RecordResult<()> {
        match parsed {
            Ok(row) => {
                if self.store.apply_row(row) == RowEffect::CreatedPatient {
                    self.report.patients_created += 1;
                }
                self.report.rows_applied += 1;
                Ok(())
            }
            // Reader-level I/O failures end the import regardless of mode
            Err(e) if e.is_io_error() => Err(e),
            Err(reason) if self.fail_fast => Err(RecordError::MalformedLine {
                line,
                source: Box::new(reason),
            }),
            Err(reason) => {
                tracing::warn!(line, "Skipping malformed line: {}", reason);
                self.report.failures.push(LineFailure { line, reason });
                Ok(())
            }
        }
    }

    fn finish(self) -> ImportReport {
        self.report
    }
}
