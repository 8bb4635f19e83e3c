//! Generic delimited-text parser.
//!
//! Provides a streaming parser over comma-separated lines. Quoting is
//! disabled: every comma is a field boundary.

use std::fs::File;
use std::io::{BufReader, Read};
use std::marker::PhantomData;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};

use crate::types::{RecordError, RecordResult};

/// Trait for types that can be parsed from one delimited line.
pub trait DelimitedRecord: Sized {
    /// Exact number of fields a line must carry.
    const FIELD_COUNT: usize;

    /// Parse a record from a CSV StringRecord.
    fn from_record(record: &StringRecord) -> RecordResult<Self>;
}

/// Non-blank records read straight off the delimited-text reader.
///
/// Yields `(line, record)` pairs. Reader errors that only affect one
/// record (such as invalid UTF-8) come back as that line's error and the
/// next call moves on. A leading UTF-8 BOM is dropped by the reader, and
/// `\n`, `\r\n` and a bare `\r` all end a record.
pub struct RawRecords<R: Read> {
    reader: Reader<R>,
}

impl RawRecords<BufReader<File>> {
    /// Opens the file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> RecordResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RecordError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: Read> RawRecords<R> {
    /// Wraps a reader. Every comma is a field boundary; quotes are literal.
    pub fn from_reader(reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::None)
            .from_reader(reader);

        Self { reader }
    }
}

impl<R: Read> Iterator for RawRecords<R> {
    type Item = (u64, RecordResult<StringRecord>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut record = StringRecord::new();
            match self.reader.read_record(&mut record) {
                Ok(true) => {
                    if is_blank(&record) {
                        continue;
                    }
                    let line = record.position().map(|p| p.line()).unwrap_or(0);
                    return Some((line, Ok(record)));
                }
                Ok(false) => return None,
                Err(e) => {
                    let line = e.position().map(|p| p.line()).unwrap_or(0);
                    return Some((line, Err(e.into())));
                }
            }
        }
    }
}

/// A streaming parser for delimited record files.
///
/// Yields `(line, result)` pairs so that callers can report failures by
/// line and keep going. Blank and whitespace-only lines are skipped.
pub struct RecordParser<R: Read, T: DelimitedRecord> {
    records: RawRecords<R>,
    _marker: PhantomData<T>,
}

impl<T: DelimitedRecord> RecordParser<BufReader<File>, T> {
    /// Creates a new parser from a file path.
    ///
    /// # Errors
    /// Returns an error if the file does not exist or cannot be opened.
    pub fn from_path<P: AsRef<Path>>(path: P) -> RecordResult<Self> {
        Ok(Self::from_records(RawRecords::from_path(path)?))
    }
}

impl<R: Read, T: DelimitedRecord> RecordParser<R, T> {
    /// Creates a new parser from a reader.
    pub fn from_reader(reader: R) -> Self {
        Self::from_records(RawRecords::from_reader(reader))
    }

    fn from_records(records: RawRecords<R>) -> Self {
        Self {
            records,
            _marker: PhantomData,
        }
    }
}

impl<R: Read, T: DelimitedRecord> Iterator for RecordParser<R, T> {
    type Item = (u64, RecordResult<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (line, record) = self.records.next()?;
        Some((line, record.and_then(|r| T::from_record(&r))))
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record.iter().all(|f| f.trim().is_empty()))
}

/// Checks that a field count matches exactly.
///
/// Extra fields are an error rather than being ignored. The legacy tool
/// dropped everything past the last expected field, which silently cut a
/// comma-containing treatment short; here the whole line is rejected and
/// reported instead.
pub fn check_field_count(found: usize, expected: usize) -> RecordResult<()> {
    if found < expected {
        return Err(RecordError::MissingFields { expected, found });
    }
    if found > expected {
        return Err(RecordError::TooManyFields { expected, found });
    }
    Ok(())
}

/// Helper functions for parsing field values.
pub mod parse {
    use health_types::PatientId;

    use super::{RecordError, RecordResult};

    /// Parses a patient id. Surrounding whitespace is rejected.
    pub fn patient_id(value: &str) -> RecordResult<PatientId> {
        value
            .parse::<PatientId>()
            .map_err(|_| RecordError::InvalidPatientId {
                value: value.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pair {
        left: String,
        right: String,
    }

    impl DelimitedRecord for Pair {
        const FIELD_COUNT: usize = 2;

        fn from_record(record: &StringRecord) -> RecordResult<Self> {
            check_field_count(record.len(), Self::FIELD_COUNT)?;
            Ok(Pair {
                left: record.get(0).unwrap_or("").to_string(),
                right: record.get(1).unwrap_or("").to_string(),
            })
        }
    }

    #[test]
    fn test_parse_patient_id() {
        assert_eq!(parse::patient_id("42").unwrap(), 42);
        assert_eq!(parse::patient_id("-3").unwrap(), -3);
        assert!(parse::patient_id("abc").is_err());
        assert!(parse::patient_id("").is_err());
        assert!(parse::patient_id(" 1").is_err());
        assert!(parse::patient_id("99999999999").is_err());
    }

    #[test]
    fn test_check_field_count() {
        assert!(check_field_count(7, 7).is_ok());
        assert!(matches!(
            check_field_count(3, 7),
            Err(RecordError::MissingFields {
                expected: 7,
                found: 3
            })
        ));
        assert!(matches!(
            check_field_count(8, 7),
            Err(RecordError::TooManyFields {
                expected: 7,
                found: 8
            })
        ));
    }

    #[test]
    fn test_parser_reports_line_numbers() {
        let input = "a,b\n\nonly\nc,d\n";
        let results: Vec<(u64, RecordResult<Pair>)> =
            RecordParser::from_reader(input.as_bytes()).collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, 1);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, 3);
        assert!(results[1].1.is_err());
        assert_eq!(results[2].0, 4);

        let last = results[2].1.as_ref().unwrap();
        assert_eq!(last.left, "c");
        assert_eq!(last.right, "d");
    }

    #[test]
    fn test_parser_does_not_honour_quotes() {
        let input = "\"a,b\",c\n";
        let results: Vec<(u64, RecordResult<Pair>)> =
            RecordParser::from_reader(input.as_bytes()).collect();
        assert!(matches!(
            results[0].1,
            Err(RecordError::TooManyFields { found: 3, .. })
        ));
    }

    #[test]
    fn test_parser_accepts_crlf() {
        let input = "a,b\r\nc,d\r\n";
        let parsed: Vec<Pair> = RecordParser::from_reader(input.as_bytes())
            .map(|(_, r)| r.unwrap())
            .collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].right, "b");
    }

    #[test]
    fn test_raw_records_continue_past_invalid_utf8() {
        let input: &[u8] = b"a,b\n\xff,c\nd,e\n";
        let results: Vec<(u64, RecordResult<StringRecord>)> =
            RawRecords::from_reader(input).collect();

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_ok());
        assert!(matches!(results[1].1, Err(RecordError::Csv(_))));

        let last = results[2].1.as_ref().unwrap();
        assert_eq!(last.get(0), Some("d"));
    }

    #[test]
    fn test_raw_records_strip_bom() {
        let input: &[u8] = b"\xEF\xBB\xBF1,b\n";
        let record = RawRecords::from_reader(input).next().unwrap().1.unwrap();
        assert_eq!(record.get(0), Some("1"));
    }

    #[test]
    fn test_raw_records_split_on_bare_cr() {
        let input: &[u8] = b"a,b\rc,d\r";
        let fields: Vec<String> = RawRecords::from_reader(input)
            .map(|(_, r)| r.unwrap().get(0).unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["a", "c"]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = RecordParser::<_, Pair>::from_path("/nonexistent/patients.csv");
        assert!(matches!(result, Err(RecordError::FileNotFound { .. })));
    }
}
