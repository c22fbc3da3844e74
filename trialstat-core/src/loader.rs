//! CSV loading with explicit encoding resolution
//!
//! Clinical export files arrive in a mix of UTF-8 and legacy single-byte
//! encodings. Decoding is an ordered decision table: each candidate is tried
//! in turn and accepted only if it decodes cleanly; byte-level detection runs
//! last. The decoded text is then parsed as headed CSV with the fixed
//! `paciente`, `evaluacion` leading columns.

use std::borrow::Cow;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, ISO_8859_15, UTF_8, WINDOWS_1252};
use tracing::debug;

use crate::{DataError, ObservationTable, PATIENT_COLUMN, ROUND_COLUMN};

/// Load one observation table from a CSV file
///
/// The first two columns must be `paciente` and `evaluacion` (matched
/// case-insensitively); every following column is a measured variable. Empty
/// cells load as missing; cells that fail numeric parsing load as missing and
/// flag their variable non-numeric.
pub fn load_observation_table(path: &Path) -> Result<ObservationTable, DataError> {
    let bytes = std::fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding) = decode_bytes(&bytes).ok_or_else(|| DataError::Decode {
        path: path.to_path_buf(),
    })?;
    debug!(encoding, path = %path.display(), "decoded input file");

    parse_table(&text, path)
}

/// Ordered-candidate decode with detection as the last resort
///
/// A candidate is accepted when it reports no decode errors and the result
/// contains no C1 control characters, the usual symptom of a wrong
/// single-byte guess.
fn decode_bytes(bytes: &[u8]) -> Option<(Cow<'_, str>, &'static str)> {
    // Candidate encodings, tried in order before detection
    let candidates: [&'static Encoding; 3] = [UTF_8, WINDOWS_1252, ISO_8859_15];
    for candidate in candidates {
        let (text, _, had_errors) = candidate.decode(bytes);
        if !had_errors && !has_c1_controls(&text) {
            return Some((text, candidate.name()));
        }
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let detected = detector.guess(None, true);
    let (text, _, had_errors) = detected.decode(bytes);
    if had_errors {
        return None;
    }
    Some((text, detected.name()))
}

fn has_c1_controls(text: &str) -> bool {
    text.chars().any(|c| ('\u{80}'..='\u{9f}').contains(&c))
}

fn parse_table(text: &str, path: &Path) -> Result<ObservationTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    for (position, column) in [(0, PATIENT_COLUMN), (1, ROUND_COLUMN)] {
        let found = headers.get(position).unwrap_or_default();
        if !found.eq_ignore_ascii_case(column) {
            return Err(DataError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
                position,
            });
        }
    }

    let variables: Vec<String> = headers.iter().skip(2).map(str::to_string).collect();
    let mut table = ObservationTable::new(variables.clone());

    for record in reader.records() {
        let record = record.map_err(|source| DataError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let patient = record.get(0).unwrap_or_default().to_string();
        let round = record.get(1).unwrap_or_default().to_string();

        let mut values = Vec::with_capacity(variables.len());
        for (offset, variable) in variables.iter().enumerate() {
            let cell = record.get(offset + 2).unwrap_or_default();
            if cell.is_empty() {
                values.push(None);
            } else {
                match cell.parse::<f64>() {
                    Ok(value) => values.push(Some(value)),
                    Err(_) => {
                        table.mark_non_numeric(variable);
                        values.push(None);
                    }
                }
            }
        }

        table
            .push_row(patient, round, values)
            .map_err(|dup| DataError::DuplicateObservation {
                path: path.to_path_buf(),
                patient: dup.patient,
                round: dup.round,
            })?;
    }

    if table.is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(table)
}
