use crate::error::{MotifError, Result};
use crate::types::{nucleotide_code, ScoringTable, ALPHABET};
use ndarray::Array2;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Width of the header label (`ALPHABET= `) preceding the alphabet symbols
pub const HEADER_PREFIX_WIDTH: usize = 10;

/// Reads the alphabet from the header line, returning the column code of
/// each listed symbol in header order
fn parse_alphabet(header: &str) -> Result<Vec<usize>> {
    let symbols: Vec<char> = header
        .trim_end()
        .chars()
        .skip(HEADER_PREFIX_WIDTH)
        .flat_map(char::to_lowercase)
        .collect();

    if symbols.is_empty() {
        return Err(MotifError::parse(1, "missing alphabet"));
    }

    let mut codes = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let code = nucleotide_code(symbol).ok_or_else(|| {
            MotifError::parse(1, format!("symbol {:?} is not a DNA base", symbol))
        })?;
        if codes.contains(&code) {
            return Err(MotifError::parse(
                1,
                format!("symbol {:?} listed more than once", symbol),
            ));
        }
        codes.push(code);
    }

    if codes.len() != ALPHABET.len() {
        return Err(MotifError::parse(
            1,
            format!(
                "alphabet lists {} symbols, expected {}",
                codes.len(),
                ALPHABET.len()
            ),
        ));
    }

    Ok(codes)
}

/// Splits a data row into integers, `None` for a blank line
fn parse_row(line: &str, line_no: usize) -> Result<Option<Vec<i64>>> {
    let values = line
        .split_whitespace()
        .map(|token| {
            token.parse::<i64>().map_err(|e| {
                MotifError::parse(line_no, format!("invalid weight {:?}: {}", token, e))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((!values.is_empty()).then_some(values))
}

/// Loads a position weight matrix file into a [`ScoringTable`]
///
/// # Format
/// * Line 1: header, the alphabet symbols start at column [`HEADER_PREFIX_WIDTH`]
///   (e.g. `ALPHABET= ACGT`)
/// * Line 2: ignored
/// * Lines 3+: one row per motif position, holding one whitespace-separated
///   integer weight per alphabet symbol in header order
///
/// # Errors
/// * `MotifError::Io` - If the file cannot be opened or read
/// * `MotifError::Parse` - If the alphabet is malformed, a row does not have one
///   value per symbol, a value is not an integer, or there are no rows
///
/// # Example
/// ```ignore
/// use pwm_scan::matrix::load_matrix;
///
/// let table = load_matrix("pwm.txt").unwrap();
/// println!("motif of {} positions", table.motif_len());
/// ```
pub fn load_matrix(path: impl AsRef<Path>) -> Result<ScoringTable> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| MotifError::parse(1, "missing alphabet"))?;
    let codes = parse_alphabet(&header)?;

    // second line carries no data
    lines.next().transpose()?;

    let mut weights = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 3;
        let line = line?;
        let Some(row) = parse_row(&line, line_no)? else {
            continue;
        };
        if row.len() != codes.len() {
            return Err(MotifError::parse(
                line_no,
                format!("expected {} values, found {}", codes.len(), row.len()),
            ));
        }

        let mut ordered = [0i64; 4];
        for (&code, value) in codes.iter().zip(row) {
            ordered[code] = value;
        }
        weights.extend_from_slice(&ordered);
    }

    let positions = weights.len() / ALPHABET.len();
    let weights = Array2::from_shape_vec((positions, ALPHABET.len()), weights)
        .map_err(|e| MotifError::DataError(e.to_string()))?;

    ScoringTable::from_weights(weights)
}

/// Reads a matrix file as a plain numeric array, one row per motif position
///
/// The alphabet is taken from the text after `=` on the header line and the
/// columns keep the header order. Only the shape is validated; the result is
/// not usable as a [`ScoringTable`] unless the header lists `ACGT`.
///
/// # Errors
/// * `MotifError::Io` - If the file cannot be opened or read
/// * `MotifError::Parse` - If the header has no `=`, rows differ in width, or a
///   value is not an integer
pub fn read_matrix_array(path: impl AsRef<Path>) -> Result<Array2<i64>> {
    let file = File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| MotifError::parse(1, "missing alphabet"))?;
    let alphabet = header
        .split_once('=')
        .map(|(_, symbols)| symbols.trim())
        .filter(|symbols| !symbols.is_empty())
        .ok_or_else(|| MotifError::parse(1, "missing alphabet"))?;

    lines.next().transpose()?;

    let mut values = Vec::new();
    let mut width: Option<usize> = None;
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 3;
        let line = line?;
        let Some(row) = parse_row(&line, line_no)? else {
            continue;
        };
        match width {
            Some(w) if w != row.len() => {
                return Err(MotifError::parse(
                    line_no,
                    format!("expected {} values, found {}", w, row.len()),
                ))
            }
            _ => width = Some(row.len()),
        }
        values.extend(row);
    }

    let width = width.unwrap_or(alphabet.chars().count());
    let rows = if width == 0 { 0 } else { values.len() / width };
    Array2::from_shape_vec((rows, width), values)
        .map_err(|e| MotifError::DataError(e.to_string()))
}
