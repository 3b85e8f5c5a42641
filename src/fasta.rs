use crate::error::{MotifError, Result};
use phf::phf_map;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};

static COMPLEMENT: phf::Map<char, char> = phf_map! {
    'A' => 'T', 'T' => 'A', 'C' => 'G', 'G' => 'C',
    'a' => 't', 't' => 'a', 'c' => 'g', 'g' => 'c',
};

/// Reads sequences from a FASTA format file and converts them into a Polars DataFrame.
///
/// # Arguments
/// * `filename` - Path to the FASTA file to read
///
/// # Returns
/// * `Result<DataFrame>` - A DataFrame with two columns:
///   - "label": The sequence identifiers (without '>' prefix)
///   - "sequence": The corresponding DNA sequences in uppercase
///
/// # Errors
/// * Returns `MotifError::InvalidFileFormat` if no sequences are found
/// * Returns `MotifError::DataError` if DataFrame creation fails
/// * Returns `MotifError::Io` for file reading issues
pub fn read_fasta(filename: &str) -> Result<DataFrame> {
    let mut sequences: Vec<(String, String)> = Vec::new();
    let file = File::open(filename)?;
    let reader = BufReader::new(file);

    let mut current_header = String::new();
    let mut current_sequence = String::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            if !current_header.is_empty() {
                sequences.push((current_header, current_sequence.to_uppercase()));
                current_sequence.clear();
            }
            current_header = header.to_string();
        } else if !line.is_empty() {
            current_sequence.push_str(line);
        }
    }

    if !current_header.is_empty() {
        sequences.push((current_header, current_sequence.to_uppercase()));
    }

    if sequences.is_empty() {
        return Err(MotifError::InvalidFileFormat("No sequences found".into()));
    }

    let (labels, sequences): (Vec<String>, Vec<String>) = sequences.into_iter().unzip();
    let df = DataFrame::new(vec![
        Column::new("label".into(), labels),
        Column::new("sequence".into(), sequences),
    ])
    .map_err(|e| MotifError::DataError(e.to_string()))?;

    Ok(df)
}

/// Checks whether a file looks like FASTA, i.e. its first non-blank line
/// starts with '>'. Only reads up to that line.
pub fn is_fasta(filename: &str) -> Result<bool> {
    let reader = BufReader::new(File::open(filename)?);
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            return Ok(line.starts_with('>'));
        }
    }
    Ok(false)
}

/// Reads a whole file as a single raw sequence, with surrounding whitespace removed
pub fn read_sequence(filename: &str) -> Result<String> {
    let content = fs::read_to_string(filename)?;
    Ok(content.trim().to_string())
}

/// Generates the reverse complement of a DNA sequence.
///
/// # Arguments
/// * `sequence` - Input DNA sequence string, any case
///
/// # Returns
/// * `Result<String>` - The reverse complement, keeping the case of each base:
///   - A ↔ T
///   - C ↔ G
///
/// # Errors
/// * Returns `MotifError::InvalidSymbol` for any character other than A, T, C or G,
///   with its position in `sequence`
pub fn reverse_complement(sequence: &str) -> Result<String> {
    sequence
        .char_indices()
        .rev()
        .map(|(position, symbol)| {
            COMPLEMENT
                .get(&symbol)
                .copied()
                .ok_or(MotifError::InvalidSymbol { position, symbol })
        })
        .collect()
}
