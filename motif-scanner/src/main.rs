use clap::Parser;
use log::{debug, info};
use polars::prelude::*;
use pwm_scan::fasta::{is_fasta, read_fasta, read_sequence};
use pwm_scan::{load_matrix, MotifError, MotifScanner};
use rayon::prelude::*;
use std::fs::{self, File};
use std::path::Path;

#[derive(thiserror::Error, Debug)]
pub enum ScannerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Motif(#[from] MotifError),

    #[error("Missing {0} column in sequence table")]
    MissingColumn(&'static str),

    #[error("Unsupported output format: {0} (expected .csv or .parquet)")]
    UnsupportedOutput(String),
}

#[derive(Parser)]
#[command(
    name = "motif-scanner",
    about = "Scans DNA sequences for binding sites of a position weight matrix",
    long_about = "Scores every window of each input sequence against a position weight matrix, \
                  on both strands, and reports the windows whose likelihood score exceeds the threshold.",
    version,
    after_help = "Example usage:\n    \
                  motif-scanner pwm.txt ebv.txt\n    \
                  motif-scanner pwm.txt sequences.fasta hits.parquet --threshold 1e3",
    color = clap::ColorChoice::Always
)]
#[derive(Debug)]
struct Args {
    /// Path to the position weight matrix file
    /// (header line, one ignored line, then one row of integer weights per position)
    #[arg(value_name = "PWM_FILE")]
    pwm_file: String,

    /// Path to the sequence file, either FASTA or a single raw sequence
    #[arg(value_name = "SEQUENCE_FILE")]
    sequence_file: String,

    /// Path for output file (supports .csv or .parquet format)
    /// Hits are written to stdout as CSV when omitted
    #[arg(value_name = "OUTPUT_FILE")]
    output_file: Option<String>,

    /// Only windows scoring strictly above this value are reported
    #[arg(long, default_value_t = pwm_scan::DEFAULT_THRESHOLD)]
    threshold: f64,
}

/// Loads the sequence file as (label, sequence) records
fn read_records(path: &str) -> Result<Vec<(String, String)>, ScannerError> {
    if !is_fasta(path)? {
        let label = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("sequence")
            .to_string();
        return Ok(vec![(label, read_sequence(path)?)]);
    }

    let df = read_fasta(path)?;
    let labels = df
        .column("label")
        .map_err(|_| ScannerError::MissingColumn("label"))?
        .str()?;
    let sequences = df
        .column("sequence")
        .map_err(|_| ScannerError::MissingColumn("sequence"))?
        .str()?;

    let records = labels
        .into_iter()
        .zip(sequences)
        .filter_map(|(label, seq)| Some((label?.to_string(), seq?.to_string())))
        .collect();
    Ok(records)
}

fn scan_records(
    records: &[(String, String)],
    scanner: &MotifScanner,
    threshold: f64,
) -> Result<DataFrame, ScannerError> {
    let results = records
        .par_iter()
        .map(|(label, sequence)| -> Result<_, MotifError> {
            let hits = scanner.find(sequence, threshold)?;
            debug!("{}: {} hits in {} bases", label, hits.len(), sequence.len());
            Ok((label, hits))
        })
        .collect::<Result<Vec<_>, MotifError>>()?;

    let mut labels: Vec<String> = Vec::new();
    let mut offsets: Vec<u64> = Vec::new();
    let mut scores: Vec<f64> = Vec::new();

    for (label, hits) in results {
        for hit in hits {
            labels.push(label.clone());
            offsets.push(hit.offset as u64);
            scores.push(hit.score);
        }
    }

    let df = DataFrame::new(vec![
        Column::new("label".into(), labels),
        Column::new("offset".into(), offsets),
        Column::new("score".into(), scores),
    ])?;

    Ok(df)
}

fn write_hits(df: &mut DataFrame, output: Option<&str>) -> Result<(), ScannerError> {
    let Some(output) = output else {
        CsvWriter::new(std::io::stdout().lock()).finish(df)?;
        return Ok(());
    };

    // Create output directory if it doesn't exist
    if let Some(parent) = Path::new(output).parent() {
        fs::create_dir_all(parent)?;
    }

    match Path::new(output).extension().and_then(|e| e.to_str()) {
        Some("csv") => {
            let mut file = File::create(output)?;
            CsvWriter::new(&mut file).finish(df)?;
        }
        Some("parquet") => {
            let file = File::create(output)?;
            ParquetWriter::new(file).finish(df)?;
        }
        _ => return Err(ScannerError::UnsupportedOutput(output.to_string())),
    }

    info!("wrote {} hits to {}", df.height(), output);
    Ok(())
}

fn main() -> Result<(), ScannerError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let start_time = std::time::Instant::now();

    let args = Args::parse();

    let table = load_matrix(&args.pwm_file)?;
    let scanner = MotifScanner::new(table);
    info!(
        "loaded {}-position matrix from {}",
        scanner.motif_len(),
        args.pwm_file
    );

    let records = read_records(&args.sequence_file)?;
    info!("{} sequences to scan", records.len());

    let mut hits = scan_records(&records, &scanner, args.threshold)?;
    write_hits(&mut hits, args.output_file.as_deref())?;

    let elapsed = start_time.elapsed();
    info!(
        "Total execution time: {:.4} minutes",
        elapsed.as_secs_f64() / 60.0
    );

    Ok(())
}
