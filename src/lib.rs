//! Position weight matrix scanning for transcription factor binding sites

pub mod error;
pub mod fasta;
pub mod matrix;
pub mod scanner;
pub mod types;

pub use error::{MotifError, Result};
pub use matrix::load_matrix;
pub use scanner::{MotifScanner, DEFAULT_THRESHOLD};
pub use types::{BindingSiteHit, ScoringTable};
