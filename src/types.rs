use crate::error::{MotifError, Result};
use ndarray::{Array2, ArrayView1};
use phf::phf_map;
use std::collections::HashMap;

/// The four DNA symbols in canonical column order
pub const ALPHABET: [char; 4] = ['a', 'c', 'g', 't'];

static NUCLEOTIDE_CODES: phf::Map<char, usize> = phf_map! {
    'a' => 0, 'A' => 0,
    'c' => 1, 'C' => 1,
    'g' => 2, 'G' => 2,
    't' => 3, 'T' => 3,
};

/// Maps a nucleotide (any case) to its column in a [`ScoringTable`]
pub fn nucleotide_code(symbol: char) -> Option<usize> {
    NUCLEOTIDE_CODES.get(&symbol).copied()
}

/// Code of the pairing partner: a <-> t, c <-> g
pub fn complement_code(code: usize) -> usize {
    3 - code
}

/// Position weight matrix of integer log-weights.
///
/// Stored as an `(motif_len, 4)` array where row `i` holds the weights of
/// `a`, `c`, `g` and `t` at motif position `i`. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringTable {
    weights: Array2<i64>,
}

impl ScoringTable {
    /// Wraps a `(positions, 4)` weight array whose columns follow [`ALPHABET`].
    ///
    /// # Errors
    /// * `MotifError::Parse` if the array does not have four columns or has no rows
    pub fn from_weights(weights: Array2<i64>) -> Result<Self> {
        if weights.ncols() != ALPHABET.len() {
            return Err(MotifError::parse(
                0,
                format!(
                    "expected {} weight columns, found {}",
                    ALPHABET.len(),
                    weights.ncols()
                ),
            ));
        }
        if weights.nrows() == 0 {
            return Err(MotifError::parse(0, "empty matrix"));
        }
        Ok(Self { weights })
    }

    /// Builds a table from a symbol -> per-position weights mapping.
    ///
    /// Symbols are case-folded. Every symbol of [`ALPHABET`] must be present
    /// exactly once and all weight sequences must share the same length.
    ///
    /// # Errors
    /// * `MotifError::Parse` on an unknown, missing or repeated symbol, or on
    ///   weight sequences of unequal length
    pub fn from_columns(columns: HashMap<char, Vec<i64>>) -> Result<Self> {
        let mut ordered: [Option<Vec<i64>>; 4] = Default::default();
        for (symbol, weights) in columns {
            let code = nucleotide_code(symbol).ok_or_else(|| {
                MotifError::parse(0, format!("symbol {:?} is not a DNA base", symbol))
            })?;
            if ordered[code].replace(weights).is_some() {
                return Err(MotifError::parse(
                    0,
                    format!("symbol {:?} given more than once", ALPHABET[code]),
                ));
            }
        }

        let mut columns = Vec::with_capacity(ALPHABET.len());
        for (code, column) in ordered.into_iter().enumerate() {
            let column = column.ok_or_else(|| {
                MotifError::parse(0, format!("missing weights for {:?}", ALPHABET[code]))
            })?;
            columns.push(column);
        }

        let motif_len = columns[0].len();
        if columns.iter().any(|c| c.len() != motif_len) {
            return Err(MotifError::parse(0, "weight columns differ in length"));
        }

        let weights = Array2::from_shape_fn((motif_len, ALPHABET.len()), |(pos, code)| {
            columns[code][pos]
        });
        Self::from_weights(weights)
    }

    /// Number of positions in the motif
    pub fn motif_len(&self) -> usize {
        self.weights.nrows()
    }

    /// Weight of `symbol` at `position`, `None` for a non-DNA symbol or an
    /// out-of-range position
    pub fn weight(&self, symbol: char, position: usize) -> Option<i64> {
        let code = nucleotide_code(symbol)?;
        self.weights.get((position, code)).copied()
    }

    /// All per-position weights of `symbol`
    pub fn weights(&self, symbol: char) -> Option<ArrayView1<'_, i64>> {
        nucleotide_code(symbol).map(|code| self.weights.column(code))
    }

    pub(crate) fn weight_at(&self, position: usize, code: usize) -> i64 {
        self.weights[[position, code]]
    }
}

/// A window whose score exceeded the scan threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BindingSiteHit {
    /// Start of the window in the scanned sequence
    pub offset: usize,
    /// `exp` of the best strand's summed log-weights
    pub score: f64,
}
