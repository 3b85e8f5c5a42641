//! Dual-strand window scoring and threshold scanning against a [`ScoringTable`]

use crate::error::{MotifError, Result};
use crate::types::{complement_code, nucleotide_code, BindingSiteHit, ScoringTable};

/// Score a window must exceed to be reported when no threshold is chosen
pub const DEFAULT_THRESHOLD: f64 = 1.0e-5;

/// Scores windows of a DNA sequence against an owned [`ScoringTable`].
///
/// The scanner holds no mutable state, so one instance can be shared by
/// reference across threads scanning different sequences.
#[derive(Debug, Clone)]
pub struct MotifScanner {
    table: ScoringTable,
    motif_len: usize,
}

impl MotifScanner {
    pub fn new(table: ScoringTable) -> Self {
        let motif_len = table.motif_len();
        Self { table, motif_len }
    }

    pub fn motif_len(&self) -> usize {
        self.motif_len
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    /// Scores a single window of exactly [`motif_len`](Self::motif_len) bases.
    ///
    /// The window is summed against the table on the forward strand and again
    /// as its reverse complement; the larger sum is exponentiated. Which strand
    /// won is not reported.
    ///
    /// # Errors
    /// * `MotifError::InvalidLength` - If the window length differs from the motif length
    /// * `MotifError::InvalidSymbol` - If the window contains anything but a, c, g or t
    pub fn score(&self, window: &str) -> Result<f64> {
        if window.len() != self.motif_len {
            return Err(MotifError::InvalidLength {
                expected: self.motif_len,
                found: window.len(),
            });
        }
        self.score_window(window, 0)
    }

    /// Slides the motif across `sequence`, returning every window whose score is
    /// strictly above `threshold`, in increasing offset order.
    ///
    /// The last window that would fit (offset `len - motif_len`) is never scored.
    /// A sequence shorter than the motif yields no hits.
    ///
    /// # Errors
    /// * `MotifError::InvalidSymbol` - If a scored window contains a non-DNA symbol;
    ///   `position` is the offset of that symbol in `sequence`
    pub fn find(&self, sequence: &str, threshold: f64) -> Result<Vec<BindingSiteHit>> {
        let Some(last) = sequence.len().checked_sub(self.motif_len) else {
            return Ok(Vec::new());
        };

        let mut hits = Vec::new();
        for offset in 0..last {
            let score = self.score_window(sequence, offset)?;
            if score > threshold {
                hits.push(BindingSiteHit { offset, score });
            }
        }
        Ok(hits)
    }

    /// Scores the window of `sequence` starting at byte `origin`.
    ///
    /// Strand sums are accumulated in `i128` so any `i64` weights add up without overflow.
    fn score_window(&self, sequence: &str, origin: usize) -> Result<f64> {
        let window = &sequence.as_bytes()[origin..origin + self.motif_len];
        let codes = window
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                nucleotide_code(b as char)
                    .ok_or_else(|| MotifError::invalid_symbol(sequence, origin + i))
            })
            .collect::<Result<Vec<_>>>()?;

        let forward: i128 = codes
            .iter()
            .enumerate()
            .map(|(pos, &code)| i128::from(self.table.weight_at(pos, code)))
            .sum();

        let reverse: i128 = codes
            .iter()
            .rev()
            .enumerate()
            .map(|(pos, &code)| i128::from(self.table.weight_at(pos, complement_code(code))))
            .sum();

        // equal sums keep the reverse strand
        let best = if forward > reverse { forward } else { reverse };
        Ok((best as f64).exp())
    }
}
