use crate::bio::msa::Alignment;
use serde::Serialize;

/// Per-column share of the most frequent symbol, in percent.
///
/// Gaps count as an ordinary symbol, so an all-gap column scores 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConservationProfile {
    scores: Vec<f64>,
}

impl ConservationProfile {
    pub fn score(alignment: &Alignment) -> Self {
        let depth = alignment.num_sequences();
        if depth == 0 {
            return Self { scores: Vec::new() };
        }

        let scores = (0..alignment.width())
            .map(|col| {
                let mut counts = [0u32; 256];
                for symbol in alignment.column(col) {
                    counts[symbol as usize] += 1;
                }
                let top = counts.iter().copied().max().unwrap_or(0);
                top as f64 / depth as f64 * 100.0
            })
            .collect();

        Self { scores }
    }

    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Mean over all columns, 0 when there are none
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }
}
