//! Iterative refinement by random bipartition and profile realignment.

use crate::bio::alignment::profile::{Profile, ProfileAligner};
use crate::bio::alignment::scoring::ScoringMatrix;
use crate::bio::msa::{AlignedRow, Alignment};
use crate::KaidokuError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Whether a realigned candidate replaces the working alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefinePolicy {
    /// Every iteration's result is kept
    #[default]
    AcceptAll,
    /// Kept only when the sum-of-pairs score strictly increases
    AcceptImproving,
}

pub struct RefinementEngine<S: ScoringMatrix> {
    aligner: ProfileAligner<S>,
    iterations: usize,
    policy: RefinePolicy,
}

impl<S: ScoringMatrix> RefinementEngine<S> {
    pub fn new(scoring: S) -> Self {
        Self {
            aligner: ProfileAligner::new(scoring),
            iterations: 3,
            policy: RefinePolicy::default(),
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_policy(mut self, policy: RefinePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn refine<R: Rng + ?Sized>(
        &self,
        alignment: Alignment,
        rng: &mut R,
    ) -> Result<Alignment, KaidokuError> {
        let mut current = alignment;
        let mut current_score = current.sum_of_pairs(self.aligner.scoring());
        let mut accepted = 0;

        for iteration in 0..self.iterations {
            let mut order: Vec<usize> = (0..current.num_sequences()).collect();
            order.shuffle(rng);
            let split = order.len() / 2;
            let (first, second) = order.split_at(split);
            if first.is_empty() || second.is_empty() {
                debug!("Refinement iteration {}: nothing to split", iteration);
                continue;
            }

            let candidate = self.realign(&current, first, second)?;
            let score = candidate.sum_of_pairs(self.aligner.scoring());
            let keep = match self.policy {
                RefinePolicy::AcceptAll => true,
                RefinePolicy::AcceptImproving => score > current_score,
            };
            debug!(
                "Refinement iteration {}: score {} -> {} ({})",
                iteration,
                current_score,
                score,
                if keep { "accepted" } else { "rejected" }
            );

            if keep {
                current = candidate;
                current_score = score;
                accepted += 1;
            }
        }

        info!(
            "Refinement finished: {}/{} iterations accepted, {} columns",
            accepted,
            self.iterations,
            current.width()
        );
        Ok(current)
    }

    fn realign(
        &self,
        alignment: &Alignment,
        first: &[usize],
        second: &[usize],
    ) -> Result<Alignment, KaidokuError> {
        let rows = alignment.rows();
        let group = |positions: &[usize]| {
            Profile::new(positions.iter().map(|&p| rows[p].residues.clone()).collect())
        };

        let (profile_a, profile_b) = self.aligner.align(&group(first)?, &group(second)?)?;

        let realigned = first
            .iter()
            .chain(second)
            .zip(profile_a.into_rows().into_iter().chain(profile_b.into_rows()))
            .map(|(&p, residues)| AlignedRow {
                index: rows[p].index,
                header: rows[p].header.clone(),
                residues,
            })
            .collect();

        let mut result = Alignment::new(realigned)?;
        result.sort_by_index();
        Ok(result)
    }
}
