//! Progressive alignment along a guide tree.

use crate::bio::alignment::profile::{Profile, ProfileAligner};
use crate::bio::alignment::scoring::ScoringMatrix;
use crate::bio::clustering::guide_tree::GuideTree;
use crate::bio::msa::{AlignedRow, Alignment};
use crate::bio::sequence::Sequence;
use crate::KaidokuError;
use tracing::{debug, info};

/// Sequence indices of a cluster paired with their current profile
type Cluster = (Vec<usize>, Profile);

pub struct ProgressiveAligner<S: ScoringMatrix> {
    aligner: ProfileAligner<S>,
}

impl<S: ScoringMatrix> ProgressiveAligner<S> {
    pub fn new(scoring: S) -> Self {
        Self {
            aligner: ProfileAligner::new(scoring),
        }
    }

    /// Merge singleton profiles in guide tree order.
    ///
    /// Rows of the left cluster precede those of the right one inside each
    /// merged profile; the final alignment is returned in input order.
    pub fn align(
        &self,
        sequences: &[Sequence],
        tree: &GuideTree,
    ) -> Result<Alignment, KaidokuError> {
        if tree.leaves() != sequences.len() {
            return Err(KaidokuError::Computation(format!(
                "Guide tree has {} leaves but {} sequences were given",
                tree.leaves(),
                sequences.len()
            )));
        }

        let mut clusters: Vec<Option<Cluster>> = sequences
            .iter()
            .enumerate()
            .map(|(i, seq)| Some((vec![i], Profile::from_sequence(&seq.sequence))))
            .collect();

        for merge in tree.merges() {
            let left = take_cluster(&mut clusters, merge.left)?;
            let right = take_cluster(&mut clusters, merge.right)?;

            let (profile_l, profile_r) = self.aligner.align(&left.1, &right.1)?;
            debug!(
                "Aligned clusters {} ({} rows) and {} ({} rows) into {} columns",
                merge.left,
                profile_l.depth(),
                merge.right,
                profile_r.depth(),
                profile_l.width()
            );

            let mut members = left.0;
            members.extend(right.0);
            let mut rows = profile_l.into_rows();
            rows.extend(profile_r.into_rows());

            clusters.push(Some((members, Profile::new(rows)?)));
        }

        let (members, profile) = take_cluster(&mut clusters, tree.root())?;
        let rows = members
            .into_iter()
            .zip(profile.into_rows())
            .map(|(index, residues)| AlignedRow {
                index,
                header: sequences[index].label(),
                residues,
            })
            .collect();

        let mut alignment = Alignment::new(rows)?;
        alignment.sort_by_index();
        info!(
            "Progressive alignment: {} sequences, {} columns",
            alignment.num_sequences(),
            alignment.width()
        );
        Ok(alignment)
    }
}

fn take_cluster(clusters: &mut [Option<Cluster>], id: usize) -> Result<Cluster, KaidokuError> {
    clusters
        .get_mut(id)
        .and_then(Option::take)
        .ok_or_else(|| KaidokuError::Computation(format!("Cluster {} is not available", id)))
}
