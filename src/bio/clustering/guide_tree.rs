//! Average-linkage (UPGMA) guide tree.
//!
//! Leaves are clusters `0..n`; the k-th merge creates cluster `n + k`. The
//! tree is kept as the flat list of merges in the order they were made.

use crate::bio::clustering::distance::DistanceMatrix;
use crate::KaidokuError;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Merge {
    pub left: usize,
    pub right: usize,
    /// Average-linkage distance between the two clusters when merged
    pub distance: f64,
    /// Original sequence indices in the merged cluster, ascending
    pub members: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideTree {
    leaves: usize,
    merges: Vec<Merge>,
}

struct ActiveCluster {
    id: usize,
    members: Vec<usize>,
}

impl GuideTree {
    /// Cluster the matrix until one cluster remains.
    ///
    /// Ties on the minimum distance go to the lowest `(left, right)` cluster
    /// id pair.
    pub fn build(matrix: &DistanceMatrix) -> Result<Self, KaidokuError> {
        let n = matrix.len();
        if n == 0 {
            return Err(KaidokuError::InvalidInput(
                "Cannot build a guide tree without sequences".to_string(),
            ));
        }

        // Distances between any two cluster ids, leaves and internal alike
        let capacity = 2 * n - 1;
        let mut dist = vec![0.0f64; capacity * capacity];
        for i in 0..n {
            for j in 0..n {
                dist[i * capacity + j] = matrix.get(i, j);
            }
        }

        // Kept sorted by id; new clusters always get the largest id
        let mut active: Vec<ActiveCluster> = (0..n)
            .map(|i| ActiveCluster {
                id: i,
                members: vec![i],
            })
            .collect();
        let mut merges = Vec::with_capacity(n - 1);

        while active.len() > 1 {
            let (mut best_a, mut best_b) = (0, 1);
            let mut best = dist[active[0].id * capacity + active[1].id];
            for a in 0..active.len() {
                for b in a + 1..active.len() {
                    let d = dist[active[a].id * capacity + active[b].id];
                    if d < best {
                        best = d;
                        best_a = a;
                        best_b = b;
                    }
                }
            }

            let right = active.remove(best_b);
            let left = active.remove(best_a);
            let new_id = n + merges.len();
            let (size_l, size_r) = (left.members.len() as f64, right.members.len() as f64);

            for other in &active {
                let d = (dist[left.id * capacity + other.id] * size_l
                    + dist[right.id * capacity + other.id] * size_r)
                    / (size_l + size_r);
                dist[new_id * capacity + other.id] = d;
                dist[other.id * capacity + new_id] = d;
            }

            let mut members = left.members;
            members.extend(right.members);
            members.sort_unstable();

            debug!(
                "merge {}: clusters {} + {} at distance {:.3} -> {}",
                merges.len(),
                left.id,
                right.id,
                best,
                new_id
            );

            merges.push(Merge {
                left: left.id,
                right: right.id,
                distance: best,
                members: members.clone(),
            });
            active.push(ActiveCluster {
                id: new_id,
                members,
            });
        }

        info!("Guide tree built with {} merges", merges.len());
        Ok(Self { leaves: n, merges })
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    pub fn leaves(&self) -> usize {
        self.leaves
    }

    /// Id of the cluster holding every sequence
    pub fn root(&self) -> usize {
        self.leaves + self.merges.len() - 1
    }

    fn height(&self, id: usize) -> f64 {
        if id < self.leaves {
            0.0
        } else {
            self.merges[id - self.leaves].distance / 2.0
        }
    }

    /// Newick rendering with ultrametric branch lengths
    pub fn to_newick(&self, labels: &[String]) -> String {
        let mut out = String::new();
        self.write_newick(self.root(), labels, &mut out);
        out.push(';');
        out
    }

    fn write_newick(&self, id: usize, labels: &[String], out: &mut String) {
        if id < self.leaves {
            let label = labels.get(id).map(String::as_str).unwrap_or("");
            out.extend(label.chars().map(|c| match c {
                '(' | ')' | ',' | ':' | ';' | '[' | ']' => '_',
                c if c.is_whitespace() => '_',
                c => c,
            }));
            return;
        }

        let merge = &self.merges[id - self.leaves];
        let parent_height = self.height(id);
        out.push('(');
        for (k, child) in [merge.left, merge.right].into_iter().enumerate() {
            if k > 0 {
                out.push(',');
            }
            self.write_newick(child, labels, out);
            out.push_str(&format!(":{:.5}", parent_height - self.height(child)));
        }
        out.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(size: usize, values: &[f64]) -> DistanceMatrix {
        DistanceMatrix::from_values(size, values.to_vec()).unwrap()
    }

    #[test]
    fn test_zero_distances_merge_lowest_ids_first() {
        let m = matrix(3, &[0.0; 9]);
        let tree = GuideTree::build(&m).unwrap();

        assert_eq!(tree.merges().len(), 2);
        assert_eq!((tree.merges()[0].left, tree.merges()[0].right), (0, 1));
        assert_eq!((tree.merges()[1].left, tree.merges()[1].right), (2, 3));
        assert_eq!(tree.merges()[1].members, vec![0, 1, 2]);
    }

    #[test]
    fn test_closest_pair_merges_first() {
        #[rustfmt::skip]
        let m = matrix(4, &[
             0.0, 40.0, 10.0, 40.0,
            40.0,  0.0, 40.0, 20.0,
            10.0, 40.0,  0.0, 40.0,
            40.0, 20.0, 40.0,  0.0,
        ]);
        let tree = GuideTree::build(&m).unwrap();
        let merges = tree.merges();

        assert_eq!((merges[0].left, merges[0].right), (0, 2));
        assert_eq!((merges[1].left, merges[1].right), (1, 3));
        assert_eq!((merges[2].left, merges[2].right), (4, 5));
        assert_eq!(merges[2].distance, 40.0);
        assert_eq!(tree.root(), 6);
    }

    #[test]
    fn test_average_linkage_update() {
        #[rustfmt::skip]
        let m = matrix(3, &[
             0.0,  2.0, 10.0,
             2.0,  0.0, 20.0,
            10.0, 20.0,  0.0,
        ]);
        let tree = GuideTree::build(&m).unwrap();
        assert_eq!(tree.merges()[1].distance, 15.0);
    }

    #[test]
    fn test_newick_output() {
        #[rustfmt::skip]
        let m = matrix(3, &[
             0.0,  2.0, 10.0,
             2.0,  0.0, 20.0,
            10.0, 20.0,  0.0,
        ]);
        let tree = GuideTree::build(&m).unwrap();
        let labels = vec!["a".to_string(), "b c".to_string(), "d".to_string()];
        assert_eq!(
            tree.to_newick(&labels),
            "(d:7.50000,(a:1.00000,b_c:1.00000):6.50000);"
        );
    }

    #[test]
    fn test_single_leaf() {
        let tree = GuideTree::build(&matrix(1, &[0.0])).unwrap();
        assert!(tree.merges().is_empty());
        assert_eq!(tree.to_newick(&["only".to_string()]), "only;");
    }
}
