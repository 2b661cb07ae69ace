pub mod distance;
pub mod guide_tree;

pub use distance::{DistanceMatrix, DistanceMethod, IdentityScorer, KmerIdentity};
pub use guide_tree::{GuideTree, Merge};
