// Picking the "hottest" cluster.
//
// Noise is ignored. With fewer than two distinct topic clusters there is no
// clear trend. Otherwise the largest cluster wins; equal sizes go to the
// cluster whose first member comes earliest in batch order.

use std::collections::HashMap;

use super::cluster::ClusterLabel;

/// Size and first appearance of one topic cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterSize {
    pub label: ClusterLabel,
    pub members: usize,
    /// Batch position of the earliest member.
    pub first_index: usize,
}

/// The winning cluster and the batch positions of its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominantCluster {
    pub label: ClusterLabel,
    pub member_indices: Vec<usize>,
}

/// Topic clusters ordered by first appearance in the batch.
pub fn cluster_sizes(labels: &[ClusterLabel]) -> Vec<ClusterSize> {
    let mut sizes: Vec<ClusterSize> = Vec::new();
    let mut position: HashMap<ClusterLabel, usize> = HashMap::new();

    for (i, label) in labels.iter().enumerate() {
        if label.is_noise() {
            continue;
        }
        match position.get(label) {
            Some(&pos) => sizes[pos].members += 1,
            None => {
                position.insert(*label, sizes.len());
                sizes.push(ClusterSize {
                    label: *label,
                    members: 1,
                    first_index: i,
                });
            }
        }
    }

    sizes
}

/// Select the dominant cluster, or `None` when fewer than two topic
/// clusters exist.
pub fn select_dominant(labels: &[ClusterLabel]) -> Option<DominantCluster> {
    let sizes = cluster_sizes(labels);
    if sizes.len() < 2 {
        return None;
    }

    // `sizes` is in first-appearance order, so keeping the first maximum
    // implements the tie-break.
    let mut best = &sizes[0];
    for candidate in &sizes[1..] {
        if candidate.members > best.members {
            best = candidate;
        }
    }

    let member_indices = labels
        .iter()
        .enumerate()
        .filter(|(_, l)| **l == best.label)
        .map(|(i, _)| i)
        .collect();

    Some(DominantCluster {
        label: best.label,
        member_indices,
    })
}
