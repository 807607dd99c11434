// Density-based clustering (DBSCAN) over cosine distance.
//
// A point is a core point when at least `min_samples` points, itself
// included, lie within `eps` of it. Clusters grow by following core points
// transitively; non-core points within `eps` of a core point join as border
// points; everything else is noise.
//
// Cluster ids are handed out in order of the lowest-index core point that
// seeds each cluster. A border point reachable from two clusters joins the
// one discovered first, which keeps the output reproducible for a fixed
// input order.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use super::tfidf::SparseVector;
use crate::error::{EngineError, EngineResult};

/// Cluster membership of one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterLabel {
    /// Not part of any dense group.
    Noise,
    Topic(u32),
}

impl ClusterLabel {
    pub fn is_noise(&self) -> bool {
        matches!(self, ClusterLabel::Noise)
    }

    /// Integer form, with -1 for noise.
    pub fn as_i64(&self) -> i64 {
        match self {
            ClusterLabel::Noise => -1,
            ClusterLabel::Topic(id) => i64::from(*id),
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterLabel::Noise => write!(f, "noise"),
            ClusterLabel::Topic(id) => write!(f, "topic {id}"),
        }
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_i64())
    }
}

impl<'de> Deserialize<'de> for ClusterLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        match raw {
            -1 => Ok(ClusterLabel::Noise),
            id => u32::try_from(id)
                .map(ClusterLabel::Topic)
                .map_err(|_| serde::de::Error::custom(format!("invalid cluster label {id}"))),
        }
    }
}

/// DBSCAN tuning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DbscanParams {
    /// Neighborhood radius in cosine-distance units.
    pub eps: f64,
    /// Minimum neighborhood size (including the point itself) for a core point.
    pub min_samples: usize,
}

impl Default for DbscanParams {
    fn default() -> Self {
        Self {
            eps: 0.7,
            min_samples: 3,
        }
    }
}

impl DbscanParams {
    pub fn validate(&self) -> EngineResult<()> {
        if !(self.eps > 0.0 && self.eps <= 2.0) {
            return Err(EngineError::InvalidParameter(format!(
                "eps must be in (0, 2], got {}",
                self.eps
            )));
        }
        if self.min_samples < 1 {
            return Err(EngineError::InvalidParameter(
                "minimum cluster size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cosine distance in [0, 2]. A zero vector is at distance 1.0 from
/// everything, so it can only be its own neighbor when `eps < 1`.
pub fn cosine_distance(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < f64::EPSILON {
        return 1.0;
    }
    (1.0 - a.dot(b) / denom).clamp(0.0, 2.0)
}

/// Label every vector. The result is index-aligned with `vectors`.
pub fn dbscan(vectors: &[SparseVector], params: &DbscanParams) -> EngineResult<Vec<ClusterLabel>> {
    params.validate()?;

    let n = vectors.len();
    let neighborhoods = neighborhoods(vectors, params.eps);
    let is_core: Vec<bool> = neighborhoods
        .iter()
        .map(|hood| hood.len() >= params.min_samples)
        .collect();

    let mut labels = vec![ClusterLabel::Noise; n];
    let mut next_id: u32 = 0;
    let mut stack = Vec::new();

    for seed in 0..n {
        if !is_core[seed] || !labels[seed].is_noise() {
            continue;
        }

        let label = ClusterLabel::Topic(next_id);
        next_id += 1;

        labels[seed] = label;
        stack.push(seed);
        while let Some(point) = stack.pop() {
            if !is_core[point] {
                continue;
            }
            for &neighbor in &neighborhoods[point] {
                if labels[neighbor].is_noise() {
                    labels[neighbor] = label;
                    stack.push(neighbor);
                }
            }
        }
    }

    let noise = labels.iter().filter(|l| l.is_noise()).count();
    debug!(
        points = n,
        core_points = is_core.iter().filter(|&&c| c).count(),
        clusters = next_id,
        noise = noise,
        "DBSCAN finished"
    );

    Ok(labels)
}

/// Indices within `eps` of each point, the point itself included.
fn neighborhoods(vectors: &[SparseVector], eps: f64) -> Vec<Vec<usize>> {
    let n = vectors.len();
    let mut hoods: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if cosine_distance(&vectors[i], &vectors[j]) <= eps {
                hoods[i].push(j);
                hoods[j].push(i);
            }
        }
    }
    for hood in &mut hoods {
        hood.sort_unstable();
    }
    hoods
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(entries: &[(usize, f64)]) -> SparseVector {
        let v = SparseVector::from_entries(entries.to_vec());
        let norm = v.norm();
        SparseVector::from_entries(entries.iter().map(|&(c, w)| (c, w / norm)).collect())
    }

    #[test]
    fn test_cosine_distance_zero_vector_is_one() {
        let zero = SparseVector::default();
        let v = unit(&[(0, 1.0)]);
        assert!((cosine_distance(&zero, &v) - 1.0).abs() < 1e-12);
        assert!((cosine_distance(&zero, &zero) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_distance_identical_is_zero() {
        let v = unit(&[(0, 1.0), (4, 2.0)]);
        assert!(cosine_distance(&v, &v) < 1e-12);
    }

    #[test]
    fn test_border_point_joins_cluster() {
        // Three tight points around axis 0 plus one point that is only close
        // to the first of them.
        let vectors = vec![
            unit(&[(0, 1.0), (1, 0.3)]),
            unit(&[(0, 1.0)]),
            unit(&[(0, 1.0), (2, 0.1)]),
            unit(&[(1, 1.0), (0, 0.7)]),
        ];
        let params = DbscanParams {
            eps: 0.3,
            min_samples: 3,
        };
        let labels = dbscan(&vectors, &params).unwrap();
        assert_eq!(labels[0], ClusterLabel::Topic(0));
        assert_eq!(labels[1], ClusterLabel::Topic(0));
        assert_eq!(labels[2], ClusterLabel::Topic(0));
        assert_eq!(labels[3], ClusterLabel::Topic(0));
    }

    #[test]
    fn test_label_serializes_noise_as_minus_one() {
        assert_eq!(serde_json::to_string(&ClusterLabel::Noise).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&ClusterLabel::Topic(3)).unwrap(), "3");
        let back: ClusterLabel = serde_json::from_str("-1").unwrap();
        assert_eq!(back, ClusterLabel::Noise);
    }

    #[test]
    fn test_zero_min_samples_rejected() {
        let params = DbscanParams {
            eps: 0.5,
            min_samples: 0,
        };
        assert!(dbscan(&[], &params).is_err());
    }
}
