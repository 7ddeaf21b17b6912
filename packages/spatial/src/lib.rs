#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Row-standardized k-nearest-neighbor spatial weights.
//!
//! Site points are bulk-loaded into an R-tree and each site is connected to
//! its `k = floor(sqrt(n))` nearest other sites, every edge weighted `1/k`.
//! Distances are planar Euclidean over `[longitude, latitude]`; sites are
//! expected to lie within a small area where that is a fair approximation.

use std::collections::BTreeMap;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use thiserror::Error;

/// Errors that can occur while building spatial weights.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// A neighbor graph needs at least two sites.
    #[error("Insufficient sites for spatial analysis: {count} site(s), at least 2 required")]
    InsufficientSites {
        /// Number of sites that were supplied.
        count: usize,
    },
}

/// A site point stored in the R-tree with its position in the input.
#[derive(Debug, Clone, Copy)]
struct SitePoint {
    index: usize,
    point: [f64; 2],
}

impl RTreeObject for SitePoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SitePoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// A weighted edge from one site to a neighbor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    /// Index of the neighboring site.
    pub index: usize,
    /// Row-standardized edge weight.
    pub weight: f64,
}

/// Number of neighbors used for `n` sites: `floor(sqrt(n))`.
#[must_use]
pub const fn knn_neighbor_count(n: usize) -> usize {
    n.isqrt()
}

/// Row-standardized k-nearest-neighbor weight graph.
///
/// Row `i` holds the neighbors of input point `i`; each row's weights sum
/// to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialWeights {
    k: usize,
    neighbors: Vec<Vec<Neighbor>>,
}

impl SpatialWeights {
    /// Builds the graph over planar `[longitude, latitude]` points.
    ///
    /// Ties at the k-th distance are broken by the lower point index so the
    /// graph is deterministic for a given input order.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InsufficientSites`] if fewer than two points
    /// are supplied.
    pub fn knn(points: &[[f64; 2]]) -> Result<Self, SpatialError> {
        let n = points.len();
        if n < 2 {
            return Err(SpatialError::InsufficientSites { count: n });
        }

        let k = knn_neighbor_count(n);
        #[allow(clippy::cast_precision_loss)]
        let weight = 1.0 / k as f64;

        let tree = RTree::bulk_load(
            points
                .iter()
                .enumerate()
                .map(|(index, point)| SitePoint {
                    index,
                    point: *point,
                })
                .collect(),
        );

        let neighbors = points
            .iter()
            .enumerate()
            .map(|(index, point)| {
                nearest_others(&tree, index, point, k)
                    .into_iter()
                    .map(|other| Neighbor {
                        index: other,
                        weight,
                    })
                    .collect()
            })
            .collect();

        log::debug!("Built {k}-nearest-neighbor weights over {n} sites");

        Ok(Self { k, neighbors })
    }

    /// Number of sites (rows) in the graph.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Whether the graph has no sites. Never true for a built graph.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors per site.
    #[must_use]
    pub const fn k(&self) -> usize {
        self.k
    }

    /// Outgoing edges of site `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[must_use]
    pub fn neighbors(&self, i: usize) -> &[Neighbor] {
        &self.neighbors[i]
    }

    /// Iterates over every `(i, j, w_ij)` edge.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.neighbors.iter().enumerate().flat_map(|(i, row)| {
            row.iter()
                .map(move |neighbor| (i, neighbor.index, neighbor.weight))
        })
    }

    /// Weight from site `i` to site `j` (0 when not neighbors).
    #[must_use]
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.neighbors
            .get(i)
            .and_then(|row| row.iter().find(|neighbor| neighbor.index == j))
            .map_or(0.0, |neighbor| neighbor.weight)
    }

    /// Sum of the outgoing weights of site `i`.
    #[must_use]
    pub fn row_sum(&self, i: usize) -> f64 {
        self.neighbors
            .get(i)
            .map_or(0.0, |row| row.iter().map(|neighbor| neighbor.weight).sum())
    }

    /// `S0`: the sum of all weights.
    #[must_use]
    pub fn s0(&self) -> f64 {
        self.edges().map(|(_, _, w)| w).sum()
    }

    /// `S1 = ½ Σᵢⱼ (wᵢⱼ + wⱼᵢ)²`.
    #[must_use]
    pub fn s1(&self) -> f64 {
        // Keyed by unordered pair so each (i, j) / (j, i) couple is summed once.
        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (i, j, w) in self.edges() {
            *pairs.entry((i.min(j), i.max(j))).or_insert(0.0) += w;
        }
        // The ½ cancels against each unordered pair appearing twice in Σᵢⱼ.
        pairs.values().map(|w| w * w).sum::<f64>()
    }

    /// `S2 = Σᵢ (wᵢ. + w.ᵢ)²`.
    #[must_use]
    pub fn s2(&self) -> f64 {
        let mut totals = vec![0.0_f64; self.len()];
        for (i, j, w) in self.edges() {
            totals[i] += w;
            totals[j] += w;
        }
        totals.iter().map(|t| t * t).sum()
    }
}

/// Finds the `k` nearest points to `point`, excluding `index` itself.
fn nearest_others(tree: &RTree<SitePoint>, index: usize, point: &[f64; 2], k: usize) -> Vec<usize> {
    let mut candidates: Vec<(f64, usize)> = Vec::with_capacity(k + 1);

    for (site, distance_2) in tree.nearest_neighbor_iter_with_distance_2(point) {
        if site.index == index {
            continue;
        }
        // Keep pulling while the candidate ties the current k-th distance.
        if candidates.len() >= k && candidates.last().is_some_and(|(d, _)| distance_2 > *d) {
            break;
        }
        candidates.push((distance_2, site.index));
    }

    candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    candidates.truncate(k);
    candidates.into_iter().map(|(_, other)| other).collect()
}
