use tracing::warn;

use crate::frame::Point;

use super::config::ClusteringMethod;

/// Assigns a cluster label to every point.
///
/// Labels are dense, start at 0, and are numbered by first member in input
/// order. Every point belongs to exactly one cluster.
pub trait ClusterStrategy: Send + Sync {
    fn cluster(&self, points: &[Point], eps: f64) -> Vec<usize>;

    fn name(&self) -> &'static str;
}

/// Single-linkage density clustering with a minimum cluster size of one.
///
/// Two points share a cluster when a chain of pairwise distances, each at
/// most `eps`, connects them.
#[derive(Clone, Copy, Debug, Default)]
pub struct DensityClustering;

impl ClusterStrategy for DensityClustering {
    fn cluster(&self, points: &[Point], eps: f64) -> Vec<usize> {
        let n = points.len();
        let mut parent: Vec<usize> = (0..n).collect();

        for i in 0..n {
            for j in (i + 1)..n {
                if points[i].distance(&points[j]) <= eps {
                    let ri = find(&mut parent, i);
                    let rj = find(&mut parent, j);
                    if ri != rj {
                        parent[ri.max(rj)] = ri.min(rj);
                    }
                }
            }
        }

        let mut dense = vec![usize::MAX; n];
        let mut next = 0;
        (0..n)
            .map(|i| {
                let root = find(&mut parent, i);
                if dense[root] == usize::MAX {
                    dense[root] = next;
                    next += 1;
                }
                dense[root]
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "density"
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Every point is its own cluster.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingletonClustering;

impl ClusterStrategy for SingletonClustering {
    fn cluster(&self, points: &[Point], _eps: f64) -> Vec<usize> {
        (0..points.len()).collect()
    }

    fn name(&self) -> &'static str {
        "singleton"
    }
}

/// Build the configured clustering strategy.
pub fn strategy_for(method: ClusteringMethod) -> Box<dyn ClusterStrategy> {
    match method {
        ClusteringMethod::Density => Box::new(DensityClustering),
        ClusteringMethod::Singleton => {
            warn!(
                kind = "DependencyDegraded",
                "Density clustering disabled, every detection is reported as its own spot"
            );
            Box::new(SingletonClustering)
        }
    }
}
