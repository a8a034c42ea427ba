//! Density-based clustering of probe samples.
//!
//! DBSCAN over an R*-tree of the sample positions. A point is a core point
//! when its `eps`-neighbourhood (itself included) holds at least
//! `min_samples` points. Border points join the first cluster reaching them.
use rstar::primitives::GeomWithData;
use rstar::RTree;

type Indexed = GeomWithData<[f32; 2], usize>;

/// Cluster label per point, `None` for noise.
pub fn dbscan(points: &[[f32; 2]], eps: f32, min_samples: usize) -> Vec<Option<usize>> {
    let n = points.len();
    let mut labels: Vec<Option<usize>> = vec![None; n];
    let mut visited = vec![false; n];
    let tree = RTree::bulk_load(
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| Indexed::new(p, i))
            .collect(),
    );
    let eps2 = eps * eps;
    // Sorted so labels do not depend on the tree layout.
    let neighbours = |i: usize| -> Vec<usize> {
        let mut found: Vec<usize> = tree
            .locate_within_distance(points[i], eps2)
            .map(|g| g.data)
            .collect();
        found.sort_unstable();
        found
    };

    let mut cluster = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let seeds = neighbours(i);
        if seeds.len() < min_samples {
            continue;
        }
        labels[i] = Some(cluster);
        let mut queue = seeds;
        let mut k = 0;
        while k < queue.len() {
            let j = queue[k];
            k += 1;
            if labels[j].is_none() {
                labels[j] = Some(cluster);
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;
            let more = neighbours(j);
            if more.len() >= min_samples {
                queue.extend(more);
            }
        }
        cluster += 1;
    }
    labels
}
