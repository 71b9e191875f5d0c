use std::collections::HashMap;

use ndarray::Array2;

use crate::frame::{BoundingBox, Point};

/// Statistics for a single 8-connected foreground region.
#[derive(Clone, Debug)]
pub struct ComponentStats {
    pub label: u32,
    /// Number of pixels in the component.
    pub area: usize,
    pub bbox: BoundingBox,
    /// Mean pixel position (column, row).
    pub centroid: Point,
}

struct Accumulator {
    area: usize,
    min_row: usize,
    max_row: usize,
    min_col: usize,
    max_col: usize,
    sum_row: f64,
    sum_col: f64,
}

/// Label 8-connected foreground regions with two-pass union-find.
///
/// Components are returned in order of first appearance in raster order.
pub fn connected_components(mask: &Array2<bool>) -> Vec<ComponentStats> {
    let (h, w) = mask.dim();
    if h == 0 || w == 0 {
        return Vec::new();
    }

    let mut labels = Array2::<u32>::zeros((h, w));
    // Index 0 is background.
    let mut parent: Vec<u32> = vec![0];

    // Pass 1: provisional labels from the already-visited neighbors.
    for row in 0..h {
        for col in 0..w {
            if !mask[[row, col]] {
                continue;
            }

            let mut neighbors = [0u32; 4];
            if col > 0 {
                neighbors[0] = labels[[row, col - 1]];
            }
            if row > 0 {
                if col > 0 {
                    neighbors[1] = labels[[row - 1, col - 1]];
                }
                neighbors[2] = labels[[row - 1, col]];
                if col + 1 < w {
                    neighbors[3] = labels[[row - 1, col + 1]];
                }
            }

            let smallest = neighbors.iter().copied().filter(|&l| l > 0).min();
            match smallest {
                None => {
                    let label = parent.len() as u32;
                    parent.push(label);
                    labels[[row, col]] = label;
                }
                Some(label) => {
                    labels[[row, col]] = label;
                    for &other in neighbors.iter().filter(|&&l| l > 0 && l != label) {
                        union(&mut parent, label, other);
                    }
                }
            }
        }
    }

    for i in 1..parent.len() {
        parent[i] = find(&parent, i as u32);
    }

    // Pass 2: resolve labels and accumulate stats.
    let mut order: Vec<u32> = Vec::new();
    let mut stats = HashMap::<u32, Accumulator>::new();

    for row in 0..h {
        for col in 0..w {
            let lbl = labels[[row, col]];
            if lbl == 0 {
                continue;
            }
            let root = parent[lbl as usize];
            let entry = stats.entry(root).or_insert_with(|| {
                order.push(root);
                Accumulator {
                    area: 0,
                    min_row: row,
                    max_row: row,
                    min_col: col,
                    max_col: col,
                    sum_row: 0.0,
                    sum_col: 0.0,
                }
            });

            entry.area += 1;
            entry.min_row = entry.min_row.min(row);
            entry.max_row = entry.max_row.max(row);
            entry.min_col = entry.min_col.min(col);
            entry.max_col = entry.max_col.max(col);
            entry.sum_row += row as f64;
            entry.sum_col += col as f64;
        }
    }

    order
        .into_iter()
        .enumerate()
        .filter_map(|(i, root)| {
            let acc = stats.remove(&root)?;
            let n = acc.area as f64;
            Some(ComponentStats {
                label: i as u32 + 1,
                area: acc.area,
                bbox: BoundingBox::new(
                    acc.min_col as i32,
                    acc.min_row as i32,
                    (acc.max_col - acc.min_col + 1) as i32,
                    (acc.max_row - acc.min_row + 1) as i32,
                ),
                centroid: Point::new(acc.sum_col / n, acc.sum_row / n),
            })
        })
        .collect()
}

fn find(parent: &[u32], mut x: u32) -> u32 {
    while parent[x as usize] != x {
        x = parent[x as usize];
    }
    x
}

fn union(parent: &mut [u32], a: u32, b: u32) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra != rb {
        let (small, big) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[big as usize] = small;
    }
}
