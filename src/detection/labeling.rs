//! Two-pass connected component labeling over a [`Mask`].

use crate::config::Connectivity;
use crate::models::{LabelMap, Mask};

/// Union-Find over provisional labels
pub struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    pub fn new() -> Self {
        // Label 0 is background and never joined
        Self { parent: vec![0] }
    }

    /// Allocate a fresh label that is its own root
    pub fn make_set(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    pub fn find(&mut self, x: u32) -> u32 {
        let mut root = x;
        while self.parent[root as usize] != root {
            root = self.parent[root as usize];
        }
        // Path compression
        let mut node = x;
        while self.parent[node as usize] != root {
            let next = self.parent[node as usize];
            self.parent[node as usize] = root;
            node = next;
        }
        root
    }

    pub fn union(&mut self, x: u32, y: u32) {
        let root_x = self.find(x);
        let root_y = self.find(y);
        // Smaller label wins so roots stay in raster order
        if root_x < root_y {
            self.parent[root_y as usize] = root_x;
        } else if root_y < root_x {
            self.parent[root_x as usize] = root_y;
        }
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

/// Label connected `true` pixels.
///
/// Returns the label map and the number of regions. Final labels run from
/// 1 to the region count, ordered by the raster position of each region's
/// first pixel.
pub fn label_components(mask: &Mask, connectivity: Connectivity) -> (LabelMap, u32) {
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let mut labels = vec![0u32; width * height];
    let mut uf = UnionFind::new();

    // First pass: provisional labels, recording equivalences
    for y in 0..height {
        for x in 0..width {
            if !mask.get(x as u32, y as u32) {
                continue;
            }

            let mut neighbors = [0u32; 4];
            let mut count = 0;
            let mut push = |label: u32| {
                if label != 0 {
                    neighbors[count] = label;
                    count += 1;
                }
            };

            // Left and above
            if x > 0 {
                push(labels[y * width + x - 1]);
            }
            if y > 0 {
                push(labels[(y - 1) * width + x]);
            }
            // Upper diagonals
            if connectivity == Connectivity::Eight && y > 0 {
                if x > 0 {
                    push(labels[(y - 1) * width + x - 1]);
                }
                if x + 1 < width {
                    push(labels[(y - 1) * width + x + 1]);
                }
            }

            let idx = y * width + x;
            match neighbors[..count].iter().min() {
                None => labels[idx] = uf.make_set(),
                Some(&min_label) => {
                    labels[idx] = min_label;
                    for &l in &neighbors[..count] {
                        uf.union(min_label, l);
                    }
                }
            }
        }
    }

    // Second pass: resolve to roots and compact in order of first appearance
    let mut compact = vec![0u32; uf.parent.len()];
    let mut next_label = 0u32;
    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = uf.find(*label) as usize;
        if compact[root] == 0 {
            next_label += 1;
            compact[root] = next_label;
        }
        *label = compact[root];
    }

    (
        LabelMap::from_raw(mask.width(), mask.height(), labels),
        next_label,
    )
}
