use std::collections::VecDeque;

use crate::config::Connectivity;
use crate::detection::labeling::label_components;
use crate::models::{LabelMap, Mask, Point, Region};

/// Moore neighbourhood, clockwise (y grows downwards) starting east
const NEIGHBORS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// East, south, west, north: clockwise, as above
const NEIGHBORS_FOUR: [(i64, i64); 4] = [(1, 0), (0, 1), (-1, 0), (0, -1)];

type Pos = (i64, i64);

/// Find bright regions in a mask, with their outer boundaries
pub fn find_regions(mask: &Mask, connectivity: Connectivity) -> (LabelMap, Vec<Region>) {
    let (labels, count) = label_components(mask, connectivity);

    let mut regions: Vec<Region> = Vec::with_capacity(count as usize);
    for y in 0..labels.height() {
        for x in 0..labels.width() {
            let label = labels.get(x, y);
            if label == 0 {
                continue;
            }

            let index = label as usize - 1;
            if index == regions.len() {
                // First pixel of a region in raster order: start tracing here
                regions.push(Region {
                    label,
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    pixel_count: 0,
                    boundary: trace_boundary(&labels, label, Point { x, y }, connectivity),
                    enclosed: true,
                });
            }

            let region = &mut regions[index];
            region.min_x = region.min_x.min(x);
            region.max_x = region.max_x.max(x);
            region.max_y = region.max_y.max(y);
            region.pixel_count += 1;
        }
    }

    mark_outer_regions(mask, &labels, connectivity, &mut regions);
    (labels, regions)
}

/// Clear `enclosed` on every region reachable from outside the image.
///
/// Background is flooded from the image border using the complementary
/// neighbourhood (4 for 8-connected regions and vice versa). A region is
/// outer if it touches the border or a flooded background pixel. Boundary
/// polygons close through the labeling neighbourhood, so a region is
/// flagged exactly when some other region's polygon already covers it.
fn mark_outer_regions(
    mask: &Mask,
    labels: &LabelMap,
    connectivity: Connectivity,
    regions: &mut [Region],
) {
    let width = mask.width();
    let height = mask.height();
    let background_neighbors: &[(i64, i64)] = match connectivity {
        Connectivity::Eight => &NEIGHBORS_FOUR,
        Connectivity::Four => &NEIGHBORS,
    };

    let index = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let mut outside = vec![false; width as usize * height as usize];
    let mut queue = VecDeque::new();
    for y in 0..height {
        for x in 0..width {
            let on_border = x == 0 || y == 0 || x + 1 == width || y + 1 == height;
            if on_border && !mask.get(x, y) {
                outside[index(x, y)] = true;
                queue.push_back((x, y));
            }
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for &(dx, dy) in background_neighbors {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                continue;
            }
            let (nx, ny) = (nx as u32, ny as u32);
            let idx = index(nx, ny);
            if !outside[idx] && !mask.get(nx, ny) {
                outside[idx] = true;
                queue.push_back((nx, ny));
            }
        }
    }

    let is_outside = |x: i64, y: i64| {
        x < 0
            || y < 0
            || x >= width as i64
            || y >= height as i64
            || outside[index(x as u32, y as u32)]
    };
    for y in 0..height {
        for x in 0..width {
            let label = labels.get(x, y);
            if label == 0 || !regions[label as usize - 1].enclosed {
                continue;
            }
            let (sx, sy) = (x as i64, y as i64);
            let exposed = NEIGHBORS_FOUR
                .iter()
                .any(|&(dx, dy)| is_outside(sx + dx, sy + dy));
            if exposed {
                regions[label as usize - 1].enclosed = false;
            }
        }
    }
}

/// Trace the outer boundary of one labeled region.
///
/// `start` must be the region's first pixel in raster order, so its west
/// and north neighbours are known to lie outside the region. Tracing stops
/// when the walk is back at `start` and about to repeat its first move.
///
/// The walk steps through the same neighbourhood the regions were labeled
/// with, so the boundary polygon only closes across diagonal gaps under
/// 8-connectivity.
pub fn trace_boundary(
    labels: &LabelMap,
    label: u32,
    start: Point,
    connectivity: Connectivity,
) -> Vec<Point> {
    let inside = |(x, y): Pos| labels.get_signed(x, y) == label;
    let start_pos: Pos = (start.x as i64, start.y as i64);

    let mut boundary = vec![start];
    match connectivity {
        Connectivity::Eight => {
            let west = (start_pos.0 - 1, start_pos.1);
            let Some((first, mut back)) = step(&inside, start_pos, west) else {
                // Isolated pixel
                return boundary;
            };

            let mut current = first;
            while let Some((next, next_back)) = step(&inside, current, back) {
                if current == start_pos && next == first {
                    break;
                }
                boundary.push(to_point(current));
                current = next;
                back = next_back;
            }
        }
        Connectivity::Four => {
            // Pretend we arrived heading east, so north is tried first
            let Some((first, mut heading)) = step_four(&inside, start_pos, 0) else {
                return boundary;
            };

            let mut current = first;
            while let Some((next, next_heading)) = step_four(&inside, current, heading) {
                if current == start_pos && next == first {
                    break;
                }
                boundary.push(to_point(current));
                current = next;
                heading = next_heading;
            }
        }
    }

    boundary
}

fn to_point((x, y): Pos) -> Point {
    Point {
        x: x as u32,
        y: y as u32,
    }
}

/// One wall-following move over the 4-neighbourhood.
///
/// Keeps the outside on the left: tries a left turn first, then straight
/// on, right, and finally back. Returns the next boundary pixel and the
/// heading used to reach it.
fn step_four(inside: &impl Fn(Pos) -> bool, current: Pos, heading: usize) -> Option<(Pos, usize)> {
    for turn in [3, 0, 1, 2] {
        let dir = (heading + turn) % 4;
        let (dx, dy) = NEIGHBORS_FOUR[dir];
        let candidate = (current.0 + dx, current.1 + dy);
        if inside(candidate) {
            return Some((candidate, dir));
        }
    }
    None
}

/// One Moore-neighbour move.
///
/// Scans clockwise around `current`, starting just after the background
/// pixel `back`. Returns the next boundary pixel and the background pixel
/// examined right before it.
fn step(inside: &impl Fn(Pos) -> bool, current: Pos, back: Pos) -> Option<(Pos, Pos)> {
    let offset = (back.0 - current.0, back.1 - current.1);
    let back_dir = NEIGHBORS.iter().position(|&d| d == offset)?;

    for i in 1..=8 {
        let dir = (back_dir + i) % 8;
        let (dx, dy) = NEIGHBORS[dir];
        let candidate = (current.0 + dx, current.1 + dy);
        if inside(candidate) {
            let (bx, by) = NEIGHBORS[(dir + 7) % 8];
            return Some((candidate, (current.0 + bx, current.1 + by)));
        }
    }
    None
}
