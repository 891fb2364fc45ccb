//! Single-source minimum-cost search over the 8-connected pixel grid.
//!
//! Dijkstra with a binary heap. Decrease-key is done by pushing a fresh
//! entry; outdated entries are skipped when popped. Every per-pixel table
//! (cost, predecessor, expanded flag) is a flat vector indexed `y * width + x`.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use super::cost::{offset_pixel, CostModel, NEIGHBOR_OFFSETS};
use crate::error::{LiveWireError, Result};
use crate::image::{check_bounds, Pixel};

/// Predecessor value for pixels without one (the seed, unreached pixels).
pub(crate) const NO_PARENT: usize = usize::MAX;

/// Expansions between two polls of the cancellation flag.
const CANCEL_CHECK_INTERVAL: usize = 4096;

/// Frontier entry ordered so that `BinaryHeap` pops the lowest cost first.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: f64,
    index: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: lower cost (then lower index) is "greater"
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Back-pointer tree produced by one search. Valid only for its seed.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerMap {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) seed: Pixel,
    pub(crate) parent: Vec<usize>,
    pub(crate) cost: Vec<f64>,
    pub(crate) expanded: Vec<bool>,
    pub(crate) expanded_count: usize,
}

impl PointerMap {
    pub fn seed(&self) -> Pixel {
        self.seed
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels whose minimum cost was finalized.
    pub fn expanded_count(&self) -> usize {
        self.expanded_count
    }

    pub fn is_expanded(&self, pixel: Pixel) -> bool {
        self.index_of(pixel)
            .map(|i| self.expanded[i])
            .unwrap_or(false)
    }

    /// Cumulative cost from the seed, if `pixel` was expanded.
    pub fn cost_at(&self, pixel: Pixel) -> Option<f64> {
        let i = self.index_of(pixel)?;
        self.expanded[i].then(|| self.cost[i])
    }

    /// Predecessor on the minimum-cost path. `None` for the seed.
    pub fn parent_of(&self, pixel: Pixel) -> Option<Pixel> {
        let i = self.index_of(pixel)?;
        match self.parent[i] {
            NO_PARENT => None,
            p => Some(Pixel::from_index(p, self.width)),
        }
    }

    fn index_of(&self, pixel: Pixel) -> Option<usize> {
        (pixel.x < self.width && pixel.y < self.height).then(|| pixel.index(self.width))
    }
}

/// Build the complete back-pointer tree rooted at `seed`.
///
/// # Errors
/// `OutOfBounds` if the seed lies outside the image.
pub fn compute_tree(model: &CostModel<'_>, seed: Pixel) -> Result<PointerMap> {
    run_search(model, seed, None)
}

/// Like [`compute_tree`], polling `cancel` while the search runs.
///
/// # Errors
/// `Cancelled` once the flag is observed set; no partial tree is returned.
pub fn compute_tree_cancellable(
    model: &CostModel<'_>,
    seed: Pixel,
    cancel: &AtomicBool,
) -> Result<PointerMap> {
    run_search(model, seed, Some(cancel))
}

fn run_search(
    model: &CostModel<'_>,
    seed: Pixel,
    cancel: Option<&AtomicBool>,
) -> Result<PointerMap> {
    let (width, height) = (model.width(), model.height());
    check_bounds(seed.x, seed.y, width, height)?;

    let len = width * height;
    let mut cost = vec![f64::INFINITY; len];
    let mut parent = vec![NO_PARENT; len];
    let mut expanded = vec![false; len];
    let mut expanded_count = 0usize;
    let mut frontier = BinaryHeap::with_capacity(len.min(1 << 16));

    let seed_index = seed.index(width);
    cost[seed_index] = 0.0;
    frontier.push(FrontierEntry {
        cost: 0.0,
        index: seed_index,
    });

    while let Some(FrontierEntry { cost: current, index }) = frontier.pop() {
        // Outdated duplicate of an already improved or expanded pixel
        if expanded[index] || current > cost[index] {
            continue;
        }

        if let Some(flag) = cancel {
            if expanded_count % CANCEL_CHECK_INTERVAL == 0 && flag.load(AtomicOrdering::Relaxed) {
                log::debug!(
                    "live-wire search from {} cancelled after {} expansions",
                    seed,
                    expanded_count
                );
                return Err(LiveWireError::Cancelled);
            }
        }

        expanded[index] = true;
        expanded_count += 1;

        let q = Pixel::from_index(index, width);
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let Some(r) = offset_pixel(q, dx, dy, width, height) else {
                continue;
            };
            let r_index = r.index(width);
            if expanded[r_index] {
                continue;
            }

            let tentative = current + model.link_cost(q, r);
            if tentative < cost[r_index] {
                cost[r_index] = tentative;
                parent[r_index] = index;
                frontier.push(FrontierEntry {
                    cost: tentative,
                    index: r_index,
                });
            }
        }
    }

    log::debug!(
        "live-wire search from {} expanded {} of {} pixels",
        seed,
        expanded_count,
        len
    );

    Ok(PointerMap {
        width,
        height,
        seed,
        parent,
        cost,
        expanded,
        expanded_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{build_features, Features};
    use crate::image::RgbaImage;
    use crate::selection::cost::CostWeights;

    fn gray_features(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> Features {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let v = f(x, y);
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        build_features(&RgbaImage::from_raw(width, height, data).unwrap()).unwrap()
    }

    #[test]
    fn test_frontier_pops_lowest_cost() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry { cost: 2.5, index: 0 });
        heap.push(FrontierEntry { cost: 0.5, index: 7 });
        heap.push(FrontierEntry { cost: 1.0, index: 3 });
        heap.push(FrontierEntry { cost: 0.5, index: 2 });

        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.index)).collect();
        assert_eq!(order, vec![2, 7, 3, 0]);
    }

    #[test]
    fn test_tree_spans_whole_grid() {
        let features = gray_features(7, 5, |x, y| ((x * 29 + y * 71) % 256) as u8);
        let model = CostModel::new(&features, CostWeights::default());
        let tree = compute_tree(&model, Pixel::new(3, 2)).unwrap();

        assert_eq!(tree.expanded_count(), 35);
        assert_eq!(tree.seed(), Pixel::new(3, 2));
        assert_eq!(tree.cost_at(Pixel::new(3, 2)), Some(0.0));
        assert_eq!(tree.parent_of(Pixel::new(3, 2)), None);

        for y in 0..5 {
            for x in 0..7 {
                let p = Pixel::new(x, y);
                assert!(tree.is_expanded(p));
                if p != tree.seed() {
                    let parent = tree.parent_of(p).unwrap();
                    assert!(parent.is_neighbor(p));
                }
            }
        }
    }

    #[test]
    fn test_costs_are_consistent_with_parents() {
        let features = gray_features(9, 8, |x, y| if (x + y) % 5 < 2 { 30 } else { 200 });
        let model = CostModel::new(&features, CostWeights::default());
        let tree = compute_tree(&model, Pixel::new(0, 7)).unwrap();

        for y in 0..8 {
            for x in 0..9 {
                let r = Pixel::new(x, y);
                let Some(q) = tree.parent_of(r) else {
                    assert_eq!(r, tree.seed());
                    continue;
                };
                let cost_r = tree.cost_at(r).unwrap();
                let cost_q = tree.cost_at(q).unwrap();
                assert!(cost_r >= cost_q);
                let link = model.local_cost(q, r).unwrap();
                assert!((cost_r - (cost_q + link)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_costs_are_minimal() {
        // Bellman check: no link can improve any finalized cost
        let features = gray_features(6, 6, |x, y| ((x * x + 3 * y) * 11 % 256) as u8);
        let model = CostModel::new(&features, CostWeights::default());
        let tree = compute_tree(&model, Pixel::new(2, 3)).unwrap();

        for y in 0..6 {
            for x in 0..6 {
                let q = Pixel::new(x, y);
                let cost_q = tree.cost_at(q).unwrap();
                for (dx, dy) in NEIGHBOR_OFFSETS {
                    if let Some(r) = offset_pixel(q, dx, dy, 6, 6) {
                        let via_q = cost_q + model.local_cost(q, r).unwrap();
                        assert!(tree.cost_at(r).unwrap() <= via_q + 1e-9);
                    }
                }
            }
        }
    }

    #[test]
    fn test_seed_out_of_bounds() {
        let features = gray_features(4, 4, |_, _| 0);
        let model = CostModel::new(&features, CostWeights::default());
        assert!(matches!(
            compute_tree(&model, Pixel::new(4, 0)),
            Err(LiveWireError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_cancelled_search() {
        let features = gray_features(5, 5, |_, _| 0);
        let model = CostModel::new(&features, CostWeights::default());
        let cancel = AtomicBool::new(true);
        assert_eq!(
            compute_tree_cancellable(&model, Pixel::new(0, 0), &cancel),
            Err(LiveWireError::Cancelled)
        );

        let proceed = AtomicBool::new(false);
        let tree = compute_tree_cancellable(&model, Pixel::new(0, 0), &proceed).unwrap();
        assert_eq!(tree.expanded_count(), 25);
    }
}
