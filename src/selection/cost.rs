//! Local link cost between 8-connected pixels.
//!
//! The cost of stepping from `p` into a neighbor `q` combines three features:
//! the Laplacian zero crossing at `q`, the gradient cost at `q` and the
//! smoothness of the gradient direction along the link. The cost is directed:
//! `cost(p, q)` and `cost(q, p)` generally differ.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::error::{LiveWireError, Result};
use crate::filters::Features;
use crate::image::{check_bounds, Pixel};

/// 8-connected neighbor offsets `(dx, dy)`.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Tolerance on the weight sum.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Feature weights of the cost model. Must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostWeights {
    /// Laplacian zero-crossing weight
    pub zero_crossing: f64,
    /// Gradient magnitude weight
    pub gradient_magnitude: f64,
    /// Gradient direction weight
    pub gradient_direction: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            zero_crossing: 0.43,
            gradient_magnitude: 0.14,
            gradient_direction: 0.43,
        }
    }
}

impl CostWeights {
    /// Create custom weights (normalized to sum 1)
    pub fn custom(zero_crossing: f64, gradient_magnitude: f64, gradient_direction: f64) -> Self {
        let sum = (zero_crossing + gradient_magnitude + gradient_direction)
            .abs()
            .max(0.001);
        Self {
            zero_crossing: zero_crossing / sum,
            gradient_magnitude: gradient_magnitude / sum,
            gradient_direction: gradient_direction / sum,
        }
    }

    /// Reject negative, non-finite or non-normalized weights.
    pub fn validate(&self) -> Result<()> {
        let all = [
            self.zero_crossing,
            self.gradient_magnitude,
            self.gradient_direction,
        ];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(LiveWireError::InvalidWeights(format!(
                "weights must be finite and non-negative, got {:?}",
                self
            )));
        }
        let sum: f64 = all.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(LiveWireError::InvalidWeights(format!(
                "weights must sum to 1, got {sum}"
            )));
        }
        Ok(())
    }
}

/// Neighbor of `p` at offset `(dx, dy)` if it lies inside `width x height`.
#[inline]
pub(crate) fn offset_pixel(
    p: Pixel,
    dx: isize,
    dy: isize,
    width: usize,
    height: usize,
) -> Option<Pixel> {
    let x = p.x.checked_add_signed(dx)?;
    let y = p.y.checked_add_signed(dy)?;
    (x < width && y < height).then_some(Pixel::new(x, y))
}

/// Unit edge-tangent at a pixel: the gradient `(gx, gy)` rotated to `(gy, -gx)`.
#[inline]
fn edge_tangent(gx: f64, gy: f64) -> Option<(f64, f64)> {
    let norm = (gx * gx + gy * gy).sqrt();
    if norm > 0.0 {
        Some((gy / norm, -gx / norm))
    } else {
        None
    }
}

#[inline]
fn dot(a: (f64, f64), b: (f64, f64)) -> f64 {
    a.0 * b.0 + a.1 * b.1
}

/// Link cost evaluator over one set of features.
#[derive(Debug, Clone, Copy)]
pub struct CostModel<'a> {
    features: &'a Features,
    weights: CostWeights,
}

impl<'a> CostModel<'a> {
    pub fn new(features: &'a Features, weights: CostWeights) -> Self {
        Self { features, weights }
    }

    pub fn width(&self) -> usize {
        self.features.width()
    }

    pub fn height(&self) -> usize {
        self.features.height()
    }

    pub fn weights(&self) -> CostWeights {
        self.weights
    }

    /// Gradient direction term in `[0, 1.5]`.
    ///
    /// 0 when either pixel has a zero gradient.
    pub fn direction_cost(&self, p: Pixel, q: Pixel) -> f64 {
        let sx = self.features.sobel_x();
        let sy = self.features.sobel_y();
        let (Some(dp), Some(dq)) = (
            edge_tangent(sx[[p.y, p.x]], sy[[p.y, p.x]]),
            edge_tangent(sx[[q.y, q.x]], sy[[q.y, q.x]]),
        ) else {
            return 0.0;
        };

        let dx = q.x as f64 - p.x as f64;
        let dy = q.y as f64 - p.y as f64;
        let mut link = if dx != 0.0 && dy != 0.0 {
            (dx * FRAC_1_SQRT_2, dy * FRAC_1_SQRT_2)
        } else {
            (dx, dy)
        };
        // Orient the link along the tangent at p
        if dot(dp, link) < 0.0 {
            link = (-link.0, -link.1);
        }

        let at_p = dot(dp, link).clamp(-1.0, 1.0).acos();
        let at_q = dot(link, dq).clamp(-1.0, 1.0).acos();
        let cost = (at_p + at_q) / PI;
        if cost.is_nan() {
            0.0
        } else {
            cost
        }
    }

    /// Cost of stepping from `p` into its neighbor `q`. No bounds checks.
    ///
    /// Axis-aligned links are scaled by `1/sqrt(2)`, diagonal links by 1.
    #[inline]
    pub(crate) fn link_cost(&self, p: Pixel, q: Pixel) -> f64 {
        let scale = if p.x != q.x && p.y != q.y {
            1.0
        } else {
            FRAC_1_SQRT_2
        };
        let w = &self.weights;
        let zero_crossing = self.features.zero_crossings()[[q.y, q.x]] as f64;
        let magnitude = self.features.gradient_magnitude()[[q.y, q.x]];

        scale
            * (w.zero_crossing * zero_crossing
                + w.gradient_direction * self.direction_cost(p, q)
                + w.gradient_magnitude * magnitude)
    }

    /// Checked link cost between two 8-connected pixels.
    pub fn local_cost(&self, p: Pixel, q: Pixel) -> Result<f64> {
        let (width, height) = (self.width(), self.height());
        check_bounds(p.x, p.y, width, height)?;
        check_bounds(q.x, q.y, width, height)?;
        if !p.is_neighbor(q) {
            return Err(LiveWireError::NotNeighbors { from: p, to: q });
        }
        Ok(self.link_cost(p, q))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::build_features;
    use crate::image::RgbaImage;

    fn gray_image(width: usize, height: usize, f: impl Fn(usize, usize) -> u8) -> RgbaImage {
        let mut data = Vec::with_capacity(width * height * 4);
        for y in 0..height {
            for x in 0..width {
                let v = f(x, y);
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }
        RgbaImage::from_raw(width, height, data).unwrap()
    }

    #[test]
    fn test_default_weights_are_valid() {
        let w = CostWeights::default();
        assert!(w.validate().is_ok());
        assert!((w.zero_crossing + w.gradient_magnitude + w.gradient_direction - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weight_validation() {
        let bad_sum = CostWeights {
            zero_crossing: 0.5,
            gradient_magnitude: 0.5,
            gradient_direction: 0.5,
        };
        assert!(matches!(bad_sum.validate(), Err(LiveWireError::InvalidWeights(_))));

        let negative = CostWeights {
            zero_crossing: 1.2,
            gradient_magnitude: -0.2,
            gradient_direction: 0.0,
        };
        assert!(negative.validate().is_err());

        let nan = CostWeights {
            zero_crossing: f64::NAN,
            gradient_magnitude: 0.5,
            gradient_direction: 0.5,
        };
        assert!(nan.validate().is_err());

        assert!(CostWeights::custom(2.0, 1.0, 1.0).validate().is_ok());
    }

    #[test]
    fn test_uniform_image_costs() {
        let features = build_features(&gray_image(5, 5, |_, _| 128)).unwrap();
        let model = CostModel::new(&features, CostWeights::default());
        let base = 0.43 + 0.14;

        let center = Pixel::new(2, 2);
        for (dx, dy) in NEIGHBOR_OFFSETS {
            let q = offset_pixel(center, dx, dy, 5, 5).unwrap();
            let expected = if dx != 0 && dy != 0 { base } else { base * FRAC_1_SQRT_2 };
            let cost = model.local_cost(center, q).unwrap();
            assert!((cost - expected).abs() < 1e-12, "{:?}: {} != {}", (dx, dy), cost, expected);
            assert_eq!(model.direction_cost(center, q), 0.0);
        }
    }

    #[test]
    fn test_direction_cost_along_and_across_edge() {
        let features = build_features(&gray_image(6, 6, |x, _| if x < 3 { 20 } else { 220 })).unwrap();
        let model = CostModel::new(&features, CostWeights::default());

        // Following the edge: tangents parallel to the link
        let along = model.direction_cost(Pixel::new(2, 2), Pixel::new(2, 3));
        assert!(along.abs() < 1e-12);

        // Crossing the edge: link perpendicular to both tangents
        let across = model.direction_cost(Pixel::new(2, 2), Pixel::new(3, 2));
        assert!((across - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_direction_cost_zero_gradient_is_zero() {
        let features = build_features(&gray_image(6, 6, |x, _| if x < 3 { 20 } else { 220 })).unwrap();
        let model = CostModel::new(&features, CostWeights::default());
        // (1, 2) has no gradient, (2, 2) does
        assert_eq!(model.direction_cost(Pixel::new(1, 2), Pixel::new(2, 2)), 0.0);
        assert_eq!(model.direction_cost(Pixel::new(0, 0), Pixel::new(1, 1)), 0.0);
    }

    #[test]
    fn test_cost_is_directed() {
        let features = build_features(&gray_image(6, 6, |x, _| if x < 3 { 20 } else { 220 })).unwrap();
        let model = CostModel::new(&features, CostWeights::default());

        let flat = Pixel::new(1, 2);
        let edge = Pixel::new(2, 2);
        let into_edge = model.local_cost(flat, edge).unwrap();
        let out_of_edge = model.local_cost(edge, flat).unwrap();
        assert!(into_edge < out_of_edge);
    }

    #[test]
    fn test_costs_are_non_negative() {
        let features = build_features(&gray_image(8, 8, |x, y| ((x * 53 + y * 17) % 256) as u8)).unwrap();
        let model = CostModel::new(&features, CostWeights::default());
        for y in 0..8 {
            for x in 0..8 {
                let p = Pixel::new(x, y);
                for (dx, dy) in NEIGHBOR_OFFSETS {
                    if let Some(q) = offset_pixel(p, dx, dy, 8, 8) {
                        let c = model.local_cost(p, q).unwrap();
                        assert!(c.is_finite() && c >= 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn test_local_cost_rejects_bad_links() {
        let features = build_features(&gray_image(4, 4, |_, _| 0)).unwrap();
        let model = CostModel::new(&features, CostWeights::default());

        assert!(matches!(
            model.local_cost(Pixel::new(0, 0), Pixel::new(2, 0)),
            Err(LiveWireError::NotNeighbors { .. })
        ));
        assert!(matches!(
            model.local_cost(Pixel::new(3, 3), Pixel::new(4, 3)),
            Err(LiveWireError::OutOfBounds { .. })
        ));
        assert!(model.local_cost(Pixel::new(1, 1), Pixel::new(1, 1)).is_err());
    }

    #[test]
    fn test_offset_pixel_bounds() {
        assert_eq!(offset_pixel(Pixel::new(0, 0), -1, 0, 3, 3), None);
        assert_eq!(offset_pixel(Pixel::new(2, 2), 1, 1, 3, 3), None);
        assert_eq!(offset_pixel(Pixel::new(1, 1), 1, -1, 3, 3), Some(Pixel::new(2, 0)));
    }
}
