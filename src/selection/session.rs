//! Multi-anchor scissors session.
//!
//! Models the click workflow of a scissors tool without any UI: the first
//! click places an anchor, cursor moves preview the live wire, later clicks
//! commit the previewed segment and re-seed at the click, and closing joins
//! the last anchor back to the first. A closed boundary can be turned into a
//! selection mask (255 = selected, 0 = not selected).

use rayon::prelude::*;

use super::live_wire::LiveWire;
use crate::error::{LiveWireError, Result};
use crate::image::Pixel;

/// Boundary being traced anchor by anchor on one image.
#[derive(Debug, Clone)]
pub struct ScissorsSession {
    wire: LiveWire,
    anchors: Vec<Pixel>,
    /// Segment `i` runs from `anchors[i]` to `anchors[i + 1]` (or back to
    /// `anchors[0]` for the closing segment), both ends included.
    segments: Vec<Vec<Pixel>>,
    closed: bool,
}

impl ScissorsSession {
    pub fn new(wire: LiveWire) -> Self {
        Self {
            wire,
            anchors: Vec::new(),
            segments: Vec::new(),
            closed: false,
        }
    }

    pub fn live_wire(&self) -> &LiveWire {
        &self.wire
    }

    pub fn into_live_wire(self) -> LiveWire {
        self.wire
    }

    pub fn anchors(&self) -> &[Pixel] {
        &self.anchors
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Discard any boundary and place the first anchor.
    ///
    /// On error the session is left as it was.
    pub fn start(&mut self, x: usize, y: usize) -> Result<()> {
        self.wire.set_seed_point(x, y)?;
        self.anchors.clear();
        self.segments.clear();
        self.closed = false;
        self.anchors.push(Pixel::new(x, y));
        Ok(())
    }

    /// Live wire from the last anchor to the cursor, anchor first.
    pub fn preview(&self, x: usize, y: usize) -> Result<Vec<Pixel>> {
        if self.closed {
            return Err(LiveWireError::InvalidSession("boundary is already closed"));
        }
        let mut path = self.wire.path_to(x, y)?;
        path.reverse();
        Ok(path)
    }

    /// Commit the previewed segment to `(x, y)` and continue from there.
    pub fn commit(&mut self, x: usize, y: usize) -> Result<&[Pixel]> {
        let segment = self.preview(x, y)?;
        self.wire.set_seed_point(x, y)?;
        self.anchors.push(Pixel::new(x, y));
        self.segments.push(segment);
        Ok(self.segments.last().map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Drop the last committed segment (or the closing one) and re-seed at
    /// the anchor it started from. Undoing the first anchor empties the
    /// session.
    pub fn undo(&mut self) -> Result<()> {
        if self.closed {
            self.segments.pop();
            self.closed = false;
        } else if self.segments.pop().is_some() {
            self.anchors.pop();
        } else {
            self.anchors.clear();
            self.wire.clear_seed();
            return Ok(());
        }

        match self.anchors.last() {
            Some(&anchor) => self.wire.set_seed_point(anchor.x, anchor.y),
            None => Ok(()),
        }
    }

    /// Join the last anchor back to the first and return the closed boundary.
    pub fn close(&mut self) -> Result<Vec<Pixel>> {
        if self.closed {
            return Err(LiveWireError::InvalidSession("boundary is already closed"));
        }
        let first = *self.anchors.first().ok_or(LiveWireError::SeedNotSet)?;
        if self.anchors.len() < 2 {
            return Err(LiveWireError::InvalidSession(
                "closing needs at least two anchors",
            ));
        }

        let segment = self.preview(first.x, first.y)?;
        self.segments.push(segment);
        self.closed = true;
        Ok(self.boundary())
    }

    /// Committed boundary as one polyline without repeated joints.
    ///
    /// For a closed boundary the first pixel is not repeated at the end.
    pub fn boundary(&self) -> Vec<Pixel> {
        let mut boundary: Vec<Pixel> = Vec::new();
        for segment in &self.segments {
            let skip = usize::from(!boundary.is_empty());
            boundary.extend(segment.iter().skip(skip).copied());
        }
        if self.closed && boundary.len() > 1 {
            boundary.pop();
        }
        boundary
    }

    /// Selection mask of the closed boundary, `width * height` bytes.
    pub fn to_mask(&self) -> Result<Vec<u8>> {
        if !self.closed {
            return Err(LiveWireError::InvalidSession(
                "only a closed boundary has an inside",
            ));
        }
        Ok(polygon_mask(
            &self.boundary(),
            self.wire.width(),
            self.wire.height(),
        ))
    }
}

/// Rasterize a closed polygon through pixel centers into a 255/0 mask.
///
/// Uses the even-odd rule per row. The outline itself, every edge between
/// consecutive vertices, is always selected, so sparse corner lists and
/// dense pixel boundaries give the same region.
pub fn polygon_mask(polygon: &[Pixel], width: usize, height: usize) -> Vec<u8> {
    let mut mask = vec![0u8; width * height];
    if polygon.is_empty() || width == 0 {
        return mask;
    }

    mask.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| fill_row(row, y, polygon));

    let n = polygon.len();
    for i in 0..n {
        stroke_edge(&mut mask, polygon[i], polygon[(i + 1) % n], width, height);
    }

    mask
}

/// Mark every pixel on the segment `a..=b`, one per step of the longer axis.
fn stroke_edge(mask: &mut [u8], a: Pixel, b: Pixel, width: usize, height: usize) {
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let steps = a.x.abs_diff(b.x).max(a.y.abs_diff(b.y));

    for i in 0..=steps {
        let t = if steps == 0 { 0.0 } else { i as f64 / steps as f64 };
        let x = (ax + t * dx).round() as usize;
        let y = (ay + t * dy).round() as usize;
        if x < width && y < height {
            mask[y * width + x] = 255;
        }
    }
}

fn fill_row(row: &mut [u8], y: usize, polygon: &[Pixel]) {
    let yf = y as f64;
    let n = polygon.len();
    let mut crossings: Vec<f64> = Vec::new();

    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let (ay, by) = (a.y as f64, b.y as f64);
        // Half-open on y so shared vertices are counted once
        if (ay <= yf) != (by <= yf) {
            let t = (yf - ay) / (by - ay);
            crossings.push(a.x as f64 + t * (b.x as f64 - a.x as f64));
        }
    }
    crossings.sort_by(f64::total_cmp);

    let last = (row.len() - 1) as f64;
    for span in crossings.chunks_exact(2) {
        let start = span[0].ceil().max(0.0);
        let end = span[1].floor().min(last);
        if end < start {
            continue;
        }
        for v in &mut row[start as usize..=end as usize] {
            *v = 255;
        }
    }
}
