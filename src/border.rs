//! Boundary handling along a single image axis.
//!
//! A wrapping axis is cyclic: the processing range covers every pixel and lookups past
//! either end continue from the other end. A non-wrapping axis skips a margin of one kernel
//! length at each border, which keeps every kernel lookup inside the image. Lookups that
//! would still leave the image are clamped to the nearest valid pixel.

use std::ops::Range;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Axis {
    pub len: usize,
    pub wrap: bool,
}

impl Axis {
    pub fn new(len: usize, wrap: bool) -> Axis {
        Axis { len, wrap }
    }

    /// The coordinates a stage computes for a kernel of length `radius`.
    pub fn range(&self, radius: usize) -> Range<usize> {
        if self.wrap {
            0..self.len
        } else {
            // Inclusive of `len - radius`.
            let end = (self.len + 1).saturating_sub(radius);
            radius..end.max(radius)
        }
    }

    /// Resolves the coordinate `delta` steps away from `i`.
    pub fn offset(&self, i: usize, delta: isize) -> usize {
        let target = i as isize + delta;
        if self.wrap {
            target.rem_euclid(self.len as isize) as usize
        } else {
            target.max(0).min(self.len as isize - 1) as usize
        }
    }
}

/// Flat indices of the eight neighbours of a pixel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Neighbourhood {
    pub n: usize,
    pub ne: usize,
    pub e: usize,
    pub se: usize,
    pub s: usize,
    pub sw: usize,
    pub w: usize,
    pub nw: usize,
}

impl Neighbourhood {
    /// North is the previous row, east the next column.
    pub fn of(x: usize, y: usize, horizontal: &Axis, vertical: &Axis) -> Neighbourhood {
        let width = horizontal.len;
        let (west, east) = (horizontal.offset(x, -1), horizontal.offset(x, 1));
        let (north, south) = (vertical.offset(y, -1) * width, vertical.offset(y, 1) * width);
        let row = y * width;
        Neighbourhood {
            n: north + x,
            ne: north + east,
            e: row + east,
            se: south + east,
            s: south + x,
            sw: south + west,
            w: row + west,
            nw: north + west,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping_range_covers_axis() {
        assert_eq!(Axis::new(10, true).range(3), 0..10);
        assert_eq!(Axis::new(10, true).range(20), 0..10);
    }

    #[test]
    fn clipped_range_skips_margins() {
        assert_eq!(Axis::new(10, false).range(3), 3..8);
        assert_eq!(Axis::new(10, false).range(1), 1..10);
        assert_eq!(Axis::new(90, false).range(3), 3..88);
        assert!(Axis::new(4, false).range(3).is_empty());
        assert!(Axis::new(2, false).range(5).is_empty());
    }

    #[test]
    fn offsets() {
        let wrap = Axis::new(5, true);
        assert_eq!(wrap.offset(0, -1), 4);
        assert_eq!(wrap.offset(4, 1), 0);
        assert_eq!(wrap.offset(1, -7), 4);
        assert_eq!(wrap.offset(2, 1), 3);

        let clamp = Axis::new(5, false);
        assert_eq!(clamp.offset(0, -1), 0);
        assert_eq!(clamp.offset(4, 2), 4);
        assert_eq!(clamp.offset(2, -1), 1);
    }

    #[test]
    fn neighbourhood_wraps_per_axis() {
        let h = Axis::new(4, true);
        let v = Axis::new(3, false);
        let nb = Neighbourhood::of(0, 0, &h, &v);
        assert_eq!(nb.w, 3);
        assert_eq!(nb.e, 1);
        // The vertical axis clamps, so north stays on row 0.
        assert_eq!(nb.n, 0);
        assert_eq!(nb.nw, 3);
        assert_eq!(nb.s, 4);
        assert_eq!(nb.se, 5);
        assert_eq!(nb.sw, 7);

        let v = Axis::new(3, true);
        let nb = Neighbourhood::of(3, 2, &h, &v);
        assert_eq!(nb.s, 3);
        assert_eq!(nb.se, 0);
        assert_eq!(nb.n, 7);
        assert_eq!(nb.ne, 4);
        assert_eq!(nb.w, 10);
    }
}
