use crate::border::{Axis, Neighbourhood};
use crate::config::CannyConfig;
use crate::error::{Error, Result};
use crate::kernel::KernelPair;
use log::{debug, trace};
use rayon::prelude::*;
use std::ops::Range;

/// Gradient magnitudes are stored as integers scaled by this factor.
pub const MAGNITUDE_SCALE: f32 = 100_000.0;

/// Owns the brightness of one image and runs detections over it.
#[derive(Clone, Debug)]
pub struct Detector {
    width: usize,
    height: usize,
    brightness: Vec<i32>,
}

/// The outcome of a detection run.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    width: usize,
    height: usize,
    edges: Vec<bool>,
    magnitude: Vec<i32>,
}

impl Detection {
    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The row-major edge mask.
    pub fn edges(&self) -> &[bool] {
        &self.edges
    }

    /// Whether the pixel at `(x, y)` lies on an edge.
    pub fn is_edge(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width, "x = {} outside of width {}", x, self.width);
        self.edges[x + y * self.width]
    }

    /// The scaled magnitude of a pixel confirmed by hysteresis, 0 for every other pixel.
    pub fn magnitude(&self, x: usize, y: usize) -> i32 {
        debug_assert!(x < self.width, "x = {} outside of width {}", x, self.width);
        self.magnitude[x + y * self.width]
    }

    /// Number of edge pixels.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|&&e| e).count()
    }
}

/// Every intermediate buffer of a run, row-major like the image.
#[derive(Clone, Debug)]
pub struct Stages {
    /// The kernels the run used.
    pub kernel: KernelPair,
    /// Brightness smoothed along X.
    pub x_conv: Vec<f32>,
    /// Brightness smoothed along Y.
    pub y_conv: Vec<f32>,
    /// Weighted derivative along X of `y_conv`.
    pub x_gradient: Vec<f32>,
    /// Weighted derivative along Y of `x_conv`.
    pub y_gradient: Vec<f32>,
    /// Suppressed magnitude, scaled by [`MAGNITUDE_SCALE`].
    pub magnitude: Vec<i32>,
    /// `magnitude` of the pixels confirmed by hysteresis, 0 elsewhere.
    pub thresholded: Vec<i32>,
    /// The final edge mask.
    pub edges: Vec<bool>,
}

/// Image geometry and the pixels a run computes.
struct Frame {
    horizontal: Axis,
    vertical: Axis,
    xs: Range<usize>,
    ys: Range<usize>,
}

impl Frame {
    fn new(width: usize, height: usize, radius: usize, config: &CannyConfig) -> Frame {
        let horizontal = Axis::new(width, config.wrap_horizontally);
        let vertical = Axis::new(height, config.wrap_vertically);
        Frame {
            xs: horizontal.range(radius),
            ys: vertical.range(radius),
            horizontal,
            vertical,
        }
    }

    fn width(&self) -> usize {
        self.horizontal.len
    }
}

impl Detector {
    /// Wraps an already computed brightness buffer of `width * height` samples.
    pub fn from_brightness(brightness: Vec<i32>, width: usize, height: usize) -> Result<Detector> {
        if width == 0 || height == 0 {
            return Err(Error::EmptyImage { width, height });
        }
        let expected = width * height;
        if brightness.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: brightness.len(),
            });
        }
        Ok(Detector { width, height, brightness })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The row-major brightness samples.
    pub fn brightness(&self) -> &[i32] {
        &self.brightness
    }

    /// Computes the edge mask of the image.
    ///
    /// The configuration is validated before any work is done. Every run starts from fresh
    /// buffers, so repeated runs with the same configuration give identical results.
    pub fn detect(&self, config: &CannyConfig) -> Result<Detection> {
        let stages = self.stages(config)?;
        Ok(Detection {
            width: self.width,
            height: self.height,
            edges: stages.edges,
            magnitude: stages.thresholded,
        })
    }

    /// Runs the pipeline and keeps every intermediate buffer.
    ///
    /// Pixels outside of the processing range stay zero in every buffer.
    pub fn stages(&self, config: &CannyConfig) -> Result<Stages> {
        config.validate()?;
        let kernel = KernelPair::new(config.kernel_width, config.kernel_sigma);
        let frame = Frame::new(self.width, self.height, kernel.radius(), config);
        debug!(
            "canny {}x{}: kernel radius {}, columns {:?}, rows {:?}",
            self.width,
            self.height,
            kernel.radius(),
            frame.xs,
            frame.ys
        );

        let (x_conv, y_conv) = convolve(&self.brightness, &kernel.smoothing, &frame);
        let y_gradient = if config.vertical_weight > 0.0 {
            vertical_gradient(&x_conv, &kernel.derivative, &frame, config.vertical_weight)
        } else {
            vec![0.0; self.brightness.len()]
        };
        let x_gradient = if config.horizontal_weight > 0.0 {
            horizontal_gradient(&y_conv, &kernel.derivative, &frame, config.horizontal_weight)
        } else {
            vec![0.0; self.brightness.len()]
        };
        let magnitude = suppress(&x_gradient, &y_gradient, &frame);

        let low = (config.low_threshold * MAGNITUDE_SCALE).floor() as i32;
        let high = (config.high_threshold * MAGNITUDE_SCALE).floor() as i32;
        let thresholded = hysteresis(&magnitude, self.width, self.height, low, high);
        let edges = binarize(&thresholded, self.width);

        Ok(Stages {
            kernel,
            x_conv,
            y_conv,
            x_gradient,
            y_gradient,
            magnitude,
            thresholded,
            edges,
        })
    }
}

/// Separably smooths the brightness along X and along Y.
fn convolve(brightness: &[i32], kernel: &[f32], frame: &Frame) -> (Vec<f32>, Vec<f32>) {
    let width = frame.width();
    let mut x_conv = vec![0.0; brightness.len()];
    let mut y_conv = vec![0.0; brightness.len()];
    x_conv
        .par_chunks_mut(width)
        .zip(y_conv.par_chunks_mut(width))
        .enumerate()
        .filter(|(y, _)| frame.ys.contains(y))
        .for_each(|(y, (x_row, y_row))| {
            let row = y * width;
            for x in frame.xs.clone() {
                let centre = brightness[row + x] as f32 * kernel[0];
                let (mut sum_x, mut sum_y) = (centre, centre);
                for (k, &weight) in kernel.iter().enumerate().skip(1) {
                    let k = k as isize;
                    let north = frame.vertical.offset(y, -k) * width + x;
                    let south = frame.vertical.offset(y, k) * width + x;
                    sum_y += weight * (brightness[north] as f32 + brightness[south] as f32);
                    let west = row + frame.horizontal.offset(x, -k);
                    let east = row + frame.horizontal.offset(x, k);
                    sum_x += weight * (brightness[west] as f32 + brightness[east] as f32);
                }
                x_row[x] = sum_x;
                y_row[x] = sum_y;
            }
        });
    (x_conv, y_conv)
}

/// Differentiates the horizontally smoothed buffer along Y.
fn vertical_gradient(x_conv: &[f32], derivative: &[f32], frame: &Frame, weight: f32) -> Vec<f32> {
    let width = frame.width();
    let mut gradient = vec![0.0; x_conv.len()];
    gradient
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| frame.ys.contains(y))
        .for_each(|(y, out)| {
            for x in frame.xs.clone() {
                let mut sum = 0.0;
                for (k, &d) in derivative.iter().enumerate().skip(1) {
                    let k = k as isize;
                    let north = frame.vertical.offset(y, -k) * width + x;
                    let south = frame.vertical.offset(y, k) * width + x;
                    sum += d * (x_conv[north] - x_conv[south]);
                }
                out[x] = sum * weight;
            }
        });
    gradient
}

/// Differentiates the vertically smoothed buffer along X.
fn horizontal_gradient(y_conv: &[f32], derivative: &[f32], frame: &Frame, weight: f32) -> Vec<f32> {
    let width = frame.width();
    let mut gradient = vec![0.0; y_conv.len()];
    gradient
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| frame.ys.contains(y))
        .for_each(|(y, out)| {
            let row = &y_conv[y * width..(y + 1) * width];
            for x in frame.xs.clone() {
                let mut sum = 0.0;
                for (k, &d) in derivative.iter().enumerate().skip(1) {
                    let k = k as isize;
                    let west = frame.horizontal.offset(x, -k);
                    let east = frame.horizontal.offset(x, k);
                    sum += d * (row[west] - row[east]);
                }
                out[x] = sum * weight;
            }
        });
    gradient
}

fn hypot(x: f32, y: f32) -> f32 {
    let (x, y) = (f64::from(x), f64::from(y));
    (x * x + y * y).sqrt() as f32
}

/// Keeps only the pixels whose magnitude peaks along the gradient direction.
///
/// The neighbour magnitudes are blended along the gradient without computing its angle:
/// the gradient components themselves weigh the two neighbours on either side.
fn suppress(x_gradient: &[f32], y_gradient: &[f32], frame: &Frame) -> Vec<i32> {
    let width = frame.width();
    let norms: Vec<f32> = x_gradient
        .par_iter()
        .zip(y_gradient.par_iter())
        .map(|(&gx, &gy)| hypot(gx, gy))
        .collect();

    let mut magnitude = vec![0; x_gradient.len()];
    magnitude
        .par_chunks_mut(width)
        .enumerate()
        .filter(|(y, _)| frame.ys.contains(y))
        .for_each(|(y, out)| {
            for x in frame.xs.clone() {
                let i = x + y * width;
                let nb = Neighbourhood::of(x, y, &frame.horizontal, &frame.vertical);
                if is_local_maximum(x_gradient[i], y_gradient[i], norms[i], &nb, &norms) {
                    out[x] = (MAGNITUDE_SCALE * norms[i]) as i32;
                }
            }
        });
    magnitude
}

fn is_local_maximum(gx: f32, gy: f32, mag: f32, nb: &Neighbourhood, norms: &[f32]) -> bool {
    let n = |i: usize| norms[i];
    if gx * gy <= 0.0 {
        if gx.abs() >= gy.abs() {
            let tmp = (gx * mag).abs();
            tmp >= (gy * n(nb.ne) - (gx + gy) * n(nb.e)).abs()
                && tmp > (gy * n(nb.sw) - (gx + gy) * n(nb.w)).abs()
        } else {
            let tmp = (gy * mag).abs();
            tmp >= (gx * n(nb.ne) - (gy + gx) * n(nb.n)).abs()
                && tmp > (gx * n(nb.sw) - (gy + gx) * n(nb.s)).abs()
        }
    } else if gx.abs() >= gy.abs() {
        let tmp = (gx * mag).abs();
        tmp >= (gy * n(nb.se) + (gx - gy) * n(nb.e)).abs()
            && tmp > (gy * n(nb.nw) + (gx - gy) * n(nb.w)).abs()
    } else {
        let tmp = (gy * mag).abs();
        tmp >= (gx * n(nb.se) + (gy - gx) * n(nb.s)).abs()
            && tmp > (gx * n(nb.nw) + (gy - gx) * n(nb.n)).abs()
    }
}

/// Links edges from strong pixels through connected pixels of at least `low`.
fn hysteresis(magnitude: &[i32], width: usize, height: usize, low: i32, high: i32) -> Vec<i32> {
    let mut thresholded = vec![0; magnitude.len()];
    let mut seeds = 0;
    for y in 0..height {
        for x in 0..width {
            let i = x + y * width;
            if thresholded[i] == 0 && magnitude[i] >= high {
                seeds += 1;
                follow(magnitude, &mut thresholded, width, height, (x, y), low);
            }
        }
    }
    debug!(
        "hysteresis: {} seeds, {} pixels confirmed",
        seeds,
        thresholded.iter().filter(|&&m| m != 0).count()
    );
    thresholded
}

/// Chases a single branch from `seed`, at most `width` pixels long.
///
/// At each pixel only the first qualifying neighbour is followed; the rest of the
/// neighbourhood is abandoned.
fn follow(
    magnitude: &[i32],
    thresholded: &mut [i32],
    width: usize,
    height: usize,
    seed: (usize, usize),
    low: i32,
) {
    let mut current = Some(seed);
    let mut steps = 0;
    while let Some((x, y)) = current {
        steps += 1;
        if steps > width {
            trace!("edge from {:?} cut off at ({}, {})", seed, x, y);
            return;
        }
        let i = x + y * width;
        thresholded[i] = magnitude[i];
        current = next_link(magnitude, thresholded, width, height, (x, y), low);
    }
}

/// The first unconfirmed neighbour of at least `low`, scanning column by column.
///
/// The neighbourhood is clamped to the image.
fn next_link(
    magnitude: &[i32],
    thresholded: &[i32],
    width: usize,
    height: usize,
    (x, y): (usize, usize),
    low: i32,
) -> Option<(usize, usize)> {
    let xs = x.saturating_sub(1)..=(x + 1).min(width - 1);
    for nx in xs {
        for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
            let i = nx + ny * width;
            if (nx, ny) != (x, y) && thresholded[i] == 0 && magnitude[i] >= low {
                return Some((nx, ny));
            }
        }
    }
    None
}

/// The first and last rows are never edges.
fn binarize(thresholded: &[i32], width: usize) -> Vec<bool> {
    let mut edges = vec![false; thresholded.len()];
    let interior = width..thresholded.len().saturating_sub(width);
    for i in interior {
        edges[i] = thresholded[i] > 0;
    }
    edges
}
