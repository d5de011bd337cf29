use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Parameters for a single detection run.
///
/// Thresholds are fractions of the scaled magnitude range: a threshold of `1.0`
/// corresponds to an unscaled gradient magnitude of `1.0`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CannyConfig {
    /// Requested one-sided length of the Gaussian kernel.
    pub kernel_width: usize,
    /// Standard deviation of the Gaussian kernel.
    pub kernel_sigma: f32,
    /// Pixels connected to an edge are kept down to this threshold.
    pub low_threshold: f32,
    /// Pixels at or above this threshold seed new edges.
    pub high_threshold: f32,
    /// Scale applied to the horizontal gradient. A value `<= 0` disables it.
    pub horizontal_weight: f32,
    /// Scale applied to the vertical gradient. A value `<= 0` disables it.
    pub vertical_weight: f32,
    /// Treat the left and right image borders as adjacent.
    pub wrap_horizontally: bool,
    /// Treat the top and bottom image borders as adjacent.
    pub wrap_vertically: bool,
}

impl Default for CannyConfig {
    fn default() -> Self {
        CannyConfig {
            kernel_width: 3,
            kernel_sigma: 1.0,
            low_threshold: 0.5,
            high_threshold: 1.0,
            horizontal_weight: 1.0,
            vertical_weight: 1.0,
            wrap_horizontally: true,
            wrap_vertically: false,
        }
    }
}

impl CannyConfig {
    /// Sets the kernel width and sigma.
    pub fn with_kernel(mut self, width: usize, sigma: f32) -> Self {
        self.kernel_width = width;
        self.kernel_sigma = sigma;
        self
    }

    /// Sets the low and high hysteresis thresholds.
    pub fn with_thresholds(mut self, low: f32, high: f32) -> Self {
        self.low_threshold = low;
        self.high_threshold = high;
        self
    }

    /// Sets the horizontal and vertical gradient weights.
    pub fn with_weights(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_weight = horizontal;
        self.vertical_weight = vertical;
        self
    }

    /// Sets wrapping of the horizontal and vertical axes.
    pub fn with_wrap(mut self, horizontally: bool, vertically: bool) -> Self {
        self.wrap_horizontally = horizontally;
        self.wrap_vertically = vertically;
        self
    }

    /// Checks that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        if self.kernel_width == 0 {
            return Err(Error::InvalidKernelWidth(self.kernel_width));
        }
        // The kernel divides by 2 * pi * sigma^2, which must stay a normal float.
        let norm = 2.0 * PI * self.kernel_sigma * self.kernel_sigma;
        if !self.kernel_sigma.is_finite() || self.kernel_sigma <= 0.0 || !norm.is_normal() {
            return Err(Error::InvalidSigma(self.kernel_sigma));
        }
        for &(name, value) in &[("low", self.low_threshold), ("high", self.high_threshold)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidThreshold { name, value });
            }
        }
        if self.low_threshold > self.high_threshold {
            return Err(Error::ThresholdOrder {
                low: self.low_threshold,
                high: self.high_threshold,
            });
        }
        for &(name, value) in &[("horizontal", self.horizontal_weight), ("vertical", self.vertical_weight)] {
            if !value.is_finite() {
                return Err(Error::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}
