/// Errors reported before any detection work is done.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The requested kernel width was zero.
    #[error("kernel width must be at least 1, got {0}")]
    InvalidKernelWidth(usize),
    /// Sigma was not a finite, strictly positive number, or too small to normalize the kernel.
    #[error("kernel sigma must be finite and > 0, got {0}")]
    InvalidSigma(f32),
    /// A hysteresis threshold fell outside of `[0, 1]`.
    #[error("{name} threshold must lie in [0, 1], got {value}")]
    InvalidThreshold {
        /// Which threshold, `"low"` or `"high"`.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// The low threshold was above the high threshold.
    #[error("low threshold {low} is above high threshold {high}")]
    ThresholdOrder {
        /// The configured low threshold.
        low: f32,
        /// The configured high threshold.
        high: f32,
    },
    /// A gradient weight was NaN or infinite.
    #[error("{name} weight must be finite, got {value}")]
    InvalidWeight {
        /// Which weight, `"horizontal"` or `"vertical"`.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// The image has no pixels.
    #[error("image must not be empty, got {width}x{height}")]
    EmptyImage {
        /// Image width in pixels.
        width: usize,
        /// Image height in pixels.
        height: usize,
    },
    /// The pixel buffer does not hold exactly `width * height` samples.
    #[error("size mismatch: expected {expected} pixels, got {actual}")]
    SizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Length of the buffer that was passed in.
        actual: usize,
    },
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
