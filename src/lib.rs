#![cfg_attr(all(test, feature = "unstable"), feature(test))]
#![warn(missing_docs)]

//! A weighted, wrap-aware variant of the Canny edge detection algorithm.
//!
//! The brightness of an image is smoothed with a separable Gaussian, differentiated along
//! both axes, thinned by non-maximum suppression and linked into edges by hysteresis. The
//! two gradient directions can be weighted independently, and each image axis can be
//! treated as cyclic, which suits panoramic images whose left and right borders meet.
//!
//! # Finding the edges in an image
//!
//! ```
//! extern crate weighted_canny;
//!
//! use weighted_canny::{CannyConfig, Detector};
//!
//! // A 20x20 image, bright on the left half and dark on the right half.
//! let brightness = (0..400).map(|i| if i % 20 < 10 { 200 } else { 0 }).collect();
//! let detector = Detector::from_brightness(brightness, 20, 20).unwrap();
//!
//! let config = CannyConfig::default().with_wrap(true, false);
//! let detection = detector.detect(&config).unwrap();
//! assert!(detection.is_edge(9, 10));
//! // The borders meet, so the seam between column 19 and column 0 is an edge too.
//! assert!(detection.is_edge(19, 10));
//! ```
//!
//! See [`CannyConfig`] for details on what each parameter means.

extern crate image;
extern crate log;
extern crate rayon;
extern crate serde;
extern crate thiserror;

mod border;
mod config;
mod convert;
mod edge;
mod error;
mod kernel;

pub use config::CannyConfig;
pub use convert::brightness;
pub use edge::*;
pub use error::{Error, Result};
pub use kernel::KernelPair;
