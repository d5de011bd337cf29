use std::f32::consts::PI;

/// Taps whose centre weight falls to this value end the kernel early.
const NEGLIGIBLE_WEIGHT: f32 = 0.005;

/// A one-sided Gaussian kernel and its derivative.
///
/// Index `0` is the centre tap, index `k` applies symmetrically to the pixels at
/// distance `k` on both sides.
#[derive(Clone, Debug, PartialEq)]
pub struct KernelPair {
    /// Gaussian smoothing weights.
    pub smoothing: Vec<f32>,
    /// Derivative-of-Gaussian weights, zero at the centre.
    pub derivative: Vec<f32>,
}

impl KernelPair {
    /// Builds the kernels for a requested `width` and `sigma`.
    ///
    /// Every tap averages the Gaussian at its centre and at both half-pixel offsets. Once
    /// the centre weight is negligible, the kernel is cut short and the last computed tap is
    /// dropped as well, so the realized length may be smaller than `width`.
    pub fn new(width: usize, sigma: f32) -> KernelPair {
        let mut smoothing = vec![0.0; width];
        let mut derivative = vec![0.0; width];
        let norm = 2.0 * PI * sigma * sigma;
        for i in 0..width {
            let x = i as f32;
            let g1 = gaussian(x, sigma);
            if g1 <= NEGLIGIBLE_WEIGHT && i >= 2 {
                smoothing.truncate(i - 1);
                derivative.truncate(i - 1);
                break;
            }
            let g2 = gaussian(x - 0.5, sigma);
            let g3 = gaussian(x + 0.5, sigma);
            smoothing[i] = (g1 + g2 + g3) / 3.0 / norm;
            derivative[i] = g3 - g2;
        }
        KernelPair { smoothing, derivative }
    }

    /// The realized kernel length. Taps `1..radius()` reach out from the centre.
    pub fn radius(&self) -> usize {
        self.smoothing.len()
    }
}

fn gaussian(x: f32, sigma: f32) -> f32 {
    (-(x * x) / (2.0 * sigma * sigma)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_kernel_is_decreasing() {
        let k = KernelPair::new(3, 1.0);
        assert_eq!(k.radius(), 3);
        assert!(k.smoothing[0] > k.smoothing[1]);
        assert!(k.smoothing[1] > k.smoothing[2]);
        assert_eq!(k.derivative[0], 0.0);
        assert!(k.derivative[1] < 0.0 && k.derivative[2] < 0.0);
    }

    #[test]
    fn default_kernel_values() {
        let k = KernelPair::new(3, 1.0);
        let expected_smoothing = [0.146_69, 0.096_22, 0.026_73];
        let expected_derivative = [0.0, -0.557_85, -0.280_71];
        for i in 0..3 {
            assert!((k.smoothing[i] - expected_smoothing[i]).abs() < 1e-4, "smoothing[{}] = {}", i, k.smoothing[i]);
            assert!((k.derivative[i] - expected_derivative[i]).abs() < 1e-4, "derivative[{}] = {}", i, k.derivative[i]);
        }
    }

    #[test]
    fn wide_request_is_truncated() {
        // exp(-16/2) is the first centre weight under the cutoff, at i = 4.
        let k = KernelPair::new(20, 1.0);
        assert_eq!(k.radius(), 3);
        assert_eq!(k.derivative.len(), 3);
        assert_eq!(k, KernelPair::new(3, 1.0));
    }

    #[test]
    fn wide_sigma_keeps_requested_width() {
        // At sigma 5 the centre weight first drops under the cutoff at i = 17.
        let k = KernelPair::new(20, 5.0);
        assert_eq!(k.radius(), 16);
        let k = KernelPair::new(17, 5.0);
        assert_eq!(k.radius(), 17);
        let k = KernelPair::new(10, 5.0);
        assert_eq!(k.radius(), 10);
    }

    #[test]
    fn single_tap() {
        let k = KernelPair::new(1, 1.0);
        assert_eq!(k.radius(), 1);
        assert_eq!(k.derivative, vec![0.0]);
    }

    #[test]
    fn deterministic() {
        for sigma_i in 1..50 {
            let sigma = sigma_i as f32 / 10.0;
            assert_eq!(KernelPair::new(12, sigma), KernelPair::new(12, sigma));
        }
    }
}
