//! Conversions between pixel buffers and the detector.

use crate::edge::{Detection, Detector};
use crate::error::Result;
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// The brightness of one pixel, weighing the channels almost equally.
pub fn brightness(r: u8, g: u8, b: u8) -> i32 {
    (0.334 * f32::from(r) + 0.333 * f32::from(g) + 0.333 * f32::from(b)).floor() as i32
}

impl Detector {
    /// Builds a detector from `0xRRGGBB` pixels. Bits above the red channel are ignored.
    pub fn from_packed_rgb(pixels: &[u32], width: usize, height: usize) -> Result<Detector> {
        let data = pixels
            .iter()
            .map(|&p| brightness((p >> 16) as u8, (p >> 8) as u8, p as u8))
            .collect();
        Detector::from_brightness(data, width, height)
    }

    /// Builds a detector from an 8-bit RGB image.
    pub fn from_rgb_image(image: &RgbImage) -> Result<Detector> {
        let data = image.pixels().map(|p| brightness(p[0], p[1], p[2])).collect();
        Detector::from_brightness(data, image.width() as usize, image.height() as usize)
    }

    /// Builds a detector from any image, converting it to 8-bit RGB first.
    pub fn from_image(image: &DynamicImage) -> Result<Detector> {
        Detector::from_rgb_image(&image.to_rgb8())
    }
}

impl Detection {
    /// Renders edges white on a black background.
    pub fn to_image(&self) -> GrayImage {
        let width = self.width();
        GrayImage::from_fn(width as u32, self.height() as u32, |x, y| {
            let edge = self.edges()[x as usize + y as usize * width];
            Luma([if edge { 255 } else { 0 }])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CannyConfig;
    use image::Rgb;

    #[test]
    fn brightness_weights() {
        assert_eq!(brightness(0, 0, 0), 0);
        assert_eq!(brightness(255, 255, 255), 255);
        assert_eq!(brightness(0, 0, 255), 84);
        assert_eq!(brightness(255, 0, 0), 85);
        assert_eq!(brightness(10, 20, 30), 19);
    }

    #[test]
    fn packed_rgb_channels() {
        let d = Detector::from_packed_rgb(&[0xff0000, 0x00ff00, 0x0000ff, 0xff_ffffff], 2, 2).unwrap();
        assert_eq!(d.brightness(), &[85, 84, 84, 255]);
    }

    #[test]
    fn rgb_image_matches_packed() {
        let image = RgbImage::from_fn(6, 4, |x, y| Rgb([(x * 40) as u8, (y * 60) as u8, 7]));
        let packed: Vec<u32> = image
            .pixels()
            .map(|p| (u32::from(p[0]) << 16) | (u32::from(p[1]) << 8) | u32::from(p[2]))
            .collect();
        let a = Detector::from_rgb_image(&image).unwrap();
        let b = Detector::from_packed_rgb(&packed, 6, 4).unwrap();
        assert_eq!(a.brightness(), b.brightness());
        assert_eq!((a.width(), a.height()), (6, 4));

        let c = Detector::from_image(&DynamicImage::ImageRgb8(image)).unwrap();
        assert_eq!(c.brightness(), a.brightness());
    }

    #[test]
    fn renders_mask() {
        let image = RgbImage::from_fn(20, 20, |x, _| if x < 10 { Rgb([200, 200, 200]) } else { Rgb([0, 0, 0]) });
        let detection = Detector::from_rgb_image(&image)
            .unwrap()
            .detect(&CannyConfig::default())
            .unwrap();
        let rendered = detection.to_image();
        assert_eq!(rendered.dimensions(), (20, 20));
        for (x, y, p) in rendered.enumerate_pixels() {
            let expected = if detection.is_edge(x as usize, y as usize) { 255 } else { 0 };
            assert_eq!(p[0], expected);
        }
        assert!(detection.edge_count() > 0);
        assert_eq!(rendered.pixels().filter(|p| p[0] == 255).count(), detection.edge_count());
    }
}
