use super::Band;
use crate::{buffer::PixelBuffer, error::Error, mask::Mask};

/// The buffer must already be expressed in the band's color space.
pub fn compute(buffer: &PixelBuffer, band: &Band) -> crate::Result<Mask> {
    if buffer.color_space() != band.color_space() {
        return Err(Error::DimensionMismatch(format!(
            "band '{}' is defined in {} but the buffer is {}",
            band.name(),
            band.color_space(),
            buffer.color_space()
        )));
    }
    let bits = buffer.pixels().map(|pixel| band.contains(pixel)).collect();
    let mask = Mask::from_bits(buffer.width(), buffer.height(), bits)?;
    log::debug!(
        "Band '{}' matched {} of {} pixels",
        band.name(),
        mask.count_matched(),
        mask.pixel_count()
    );
    Ok(mask)
}

#[cfg(test)]
mod test {
    use super::compute;
    use crate::{
        band::{Band, BandRange},
        buffer::{converter, PixelBuffer},
        color::ColorSpace,
        error::Error,
        mask::compositor::union_ranges,
    };

    fn rgb_band(lower: [u8; 3], upper: [u8; 3]) -> Band {
        Band::new("test", ColorSpace::Rgb, vec![BandRange::from_bounds(&lower, &upper)]).unwrap()
    }

    fn red_block_image() -> PixelBuffer {
        let mut samples = Vec::new();
        for row_index in 0..4 {
            for column_index in 0..4 {
                if row_index < 2 && column_index < 2 {
                    samples.extend_from_slice(&[255, 0, 0]);
                } else {
                    samples.extend_from_slice(&[255, 255, 255]);
                }
            }
        }
        PixelBuffer::new(4, 4, ColorSpace::Rgb, samples).unwrap()
    }

    #[test]
    fn black_image_matches_completely() {
        let buffer = PixelBuffer::filled(10, 10, ColorSpace::Rgb, &[0, 0, 0]).unwrap();
        let mask = compute(&buffer, &rgb_band([0, 0, 0], [50, 50, 50])).unwrap();
        assert_eq!(mask.count_matched(), 100);
        assert_eq!(mask.pixel_count(), 100);
    }

    #[test]
    fn red_block_matches_top_left() {
        let mask = compute(&red_block_image(), &rgb_band([200, 0, 0], [255, 50, 50])).unwrap();
        assert_eq!(mask.count_matched(), 4);
        assert!(mask.get(0, 0) && mask.get(1, 1));
        assert!(!mask.get(2, 0) && !mask.get(0, 2));
    }

    #[test]
    fn boundary_values_are_included() {
        let samples = vec![10, 10, 10, 20, 20, 20, 9, 10, 10, 21, 20, 20];
        let buffer = PixelBuffer::new(4, 1, ColorSpace::Rgb, samples).unwrap();
        let mask = compute(&buffer, &rgb_band([10, 10, 10], [20, 20, 20])).unwrap();
        assert_eq!(mask.bits(), &[true, true, false, false]);
    }

    #[test]
    fn two_ranges_equal_union_of_each() {
        let hues: Vec<u8> = vec![0, 5, 10, 11, 90, 159, 160, 179];
        let samples = hues.iter().flat_map(|hue| [*hue, 200, 200]).collect();
        let buffer = PixelBuffer::new(hues.len() as u32, 1, ColorSpace::Hsv, samples).unwrap();
        let low = BandRange::from_bounds(&[0, 100, 100], &[10, 255, 255]);
        let high = BandRange::from_bounds(&[160, 100, 100], &[179, 255, 255]);
        let both = Band::new("red", ColorSpace::Hsv, vec![low.clone(), high.clone()]).unwrap();
        let only_low = Band::new("red", ColorSpace::Hsv, vec![low]).unwrap();
        let only_high = Band::new("red", ColorSpace::Hsv, vec![high]).unwrap();

        let combined = compute(&buffer, &both).unwrap();
        let unioned = union_ranges(&[
            compute(&buffer, &only_low).unwrap(),
            compute(&buffer, &only_high).unwrap(),
        ])
        .unwrap();
        assert_eq!(combined, unioned);
        assert_eq!(combined.count_matched(), 5);
    }

    #[test]
    fn empty_buffer_yields_empty_mask() {
        let buffer = PixelBuffer::new(0, 0, ColorSpace::Rgb, Vec::new()).unwrap();
        let mask = compute(&buffer, &rgb_band([0, 0, 0], [255, 255, 255])).unwrap();
        assert_eq!(mask.pixel_count(), 0);
    }

    #[test]
    fn reject_buffer_in_other_color_space() {
        let buffer = PixelBuffer::filled(2, 2, ColorSpace::Rgb, &[0, 0, 0]).unwrap();
        let bgr = converter::convert(&buffer, ColorSpace::Rgb, ColorSpace::Bgr).unwrap();
        let result = compute(&bgr, &rgb_band([0, 0, 0], [10, 10, 10]));
        assert!(matches!(result, Err(Error::DimensionMismatch(_))));
    }

    #[test]
    fn computing_twice_is_deterministic() {
        let band = rgb_band([200, 0, 0], [255, 50, 50]);
        let image = red_block_image();
        assert_eq!(compute(&image, &band).unwrap(), compute(&image, &band).unwrap());
    }
}
