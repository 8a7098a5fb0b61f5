use super::PixelBuffer;
use crate::{
    color::{ColorSpace, HSVColorFormat, LumaColorFormat, RGBColorFormat},
    error::Error,
};

pub fn convert(buffer: &PixelBuffer, from: ColorSpace, to: ColorSpace) -> crate::Result<PixelBuffer> {
    if buffer.color_space() != from {
        return Err(Error::UnsupportedConversion(buffer.color_space(), to));
    }
    if from == to {
        return Ok(buffer.clone());
    }
    let read_dot = match from {
        ColorSpace::Rgb => read_rgb_dot,
        ColorSpace::Bgr => read_bgr_dot,
        ColorSpace::Hsv | ColorSpace::Grayscale => {
            return Err(Error::UnsupportedConversion(from, to))
        }
    };
    log::debug!(
        "Converting {}x{} buffer from {} to {}",
        buffer.width(),
        buffer.height(),
        from,
        to
    );
    let dots = buffer.pixels().map(read_dot);
    let samples: Vec<u8> = match to {
        ColorSpace::Rgb => dots.flat_map(|dot| [dot.red, dot.green, dot.blue]).collect(),
        ColorSpace::Bgr => dots.flat_map(|dot| [dot.blue, dot.green, dot.red]).collect(),
        ColorSpace::Hsv => dots
            .map(|dot| HSVColorFormat::from(&dot))
            .flat_map(|hsv| [hsv.hue, hsv.saturation, hsv.value])
            .collect(),
        ColorSpace::Grayscale => dots.map(|dot| LumaColorFormat::from(&dot).luma).collect(),
    };
    PixelBuffer::new(buffer.width(), buffer.height(), to, samples)
}

fn read_rgb_dot(pixel: &[u8]) -> RGBColorFormat<u8> {
    RGBColorFormat::new(pixel[0], pixel[1], pixel[2])
}

fn read_bgr_dot(pixel: &[u8]) -> RGBColorFormat<u8> {
    RGBColorFormat::from_bgr(pixel[0], pixel[1], pixel[2])
}

#[cfg(test)]
mod test {
    use super::convert;
    use crate::{buffer::PixelBuffer, color::ColorSpace, error::Error};

    #[rustfmt::skip]
    const TEST_RGB: &[u8] = &[
        255,   0,   0,    0, 255,   0,
          0,   0, 255,  255, 255, 255,
    ];

    fn rgb_buffer() -> PixelBuffer {
        PixelBuffer::new(2, 2, ColorSpace::Rgb, TEST_RGB.to_vec()).unwrap()
    }

    #[test]
    fn swap_rgb_to_bgr() {
        let bgr = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Bgr).unwrap();
        assert_eq!(bgr.color_space(), ColorSpace::Bgr);
        assert_eq!(bgr.pixel(0, 0), &[0, 0, 255]);
        assert_eq!(bgr.pixel(1, 0), &[0, 255, 0]);
        assert_eq!(bgr.pixel(0, 1), &[255, 0, 0]);
    }

    #[test]
    fn bgr_round_trip_restores_buffer() {
        let bgr = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Bgr).unwrap();
        let rgb = convert(&bgr, ColorSpace::Bgr, ColorSpace::Rgb).unwrap();
        assert_eq!(rgb, rgb_buffer());
    }

    #[test]
    fn convert_rgb_to_hsv() {
        let hsv = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Hsv).unwrap();
        assert_eq!(hsv.pixel(0, 0), &[0, 255, 255]);
        assert_eq!(hsv.pixel(1, 0), &[60, 255, 255]);
        assert_eq!(hsv.pixel(0, 1), &[120, 255, 255]);
        assert_eq!(hsv.pixel(1, 1), &[0, 0, 255]);
    }

    #[test]
    fn convert_bgr_to_hsv_matches_rgb_path() {
        let bgr = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Bgr).unwrap();
        let from_bgr = convert(&bgr, ColorSpace::Bgr, ColorSpace::Hsv).unwrap();
        let from_rgb = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Hsv).unwrap();
        assert_eq!(from_bgr, from_rgb);
    }

    #[test]
    fn convert_rgb_to_grayscale() {
        let gray = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Grayscale).unwrap();
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.samples(), &[76, 150, 29, 255]);
    }

    #[test]
    fn reject_conversion_out_of_hsv() {
        let hsv = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Hsv).unwrap();
        let result = convert(&hsv, ColorSpace::Hsv, ColorSpace::Rgb);
        assert!(matches!(
            result,
            Err(Error::UnsupportedConversion(ColorSpace::Hsv, ColorSpace::Rgb))
        ));
    }

    #[test]
    fn reject_conversion_out_of_grayscale() {
        let gray = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Grayscale).unwrap();
        let result = convert(&gray, ColorSpace::Grayscale, ColorSpace::Hsv);
        assert!(matches!(result, Err(Error::UnsupportedConversion(_, _))));
    }

    #[test]
    fn reject_mislabeled_source() {
        let result = convert(&rgb_buffer(), ColorSpace::Bgr, ColorSpace::Hsv);
        assert!(matches!(result, Err(Error::UnsupportedConversion(_, _))));
    }

    #[test]
    fn identity_conversion_copies() {
        let gray = convert(&rgb_buffer(), ColorSpace::Rgb, ColorSpace::Grayscale).unwrap();
        let same = convert(&gray, ColorSpace::Grayscale, ColorSpace::Grayscale).unwrap();
        assert_eq!(same, gray);
    }
}
