use std::collections::VecDeque;
use std::io::BufRead;

use crate::buffer::{ImageReader, PixelBuffer};
use crate::color::{ColorSpace, RGBColorFormat, RangeColorFormat};
use crate::error::Error;

const MAGIC_NUMBER: &str = "P3";
const MAGIC_NUMBER_TOKEN_NAME: &str = "P3 Header";
const WIDTH_TOKEN_NAME: &str = "Width Header";
const HEIGHT_TOKEN_NAME: &str = "Height Header";
const MAX_VALUE_TOKEN_NAME: &str = "Max Value Header";
const SAMPLE_TOKEN_NAME: &str = "Color Component Value";

/// Reads plain (P3) portable pixmaps, rescaling any max value to 8 bit.
pub struct PPMImageReader<T: BufRead> {
    reader: T,
}

impl<T: BufRead> PPMImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }
}

impl<T: BufRead> ImageReader for PPMImageReader<T> {
    fn read_image(&mut self) -> crate::Result<PixelBuffer> {
        let mut tokens = PPMTokens::new(&mut self.reader);
        let header = PPMHeader::read(&mut tokens)?;
        log::debug!(
            "PPM header: {}x{}, max value {}",
            header.width,
            header.height,
            header.max_value
        );
        let samples = read_samples(&mut tokens, &header)?;
        PixelBuffer::new(header.width, header.height, ColorSpace::Rgb, samples)
    }
}

struct PPMTokens<'a, R: BufRead> {
    reader: &'a mut R,
    pending: VecDeque<String>,
}

impl<'a, R: BufRead> PPMTokens<'a, R> {
    fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    fn next_token(&mut self) -> crate::Result<Option<String>> {
        let mut line = String::new();
        while self.pending.is_empty() {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .map_err(Error::PPMStreamReadFailed)?;
            if read == 0 {
                return Ok(None);
            }
            let content = line.split('#').next().unwrap_or_default();
            self.pending
                .extend(content.split_ascii_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }

    fn expect_token(&mut self, token_name: &'static str) -> crate::Result<String> {
        self.next_token()?
            .ok_or(Error::PPMFileDoesNotContainRequiredToken(token_name))
    }

    fn expect_number<N: std::str::FromStr>(&mut self, token_name: &'static str) -> crate::Result<N> {
        self.expect_token(token_name)?
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(token_name))
    }
}

struct PPMHeader {
    width: u32,
    height: u32,
    max_value: u16,
}

impl PPMHeader {
    fn read<R: BufRead>(tokens: &mut PPMTokens<R>) -> crate::Result<Self> {
        if tokens.expect_token(MAGIC_NUMBER_TOKEN_NAME)? != MAGIC_NUMBER {
            return Err(Error::PPMFileDoesNotContainRequiredToken(
                MAGIC_NUMBER_TOKEN_NAME,
            ));
        }
        Ok(Self {
            width: tokens.expect_number(WIDTH_TOKEN_NAME)?,
            height: tokens.expect_number(HEIGHT_TOKEN_NAME)?,
            max_value: tokens.expect_number(MAX_VALUE_TOKEN_NAME)?,
        })
    }

    fn sample_count(&self) -> crate::Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or(Error::MismatchOfSizeBetweenHeaderAndValues)
    }
}

const MAX_INITIAL_CAPACITY: usize = 1 << 20;

fn read_samples<R: BufRead>(tokens: &mut PPMTokens<R>, header: &PPMHeader) -> crate::Result<Vec<u8>> {
    let expected = header.sample_count()?;
    let mut samples = Vec::with_capacity(expected.min(MAX_INITIAL_CAPACITY));
    let mut pixel = Vec::with_capacity(3);
    while let Some(token) = tokens.next_token()? {
        let component: u16 = token
            .parse()
            .map_err(|_| Error::ParsingOfTokenFailed(SAMPLE_TOKEN_NAME))?;
        pixel.push(component);
        if pixel.len() == 3 {
            let color = RangeColorFormat::new(header.max_value, pixel[0], pixel[1], pixel[2])?;
            let color = RGBColorFormat::from(color);
            samples.extend_from_slice(&[color.red, color.green, color.blue]);
            pixel.clear();
            if samples.len() > expected {
                return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
            }
        }
    }
    if !pixel.is_empty() {
        return Err(Error::IncompletePixelParsed(pixel.len()));
    }
    if samples.len() != expected {
        return Err(Error::MismatchOfSizeBetweenHeaderAndValues);
    }
    Ok(samples)
}

#[cfg(test)]
mod test {
    use super::PPMImageReader;
    use crate::{
        buffer::{ImageReader, PixelBuffer},
        color::ColorSpace,
        error::Error,
        Result,
    };

    fn read_ppm(content: &str) -> Result<PixelBuffer> {
        PPMImageReader::new(content.as_bytes()).read_image()
    }

    #[test]
    fn read_commented_image() {
        let content = "P3\n# fiber sample\n3 2\n255\n255 0 0   0 255 0   0 0 255 # first row\n255 255 0  255 0 255  0 255 255";
        let image = read_ppm(content).unwrap();
        assert_eq!(image.width(), 3);
        assert_eq!(image.height(), 2);
        assert_eq!(image.color_space(), ColorSpace::Rgb);
        assert_eq!(image.pixel(1, 0), &[0, 255, 0]);
        assert_eq!(image.pixel(2, 1), &[0, 255, 255]);
    }

    #[test]
    fn read_single_line_image() {
        let image = read_ppm("P3 2 1 255 1 2 3 4 5 6").unwrap();
        assert_eq!(image.samples(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn read_one_token_per_line() {
        let image = read_ppm("P3\n1\n2\n255\n9\n8\n7\n6\n5\n4\n").unwrap();
        assert_eq!(image.pixel(0, 1), &[6, 5, 4]);
    }

    #[test]
    fn rescale_to_eight_bit() {
        let image = read_ppm("P3 2 1 15 15 0 5  0 15 0").unwrap();
        assert_eq!(image.pixel(0, 0), &[255, 0, 85]);
    }

    #[test]
    fn incomplete_pixel() {
        let result = read_ppm("P3\n3 2 255 0 0 255 0 0");
        assert!(
            matches!(result, Err(Error::IncompletePixelParsed(2))),
            "Incomplete pixel not detected"
        );
    }

    #[test]
    fn wrong_size() {
        let result = read_ppm("P3\n3 2 255 0 0 255");
        assert!(matches!(
            result,
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn header_size_overflows() {
        assert!(matches!(
            read_ppm("P3 4294967295 4294967295 255 0 0 0"),
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn huge_header_with_few_samples() {
        assert!(matches!(
            read_ppm("P3 200000 200000 255 0 0 0"),
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn more_samples_than_header() {
        assert!(matches!(
            read_ppm("P3 1 1 255 0 0 0 1 1 1"),
            Err(Error::MismatchOfSizeBetweenHeaderAndValues)
        ));
    }

    #[test]
    fn value_above_max() {
        assert!(matches!(
            read_ppm("P3 1 1 100 0 101 0"),
            Err(Error::ColorValueExceedsMaxValue(101, 100))
        ));
    }

    #[test]
    fn wrong_magic_number() {
        assert!(matches!(
            read_ppm("P6 1 1 255 0 0 0"),
            Err(Error::PPMFileDoesNotContainRequiredToken(_))
        ));
    }

    #[test]
    fn missing_height() {
        assert!(matches!(
            read_ppm("P3 4"),
            Err(Error::PPMFileDoesNotContainRequiredToken("Height Header"))
        ));
    }

    #[test]
    fn unparsable_width() {
        assert!(matches!(
            read_ppm("P3 four 1 255"),
            Err(Error::ParsingOfTokenFailed("Width Header"))
        ));
    }
}
