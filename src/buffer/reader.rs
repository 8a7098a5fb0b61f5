use std::{fs::File, io::BufReader, path::Path};

use super::{ImageReader, PixelBuffer};
use crate::error::Error;

pub mod decoded;
pub mod ppm;

use decoded::DecodedImageReader;
use ppm::PPMImageReader;

fn open_input_file(file_path: &Path) -> crate::Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })
}

fn is_ppm_file(file_path: &Path) -> bool {
    file_path
        .extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("ppm"))
}

pub fn read_image_file(file_path: &Path) -> crate::Result<PixelBuffer> {
    log::info!("Reading image {}", file_path.display());
    if is_ppm_file(file_path) {
        let file = open_input_file(file_path)?;
        PPMImageReader::new(BufReader::new(file)).read_image()
    } else {
        DecodedImageReader::new(file_path).read_image()
    }
}
