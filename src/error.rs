use std::fmt::Display;

use crate::color::ColorSpace;

#[derive(Debug)]
pub enum Error {
    UnsupportedConversion(ColorSpace, ColorSpace),
    DimensionMismatch(String),
    InvalidRegion(String),
    InvalidBand(String),
    PPMFileDoesNotContainRequiredToken(&'static str),
    ParsingOfTokenFailed(&'static str),
    IncompletePixelParsed(usize),
    MismatchOfSizeBetweenHeaderAndValues,
    ColorValueExceedsMaxValue(u16, u16),
    PPMStreamReadFailed(std::io::Error),
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    ImageDecodingFailed(String, String),
    FailedToWriteMaskImage(String, String),
    BandDefinitionParsingFailed(String, String),
    ReportSerializationFailed(String),
    FailedToWriteReport(std::io::Error),
    AnalysisWorkerFailed(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedConversion(from, to) => {
                write!(f, "Conversion from {} to {} is not supported", from, to)
            }
            Self::DimensionMismatch(details) => {
                write!(f, "Dimension mismatch: {}", details)
            }
            Self::InvalidRegion(details) => {
                write!(f, "Invalid region: {}", details)
            }
            Self::InvalidBand(details) => {
                write!(f, "Invalid band definition: {}", details)
            }
            Self::PPMFileDoesNotContainRequiredToken(token_name) => {
                write!(f, "Expected token '{}' not found in PPM file", token_name)
            }
            Self::ParsingOfTokenFailed(token_name) => {
                write!(f, "Parsing of token '{}' failed", token_name)
            }
            Self::IncompletePixelParsed(number_of_tokens_parsed) => {
                write!(
                    f,
                    "Incomplete pixel parsed. Expected 3 components, but got {}.",
                    number_of_tokens_parsed
                )
            }
            Self::MismatchOfSizeBetweenHeaderAndValues => {
                write!(
                    f,
                    "Number of pixels does not match the size provided in header"
                )
            }
            Self::ColorValueExceedsMaxValue(value, max) => {
                write!(
                    f,
                    "Color value {} exceeds the max value of {} given in header",
                    value, max
                )
            }
            Self::PPMStreamReadFailed(error) => write!(f, "Reading of PPM stream failed: {}", error),
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::ImageDecodingFailed(path, reason) => {
                write!(f, "Decoding of image '{}' failed: {}", path, reason)
            }
            Self::FailedToWriteMaskImage(path, reason) => {
                write!(f, "Failed to write mask image '{}': {}", path, reason)
            }
            Self::BandDefinitionParsingFailed(path, reason) => {
                write!(f, "Band definitions in '{}' are invalid: {}", path, reason)
            }
            Self::ReportSerializationFailed(reason) => {
                write!(f, "Serialization of report failed: {}", reason)
            }
            Self::FailedToWriteReport(error) => write!(f, "Failed to write report: {}", error),
            Self::AnalysisWorkerFailed(input) => {
                write!(f, "Analysis worker for '{}' stopped unexpectedly", input)
            }
        }
    }
}

impl std::error::Error for Error {}
