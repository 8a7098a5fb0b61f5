use std::{
    fs::{File, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::builder::PossibleValue;
use clap::ValueEnum;
use serde::Serialize;

use crate::{
    analysis::AnalysisOutcome,
    buffer::PixelBuffer,
    color::{ColorSpace, RGBColorFormat},
    error::Error,
    mask::compositor,
    report::PercentageReport,
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ValueEnum for ReportFormat {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Text, Self::Json]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Text => Some(PossibleValue::new("text")),
            Self::Json => Some(PossibleValue::new("json")),
        }
    }
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

#[derive(Serialize)]
pub struct ImageReport<'a> {
    pub input: String,
    pub report: &'a PercentageReport,
}

impl<'a> ImageReport<'a> {
    pub fn new(input: &Path, outcome: &'a AnalysisOutcome) -> Self {
        Self {
            input: input.display().to_string(),
            report: &outcome.report,
        }
    }
}

pub fn render_reports(reports: &[ImageReport], format: ReportFormat) -> crate::Result<String> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(reports)
            .map_err(|e| Error::ReportSerializationFailed(e.to_string())),
        ReportFormat::Text => Ok(reports
            .iter()
            .map(|image_report| format!("== {} ==\n{}", image_report.input, image_report.report))
            .collect::<Vec<String>>()
            .join("\n")),
    }
}

fn open_output_file(file_path: &Path) -> crate::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| Error::UnableToOpenOutputFileForWriting(file_path.display().to_string(), e))
}

/// An existing directory receives `<suggested stem>.<extension>`.
pub fn resolve_report_path(output: &Path, report: &PercentageReport, format: ReportFormat) -> PathBuf {
    if output.is_dir() {
        output.join(format!("{}.{}", report.suggested_file_stem(), format.extension()))
    } else {
        output.to_path_buf()
    }
}

pub fn write_reports(
    reports: &[ImageReport],
    format: ReportFormat,
    output: Option<&Path>,
) -> crate::Result<Option<PathBuf>> {
    let rendered = render_reports(reports, format)?;
    match (output, reports.first()) {
        (Some(output), Some(first)) => {
            let path = resolve_report_path(output, first.report, format);
            let file = open_output_file(&path)?;
            let mut writer = BufWriter::new(file);
            writeln!(writer, "{}", rendered).map_err(Error::FailedToWriteReport)?;
            writer.flush().map_err(Error::FailedToWriteReport)?;
            log::info!("Report written to {}", path.display());
            Ok(Some(path))
        }
        _ => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", rendered).map_err(Error::FailedToWriteReport)?;
            Ok(None)
        }
    }
}

const HIGHLIGHT_COLORS: [RGBColorFormat<u8>; 4] = [
    RGBColorFormat { red: 255, green: 0, blue: 0 },
    RGBColorFormat { red: 0, green: 0, blue: 255 },
    RGBColorFormat { red: 255, green: 255, blue: 0 },
    RGBColorFormat { red: 0, green: 255, blue: 0 },
];

fn mask_file_name(input_index: usize, input: &Path, band: &str, suffix: &str) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    format!("{}_{}_{}{}.png", input_index + 1, stem, band, suffix)
}

fn save_png(path: &Path, buffer: &PixelBuffer) -> crate::Result<()> {
    let failed = |reason: String| Error::FailedToWriteMaskImage(path.display().to_string(), reason);
    let color_type = match buffer.color_space() {
        ColorSpace::Grayscale => image::ExtendedColorType::L8,
        ColorSpace::Rgb => image::ExtendedColorType::Rgb8,
        other => return Err(failed(format!("{} buffers cannot be saved", other))),
    };
    image::save_buffer(path, buffer.samples(), buffer.width(), buffer.height(), color_type)
        .map_err(|e| failed(e.to_string()))
}

/// File names start with the one-based position of `input` in the input list.
pub fn write_masks(
    input_index: usize,
    input: &Path,
    image: &PixelBuffer,
    outcome: &AnalysisOutcome,
    directory: &Path,
) -> crate::Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(outcome.overlays.len() * 2);
    for (overlay, color) in outcome.overlays.iter().zip(HIGHLIGHT_COLORS.iter().cycle()) {
        if overlay.mask.pixel_count() == 0 {
            log::warn!(
                "Mask of band '{}' for {} is empty and was not written",
                overlay.band,
                input.display()
            );
            continue;
        }
        let mask_path = directory.join(mask_file_name(input_index, input, &overlay.band, ""));
        let mask_image = PixelBuffer::new(
            overlay.mask.width(),
            overlay.mask.height(),
            ColorSpace::Grayscale,
            overlay.mask.to_luma_bytes(),
        )?;
        save_png(&mask_path, &mask_image)?;

        let highlight_path = directory.join(mask_file_name(input_index, input, &overlay.band, "_highlight"));
        let highlighted = compositor::highlight(image, &overlay.mask, *color)?;
        save_png(&highlight_path, &highlighted)?;

        log::info!(
            "Mask of band '{}' written to {} and {}",
            overlay.band,
            mask_path.display(),
            highlight_path.display()
        );
        written.push(mask_path);
        written.push(highlight_path);
    }
    Ok(written)
}
