use std::{
    fs,
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
};

use threadpool::ThreadPool;

pub use analysis::{AnalysisOptions, AnalysisOutcome, Analyzer};
pub use band::preset::BandPreset;
pub use cli::CLIParser;
pub use error::Error;
pub use export::ReportFormat;
pub use region::{Rect, Region};
pub use report::{PercentageReport, ReportAnnotations};

use band::Band;
use export::ImageReport;

pub mod accumulator;
pub mod analysis;
pub mod band;
pub mod buffer;
mod cli;
pub mod color;
mod error;
pub mod export;
mod logger;
pub mod mask;
pub mod region;
pub mod report;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    input_files: Vec<PathBuf>,
    preset: BandPreset,
    band_file: Option<PathBuf>,
    dark_threshold: u8,
    regions: Vec<Region>,
    identifier: Option<String>,
    date: Option<String>,
    comments: Option<String>,
    report_format: ReportFormat,
    output: Option<PathBuf>,
    mask_dir: Option<PathBuf>,
    number_of_threads: usize,
}

fn read_band_file(file_path: &Path) -> Result<Vec<Band>> {
    let content = fs::read_to_string(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.display().to_string(), e)
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::BandDefinitionParsingFailed(file_path.display().to_string(), e.to_string())
    })
}

impl TryFrom<&Arguments> for AnalysisOptions {
    type Error = Error;

    fn try_from(value: &Arguments) -> Result<Self> {
        let bands = match &value.band_file {
            Some(band_file) => read_band_file(band_file)?,
            None => value.preset.bands(value.dark_threshold)?,
        };
        Ok(Self {
            bands,
            regions: value.regions.clone(),
            annotations: ReportAnnotations {
                identifier: value.identifier.clone(),
                date: value.date.clone(),
                comments: value.comments.clone(),
            },
        })
    }
}

pub fn analyze_image_file(
    input_index: usize,
    file_path: &Path,
    options: &AnalysisOptions,
    mask_dir: Option<&Path>,
) -> Result<AnalysisOutcome> {
    let image = buffer::reader::read_image_file(file_path)?;
    let outcome = Analyzer::new(&image, options).analyze()?;
    if let Some(mask_dir) = mask_dir {
        export::write_masks(input_index, file_path, &image, &outcome, mask_dir)?;
    }
    Ok(outcome)
}

/// Analyzes every input image on the thread pool, one independent pass per
/// image, and returns the outcomes in input order. Masks are written by the
/// workers when a mask directory is configured.
pub fn analyze_images(arguments: &Arguments) -> Result<Vec<(PathBuf, AnalysisOutcome)>> {
    let options = Arc::new(AnalysisOptions::try_from(arguments)?);
    let threadpool = ThreadPool::new(arguments.number_of_threads.max(1));
    let (sender, receiver) = mpsc::channel();
    for (index, input_file) in arguments.input_files.iter().enumerate() {
        let options = Arc::clone(&options);
        let sender = sender.clone();
        let input_file = input_file.clone();
        let mask_dir = arguments.mask_dir.clone();
        threadpool.execute(move || {
            let outcome = analyze_image_file(index, &input_file, &options, mask_dir.as_deref());
            let _ = sender.send((index, outcome));
        });
    }
    drop(sender);

    let mut outcomes: Vec<Option<Result<AnalysisOutcome>>> =
        arguments.input_files.iter().map(|_| None).collect();
    for (index, outcome) in receiver {
        outcomes[index] = Some(outcome);
    }
    arguments
        .input_files
        .iter()
        .zip(outcomes)
        .map(|(input_file, outcome)| match outcome {
            Some(outcome) => outcome.map(|outcome| (input_file.clone(), outcome)),
            None => Err(Error::AnalysisWorkerFailed(input_file.display().to_string())),
        })
        .collect()
}

pub fn run(arguments: &Arguments) -> Result<Vec<(PathBuf, AnalysisOutcome)>> {
    let outcomes = analyze_images(arguments)?;
    let reports: Vec<ImageReport> = outcomes
        .iter()
        .map(|(input_file, outcome)| ImageReport::new(input_file, outcome))
        .collect();
    export::write_reports(&reports, arguments.report_format, arguments.output.as_deref())?;
    Ok(outcomes)
}
