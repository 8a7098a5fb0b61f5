use crate::band::preset::{BandPreset, DEFAULT_DARK_THRESHOLD};
use crate::export::ReportFormat;
use crate::region::Region;
use crate::Arguments;
use clap::{
    arg, crate_authors, crate_description, crate_name, crate_version, value_parser, Arg,
    ArgAction, ArgMatches, Command,
};
use std::ffi::OsString;
use std::path::PathBuf;
use std::{io, thread};

pub struct CLIParser {
    command: Command,
}

impl CLIParser {
    pub fn new() -> Self {
        let command = Self::create_base_command();
        let command = Self::register_arguments(command);
        CLIParser { command }
    }

    pub fn parse<I, T>(&mut self, itr: I) -> Arguments
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = self
            .command
            .try_get_matches_from_mut(itr)
            .unwrap_or_else(|e| e.exit());
        Self::extract_arguments(&matches)
    }

    fn register_arguments(command: Command) -> Command {
        let command = Self::register_input_files_argument(command);
        let command = Self::register_preset_argument(command);
        let command = Self::register_band_file_argument(command);
        let command = Self::register_dark_threshold_argument(command);
        let command = Self::register_region_argument(command);
        let command = Self::register_annotation_arguments(command);
        let command = Self::register_report_format_argument(command);
        let command = Self::register_output_argument(command);
        let command = Self::register_mask_dir_argument(command);
        Self::register_threads_argument(command)
    }

    fn register_input_files_argument(command: Command) -> Command {
        command.arg(Self::create_input_files_argument())
    }

    fn register_preset_argument(command: Command) -> Command {
        command.arg(Self::create_preset_argument())
    }

    fn register_band_file_argument(command: Command) -> Command {
        command.arg(Self::create_band_file_argument())
    }

    fn register_dark_threshold_argument(command: Command) -> Command {
        command.arg(Self::create_dark_threshold_argument())
    }

    fn register_region_argument(command: Command) -> Command {
        command.arg(Self::create_region_argument())
    }

    fn register_annotation_arguments(command: Command) -> Command {
        command
            .arg(arg!(--id <ID> "Identifier of the sample, printed in the report").required(false))
            .arg(arg!(--date <DATE> "Date printed in the report").required(false))
            .arg(arg!(--comments <TEXT> "Comments appended to the report").required(false))
    }

    fn register_report_format_argument(command: Command) -> Command {
        command.arg(Self::create_report_format_argument())
    }

    fn register_output_argument(command: Command) -> Command {
        command.arg(Self::create_output_argument())
    }

    fn register_mask_dir_argument(command: Command) -> Command {
        command.arg(Self::create_mask_dir_argument())
    }

    fn register_threads_argument(command: Command) -> Command {
        command.arg(Self::create_threads_argument())
    }

    fn create_base_command() -> Command {
        Command::new(crate_name!())
            .version(crate_version!())
            .author(crate_authors!())
            .about(crate_description!())
    }

    fn create_input_files_argument() -> Arg {
        Arg::new("input_files")
            .help("Paths to the images to analyze (PPM, JPEG, PNG, TIFF, ...)")
            .value_parser(value_parser!(PathBuf))
            .num_args(1..)
            .required(true)
    }

    fn create_preset_argument() -> Arg {
        arg!(preset: -p --preset <PRESET> "Band preset used unless a band file is given")
            .default_value("bgr-fiber")
            .value_parser(value_parser!(BandPreset))
    }

    fn create_band_file_argument() -> Arg {
        arg!(band_file: -b --bands <FILE> "JSON file with band definitions")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_dark_threshold_argument() -> Arg {
        arg!(dark_threshold: --dark_threshold <LEVEL> "Highest gray level counted as dark")
            .default_value(DEFAULT_DARK_THRESHOLD.to_string())
            .value_parser(value_parser!(u8))
    }

    fn create_region_argument() -> Arg {
        arg!(region: -r --region <RECT> "Crop rectangle x1,y1,x2,y2; repeat for several regions")
            .required(false)
            .action(ArgAction::Append)
            .value_parser(parse_region)
    }

    fn create_report_format_argument() -> Arg {
        arg!(report_format: -f --format <FORMAT> "Report format")
            .default_value("text")
            .value_parser(value_parser!(ReportFormat))
    }

    fn create_output_argument() -> Arg {
        arg!(output: -o --output <PATH> "Report file or existing directory; stdout if omitted")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_mask_dir_argument() -> Arg {
        arg!(mask_dir: --mask_dir <DIR> "Directory receiving one PNG mask per band and image")
            .required(false)
            .value_parser(value_parser!(PathBuf))
    }

    fn create_threads_argument() -> Arg {
        arg!(-t --threads <THREADS> "Number of images analyzed in parallel")
            .default_value(get_number_of_threads().unwrap_or(1).to_string())
            .required(false)
            .value_parser(value_parser!(usize))
    }

    fn extract_arguments(matches: &ArgMatches) -> Arguments {
        Arguments {
            input_files: Self::extract_input_files_argument(matches),
            preset: Self::extract_preset_argument(matches),
            band_file: Self::extract_optional_path(matches, "band_file"),
            dark_threshold: Self::extract_dark_threshold_argument(matches),
            regions: Self::extract_region_argument(matches),
            identifier: Self::extract_optional_text(matches, "id"),
            date: Self::extract_optional_text(matches, "date"),
            comments: Self::extract_optional_text(matches, "comments"),
            report_format: Self::extract_report_format_argument(matches),
            output: Self::extract_optional_path(matches, "output"),
            mask_dir: Self::extract_optional_path(matches, "mask_dir"),
            number_of_threads: Self::extract_threads_argument(matches),
        }
    }

    fn extract_input_files_argument(matches: &ArgMatches) -> Vec<PathBuf> {
        matches
            .get_many::<PathBuf>("input_files")
            .expect("Required argument input_files not provided")
            .cloned()
            .collect()
    }

    fn extract_preset_argument(matches: &ArgMatches) -> BandPreset {
        matches
            .get_one::<BandPreset>("preset")
            .expect("Band preset must be provided, but was unset.")
            .to_owned()
    }

    fn extract_dark_threshold_argument(matches: &ArgMatches) -> u8 {
        matches
            .get_one::<u8>("dark_threshold")
            .expect("Dark threshold must be provided, but was unset.")
            .to_owned()
    }

    fn extract_region_argument(matches: &ArgMatches) -> Vec<Region> {
        matches
            .get_many::<Region>("region")
            .map(|regions| regions.copied().collect())
            .unwrap_or_default()
    }

    fn extract_report_format_argument(matches: &ArgMatches) -> ReportFormat {
        matches
            .get_one::<ReportFormat>("report_format")
            .expect("Report format must be provided, but was unset.")
            .to_owned()
    }

    fn extract_threads_argument(matches: &ArgMatches) -> usize {
        matches
            .get_one::<usize>("threads")
            .expect("Required argument threads not provided")
            .to_owned()
    }

    fn extract_optional_path(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
        matches.get_one::<PathBuf>(id).cloned()
    }

    fn extract_optional_text(matches: &ArgMatches, id: &str) -> Option<String> {
        matches.get_one::<String>(id).cloned()
    }
}

impl Default for CLIParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_region(value: &str) -> Result<Region, String> {
    value.parse()
}

fn get_number_of_threads() -> io::Result<usize> {
    Ok(thread::available_parallelism()?.get())
}
