use std::{env::args_os, process::ExitCode};

use sem_area_calculator::{run, CLIParser};

fn main() -> ExitCode {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match run(&arguments) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Analysis failed because of: {}", e);
            ExitCode::FAILURE
        }
    }
}
