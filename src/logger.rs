use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    Config,
};

use crate::accumulator::RegionResult;

const CONFIG_FILE: &str = "log4rs.yaml";

#[ctor::ctor]
fn init() {
    if log4rs::init_file(CONFIG_FILE, Default::default()).is_ok() {
        return;
    }
    let stderr = ConsoleAppender::builder().target(Target::Stderr).build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn));
    match config {
        Ok(config) => {
            let _ = log4rs::init_config(config);
        }
        Err(e) => eprintln!("Logging disabled, invalid fallback configuration: {}", e),
    }
}

pub fn log_region_results(results: &[RegionResult]) {
    for result in results {
        log::info!(
            "Region {} band '{}': {} of {} pixels ({:.2}%)",
            result.region_index + 1,
            result.band,
            result.matched,
            result.total,
            result.percentage
        );
    }
}
