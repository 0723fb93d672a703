use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use crate::internal::config::{LoggingConfig, VERSION};

/// Options of the demo binary
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOptions {
    pub module: String,
    pub base: String,
    pub config_path: Option<PathBuf>,
    pub threads: usize,
    pub count: usize,
    pub print_config: bool,
}

pub fn build_cli() -> Command {
    Command::new("dual-sink-log")
        .version(VERSION)
        .about("Writes sample records to the console and the daily JSON log file")
        .arg(
            Arg::new("module")
                .long("module")
                .short('m')
                .default_value("demo")
                .help("Module name attached to every record")
        )
        .arg(
            Arg::new("base")
                .long("base")
                .short('b')
                .help("Log file prefix (default: the module name)")
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to a logging config file (toml, yaml or json)")
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .short('t')
                .value_parser(clap::value_parser!(usize))
                .default_value("4")
                .help("Number of threads logging at the same time")
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('n')
                .value_parser(clap::value_parser!(usize))
                .default_value("10")
                .help("Records per thread")
        )
        .arg(
            Arg::new("print-config")
                .long("print-config")
                .action(ArgAction::SetTrue)
                .help("Print the effective logging config as JSON and exit")
        )
}

pub fn parse_options(matches: &clap::ArgMatches) -> DemoOptions {
    let module = matches
        .get_one::<String>("module")
        .cloned()
        .unwrap_or_else(|| "demo".to_string());

    let base = matches
        .get_one::<String>("base")
        .cloned()
        .unwrap_or_else(|| module.clone());

    DemoOptions {
        module,
        base,
        config_path: matches.get_one::<String>("config").map(PathBuf::from),
        threads: matches.get_one::<usize>("threads").copied().unwrap_or(4),
        count: matches.get_one::<usize>("count").copied().unwrap_or(10),
        print_config: matches.get_flag("print-config"),
    }
}

/// Config file if one was given, defaults otherwise
pub fn load_config(opts: &DemoOptions) -> anyhow::Result<LoggingConfig> {
    match &opts.config_path {
        Some(path) => Ok(LoggingConfig::load(path)?),
        None => Ok(LoggingConfig::default()),
    }
}
