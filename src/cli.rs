use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};

pub fn create_cli() -> Command {
    Command::new("schemsim")
        .version(crate::VERSION)
        .about("Netlist export and approximate DC analysis for schematic projects")
        .arg(
            Arg::new("input")
                .help("Project file (.dsc / .json)")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file for results or netlist"),
        )
        .arg(
            Arg::new("netlist")
                .long("netlist")
                .action(ArgAction::SetTrue)
                .help("Emit the SPICE netlist instead of simulating"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase verbosity level"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .default_value("csv")
                .value_parser(["csv", "json"])
                .help("Output format for simulation results"),
        )
}

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub input_file: String,
    pub output_file: Option<String>,
    pub mode: RunMode,
    pub output_format: OutputFormat,
    pub verbose_level: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunMode {
    /// Run the DC estimate
    Simulate,
    /// Emit the netlist instead of simulating
    Netlist,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl CliArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let input_file = matches
            .get_one::<String>("input")
            .ok_or_else(|| anyhow!("Project file is required"))?
            .clone();

        let output_file = matches.get_one::<String>("output").cloned();

        let verbose_level = matches.get_count("verbose");

        let output_format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("csv") | None => OutputFormat::Csv,
            Some("json") => OutputFormat::Json,
            Some(other) => return Err(anyhow!("Invalid output format '{}'", other)),
        };

        let mode = if matches.get_flag("netlist") {
            RunMode::Netlist
        } else {
            RunMode::Simulate
        };

        Ok(CliArgs {
            input_file,
            output_file,
            mode,
            output_format,
            verbose_level,
        })
    }

    /// Log filter implied by the number of `-v` flags
    pub fn log_level(&self) -> &'static str {
        match self.verbose_level {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
