use std::fs;
use std::path::Path;

use clap::ArgMatches;
use colored::*;
use log::info;

use schemsim::cli::{self, CliArgs, RunMode};
use schemsim::Schematic;

fn main() {
    let matches = cli::create_cli().get_matches();

    if let Err(e) = run_application(&matches) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn run_application(matches: &ArgMatches) -> anyhow::Result<()> {
    let args = CliArgs::from_matches(matches)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level())).init();

    info!("{}", "Starting schemsim".green().bold());
    info!("Project file: {}", args.input_file.bright_blue());

    if !Path::new(&args.input_file).exists() {
        return Err(anyhow::anyhow!("Project file '{}' not found", args.input_file));
    }

    let schematic = Schematic::open(&args.input_file)?;
    for (kind, count) in schematic.kind_counts() {
        info!("  {}: {}", kind, count);
    }

    match args.mode {
        RunMode::Netlist => {
            let netlist = schematic.build_netlist();
            if let Some(output_file) = &args.output_file {
                fs::write(output_file, &netlist)?;
                info!("Netlist written to: {}", output_file.bright_green());
            } else {
                println!("{}", netlist);
            }
        }
        RunMode::Simulate => {
            info!("Running DC estimate");
            let results = schematic.simulate();

            if let Some(output_file) = &args.output_file {
                results.export(output_file, args.output_format)?;
                info!("Results exported to: {}", output_file.bright_green());
            } else {
                results.print_summary();
            }
        }
    }

    info!("{}", "Done".green().bold());
    Ok(())
}
