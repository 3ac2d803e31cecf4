mod commands;
mod config;

use anyhow::Result;
use clap::{App, AppSettings, Arg};
use std::str::FromStr;
use tracing::{subscriber::set_global_default, Level};

fn main() -> Result<()> {
    let matches = App::new("veil")
        .version("0.1.0")
        .about("Anonymizes CSV data column by column and reports its k-anonymity")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .global(true)
                .takes_value(true)
                .default_value("INFO")
                .help("Sets the level of verbosity"),
        )
        .subcommand(
            App::new("run")
                .about("Applies the configured rules and reports the resulting risk")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .takes_value(true)
                        .default_value("./veil.toml")
                        .help("Path to the config file to use"),
                ),
        )
        .subcommand(
            App::new("inspect")
                .about("Prints a config skeleton for a CSV file")
                .arg(
                    Arg::new("input")
                        .required(true)
                        .help("CSV file with a header row"),
                )
                .arg(
                    Arg::new("delimiter")
                        .short('d')
                        .long("delimiter")
                        .takes_value(true)
                        .default_value(",")
                        .help("Field delimiter"),
                ),
        )
        .get_matches();

    let tracing_level = Level::from_str(
        matches
            .value_of("verbosity")
            .unwrap_or("INFO"),
    )?;

    let collector = tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(std::io::stderr)
        .finish();

    set_global_default(collector)?;

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run::execute(sub_matches),
        Some(("inspect", sub_matches)) => commands::inspect::execute(sub_matches),
        _ => unreachable!("a subcommand is required"),
    }
}
