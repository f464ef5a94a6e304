use anyhow::{Context, Result};
use clap::{arg, ArgMatches, Command};
use feed_runtime::{run, OutputFormat, RunOptions};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("feed-runtime")
        .about("Picks the best page of stories for every reload in an event stream")
        .arg(
            arg!([INPUT] "Path to the event stream, or '-' for stdin")
                .default_value("-")
                .value_parser(clap::value_parser!(String)),
        )
        .arg(
            arg!(--output [OUTPUT_FILE] "If set, results are written to this file instead of stdout")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--format [FORMAT] "Output format")
                .default_value("text")
                .value_parser(["text", "json"]),
        )
        .arg(arg!(--"no-cache" "Solve every reload from scratch"))
        .arg(arg!(--verify "Cross-check every reported page against a fresh solve"))
        .arg(
            arg!(--"log-level" [LEVEL] "Log filter, e.g. 'debug' (defaults to $FEED_LOG or 'warn')")
                .value_parser(clap::value_parser!(String)),
        )
}

fn main() {
    let matches = cli().get_matches();

    if let Err(e) = run_cli(&matches) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run_cli(matches: &ArgMatches) -> Result<()> {
    init_logging(matches.get_one::<String>("log-level").map(String::as_str))?;

    let options = RunOptions {
        format: matches
            .get_one::<String>("format")
            .map(|format| format.parse::<OutputFormat>())
            .transpose()?
            .unwrap_or_default(),
        caching: !matches.get_flag("no-cache"),
        verify: matches.get_flag("verify"),
    };
    let input = open_input(
        matches
            .get_one::<String>("INPUT")
            .map(String::as_str)
            .unwrap_or("-"),
    )?;
    let output: Box<dyn Write> = match matches.get_one::<PathBuf>("output") {
        Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
            format!("Failed to create output file: {}", path.display())
        })?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    run(input, output, &options)?;
    Ok(())
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>> {
    if input == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file =
            File::open(input).with_context(|| format!("Failed to read input file: {}", input))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_env("FEED_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
    Ok(())
}
