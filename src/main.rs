//! Reads NMEA 0183 lines and prints every active RMC fix as
//! `HH:MM:SS, <lat>, <long>`.

#[macro_use]
extern crate log;

use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::process;

use rmcfix::parser::DEFAULT_LINE_LIMIT;
use rmcfix::report::write_active_fixes;
use rmcfix::{Diagnostics, LogDiagnostics, NoDiagnostics, RmcParser};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Config {
    /// Log every rejected line and the reason it was rejected
    #[arg(short, long)]
    verbose: bool,

    /// Stop after this many lines, 0 reads until EOF
    #[arg(short = 'n', long, default_value_t = DEFAULT_LINE_LIMIT)]
    limit: usize,

    /// File to read from instead of stdin
    input: Option<PathBuf>,
}

impl Config {
    fn line_limit(&self) -> Option<usize> {
        match self.limit {
            0 => None,
            n => Some(n),
        }
    }
}

fn run<R: BufRead, D: Diagnostics>(config: &Config, input: R, diag: D) -> io::Result<usize> {
    let parser = RmcParser::with_diagnostics(input, diag).limit(config.line_limit());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_active_fixes(parser, &mut out)
}

fn main() {
    let config = Config::parse();

    let level = if config.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let input: Box<dyn BufRead> = match config.input {
        Some(ref path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                error!("could not open {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        None => Box::new(BufReader::new(io::stdin())),
    };

    let result = if config.verbose {
        let mut diag = LogDiagnostics::new();
        let result = run(&config, input, &mut diag);
        debug!("{} lines rejected", diag.rejected_count());
        result
    } else {
        run(&config, input, NoDiagnostics)
    };

    match result {
        Ok(written) => debug!("{} active fixes written", written),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
