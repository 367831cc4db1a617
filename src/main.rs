//! Amortization CLI
//!
//! Reads loan requests from CSV and writes their repayment schedules, or one
//! summary line per loan with `--summary`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- loans.csv > schedules.csv
//! cargo run -- loans.csv --summary > summaries.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use amortization_engine::{EngineError, Result, ScheduleBatch};
use chrono::Local;
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut input_path = None;
    let mut summary = false;

    for arg in env::args().skip(1) {
        if arg == "--summary" {
            summary = true;
        } else if arg.starts_with("--") || input_path.is_some() {
            return Err(EngineError::UnknownOption(arg));
        } else {
            input_path = Some(arg);
        }
    }

    let input_path = input_path.ok_or(EngineError::MissingArgument)?;
    let file = File::open(&input_path)?;
    let reader = BufReader::new(file);

    let mut batch = ScheduleBatch::new(Local::now().date_naive());
    batch.process_csv(reader)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    if summary {
        batch.write_summaries(handle)?;
    } else {
        batch.write_schedules(handle)?;
    }

    Ok(())
}
