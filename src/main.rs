use std::io::{self, BufWriter};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;

use bfopt::{compile, TapeConfig};

/// Optimizing Brainf**k interpreter
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The .bf file to run
    file: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let Some(path) = args.file else {
        let program = std::env::args().next().unwrap_or_else(|| "bfopt".into());
        println!("Usage: {program} <.bf filepath>");
        return ExitCode::SUCCESS;
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{} {}: {}", "error:".red(), path, e);
            return ExitCode::FAILURE;
        }
    };

    let now = Instant::now();
    let program = match compile(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            return ExitCode::FAILURE;
        }
    };
    let compile_time = now.elapsed();

    let now = Instant::now();
    let runtime = match program.execute(
        Box::new(io::stdin()),
        Box::new(BufWriter::new(io::stdout())),
        TapeConfig::default(),
    ) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} {}", "error:".red(), e);
            return ExitCode::FAILURE;
        }
    };
    let execute_time = now.elapsed();

    println!("compile time usage: {:.6}s", compile_time.as_secs_f64());
    println!("execute time usage: {:.6}s", execute_time.as_secs_f64());
    println!("bf memory allocated: {}", runtime.allocated());
    println!("bf memory used: {}", runtime.high_water());

    ExitCode::SUCCESS
}
