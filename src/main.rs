use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use env_logger::Builder;
use log::{debug, info};

use dlox::error::RunError;
use dlox::runner::{read_source, Runner};

const EXIT_USAGE: i32 = 64;

#[derive(ClapParser, Debug)]
#[command(version, about = "Lox-Interpreter mit deutschen Schlüsselwörtern", long_about = None)]
pub struct Cli {
    /// Script to run; starts a prompt when omitted
    script: Option<PathBuf>,

    /// Enable logging to app.log
    #[arg(long)]
    log: bool,
}

fn read_file(filename: &PathBuf) -> Result<String> {
    read_source(filename).context(format!("Failed to read script {:?}", filename))
}

fn init_logger() -> Result<()> {
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("dlox::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{}:{}] - {}",
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_default_env()
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

fn report(error: &RunError) {
    match error {
        RunError::Static(errors) => {
            for e in errors {
                eprintln!("{}", e);
            }
        }
        RunError::Runtime(_) => eprintln!("{}", error),
    }
}

fn run_file(filename: &PathBuf) -> Result<()> {
    let source = read_file(filename)?;
    let mut runner = Runner::new();

    if let Err(e) = runner.run(&source) {
        debug!("Run failed: {:?}", e);
        report(&e);
        std::process::exit(e.exit_code());
    }

    info!("Program executed successfully");
    Ok(())
}

fn run_prompt() -> Result<()> {
    info!("Starting interactive prompt");

    let mut runner = Runner::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;

        // Errors are reported and the session goes on.
        if let Err(e) = runner.run(&line) {
            debug!("Prompt line failed: {:?}", e);
            report(&e);
        }
    }

    println!();
    info!("Prompt closed");
    Ok(())
}

fn main() -> Result<()> {
    let args: Cli = match Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(_) => {
            println!("Benutzung: dlox [script]");
            std::process::exit(EXIT_USAGE);
        }
    };

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match &args.script {
        Some(script) => run_file(script),
        None => run_prompt(),
    }
}
