use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cui;
mod input;

use input::{open_input, source_path};

/// Log level accepted by `--verbose`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

/// VGM sound log tools
#[derive(Parser, Debug)]
#[command(
    name = "vgmscope",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    /// Log level; RUST_LOG takes precedence when set
    #[arg(long, value_enum, default_value_t = Level::Info, global = true)]
    verbose: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the header and every command with its byte offset
    Dump {
        /// Input file to read (.vgm or .vgz; use '-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Force gzip decoding
        #[arg(long)]
        gzip: bool,
    },
    /// Replay YM2612 writes and write channel voice snapshots
    Interpret {
        /// Input file to read (.vgm or .vgz; use '-' for stdin)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Directory that receives chNN-SSSS.txt snapshot files
        #[arg(long, short, value_name = "DIR")]
        output: PathBuf,
        /// Force gzip decoding
        #[arg(long)]
        gzip: bool,
        /// Append the adapted DX7 voice to every snapshot
        #[arg(long)]
        dx7: bool,
    },
}

fn init_tracing(level: Level) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Dump { file, gzip } => {
            let reader = open_input(&file, gzip)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let errors = cui::dump::dump_vgm(source_path(&file), reader, &mut out)?;
            out.flush()?;
            Ok(errors == 0)
        }
        Commands::Interpret {
            file,
            output,
            gzip,
            dx7,
        } => {
            let reader = open_input(&file, gzip)?;
            let report =
                cui::interpret::interpret_vgm(source_path(&file), reader, &output, dx7)?;
            Ok(report.errors == 0)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
