//! `tenbit`: 8b/10b table inspection tool.
//!
//! - `tenbit encode K28.5` / `tenbit encode 0xbc -k --rd 1`
//! - `tenbit decode 0x17c` / `tenbit decode 0101111100 --rd 0`
//! - `tenbit check` validates the table and both exported lookup tables
//! - `tenbit export --format minterms` writes one bit plane per output bit
//! - `tenbit controls` dumps control-symbol traces

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tenbit_codec::{dump, export, trace, Codec, DecodeTable, EncodeTable, JsonSink, MintermSink, PlaneSink, TextSink, Validator};
use tenbit_core::{parse_codeword, parse_disparity, parse_symbol, CodecConfig, LineCodeError};
use tenbit_dsa::CanonicalTable;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tenbit")]
#[command(version, about = "IBM 8b/10b codec tables", long_about = None)]
struct Cli {
    /// TOML file with codec settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode one symbol: D<x>.<y>, K<x>.<y>, or a raw byte in hex or binary.
    Encode {
        symbol: String,
        /// Treat a raw byte as a control symbol.
        #[arg(short = 'k', long)]
        control: bool,
        /// Entering disparity (0 or 1).
        #[arg(long)]
        rd: Option<String>,
    },
    /// Decode one 10-bit word given in hex or binary.
    Decode {
        word: String,
        /// Entering disparity. Both are tried when omitted.
        #[arg(long)]
        rd: Option<String>,
    },
    /// Validate the code table and the exported lookup tables.
    Check,
    /// Write the lookup tables as one named stream per output bit.
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Text)]
        format: ExportFormat,
    },
    /// Trace the control symbols and the comma reference words.
    Controls,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Text,
    Minterms,
    Json,
}

fn init_logging(config: &CodecConfig) {
    // Logs go to stderr so stdout carries only table output.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => CodecConfig::load(path)?,
        None => CodecConfig::default(),
    };
    init_logging(&config);

    let codec = Codec::standard().clone().with_detector(config.detector);

    match cli.command {
        Commands::Encode { symbol, control, rd } => {
            let symbol = parse_symbol(&symbol, control)?;
            let rd = match rd {
                Some(text) => parse_disparity(&text)?,
                None => config.disparity(),
            };
            println!("{}", dump::encode_line(&codec, symbol, rd));
        }
        Commands::Decode { word, rd } => {
            let word = parse_codeword(&word)?;
            let rd = rd.as_deref().map(parse_disparity).transpose()?;
            for line in dump::decode_lines(&codec, word, rd) {
                println!("{}", line);
            }
        }
        Commands::Check => return run_check(&config),
        Commands::Export { format } => {
            let stdout = io::stdout().lock();
            let mut sink: Box<dyn PlaneSink> = match format {
                ExportFormat::Text => Box::new(TextSink::new(stdout, config.lut_chunk)),
                ExportFormat::Minterms => Box::new(MintermSink::new(stdout)),
                ExportFormat::Json => Box::new(JsonSink::new(stdout)),
            };
            export::export(&codec, sink.as_mut())?;
        }
        Commands::Controls => {
            for line in trace::control_trace(&codec) {
                println!("{}", line);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check(config: &CodecConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Built fresh rather than through the shared instance so table faults
    // surface as errors here instead of a panic.
    let table = CanonicalTable::standard().map_err(LineCodeError::from)?;
    tracing::info!(symbols = table.len(), "canonical table passed disparity self-check");
    let codec = Codec::new(table).map_err(LineCodeError::from)?.with_detector(config.detector);

    let anomalies = Validator::for_codec(&codec).check();
    for anomaly in &anomalies {
        println!("{}", anomaly);
    }

    let mismatches: Vec<_> = EncodeTable::build(&codec)
        .check(&codec)
        .into_iter()
        .chain(DecodeTable::build(&codec).check(&codec))
        .collect();
    for mismatch in &mismatches {
        println!("{}", mismatch);
    }

    let failing = anomalies.iter().filter(|a| a.kind.fails(config.fail_on)).count();
    println!(
        "{} anomalies ({} failing), {} table mismatches",
        anomalies.len(),
        failing,
        mismatches.len()
    );

    if failing > 0 || !mismatches.is_empty() {
        tracing::error!(failing, mismatches = mismatches.len(), "table check failed");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
