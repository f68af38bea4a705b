use clap::{Parser, Subcommand};
use log::LevelFilter;
use simplelog::{Config, SimpleLogger};
use std::fs;
use std::path::PathBuf;

use vast_normalizer::{normalize, parse_vast, NormalizeOptions, Size};

/// VAST validator and normalizer
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Sets debug output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a VAST file, printing the document as JSON
    Inspect {
        /// Path to the VAST file
        #[arg(short, long)]
        input: PathBuf,

        /// Pretty print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate a VAST file and narrow it down for a given player
    Normalize {
        /// Path to the VAST file
        #[arg(short, long)]
        input: PathBuf,

        /// Rewrite every URI to https
        #[arg(long, conflicts_with = "insecure")]
        secure: bool,

        /// Rewrite every URI to http
        #[arg(long)]
        insecure: bool,

        /// Accepted media format, as a MIME type or a short name like mp4 (repeatable)
        #[arg(short, long = "format")]
        formats: Vec<String>,

        /// Player size as WIDTHxHEIGHT
        #[arg(short, long)]
        size: Option<Size>,

        /// Output file path (if not specified, prints to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the XML output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => return,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        3 => LevelFilter::Trace,
        _ => {
            eprintln!("using more than -vvv does not affect verbosity level");
            LevelFilter::Trace
        }
    };

    if let Err(e) = SimpleLogger::init(level, Config::default()) {
        eprintln!("Failed to initialize logging: {}", e);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Inspect { input, pretty } => {
            let content = fs::read_to_string(&input)?;
            let mut vast = parse_vast(&content)?;
            vast.validate()?;

            let json = if pretty {
                serde_json::to_string_pretty(&vast)?
            } else {
                serde_json::to_string(&vast)?
            };
            println!("{}", json);
        }
        Commands::Normalize {
            input,
            secure,
            insecure,
            formats,
            size,
            output,
            pretty,
        } => {
            let options = NormalizeOptions {
                secure: match (secure, insecure) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                formats,
                size,
            };

            let content = fs::read_to_string(&input)?;
            let mut vast = parse_vast(&content)?;
            normalize(&mut vast, &options)?;

            let xml = if pretty {
                vast_normalizer::to_xml_pretty(&vast)?
            } else {
                vast_normalizer::to_xml(&vast)?
            };

            if let Some(output_path) = output {
                fs::write(&output_path, &xml)?;
                eprintln!("Normalized VAST written to {}", output_path.display());
            } else {
                println!("{}", xml);
            }
        }
    }

    Ok(())
}
