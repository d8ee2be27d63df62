//! `fql` CLI: decode, inspect and re-encode FQL wire JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Decode wire JSON and print the value tree (stdin → stdout)
//! echo '{"@ref":{"id":"101","class":{"@ref":{"id":"spells"}}}}' | fql decode
//!
//! # Extract a typed field
//! fql get -p data.items.0.name -i instance.json
//!
//! # Re-encode a decoded document in request form
//! fql encode --pretty -i instance.json
//!
//! # Unwrap a full server response, failing on server errors
//! fql response -i body.json
//!
//! # Debug logging
//! RUST_LOG=fql_core=debug fql decode -i instance.json
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fql_core::{Path, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fql", version, about = "FQL wire JSON CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decoder decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode wire JSON and print the value tree
    Decode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Decode wire JSON and print the value at a dotted path (e.g. data.items.0)
    Get {
        /// Dotted path; numeric segments index into arrays
        #[arg(short, long)]
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Decode wire JSON and re-encode it in request form
    Encode {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Unwrap a server response envelope and print its resource
    Response {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Decode { input, output } => {
            let bytes = read_input(input.as_deref())?;
            let value = fql_core::decode(&bytes).context("Failed to decode wire JSON")?;
            write_output(output.as_deref(), &format!("{value}\n"))?;
        }
        Commands::Get { path, input } => {
            let path: Path = path.parse().context("Failed to parse path")?;
            let bytes = read_input(input.as_deref())?;
            let value = fql_core::decode(&bytes).context("Failed to decode wire JSON")?;
            let found: Value = value
                .get(&path)
                .with_context(|| format!("Failed to extract {path}"))?;
            println!("{found}");
        }
        Commands::Encode {
            input,
            output,
            pretty,
        } => {
            let bytes = read_input(input.as_deref())?;
            let value = fql_core::decode(&bytes).context("Failed to decode wire JSON")?;
            let json = fql_core::encoder::value_to_json(&value);
            let text = if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                json.to_string()
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Response { input } => {
            let bytes = read_input(input.as_deref())?;
            let value =
                fql_core::parse_response(&bytes).context("Server response was not a success")?;
            println!("{value}");
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<Vec<u8>> {
    let bytes = match path {
        Some(path) => std::fs::read(path).with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    tracing::debug!(len = bytes.len(), source = path.unwrap_or("<stdin>"), "read input");
    Ok(bytes)
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
