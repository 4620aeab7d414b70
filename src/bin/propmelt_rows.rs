//! propmelt-rows: Slice a stored attribute list back into records
//!
//! Usage:
//!   # Read an attribute list (JSON array or JSON Lines) from a file
//!   propmelt-rows attributes.json
//!
//!   # Read from stdin, only the records of one namespace
//!   cat attributes.jsonl | propmelt-rows --namespace comments
//!
//!   # Ignore namespaces deeper than one level below the root
//!   propmelt-rows --max-depth 1 attributes.json

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use propmelt::melt::{read_attributes, slice_rows, Row, RowWriter};
use propmelt::namespace;
use propmelt::SerializerConfig;
use std::fs::File;
use std::io::Read;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "propmelt-rows")]
#[command(about = "Slice a flat attribute list into per-namespace records", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Only slice this namespace (use "" for the root record)
    #[arg(long, short = 'n')]
    namespace: Option<String>,

    /// JSON config file with serializer settings
    #[arg(long)]
    config: Option<String>,

    /// Skip namespaces deeper than this many levels below the root (default: 2)
    #[arg(long)]
    max_depth: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SerializerConfig::from_json_file(path)?,
        None => SerializerConfig::default(),
    };
    if let Some(depth) = args.max_depth {
        config.max_depth = depth;
    }

    let reader = if let Some(file_path) = &args.input {
        let file = File::open(file_path).with_context(|| format!("Failed to open {file_path}"))?;
        Box::new(file) as Box<dyn Read>
    } else {
        Box::new(std::io::stdin()) as Box<dyn Read>
    };
    let mut attributes = read_attributes(reader)?;
    debug!(attributes = attributes.len(), "read attribute list");

    let namespaces = match args.namespace {
        Some(namespace) => vec![namespace],
        None => namespace::discover(&attributes),
    };

    let stdout = std::io::stdout();
    let mut writer = RowWriter::new(stdout.lock());

    for ns in namespaces {
        if namespace::depth(&ns) > config.max_depth {
            warn!(namespace = %ns, max_depth = config.max_depth, "skipping namespace beyond depth cap");
            continue;
        }

        let rows: Vec<Row> = slice_rows(&ns, &mut attributes)
            .into_iter()
            .enumerate()
            .map(|(index, extraction)| Row::new(&ns, index, extraction))
            .collect();
        debug!(namespace = %ns, rows = rows.len(), "sliced namespace");
        writer.write_rows(&rows)?;
    }

    writer.flush()?;
    Ok(())
}
