//! Print a persisted frequency table as text, JSON or CSV
//!
//! Usage:
//!   cargo run -p inspect_freq -- --store ~/.tapime
//!   cargo run -p inspect_freq -- --store data/freq.redb --format csv --top 20

use clap::Parser;
use std::path::PathBuf;
use tapime_core::{load_frequency, ByteStore, Config, DirStore, RedbStore};

#[derive(Parser, Debug)]
#[command(name = "inspect_freq")]
#[command(about = "Print a persisted commit frequency table")]
struct Args {
    /// Store location: a directory, or a .redb database file
    #[arg(short, long)]
    store: PathBuf,

    /// Record key inside the store
    #[arg(short, long)]
    key: Option<String>,

    /// Output format: text, json or csv
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Only print the N most frequent entries
    #[arg(short, long)]
    top: Option<usize>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let defaults = Config::default();

    let store: Box<dyn ByteStore> = if args.store.extension().is_some_and(|e| e == "redb") {
        Box::new(RedbStore::open(&args.store)?)
    } else {
        Box::new(DirStore::open(&args.store)?)
    };
    let key = args.key.unwrap_or(defaults.frequency_key);

    // Read with an unbounded capacity so nothing on disk is hidden
    let model = load_frequency(store.as_ref(), &key, usize::MAX)?;
    let entries = model.top(args.top.unwrap_or(model.len()));

    let output = match args.format.as_str() {
        "text" => export_text(&entries),
        "json" => serde_json::to_string_pretty(&entries)? + "\n",
        "csv" => export_csv(&entries),
        _ => anyhow::bail!("Unsupported format: {}. Use 'text', 'json' or 'csv'", args.format),
    };

    if let Some(path) = args.output {
        std::fs::write(path, output)?;
    } else {
        print!("{}", output);
    }

    Ok(())
}

fn export_text(entries: &[(String, u32)]) -> String {
    let mut output = format!("{} entries\n", entries.len());
    for (i, (text, count)) in entries.iter().enumerate() {
        output.push_str(&format!("{:>4}. {}  {}\n", i + 1, text, count));
    }
    output
}

fn export_csv(entries: &[(String, u32)]) -> String {
    let mut output = String::from("text,count\n");
    for (text, count) in entries {
        let escaped = text.replace('"', "\"\"");
        output.push_str(&format!("\"{}\",{}\n", escaped, count));
    }
    output
}
