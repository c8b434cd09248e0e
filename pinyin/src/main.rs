//! tapime command-line front end.
//!
//! Usage:
//!   tapime --dict data/sample.json type "66444 0"
//!   tapime --dict data/sample.json --store ~/.tapime lookup ni
//!   tapime --dict data/sample.json segment nihao
//!   tapime --dict data/sample.json compile --output data/sample.bincode
//!   tapime --dict data/sample.bincode interactive

use clap::{Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use tapime_pinyin::{
    engine_with_dictionary, load_dictionary, replay, ByteStore, DirStore, Dictionary, ImeContext,
    PinyinConfig, PinyinEngine, RedbStore,
};

#[derive(Parser, Debug)]
#[command(name = "tapime")]
#[command(about = "Multi-tap keypad composition engine with pinyin input")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Dictionary resource (JSON records or .bincode snapshot); overrides the config
    #[arg(short, long)]
    dict: Option<PathBuf>,

    /// Persist learned frequencies here: a directory, or a .redb database file
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Print snapshots as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a key script and print the resulting display state
    Type {
        /// Keypad symbols plus m (mode), < (backspace), x (cancel), > (send); space pauses
        script: String,
    },
    /// Print ranked candidates for a romanized buffer
    Lookup { buffer: String },
    /// Print every segmentation of a romanized buffer
    Segment { buffer: String },
    /// Compile the dictionary into a bincode snapshot
    Compile {
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Read key scripts from stdin, one per line
    Interactive,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PinyinConfig::load_toml(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))?,
        None => PinyinConfig::default(),
    };
    if let Some(dict) = &args.dict {
        config.dictionary_path = Some(dict.clone());
    }

    let Some(dict_path) = config.dictionary_path.clone() else {
        anyhow::bail!("No dictionary given. Use --dict or set dictionary_path in the config");
    };
    let dict = load_dictionary(&dict_path)?;

    match args.command {
        Command::Compile { output } => {
            dict.save_bincode(&output)?;
            println!(
                "compiled {} syllables ({} mappings) into {}",
                dict.len(),
                dict.mapping_count(),
                output.display()
            );
        }
        Command::Segment { buffer } => {
            let key = tapime_pinyin::normalize(&buffer);
            for seg in tapime_pinyin::segment(&key, &dict) {
                println!("{}", seg.join(" "));
            }
        }
        Command::Lookup { buffer } => {
            let engine = open_engine(dict, &config, args.store.as_ref())?;
            let key = tapime_pinyin::normalize(&buffer);
            let ranked = engine.candidates_for(&key);
            if args.json {
                let rows: Vec<(&str, u32)> =
                    ranked.iter().map(|c| (c.text.as_str(), c.frequency)).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if ranked.is_empty() {
                println!("(no candidates)");
            } else {
                for (i, c) in ranked.iter().enumerate() {
                    println!("{:>2}. {} ({})", i + 1, c.text, c.frequency);
                }
            }
        }
        Command::Type { script } => {
            let mut engine = open_engine(dict, &config, args.store.as_ref())?;
            replay(&mut engine, &script, 0)?;
            print_snapshot(&engine.snapshot(), args.json)?;
            print_sent(&mut engine);
            finish(&mut engine);
        }
        Command::Interactive => {
            let mut engine = open_engine(dict, &config, args.store.as_ref())?;
            println!("Type key scripts and press Enter. Ctrl+D to exit.");
            let mut now = 0u64;
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let line = line?;
                match replay(&mut engine, line.trim_end(), now) {
                    Ok((end, _)) => now = end + tapime_pinyin::script::PAUSE_MS,
                    Err(e) => {
                        eprintln!("{}", e);
                        continue;
                    }
                }
                print_snapshot(&engine.snapshot(), args.json)?;
                print_sent(&mut engine);
            }
            finish(&mut engine);
        }
    }

    Ok(())
}

fn open_engine(
    dict: Dictionary,
    config: &PinyinConfig,
    store: Option<&PathBuf>,
) -> anyhow::Result<PinyinEngine> {
    let store: Option<Box<dyn ByteStore>> = match store {
        Some(path) if path.extension().is_some_and(|e| e == "redb") => {
            Some(Box::new(RedbStore::open(path)?))
        }
        Some(path) => {
            std::fs::create_dir_all(path)?;
            Some(Box::new(DirStore::open(path)?))
        }
        None => None,
    };
    Ok(engine_with_dictionary(Arc::new(dict), config, store))
}

fn print_snapshot(ctx: &ImeContext, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(ctx)?);
        return Ok(());
    }
    println!("[{}] {}", ctx.mode_label, ctx.committed_text);
    if ctx.composing {
        println!("  pinyin: {}", ctx.pending_text);
        let line: Vec<String> = ctx
            .visible_candidates()
            .iter()
            .enumerate()
            .map(|(i, c)| {
                if ctx.window_start + i == ctx.candidate_cursor {
                    format!("[{}]", c)
                } else {
                    c.to_string()
                }
            })
            .collect();
        println!("  {}", line.join(" "));
    }
    if ctx.show_key_table {
        println!("  2:abc 3:def 4:ghi 5:jkl 6:mno 7:pqrs 8:tuv 9:wxyz");
    }
    Ok(())
}

fn print_sent(engine: &mut PinyinEngine) {
    for text in engine.take_sent() {
        println!("sent: {}", text);
    }
}

fn finish(engine: &mut PinyinEngine) {
    if engine.has_store() {
        if let Err(e) = engine.flush() {
            eprintln!("warning: failed to save frequencies: {}", e);
        }
    }
}
