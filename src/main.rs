use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cnb::cache::types::format_timestamp;
use cnb::cache::{CacheEngine, CacheEntry};
use cnb::config::{self, CONFIG_FILE_PATH};
use cnb::logger::{self, LogLevel, LogTag};
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cnb")]
#[command(about = "Disk-backed blob cache with FIFO/LRU eviction", long_about = None)]
struct Args {
    /// Configuration file (created with defaults if missing)
    #[arg(short, long, global = true, default_value = CONFIG_FILE_PATH)]
    config: PathBuf,

    /// Enable debug output for every subsystem
    #[arg(long, global = true)]
    debug: bool,

    /// Enable all output, including per-file traces
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Minimum level to print (error, warning, info, debug, verbose)
    #[arg(long, global = true, value_parser = parse_log_level)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cache data under a key (reads stdin unless --file is given)
    Put {
        key: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Write the cached bytes for a key to stdout
    Get { key: String },
    /// Check whether a key is cached
    Contains { key: String },
    /// Remove one key
    Remove { key: String },
    /// Remove entries older than the configured lifetime
    Expire,
    /// Remove every entry
    Clear,
    /// Print the number of cached entries
    Count,
    /// List entries, oldest first
    List {
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let args = Args::parse();
    logger::init_with(args.debug, args.verbose, args.log_level);

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            logger::error(LogTag::System, &format!("{:#}", e));
            std::process::exit(2);
        }
    }
}

/// Returns the process exit code: 0 on success or hit, 1 on miss
fn run(args: Args) -> Result<i32> {
    let configuration = config::load_or_create(&args.config)
        .with_context(|| format!("Failed to load config '{}'", args.config.display()))?;
    let engine = CacheEngine::open(configuration).context("Failed to open cache")?;

    match args.command {
        Command::Put { key, file } => {
            let data = match file {
                Some(path) => std::fs::read(&path)
                    .with_context(|| format!("Failed to read '{}'", path.display()))?,
                None => {
                    let mut buffer = Vec::new();
                    io::stdin()
                        .read_to_end(&mut buffer)
                        .context("Failed to read stdin")?;
                    buffer
                }
            };

            engine.expire_stale()?;
            let address = engine.put(&key, &data)?;
            println!("{}", address);
            Ok(0)
        }
        Command::Get { key } => {
            if !engine.contains(&key)? {
                logger::warning(LogTag::Cache, &format!("'{}' is not cached", key));
                return Ok(1);
            }
            let data = engine.get(&key)?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
            Ok(0)
        }
        Command::Contains { key } => {
            let hit = engine.contains(&key)?;
            println!("{}", hit);
            Ok(if hit { 0 } else { 1 })
        }
        Command::Remove { key } => {
            let removed = engine.remove(&key)?;
            println!("{}", removed);
            Ok(if removed { 0 } else { 1 })
        }
        Command::Expire => {
            println!("{}", engine.expire_stale()?);
            Ok(0)
        }
        Command::Clear => {
            println!("{}", engine.clear()?);
            Ok(0)
        }
        Command::Count => {
            println!("{}", engine.count()?);
            Ok(0)
        }
        Command::List { json } => {
            let entries = engine.list_entries()?;
            print_entries(&entries, json)?;
            Ok(0)
        }
    }
}

fn parse_log_level(raw: &str) -> Result<LogLevel, String> {
    LogLevel::parse(raw).ok_or_else(|| format!("unknown log level '{}'", raw))
}

fn print_entries(entries: &[CacheEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    for entry in entries {
        println!("{}  {}", format_timestamp(&entry.touched_at), entry.address);
    }
    Ok(())
}
