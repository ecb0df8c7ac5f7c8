//! seglog CLI
//!
//! Appends to and inspects a `{base}.store` / `{base}.index` pair on disk.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use seglog::{Config, Index, LogError, Result, Store};
use tracing_subscriber::{fmt, EnvFilter};

/// seglog CLI
#[derive(Parser, Debug)]
#[command(name = "seglog")]
#[command(about = "Append to and inspect a log segment's store and index files")]
#[command(version)]
struct Args {
    /// Directory holding the segment files
    #[arg(short, long, default_value = "./seglog_data")]
    dir: PathBuf,

    /// Segment base offset, used as the file stem
    #[arg(short, long, default_value = "0")]
    base: u64,

    /// Bytes reserved for the index while open
    #[arg(short, long, default_value = "1048576")]
    max_index_bytes: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Append records, one per argument
    Append {
        /// Record contents
        #[arg(required = true)]
        records: Vec<String>,
    },

    /// Print one record by relative offset
    Get {
        /// Relative offset, or -1 for the last record
        #[arg(allow_negative_numbers = true)]
        offset: i64,
    },

    /// Print every record with its index entry
    Dump,
}

/// A store/index pair opened from one directory
struct Segment {
    store: Store,
    index: Index,
}

impl Segment {
    fn open(dir: &Path, base: u64, config: &Config) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let store = Store::open(&dir.join(format!("{base}.store")))?;
        let index = Index::open(&dir.join(format!("{base}.index")), config)?;
        Ok(Self { store, index })
    }

    fn close(self) -> Result<()> {
        self.index.close()?;
        self.store.close()
    }
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,seglog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    tracing::debug!("seglog v{}", seglog::VERSION);

    let config = Config::builder()
        .max_index_bytes(args.max_index_bytes)
        .build();

    if let Err(e) = run(&args, &config) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let mut segment = Segment::open(&args.dir, args.base, config)?;

    let result = match &args.command {
        Commands::Append { records } => append(&mut segment, records),
        Commands::Get { offset } => get(&segment, *offset),
        Commands::Dump => dump(&segment),
    };

    // Close even on failure so the index is shrunk back to its content
    let closed = segment.close();
    result.and(closed)
}

fn append(segment: &mut Segment, records: &[String]) -> Result<()> {
    for record in records {
        if segment.index.is_full() {
            return Err(LogError::IndexFull {
                max_bytes: segment.index.capacity(),
            });
        }

        let offset = u32::try_from(segment.index.len())
            .map_err(|_| LogError::Config("relative offset exceeds u32".to_string()))?;
        let (written, position) = segment.store.append(record.as_bytes())?;
        segment.index.write(offset, position)?;

        println!("{}\t{}\t{}", offset, position, written);
    }
    Ok(())
}

fn get(segment: &Segment, offset: i64) -> Result<()> {
    let (offset, position) = segment.index.read(offset)?;
    let record = segment.store.read(position)?;
    println!("{}\t{}\t{}", offset, position, String::from_utf8_lossy(&record));
    Ok(())
}

fn dump(segment: &Segment) -> Result<()> {
    println!(
        "# {} entries, store {} bytes",
        segment.index.len(),
        segment.store.size()
    );
    for entry in 0..segment.index.len() {
        let (offset, position) = segment.index.read(entry as i64)?;
        let record = segment.store.read(position)?;
        println!(
            "{}\t{}\t{}\t{}",
            offset,
            position,
            record.len(),
            String::from_utf8_lossy(&record)
        );
    }
    Ok(())
}
