use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobpipe")]
#[command(about = "Run a task for every line of an input file on a bounded worker pool")]
#[command(version)]
pub struct Cli {
    /// Input file, one record per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output file for results ("-" for stdout)
    #[arg(short, long, default_value = "-")]
    pub output: PathBuf,

    /// Number of concurrent workers
    #[arg(short = 'n', long, default_value = "32")]
    pub num_workers: usize,

    /// Shell command run for each line (the line is passed as $1)
    #[arg(short, long)]
    pub command: Option<String>,

    /// Per-task timeout for the command, in seconds
    #[arg(short, long)]
    pub timeout_secs: Option<u64>,

    /// Only process the first N lines
    #[arg(long)]
    pub head: Option<usize>,

    /// Only process the last N lines
    #[arg(long)]
    pub tail: Option<usize>,

    /// Skip empty lines
    #[arg(long)]
    pub skip_empty: bool,

    /// Total number of shards
    #[arg(long, default_value = "1")]
    pub num_shards: usize,

    /// Shard index handled by this process (0-based)
    #[arg(long, default_value = "0")]
    pub shard: usize,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
