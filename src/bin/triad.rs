use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use triad_bloom::utils::{optimal_capacity, theoretical_fpr};
use triad_bloom::{
    populate, probe, probe_with, BloomFilter, Dataset, FilterConfig, QueryTally,
};

/// Screen keys against a string-keyed Bloom filter.
#[derive(Parser)]
#[command(name = "triad", author, version, about = "Triad Bloom filter CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    sizing: Sizing,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Sizing {
    /// JSON configuration file (capacity, multiplier, modulus).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Bit-array size.
    #[arg(long, global = true, conflicts_with = "expected")]
    capacity: Option<usize>,

    /// Polynomial hash multiplier.
    #[arg(long, global = true)]
    multiplier: Option<u64>,

    /// Polynomial hash modulus.
    #[arg(long, global = true)]
    modulus: Option<u64>,

    /// Size the filter for this many keys instead of giving a capacity.
    #[arg(long, global = true)]
    expected: Option<usize>,

    /// Target false positive rate used with --expected.
    #[arg(long, global = true, default_value_t = 0.01)]
    fpr: f64,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a source file, then check one or more files against it.
    Screen {
        /// Line-delimited keys to insert.
        #[arg(long)]
        source: PathBuf,

        /// Line-delimited keys to check (defaults to the source itself).
        #[arg(long)]
        probe: Vec<PathBuf>,
    },

    /// Interactive shell with `load` and `query` commands.
    Shell {
        /// Load this file before the prompt opens.
        #[arg(long)]
        source: Option<PathBuf>,
    },
}

impl Sizing {
    fn resolve(&self) -> anyhow::Result<FilterConfig> {
        let mut config = match &self.config {
            Some(path) => FilterConfig::from_json_file(path)?,
            None => FilterConfig::default(),
        };
        if let Some(capacity) = self.capacity {
            config.capacity = capacity;
        }
        if let Some(expected) = self.expected {
            config.capacity = optimal_capacity(expected, self.fpr);
        }
        if let Some(multiplier) = self.multiplier {
            config.multiplier = multiplier;
        }
        if let Some(modulus) = self.modulus {
            config.modulus = modulus;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.sizing.resolve()?;
    let mut filter = config.build().context("failed to build filter")?;

    match cli.command {
        Commands::Screen { source, probe } => screen(&mut filter, source, probe),
        Commands::Shell { source } => shell(&mut filter, source),
    }
}

fn load(filter: &mut BloomFilter, path: &Path) -> anyhow::Result<usize> {
    let dataset = Dataset::open(path)?;
    let added = populate(filter, &dataset)?;
    println!("Total Rows Added: {}", added);
    println!("Total Size: {} bits", filter.capacity());
    Ok(added)
}

fn screen(
    filter: &mut BloomFilter,
    source: PathBuf,
    probes: Vec<PathBuf>,
) -> anyhow::Result<()> {
    load(filter, &source)?;

    let probes = if probes.is_empty() {
        vec![source]
    } else {
        probes
    };

    for path in &probes {
        let dataset = Dataset::open(path)?;
        println!("--- Checking {} ---", path.display());
        let tally = probe_with(filter, &dataset, |record, present| {
            println!("Checking {} : {}", String::from_utf8_lossy(record), present)
        })?;
        println!("Total Positives: {}", tally.positives);
        println!("Total Negatives: {}", tally.negatives);
    }

    println!("All bits set: {}", filter.all_set());
    println!("{}", filter.stats());
    Ok(())
}

fn shell(filter: &mut BloomFilter, source: Option<PathBuf>) -> anyhow::Result<()> {
    if let Some(path) = source {
        load(filter, &path)?;
    }

    let mut rl = DefaultEditor::new()?;
    let mut tally = QueryTally::default();

    loop {
        let line = match rl.readline("triad> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if line.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(line.as_str())?;

        match parse_command(&line) {
            ShellCommand::Quit => break,
            ShellCommand::Help => print_help(),
            ShellCommand::Stats => {
                println!("{}", filter.stats());
                println!(
                    "Theoretical FPR: {:.6}",
                    theoretical_fpr(filter.capacity(), filter.len())
                );
            }
            ShellCommand::Load(path) => {
                if let Err(e) = load(filter, Path::new(path)) {
                    eprintln!("Error: {:#}", e);
                }
            }
            ShellCommand::Probe(path) => {
                match Dataset::open(path).and_then(|d| probe(filter, &d)) {
                    Ok(result) => println!(
                        "Positives: {}  Negatives: {}",
                        result.positives, result.negatives
                    ),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            ShellCommand::Query(key) => {
                let present = filter.contains(key);
                tally.record(present);
                println!(
                    "{} : {}  (positives: {}, negatives: {})",
                    key, present, tally.positives, tally.negatives
                );
            }
            ShellCommand::Usage(usage) => eprintln!("Usage: {}", usage),
            ShellCommand::Unknown(command) => {
                eprintln!("Unknown command: {}", command);
                print_help();
            }
        }
    }

    Ok(())
}

/// One line of shell input.
///
/// Arguments are trimmed: a key or path with leading or trailing whitespace
/// cannot be expressed at the prompt. Use `probe` with a file for such keys.
#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Load(&'a str),
    Query(&'a str),
    Probe(&'a str),
    Stats,
    Help,
    Quit,
    Usage(&'static str),
    Unknown(&'a str),
}

fn parse_command(line: &str) -> ShellCommand<'_> {
    let line = line.trim();
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };

    match (command, arg) {
        ("quit" | "exit", _) => ShellCommand::Quit,
        ("help", _) => ShellCommand::Help,
        ("stats", _) => ShellCommand::Stats,
        ("load", "") => ShellCommand::Usage("load <path>"),
        ("load", path) => ShellCommand::Load(path),
        ("query", "") => ShellCommand::Usage("query <key>"),
        ("query", key) => ShellCommand::Query(key),
        ("probe", "") => ShellCommand::Usage("probe <path>"),
        ("probe", path) => ShellCommand::Probe(path),
        _ => ShellCommand::Unknown(line),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  load <path>    insert every line of a file");
    println!("  query <key>    check one key");
    println!("  probe <path>   check every line of a file");
    println!("  stats          show filter statistics");
    println!("  quit           leave the shell");
}
