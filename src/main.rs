//! snaptree - snapshot a directory tree and filter or serialize it.
//!
//! Usage:
//!   snaptree snapshot [TOP]      Walk TOP and print the encoded tree
//!   snaptree filter [INPUT]      Filter an encoded tree by path regex
//!   snaptree list [INPUT]        Print every file path in an encoded tree
//!   snaptree stats [INPUT]       Print file and directory counts
//!   snaptree --help              Show help

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use snaptree_core::{PathFilter, SnapshotConfig, Tree, decode, encode, encode_pretty};
use snaptree_scan::snapshot_with_summary;

#[derive(Parser)]
#[command(
    name = "snaptree",
    version,
    about = "Snapshot a directory tree, following links safely",
    long_about = "snaptree walks a directory, follows symbolic links while keeping every \
                  resolved path inside a set of valid roots, and prints the resulting \
                  tree as JSON. Encoded trees can be filtered and listed later."
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Walk a directory and print its encoded tree
    Snapshot {
        /// Directory to walk
        #[arg(default_value = ".")]
        top: PathBuf,

        /// Valid root; links resolving outside every root are dropped (defaults to TOP)
        #[arg(short, long = "root")]
        roots: Vec<PathBuf>,

        /// Gitignore-style pattern to skip, relative to TOP
        #[arg(short, long = "ignore")]
        ignores: Vec<String>,

        /// Keep only files whose path matches this regex (from the start)
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// TOML config providing top, valid_roots, ignore_patterns and filters
        #[arg(short, long, conflicts_with_all = ["roots", "ignores", "filters"])]
        config: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Filter an encoded tree
    Filter {
        /// Encoded tree file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Keep only files whose path matches this regex (from the start)
        #[arg(short, long = "filter", required = true)]
        filters: Vec<String>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the output
        #[arg(long)]
        pretty: bool,
    },

    /// Print every file path of an encoded tree
    List {
        /// Encoded tree file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Print file and directory counts of an encoded tree
    Stats {
        /// Encoded tree file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_tracing(&cli);
    let quiet = cli.quiet;

    match cli.command {
        Command::Snapshot {
            top,
            roots,
            ignores,
            filters,
            config,
            output,
            pretty,
        } => {
            let config = match config {
                Some(path) => SnapshotConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => build_config(top, roots, ignores, filters)?,
            };
            run_snapshot(&config, output.as_deref(), pretty, quiet)?;
        }
        Command::Filter {
            input,
            filters,
            output,
            pretty,
        } => {
            run_filter(&input, &filters, output.as_deref(), pretty, quiet)?;
        }
        Command::List { input } => {
            let tree = read_tree(&input)?;
            let mut stdout = io::stdout().lock();
            for path in tree.file_paths() {
                writeln!(stdout, "{path}")?;
            }
        }
        Command::Stats { input } => {
            let stats = read_tree(&input)?.stats();
            println!("{} files, {} directories", stats.files, stats.dirs);
            println!("max depth {}", stats.max_depth);
        }
    }

    Ok(())
}

fn setup_tracing(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::OFF
    } else {
        match cli.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .compact()
        .init();
}

fn build_config(
    top: PathBuf,
    roots: Vec<PathBuf>,
    ignores: Vec<String>,
    filters: Vec<String>,
) -> Result<SnapshotConfig> {
    if !top.exists() {
        bail!("Top path does not exist: {}", top.display());
    }
    let roots = if roots.is_empty() { vec![top.clone()] } else { roots };

    SnapshotConfig::builder()
        .top(top)
        .valid_roots(roots)
        .ignore_patterns(ignores)
        .filters(filters)
        .build()
        .context("Invalid snapshot options")
}

/// Walk, filter and write the encoded tree. Status lines go to stderr
/// unless `quiet` is set.
fn run_snapshot(
    config: &SnapshotConfig,
    output: Option<&Path>,
    pretty: bool,
    quiet: bool,
) -> Result<()> {
    debug!(?config, "Running snapshot");
    let (tree, summary) = snapshot_with_summary(config).context("Snapshot failed")?;

    if !quiet {
        eprintln!(
            "{} files, {} directories ({} skipped) in {:.2}s",
            summary.files,
            summary.dirs,
            summary.skipped(),
            summary.elapsed.as_secs_f64()
        );
    }
    write_tree(&tree, output, pretty, quiet)
}

fn run_filter(
    input: &Path,
    filters: &[String],
    output: Option<&Path>,
    pretty: bool,
    quiet: bool,
) -> Result<()> {
    let filters = PathFilter::many(filters).context("Invalid filter")?;
    let tree = read_tree(input)?;
    write_tree(&tree.filter(&filters), output, pretty, quiet)
}

fn read_tree(input: &Path) -> Result<Tree> {
    let text = if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        text
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?
    };
    decode(&text).context("Failed to decode tree")
}

fn write_tree(tree: &Tree, output: Option<&Path>, pretty: bool, quiet: bool) -> Result<()> {
    let text = if pretty { encode_pretty(tree)? } else { encode(tree)? };

    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!("Wrote {}", path.display());
            }
        }
        None => println!("{text}"),
    }
    Ok(())
}
