use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use fxsa::index::{BuildConfig, Builder, INDEX_POINT_SIZE, SuffixArray, default_array_path};
use fxsa::output::Printer;
use fxsa::search::{Searcher, Seeker};
use fxsa::text::TextView;
use fxsa::utils::progress::BarProgress;
use fxsa::utils::tokenizer::Tokenizer;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "fxsa")]
#[command(version, about = "Suffix array indexer and substring search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the suffix array of a text file
    Index(IndexArgs),
    /// Search a text file through its suffix array
    Search(SearchArgs),
    /// Show the size of a text and its array
    Stats {
        file: PathBuf,

        /// Array file (default: FILE.ary)
        #[arg(short, long)]
        array: Option<PathBuf>,
    },
}

#[derive(Args)]
struct IndexArgs {
    file: PathBuf,

    /// Array file (default: FILE.ary)
    #[arg(short, long)]
    array: Option<PathBuf>,

    /// Index every character of the named encoding (UTF-8, EUC-JP, ...)
    #[arg(short = 'c', long = "encoding", value_name = "NAME", conflicts_with_all = ["line", "word"])]
    encoding: Option<String>,

    /// Index every line
    #[arg(short, long, conflicts_with = "word")]
    line: bool,

    /// Index every whitespace-delimited word
    #[arg(short, long)]
    word: bool,

    /// Sort block by block with blocks of KB kilobytes, then merge
    #[arg(short, long, value_name = "KB", num_args = 0..=1, default_missing_value = "4096")]
    block: Option<usize>,

    /// Worker threads for block sorting
    #[arg(short, long, requires = "block")]
    threads: Option<usize>,

    /// Only write the unsorted index points
    #[arg(short, long, conflicts_with = "sort")]
    index: bool,

    /// Only sort an existing array
    #[arg(short, long)]
    sort: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    quiet: bool,

    /// JSON build configuration; command-line flags override it
    #[arg(long, value_name = "JSON")]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct SearchArgs {
    pattern: String,

    file: PathBuf,

    /// Array file (default: FILE.ary)
    #[arg(short, long)]
    array: Option<PathBuf>,

    /// Also match PATTERN (repeatable)
    #[arg(long = "or", value_name = "PATTERN", conflicts_with = "ignore_case")]
    or: Vec<String>,

    /// Only print the number of occurrences
    #[arg(short, long)]
    count: bool,

    /// Match ASCII letters in either case
    #[arg(short, long)]
    ignore_case: bool,

    /// Print in suffix order instead of text order
    #[arg(short, long)]
    lexicographical: bool,

    /// Lines of trailing context
    #[arg(short = 'A', long, value_name = "NUM")]
    after_context: Option<usize>,

    /// Lines of leading context
    #[arg(short = 'B', long, value_name = "NUM")]
    before_context: Option<usize>,

    /// Lines of context on both sides
    #[arg(short = 'C', long, value_name = "NUM", num_args = 0..=1, default_missing_value = "2")]
    context: Option<usize>,

    /// Print the region starting at the closest TAG before each occurrence
    #[arg(short, long, value_name = "TAG", requires = "end")]
    start: Option<String>,

    /// Print the region ending at the closest TAG after each occurrence
    #[arg(short, long, value_name = "TAG", requires = "start")]
    end: Option<String>,

    /// Highlight matches
    #[arg(short = 'p', long)]
    highlight: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index(args) => run_index(args),
        Commands::Search(args) => run_search(args),
        Commands::Stats { file, array } => run_stats(&file, array),
    }
}

fn build_config(args: &IndexArgs) -> Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)?,
        None => BuildConfig::default(),
    };

    if let Some(name) = &args.encoding {
        config.tokenizer = match Tokenizer::from_codeset(name) {
            Some(tokenizer) => tokenizer,
            None => bail!("unknown encoding: {}", name),
        };
    }
    if args.line {
        config.tokenizer = Tokenizer::Line;
    }
    if args.word {
        config.tokenizer = Tokenizer::Word;
    }
    if let Some(kb) = args.block {
        config.block_size = Some(block_bytes(kb)?);
    }
    if let Some(threads) = args.threads {
        config.threads = threads;
    }

    config.validate()?;
    Ok(config)
}

/// Block size in bytes for `-b KB`; 0 KB means one index point per block
fn block_bytes(kb: usize) -> Result<usize> {
    match kb.checked_mul(1024) {
        Some(bytes) => Ok(bytes.max(INDEX_POINT_SIZE)),
        None => bail!("block size of {} KB is too large", kb),
    }
}

fn run_index(args: IndexArgs) -> Result<()> {
    let config = build_config(&args)?;
    let mut builder = Builder::new(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?
        .with_config(config);
    if let Some(array) = &args.array {
        builder = builder.with_array_path(array);
    }
    if !args.quiet {
        builder = builder.with_progress(Arc::new(BarProgress::new()));
    }

    if args.index {
        let count = builder.index()?;
        if !args.quiet {
            println!("{} index points written to {}", count, builder.array_path().display());
        }
    } else if args.sort {
        builder.sort()?;
        if !args.quiet {
            println!("Sorted {}", builder.array_path().display());
        }
    } else {
        let count = builder.index_and_sort()?;
        if !args.quiet {
            println!("{} index points sorted into {}", count, builder.array_path().display());
        }
    }

    Ok(())
}

fn run_search(args: SearchArgs) -> Result<()> {
    let mut searcher = match &args.array {
        Some(array) => Searcher::open_with_array(&args.file, array),
        None => Searcher::open(&args.file),
    }
    .with_context(|| format!("Failed to open index for {}", args.file.display()))?;

    let mut patterns = vec![args.pattern.as_bytes().to_vec()];
    patterns.extend(args.or.iter().map(|p| p.as_bytes().to_vec()));

    let found = if patterns.len() > 1 {
        searcher.multi_search(&patterns)
    } else if args.ignore_case {
        searcher.case_insensitive_search(&patterns[0])
    } else {
        searcher.search(&patterns[0])
    };

    let mut printer =
        Printer::stdout(args.highlight).with_patterns(patterns, args.ignore_case);

    if args.count {
        printer.count(searcher.count_occurrences())?;
        return Ok(());
    }
    if !found {
        return Ok(());
    }
    if !args.lexicographical {
        searcher.sort_occurrences();
    }

    let (seeker, separated) = match (&args.start, &args.end) {
        (Some(start), Some(end)) => (
            Seeker::Tagged {
                start: start.as_bytes(),
                end: end.as_bytes(),
            },
            true,
        ),
        _ => {
            let backward = args.before_context.or(args.context).unwrap_or(0);
            let forward = args.after_context.or(args.context).unwrap_or(0);
            let separated = args.before_context.is_some()
                || args.after_context.is_some()
                || args.context.is_some();
            (Seeker::Lines { backward, forward }, separated)
        }
    };

    let mut first = true;
    while let Some(region) = searcher.next_region(&seeker) {
        if separated && !first {
            printer.separator()?;
        }
        printer.region(searcher.region_text(region))?;
        first = false;
    }
    printer.flush()?;

    Ok(())
}

fn run_stats(file: &Path, array: Option<PathBuf>) -> Result<()> {
    let array_path = array.unwrap_or_else(|| default_array_path(file));
    let text = TextView::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let array = SuffixArray::open(&array_path)
        .with_context(|| format!("Failed to open {}", array_path.display()))?;

    println!("Text:         {}", file.display());
    println!("Text size:    {} bytes", text.len());
    println!("Array:        {}", array_path.display());
    println!("Index points: {}", array.len());
    println!(
        "Array size:   {} bytes",
        array.len() * INDEX_POINT_SIZE
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_bytes() {
        assert_eq!(block_bytes(0).unwrap(), INDEX_POINT_SIZE);
        assert_eq!(block_bytes(4096).unwrap(), 4096 * 1024);
        assert!(block_bytes(usize::MAX).is_err());
        assert!(block_bytes(usize::MAX / 1024 + 1).is_err());
        assert_eq!(block_bytes(usize::MAX / 1024).unwrap(), usize::MAX / 1024 * 1024);
    }
}
