use std::{fs::File, path::PathBuf, sync::Mutex, time::Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};

use wordtrie::{
    dictionary::{populate, DictionaryStore, FileDictionary, DEFAULT_DICTIONARY},
    Trie,
};

mod edit;
mod menu;
mod query;

/// Word store with frequency-ranked prefix completion.
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Autocomplete words from a frequency-ranked dictionary."
)]
struct Cli {
    /// Dictionary file of `word frequency` lines.
    #[arg(short, long, global = true, default_value = DEFAULT_DICTIONARY)]
    dictionary: PathBuf,

    /// Keep at most this many matches per completion query.
    #[arg(short, long, global = true)]
    limit: Option<usize>,

    /// Print query results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive numbered menu (the default).
    Menu(menu::MenuArgs),
    /// Store a word, or replace its frequency.
    Insert(edit::InsertArgs),
    /// Remove a word.
    Remove(edit::RemoveArgs),
    /// List words under a prefix, most frequent first.
    Complete(query::PrefixArgs),
    /// Count every stored word.
    Count,
    /// Count the words under a prefix.
    CountPrefix(query::PrefixArgs),
    /// Longest word under a prefix.
    Longest(query::PrefixArgs),
    /// Rewrite the dictionary with one line per stored word.
    Compact,
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Config {
    pub dictionary: PathBuf,
    pub limit: Option<usize>,
    pub json: bool,
}

impl From<&Cli> for Config {
    fn from(cli: &Cli) -> Self {
        Self {
            dictionary: cli.dictionary.clone(),
            limit: cli.limit,
            json: cli.json,
        }
    }
}

/// Loads the configured dictionary into a fresh trie.
pub async fn open(config: &Config) -> anyhow::Result<(Trie, FileDictionary)> {
    let store = FileDictionary::new(&config.dictionary);
    let records = store
        .load()
        .await
        .with_context(|| format!("loading {}", config.dictionary.display()))?;

    let mut trie = Trie::new();
    let applied = populate(&mut trie, &records);
    info!(
        "Loaded {} of {} records, {} words",
        applied,
        records.len(),
        trie.count_words()
    );
    Ok((trie, store))
}

fn init_logging(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_max_level(Level::DEBUG)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_writer(std::io::stderr)
            .init(),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_ref())?;

    let config = Config::from(&cli);
    info!("Config: {:?}", config);

    let start = Instant::now();
    let res = match cli.command {
        None => menu::execute_menu(menu::MenuArgs::default(), &config).await,
        Some(Command::Menu(args)) => menu::execute_menu(args, &config).await,
        Some(Command::Insert(args)) => edit::execute_insert(args, &config).await,
        Some(Command::Remove(args)) => edit::execute_remove(args, &config).await,
        Some(Command::Complete(args)) => query::execute_complete(args, &config).await,
        Some(Command::Count) => query::execute_count(&config).await,
        Some(Command::CountPrefix(args)) => query::execute_count_prefix(args, &config).await,
        Some(Command::Longest(args)) => query::execute_longest(args, &config).await,
        Some(Command::Compact) => edit::execute_compact(&config).await,
    };
    debug!("Command took {} ms", start.elapsed().as_millis());

    res
}
