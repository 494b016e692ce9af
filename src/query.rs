use clap::Args;
use serde::Serialize;
use tracing::debug;

use wordtrie::{Completion, Longest, Trie};

use crate::Config;

#[derive(Args, Debug)]
pub struct PrefixArgs {
    /// Prefix to look up. Omit to match every word.
    #[arg(name = "PREFIX")]
    pub prefix: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LongestReport {
    NoMatch { prefix: String },
    NoLongerWord { prefix: String },
    Found { prefix: String, word: String },
}

impl LongestReport {
    pub fn new(prefix: String, longest: Longest) -> Self {
        match longest {
            Longest::NoMatch => Self::NoMatch { prefix },
            Longest::NoLongerWord => Self::NoLongerWord { prefix },
            Longest::Found(word) => Self::Found { prefix, word },
        }
    }
}

impl std::fmt::Display for LongestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch { prefix } => write!(f, "No words found with prefix '{}'.", prefix),
            Self::NoLongerWord { prefix } => {
                write!(f, "No longer word found beyond prefix '{}'.", prefix)
            }
            Self::Found { prefix, word } => {
                write!(f, "Longest word for prefix '{}' is: {}", prefix, word)
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct CountReport<'a> {
    prefix: Option<&'a str>,
    count: usize,
}

/// Ranked completions for `prefix`, or `None` when nothing starts with it.
pub fn complete(
    trie: &Trie,
    prefix: &str,
    limit: Option<usize>,
) -> anyhow::Result<Option<Vec<Completion>>> {
    if !trie.has_prefix(prefix)? {
        return Ok(None);
    }
    Ok(Some(trie.autocomplete_limited(prefix, limit)?))
}

pub async fn execute_complete(args: PrefixArgs, config: &Config) -> anyhow::Result<()> {
    let (trie, _) = crate::open(config).await?;
    let prefix = args.prefix.unwrap_or_default().to_ascii_lowercase();
    let completions = complete(&trie, &prefix, config.limit)?;
    debug!("Completions for {:?}: {:?}", prefix, completions);

    if config.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&completions.unwrap_or_default())?
        );
        return Ok(());
    }

    match completions {
        None => println!("No suggestions found for '{}'.", prefix),
        Some(completions) if completions.is_empty() => println!("  (none found)"),
        Some(completions) => {
            for completion in completions {
                println!("{} (freq={})", completion.word, completion.frequency);
            }
        }
    }
    Ok(())
}

pub async fn execute_count(config: &Config) -> anyhow::Result<()> {
    let (trie, _) = crate::open(config).await?;
    let count = trie.count_words();

    if config.json {
        let report = CountReport {
            prefix: None,
            count,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Total words in dictionary: {}", count);
    }
    Ok(())
}

pub async fn execute_count_prefix(args: PrefixArgs, config: &Config) -> anyhow::Result<()> {
    let (trie, _) = crate::open(config).await?;
    let prefix = args.prefix.unwrap_or_default().to_ascii_lowercase();
    let count = trie.count_with_prefix(&prefix)?;

    if config.json {
        let report = CountReport {
            prefix: Some(&prefix),
            count,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Total words with prefix '{}': {}", prefix, count);
    }
    Ok(())
}

pub async fn execute_longest(args: PrefixArgs, config: &Config) -> anyhow::Result<()> {
    let (trie, _) = crate::open(config).await?;
    let prefix = args.prefix.unwrap_or_default().to_ascii_lowercase();
    let longest = trie.longest_under_prefix(&prefix)?;
    let report = LongestReport::new(prefix, longest);

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
