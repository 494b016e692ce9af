use clap::Args;
use tracing::info;

use wordtrie::dictionary::{snapshot, DictionaryRecord, DictionaryStore};

use crate::Config;

#[derive(Args, Debug)]
pub struct InsertArgs {
    #[arg(name = "WORD")]
    word: String,
    /// Ranking weight; replaces the previous value if the word is already stored.
    #[arg(name = "FREQUENCY", allow_negative_numbers = true)]
    frequency: i64,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[arg(name = "WORD")]
    word: String,
}

pub async fn execute_insert(args: InsertArgs, config: &Config) -> anyhow::Result<()> {
    let (mut trie, store) = crate::open(config).await?;
    let word = args.word.to_ascii_lowercase();

    let previous = trie.insert(&word, args.frequency)?;
    store
        .append(&DictionaryRecord::new(word.as_str(), args.frequency))
        .await?;

    match previous {
        Some(old) => info!("Replaced '{}' frequency {} with {}", word, old, args.frequency),
        None => info!("Inserted '{}'", word),
    }
    println!("Inserted '{}' (freq={}).", word, args.frequency);
    Ok(())
}

pub async fn execute_remove(args: RemoveArgs, config: &Config) -> anyhow::Result<()> {
    let (mut trie, store) = crate::open(config).await?;
    let word = args.word.to_ascii_lowercase();

    if !trie.remove(&word)? {
        anyhow::bail!("Word not found: '{}'", word);
    }
    store.remove(&word).await?;
    println!("'{}' removed successfully.", word);
    Ok(())
}

/// Rewrites the dictionary with one line per stored word, dropping superseded
/// and malformed lines.
pub async fn execute_compact(config: &Config) -> anyhow::Result<()> {
    let (trie, store) = crate::open(config).await?;
    let records = snapshot(&trie);
    store.rewrite(&records).await?;
    println!(
        "Compacted {} to {} words.",
        store.path().display(),
        records.len()
    );
    Ok(())
}
