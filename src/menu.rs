use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, info, warn};

use wordtrie::{
    dictionary::{DictionaryRecord, DictionaryStore},
    Trie,
};

use crate::{query::LongestReport, Config};

#[derive(Args, Debug, Default)]
pub struct MenuArgs {
    /// Skip the banner and the menu listing before each prompt.
    #[arg(short, long)]
    quiet: bool,
}

pub async fn execute_menu(args: MenuArgs, config: &Config) -> anyhow::Result<()> {
    let (trie, store) = crate::open(config).await?;
    let mut session = Session::new(trie, store, config.limit);
    session.quiet = args.quiet;

    let input = tokio::io::BufReader::new(tokio::io::stdin());
    session.run(input, tokio::io::stdout()).await?;

    info!("Session ended with {} words", session.trie().count_words());
    Ok(())
}

const MENU: &str = "\
MENU:
1. Insert Word
2. Remove Word
3. Autocomplete (show all suggestions)
4. Count Words
5. Count words with prefix
6. Suggest longest word with prefix
7. Exit";

/// An interactive session over one trie and the store that mirrors it.
pub struct Session<S> {
    trie: Trie,
    store: S,
    limit: Option<usize>,
    quiet: bool,
}

impl<S: DictionaryStore> Session<S> {
    pub fn new(trie: Trie, store: S, limit: Option<usize>) -> Self {
        Self {
            trie,
            store,
            limit,
            quiet: false,
        }
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Serves menu choices until "Exit", end of input, or a non-numeric choice.
    pub async fn run<R, W>(&mut self, input: R, mut out: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        if !self.quiet {
            say(&mut out, "=== AUTOCOMPLETE SYSTEM ===").await?;
        }

        loop {
            if !self.quiet {
                say(&mut out, &format!("\n{}", MENU)).await?;
            }
            let Some(choice) = ask(&mut lines, &mut out, "Enter your choice: ").await? else {
                break;
            };
            let Ok(choice) = choice.parse::<u32>() else {
                say(&mut out, "Invalid input. Exiting...").await?;
                break;
            };
            debug!("Menu choice {}", choice);

            let keep_going = match choice {
                1 => self.insert(&mut lines, &mut out).await?,
                2 => self.remove(&mut lines, &mut out).await?,
                3 => self.autocomplete(&mut lines, &mut out).await?,
                4 => {
                    let total = self.trie.count_words();
                    say(&mut out, &format!("Total words in dictionary: {}", total)).await?;
                    true
                }
                5 => self.count_prefix(&mut lines, &mut out).await?,
                6 => self.longest(&mut lines, &mut out).await?,
                7 => {
                    say(&mut out, "Exiting...").await?;
                    false
                }
                _ => {
                    say(&mut out, "Invalid choice! Try again.").await?;
                    true
                }
            };
            if !keep_going {
                break;
            }
        }

        Ok(())
    }

    async fn insert<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(word) = ask(lines, out, "Enter word to insert: ").await? else {
            return Ok(false);
        };
        let word = word.to_ascii_lowercase();
        let Some(frequency) = ask(lines, out, "Enter frequency (for ranking): ").await? else {
            return Ok(false);
        };
        let Ok(frequency) = frequency.parse::<i64>() else {
            say(out, "Invalid frequency.").await?;
            return Ok(true);
        };

        if let Err(err) = self.trie.insert(&word, frequency) {
            say(out, &err.to_string()).await?;
            return Ok(true);
        }
        say(out, &format!("Inserted '{}' (freq={}).", word, frequency)).await?;

        match self
            .store
            .append(&DictionaryRecord::new(word, frequency))
            .await
        {
            Ok(()) => say(out, "Saved to dictionary.").await?,
            Err(err) => {
                warn!("Failed to persist insert: {}", err);
                say(out, &err.to_string()).await?;
            }
        }
        Ok(true)
    }

    async fn remove<R, W>(&mut self, lines: &mut Lines<R>, out: &mut W) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(word) = ask(lines, out, "Enter word to remove: ").await? else {
            return Ok(false);
        };
        let word = word.to_ascii_lowercase();

        match self.trie.remove(&word) {
            Ok(true) => {
                say(out, &format!("'{}' removed successfully.", word)).await?;
                if let Err(err) = self.store.remove(&word).await {
                    warn!("Failed to persist removal: {}", err);
                    say(out, &err.to_string()).await?;
                }
            }
            Ok(false) => say(out, "Word not found.").await?,
            Err(err) => say(out, &err.to_string()).await?,
        }
        Ok(true)
    }

    async fn autocomplete<R, W>(
        &mut self,
        lines: &mut Lines<R>,
        out: &mut W,
    ) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(prefix) = ask(lines, out, "Enter prefix: ").await? else {
            return Ok(false);
        };
        let prefix = prefix.to_ascii_lowercase();

        match self.trie.has_prefix(&prefix) {
            Ok(false) => {
                say(out, &format!("No suggestions found for '{}'.", prefix)).await?;
            }
            Ok(true) => {
                let ranked = self.trie.autocomplete_limited(&prefix, self.limit)?;
                say(out, &format!("\nSuggestions for '{}':", prefix)).await?;
                if ranked.is_empty() {
                    say(out, "  (none found)").await?;
                }
                for completion in ranked {
                    say(
                        out,
                        &format!("  {} (freq={})", completion.word, completion.frequency),
                    )
                    .await?;
                }
            }
            Err(err) => say(out, &err.to_string()).await?,
        }
        Ok(true)
    }

    async fn count_prefix<R, W>(
        &mut self,
        lines: &mut Lines<R>,
        out: &mut W,
    ) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(prefix) = ask(lines, out, "Enter prefix: ").await? else {
            return Ok(false);
        };
        let prefix = prefix.to_ascii_lowercase();

        match self.trie.count_with_prefix(&prefix) {
            Ok(count) => {
                say(
                    out,
                    &format!("Total words with prefix '{}': {}", prefix, count),
                )
                .await?
            }
            Err(err) => say(out, &err.to_string()).await?,
        }
        Ok(true)
    }

    async fn longest<R, W>(
        &mut self,
        lines: &mut Lines<R>,
        out: &mut W,
    ) -> anyhow::Result<bool>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let Some(prefix) = ask(lines, out, "Enter prefix: ").await? else {
            return Ok(false);
        };
        let prefix = prefix.to_ascii_lowercase();

        let text = match self.trie.longest_under_prefix(&prefix) {
            Ok(longest) => LongestReport::new(prefix, longest).to_string(),
            Err(err) => err.to_string(),
        };
        say(out, &text).await?;
        Ok(true)
    }
}

async fn say<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> std::io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

/// Prompts and returns the first token of the next non-blank line, or `None` at
/// end of input.
async fn ask<R, W>(
    lines: &mut Lines<R>,
    out: &mut W,
    prompt: &str,
) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    out.write_all(prompt.as_bytes()).await?;
    out.flush().await?;
    while let Some(line) = lines.next_line().await? {
        if let Some(token) = line.split_whitespace().next() {
            return Ok(Some(token.to_string()));
        }
    }
    Ok(None)
}
