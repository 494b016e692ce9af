use std::{
    fmt,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::{ranking::RankedCollector, trie::Trie};

pub const DEFAULT_DICTIONARY: &str = "dictionary.txt";

/// One `word frequency` line of a dictionary file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DictionaryRecord {
    pub word: String,
    pub frequency: i64,
}

impl DictionaryRecord {
    pub fn new(word: impl Into<String>, frequency: i64) -> Self {
        Self {
            word: word.into(),
            frequency,
        }
    }

    /// Parses a non-blank line. Words are lower-cased; anything but exactly two
    /// whitespace-separated tokens is rejected.
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let word = tokens.next()?;
        let frequency = tokens.next()?.parse().ok()?;
        if tokens.next().is_some() {
            return None;
        }
        Some(Self::new(word.to_ascii_lowercase(), frequency))
    }
}

impl fmt::Display for DictionaryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.word, self.frequency)
    }
}

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to access dictionary {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot persist '{}': words must be non-empty and contain no whitespace", .0.word)]
    Record(DictionaryRecord),
}

/// Backing storage for the words held in a [`Trie`].
#[async_trait::async_trait]
pub trait DictionaryStore {
    /// Every well-formed record, in storage order. Later records for the same
    /// word supersede earlier ones.
    async fn load(&self) -> Result<Vec<DictionaryRecord>, DictionaryError>;

    async fn append(&self, record: &DictionaryRecord) -> Result<(), DictionaryError>;

    /// Drops every record for `word`. Returns whether any was dropped.
    async fn remove(&self, word: &str) -> Result<bool, DictionaryError>;

    /// Replaces the stored records with `records`.
    async fn rewrite(&self, records: &[DictionaryRecord]) -> Result<(), DictionaryError>;
}

/// A line-oriented text dictionary on disk.
#[derive(Debug, Clone)]
pub struct FileDictionary {
    path: PathBuf,
}

impl FileDictionary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> DictionaryError {
        DictionaryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Contents of the file, or `None` if it does not exist yet.
    async fn read(&self) -> Result<Option<String>, DictionaryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(err)),
        }
    }

    /// Writes `contents` next to the dictionary and renames it into place.
    async fn replace(&self, contents: String) -> Result<(), DictionaryError> {
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);

        tokio::fs::write(&tmp_path, contents)
            .await
            .map_err(|e| self.io_error(e))?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))
    }
}

fn check_record(record: &DictionaryRecord) -> Result<(), DictionaryError> {
    if record.word.is_empty() || record.word.contains(char::is_whitespace) {
        return Err(DictionaryError::Record(record.clone()));
    }
    Ok(())
}

#[async_trait::async_trait]
impl DictionaryStore for FileDictionary {
    async fn load(&self) -> Result<Vec<DictionaryRecord>, DictionaryError> {
        let Some(contents) = self.read().await? else {
            info!(
                "No existing dictionary at {}, starting fresh",
                self.path.display()
            );
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match DictionaryRecord::parse(line) {
                Some(record) => records.push(record),
                None => warn!(
                    "Skipping malformed line {} of {}: {:?}",
                    line_no + 1,
                    self.path.display(),
                    line
                ),
            }
        }

        info!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    async fn append(&self, record: &DictionaryRecord) -> Result<(), DictionaryError> {
        check_record(record)?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(format!("{}\n", record).as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        debug!("Appended '{}' to {}", record, self.path.display());
        Ok(())
    }

    async fn remove(&self, word: &str) -> Result<bool, DictionaryError> {
        let Some(contents) = self.read().await? else {
            debug!("{} not found, nothing to remove", self.path.display());
            return Ok(false);
        };

        let mut found = false;
        let mut kept = String::with_capacity(contents.len());
        for line in contents.lines() {
            let matches = DictionaryRecord::parse(line).is_some_and(|r| r.word == word);
            if matches {
                found = true;
            } else {
                kept.push_str(line);
                kept.push('\n');
            }
        }

        if found {
            self.replace(kept).await?;
            debug!("Removed '{}' from {}", word, self.path.display());
        } else {
            debug!("'{}' not present in {}", word, self.path.display());
        }
        Ok(found)
    }

    async fn rewrite(&self, records: &[DictionaryRecord]) -> Result<(), DictionaryError> {
        let mut contents = String::new();
        for record in records {
            check_record(record)?;
            contents.push_str(&format!("{}\n", record));
        }
        self.replace(contents).await?;

        info!(
            "Rewrote {} with {} records",
            self.path.display(),
            records.len()
        );
        Ok(())
    }
}

/// Inserts `records` into `trie` in order, skipping words the trie rejects.
/// Returns how many records were applied.
pub fn populate(trie: &mut Trie, records: &[DictionaryRecord]) -> usize {
    let mut applied = 0;
    for record in records {
        match trie.insert(&record.word, record.frequency) {
            Ok(_) => applied += 1,
            Err(err) => warn!("Skipping dictionary entry: {}", err),
        }
    }
    applied
}

/// The words held by `trie`, alphabetically.
pub fn snapshot(trie: &Trie) -> Vec<DictionaryRecord> {
    // Depth-first a..=z collection is already alphabetical.
    trie.collect("", None)
        .map(RankedCollector::into_entries)
        .unwrap_or_default()
        .into_iter()
        .map(|c| DictionaryRecord::new(c.word, c.frequency))
        .collect()
}
