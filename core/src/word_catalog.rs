//! Word list loaded once and shared read-only by every experiment run.

use std::fs::File;
use std::io::{BufRead, BufReader};

use crate::error::{ExperimentError, ExperimentResult};

/// Candidate words bucketed by length, `1..=max_len`.
///
/// There is no way to add words after construction, so a `&WordCatalog`
/// can be handed to any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCatalog {
    // buckets[0] holds words of length 1.
    buckets: Vec<Vec<String>>,
}

impl WordCatalog {
    /// Open and parse a word list file.
    pub fn load(path: &str, max_len: usize) -> ExperimentResult<Self> {
        let file = File::open(path).map_err(|source| ExperimentError::ResourceUnavailable {
            path: path.to_string(),
            source,
        })?;
        let catalog = Self::from_reader(BufReader::new(file), max_len).map_err(|source| {
            ExperimentError::ResourceUnavailable {
                path: path.to_string(),
                source,
            }
        })?;
        log::info!("word list {path}: loaded {} words", catalog.total_words());
        Ok(catalog)
    }

    /// Parse a line-oriented list of quoted words.
    ///
    /// Lines are read as raw bytes, so an entry in another encoding is
    /// skipped like any other non-alphabetic entry. Only read failures
    /// are errors.
    pub fn from_reader<R: BufRead>(reader: R, max_len: usize) -> std::io::Result<Self> {
        let mut buckets = vec![Vec::new(); max_len];
        for line in reader.split(b'\n') {
            let line = line?;
            if let Some(word) = parse_line(&line) {
                if word.len() <= max_len {
                    buckets[word.len() - 1].push(word);
                }
            }
        }
        Ok(Self { buckets })
    }

    /// Build directly from words; entries that do not parse as a bare
    /// word or exceed `max_len` are skipped.
    pub fn from_words<I, S>(words: I, max_len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut buckets = vec![Vec::new(); max_len];
        for word in words {
            if let Some(word) = normalize(word.as_ref().as_bytes()) {
                if word.len() <= max_len {
                    buckets[word.len() - 1].push(word);
                }
            }
        }
        Self { buckets }
    }

    /// Longest word length this catalog can hold.
    pub fn max_len(&self) -> usize {
        self.buckets.len()
    }

    /// Words of exactly `len` characters, in load order.
    pub fn bucket(&self, len: usize) -> &[String] {
        match len {
            0 => &[],
            _ => self.buckets.get(len - 1).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn total_words(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// One-line summary of bucket sizes, e.g. `ENV: WORD DB { [1]=0, [2]=4 }`.
    pub fn describe(&self) -> String {
        let counts: Vec<String> = self
            .buckets
            .iter()
            .enumerate()
            .map(|(i, bucket)| format!("[{}]={}", i + 1, bucket.len()))
            .collect();
        format!("ENV: WORD DB {{ {} }}", counts.join(", "))
    }
}

fn parse_line(line: &[u8]) -> Option<String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let unquoted = line
        .strip_prefix(b"\"")
        .and_then(|rest| rest.strip_suffix(b"\""))
        .unwrap_or(line);
    normalize(unquoted)
}

fn normalize(word: &[u8]) -> Option<String> {
    if word.is_empty() || !word.iter().all(u8::is_ascii_alphabetic) {
        return None;
    }
    Some(word.iter().map(|&b| char::from(b.to_ascii_lowercase())).collect())
}
