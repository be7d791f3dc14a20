use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::sampler::SAMPLE_SIZE;

pub const DEFAULT_WORDBANK_PATH: &str = "bank.db";

/// Fallback words offered when no word bank file exists.
pub const DEFAULT_WORDS: [&str; 35] = [
    "love", "faith", "hope", "peace", "grace", "mercy", "truth", "light",
    "wisdom", "strength", "joy", "blessing", "prayer", "spirit", "soul",
    "heaven", "eternal", "divine", "holy", "sacred", "glory", "praise",
    "salvation", "redemption", "forgiveness", "covenant", "promise", "miracle",
    "shepherd", "lamb", "cross", "resurrection", "life", "death", "rebirth",
];

#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    #[error("failed to read word bank '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// The candidate words, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordBank {
    words: Vec<String>,
}

impl WordBank {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// True when the bank holds enough words for one pull.
    pub fn is_usable(&self) -> bool {
        self.words.len() >= SAMPLE_SIZE
    }
}

/// Result of looking for the word bank at startup.
#[derive(Debug, PartialEq, Eq)]
pub enum WordBankStatus {
    Loaded(WordBank),
    TooSmall(WordBank),
    Missing,
}

fn normalize_word(line: &str) -> Option<String> {
    let word = line.trim().to_lowercase();
    (word.chars().count() > 2).then_some(word)
}

pub fn load_wordbank_from_str(data: &str) -> WordBank {
    WordBank::new(data.lines().filter_map(normalize_word).collect())
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> io::Result<WordBank> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize_word(&line?) {
            words.push(word);
        }
    }
    Ok(WordBank::new(words))
}

pub fn load_wordbank<P: AsRef<Path>>(path: P) -> Result<WordBankStatus, WordBankError> {
    let path = path.as_ref();
    if !path.exists() {
        log::warn!("word bank not found at {}", path.display());
        return Ok(WordBankStatus::Missing);
    }

    let bank = load_wordbank_from_file(path).map_err(|source| WordBankError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("loaded {} words from {}", bank.len(), path.display());

    if bank.is_usable() {
        Ok(WordBankStatus::Loaded(bank))
    } else {
        Ok(WordBankStatus::TooSmall(bank))
    }
}

pub fn write_default_wordbank<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref();
    fs::write(path, DEFAULT_WORDS.join("\n"))?;
    log::info!("wrote default word bank to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_from_str_normalizes() {
        let bank = load_wordbank_from_str("  Grace \nLAMB\n\nox\n  \nmercy");
        assert_eq!(bank.words(), ["grace", "lamb", "mercy"]);
    }

    #[test]
    fn test_load_from_str_keeps_duplicates() {
        let bank = load_wordbank_from_str("hope\nHope\nhope");
        assert_eq!(bank.len(), 3);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // two characters, four bytes
        let bank = load_wordbank_from_str("éé\néèê");
        assert_eq!(bank.words(), ["éèê"]);
    }

    #[test]
    fn test_missing_file_reports_missing() {
        let dir = tempdir().unwrap();
        let status = load_wordbank(dir.path().join("bank.db")).unwrap();
        assert_eq!(status, WordBankStatus::Missing);
    }

    #[test]
    fn test_small_file_reports_too_small() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.db");
        fs::write(&path, "love\nfaith\nhope").unwrap();

        match load_wordbank(&path).unwrap() {
            WordBankStatus::TooSmall(bank) => assert_eq!(bank.len(), 3),
            other => panic!("Expected TooSmall, got {other:?}"),
        }
    }

    #[test]
    fn test_default_wordbank_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bank.db");
        write_default_wordbank(&path).unwrap();

        match load_wordbank(&path).unwrap() {
            WordBankStatus::Loaded(bank) => {
                assert_eq!(bank.len(), DEFAULT_WORDS.len());
                assert_eq!(bank.words()[0], "love");
                assert_eq!(bank.words()[34], "rebirth");
            }
            other => panic!("Expected Loaded, got {other:?}"),
        }
    }

    #[test]
    fn test_default_words_survive_normalization() {
        let bank = load_wordbank_from_str(&DEFAULT_WORDS.join("\n"));
        assert_eq!(bank.len(), 35);
        assert!(bank.is_usable());
    }
}
