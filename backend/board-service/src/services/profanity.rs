use crate::config::ModerationConfig;
use crate::error::{AppError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use unicode_segmentation::UnicodeSegmentation;

const DEFAULT_WORDS: &str = include_str!("../../data/profanity_words.txt");

/// Word-level profanity masking.
///
/// Text is split on Unicode word boundaries; every segment found in the word
/// list (case-insensitive) is replaced by the placeholder repeated once per
/// character. Everything else, whitespace and punctuation included, is kept
/// verbatim. The filter never rejects input.
pub struct ProfanityFilter {
    words: HashSet<String>,
    placeholder: char,
}

impl ProfanityFilter {
    pub fn new<I, S>(words: I, placeholder: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        Self { words, placeholder }
    }

    /// The built-in list with the default `*` placeholder.
    pub fn with_default_words() -> Self {
        Self::new(parse_word_list(DEFAULT_WORDS), '*')
    }

    /// Built-in list, extended by the configured word file if any.
    pub fn from_config(config: &ModerationConfig) -> Result<Self> {
        let mut words = parse_word_list(DEFAULT_WORDS);
        if let Some(path) = &config.words_path {
            let extra = Self::load_words(path)?;
            tracing::info!(path = %path, count = extra.len(), "loaded extra profanity words");
            words.extend(extra);
        }

        Ok(Self::new(words, config.placeholder))
    }

    /// Load words from file, one per line; blank lines and `#` comments are skipped.
    pub fn load_words(path: impl AsRef<Path>) -> Result<Vec<String>> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Config(format!(
                "Failed to load profanity words from {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Ok(parse_word_list(&content))
    }

    pub fn is_profane(&self, text: &str) -> bool {
        text.unicode_words().any(|word| self.is_listed(word))
    }

    pub fn clean(&self, text: &str) -> String {
        text.split_word_bounds()
            .map(|segment| {
                if self.is_listed(segment) {
                    self.mask(segment)
                } else {
                    segment.to_string()
                }
            })
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    fn is_listed(&self, segment: &str) -> bool {
        self.words.contains(&segment.to_lowercase())
    }

    fn mask(&self, segment: &str) -> String {
        std::iter::repeat(self.placeholder)
            .take(segment.chars().count())
            .collect()
    }
}

fn parse_word_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_lowercase)
        .collect()
}
