/*!
 * Character timing and word span extraction.
 *
 * Voice synthesis reports one timing record per synthesized character, each
 * tagged with the word it belongs to. This module parses that alignment
 * payload and groups maximal same-word runs into `WordSpan` values, the
 * time base for captioning.
 */

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::TimingError;

/// Per-character timing record as reported by voice synthesis.
/// Records are ordered by start time and do not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterTiming {
    /// The synthesized glyph
    pub character: String,
    /// Character onset in seconds
    pub start: f64,
    /// Character end in seconds
    pub end: f64,
    /// Onset of the enclosing word in seconds
    pub word_start: f64,
    /// End of the enclosing word in seconds
    pub word_end: f64,
    /// The enclosing word
    pub word: String,
}

/// Time interval during which one spoken word is the current word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordSpan {
    /// The spoken word
    pub word: String,
    /// Span onset in seconds
    pub start: f64,
    /// Span end in seconds
    pub end: f64,
}

impl WordSpan {
    /// Create a new word span
    pub fn new<S: Into<String>>(word: S, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }

    /// Length of the span in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Group a character timing stream into maximal same-word runs.
///
/// A new span opens whenever the `word` tag differs from the one before it,
/// so repeated words separated by other words produce separate spans while
/// an uninterrupted run stays a single span. Interior spans close at the
/// start of the next word's first character, which keeps each caption on
/// screen through any trailing silence; the final span closes at its own
/// last character's end.
pub fn build_word_spans(characters: &[CharacterTiming]) -> Result<Vec<WordSpan>, TimingError> {
    let first = characters.first().ok_or(TimingError::EmptyInput)?;

    let mut spans = Vec::new();
    let mut current_word = &first.word;
    let mut span_start = first.start;

    for timing in &characters[1..] {
        if timing.word != *current_word {
            spans.push(WordSpan::new(current_word.clone(), span_start, timing.start));
            current_word = &timing.word;
            span_start = timing.start;
        }
    }

    let last = &characters[characters.len() - 1];
    spans.push(WordSpan::new(current_word.clone(), span_start, last.end));

    Ok(spans)
}

/// Alignment payload written by the synthesis step: one record per word,
/// each carrying the characters it was synthesized from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAlignment {
    /// Words in spoken order
    pub words: Vec<AlignedWord>,
}

/// One word of the alignment payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedWord {
    /// The spoken word
    pub word: String,
    /// Word onset in seconds
    pub start: f64,
    /// Word end in seconds
    pub end: f64,
    /// Characters of the word in spoken order
    pub characters: Vec<AlignedCharacter>,
}

/// One character of an aligned word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedCharacter {
    /// The synthesized glyph
    pub character: String,
    /// Character onset in seconds
    pub start: f64,
    /// Character end in seconds
    pub end: f64,
}

impl VoiceAlignment {
    /// Parse an alignment payload from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse voice alignment JSON")
    }

    /// Read and parse an alignment payload from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read alignment file: {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Flatten the nested payload into the per-character stream that
    /// span grouping consumes
    pub fn flatten(&self) -> Vec<CharacterTiming> {
        let mut characters = Vec::new();
        for word in &self.words {
            for ch in &word.characters {
                characters.push(CharacterTiming {
                    character: ch.character.clone(),
                    start: ch.start,
                    end: ch.end,
                    word_start: word.start,
                    word_end: word.end,
                    word: word.word.clone(),
                });
            }
        }
        characters
    }

    /// End of the final word in seconds; zero for an empty alignment.
    /// Serves as the voice track length when no probe result is available.
    pub fn end_seconds(&self) -> f64 {
        self.words.last().map_or(0.0, |word| word.end)
    }
}
