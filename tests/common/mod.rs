/*!
 * Common test utilities for the reelforge test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use reelforge::timing::CharacterTiming;


/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// One character timing record with the word interval mirroring the
/// character interval, enough for span grouping tests
pub fn char_timing(character: &str, word: &str, start: f64, end: f64) -> CharacterTiming {
    CharacterTiming {
        character: character.to_string(),
        start,
        end,
        word_start: start,
        word_end: end,
        word: word.to_string(),
    }
}

/// A two-word alignment payload ("Hello" then "world") ending at 1.0s.
/// The inter-word gap from 0.5 to 0.55 exercises the rule that a caption
/// stays up until the next word starts.
pub fn sample_alignment_json() -> &'static str {
    r#"{
  "words": [
    {
      "word": "Hello",
      "start": 0.0,
      "end": 0.5,
      "characters": [
        { "character": "H", "start": 0.0, "end": 0.1 },
        { "character": "e", "start": 0.1, "end": 0.2 },
        { "character": "l", "start": 0.2, "end": 0.3 },
        { "character": "l", "start": 0.3, "end": 0.4 },
        { "character": "o", "start": 0.4, "end": 0.5 }
      ]
    },
    {
      "word": "world",
      "start": 0.55,
      "end": 1.0,
      "characters": [
        { "character": "w", "start": 0.55, "end": 0.64 },
        { "character": "o", "start": 0.64, "end": 0.73 },
        { "character": "r", "start": 0.73, "end": 0.82 },
        { "character": "l", "start": 0.82, "end": 0.91 },
        { "character": "d", "start": 0.91, "end": 1.0 }
      ]
    }
  ]
}"#
}

/// Creates a sample alignment file for testing
pub fn create_test_alignment(dir: &Path, filename: &str) -> Result<PathBuf> {
    create_test_file(dir, filename, sample_alignment_json())
}

/// Creates a complete assembly in `dir`: a stub voice track, the sample
/// alignment, three images, one timed sound effect and the manifest
/// naming them all by relative path. Returns the manifest path.
pub fn create_test_assembly(dir: &Path, stem: &str) -> Result<PathBuf> {
    create_test_file(dir, "voice.mp3", "stub audio")?;
    create_test_alignment(dir, "voice.alignment.json")?;
    create_test_file(dir, "img_1.png", "stub image")?;
    create_test_file(dir, "img_2.png", "stub image")?;
    create_test_file(dir, "img_3.png", "stub image")?;
    create_test_file(dir, "whoosh.wav", "stub audio")?;

    let manifest = r#"{
  "voice": {
    "audio": "voice.mp3",
    "alignment": "voice.alignment.json"
  },
  "images": ["img_1.png", "img_2.png", "img_3.png"],
  "sfx": [
    { "audio": "whoosh.wav", "at": 0.25 }
  ]
}"#;
    create_test_file(dir, &format!("{}.manifest.json", stem), manifest)
}
