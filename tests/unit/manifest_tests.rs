/*!
 * Tests for assembly manifest parsing and validation
 */

use std::path::{Path, PathBuf};

use anyhow::Result;

use reelforge::manifest::AssemblyManifest;
use crate::common;

/// Test that a full manifest with every optional section parses
#[test]
fn test_fromJsonStr_withFullManifest_shouldParse() -> Result<()> {
    let manifest = AssemblyManifest::from_json_str(
        r#"{
            "voice": { "audio": "voice.mp3", "alignment": "voice.alignment.json" },
            "images": ["a.png", "b.png"],
            "sfx": [
                { "audio": "boom.wav", "at": 3.5 },
                { "audio": "wind.wav" }
            ],
            "music": "bed.mp3"
        }"#,
    )?;

    assert_eq!(manifest.voice.audio, PathBuf::from("voice.mp3"));
    assert_eq!(manifest.images.len(), 2);
    assert_eq!(manifest.sfx.len(), 2);
    assert_eq!(manifest.sfx[0].at, Some(3.5));
    assert_eq!(manifest.sfx[1].at, None);
    assert_eq!(manifest.music, Some(PathBuf::from("bed.mp3")));

    Ok(())
}

/// Test that sfx and music default to empty when omitted
#[test]
fn test_fromJsonStr_withMinimalManifest_shouldDefaultOptionals() -> Result<()> {
    let manifest = AssemblyManifest::from_json_str(
        r#"{
            "voice": { "audio": "v.mp3", "alignment": "v.json" },
            "images": ["a.png"]
        }"#,
    )?;

    assert!(manifest.sfx.is_empty());
    assert!(manifest.music.is_none());

    Ok(())
}

/// Test that a manifest missing the voice section fails to parse
#[test]
fn test_fromJsonStr_withoutVoice_shouldFail() {
    let result = AssemblyManifest::from_json_str(r#"{ "images": ["a.png"] }"#);
    assert!(result.is_err());
}

/// Test that an empty image list fails validation
#[test]
fn test_validate_withNoImages_shouldFail() -> Result<()> {
    let manifest = AssemblyManifest::from_json_str(
        r#"{
            "voice": { "audio": "v.mp3", "alignment": "v.json" },
            "images": []
        }"#,
    )?;

    let result = manifest.validate();

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("no images"));
    Ok(())
}

/// Test that a negative effect time fails validation
#[test]
fn test_validate_withNegativeSfxTime_shouldFail() -> Result<()> {
    let manifest = AssemblyManifest::from_json_str(
        r#"{
            "voice": { "audio": "v.mp3", "alignment": "v.json" },
            "images": ["a.png"],
            "sfx": [ { "audio": "boom.wav", "at": -1.0 } ]
        }"#,
    )?;

    assert!(manifest.validate().is_err());
    Ok(())
}

/// Test that relative paths resolve against the base while absolute
/// paths stay put
#[test]
fn test_resolveRelativeTo_shouldAnchorRelativePathsOnly() -> Result<()> {
    let mut manifest = AssemblyManifest::from_json_str(
        r#"{
            "voice": { "audio": "voice.mp3", "alignment": "/data/fixed.json" },
            "images": ["shots/a.png"],
            "sfx": [ { "audio": "boom.wav", "at": 1.0 } ],
            "music": "bed.mp3"
        }"#,
    )?;

    manifest.resolve_relative_to(Path::new("/projects/story"));

    assert_eq!(manifest.voice.audio, PathBuf::from("/projects/story/voice.mp3"));
    assert_eq!(manifest.voice.alignment, PathBuf::from("/data/fixed.json"));
    assert_eq!(manifest.images[0], PathBuf::from("/projects/story/shots/a.png"));
    assert_eq!(manifest.sfx[0].audio, PathBuf::from("/projects/story/boom.wav"));
    assert_eq!(manifest.music, Some(PathBuf::from("/projects/story/bed.mp3")));

    Ok(())
}

/// Test that manifest files load from disk
#[test]
fn test_fromFile_withWrittenManifest_shouldParse() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_assembly(temp_dir.path(), "story")?;

    let manifest = AssemblyManifest::from_file(&path)?;

    assert_eq!(manifest.images.len(), 3);
    manifest.validate()?;
    Ok(())
}

/// Test that a missing manifest file reports its path
#[test]
fn test_fromFile_withMissingFile_shouldFail() {
    let result = AssemblyManifest::from_file("no/such/story.manifest.json");
    assert!(result.is_err());
}
