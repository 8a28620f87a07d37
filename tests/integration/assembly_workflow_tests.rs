/*!
 * Integration tests for the single-manifest assembly workflow
 */

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use tokio_test;

use reelforge::app_config::Config;
use reelforge::app_controller::Controller;
use reelforge::assets::{AssetStore, FsAssetStore, MusicLibrary};
use reelforge::audio_mix::MixSourceKind;
use reelforge::composer::Timeline;
use reelforge::media_probe::DurationProbe;
use reelforge::validation::TimelineValidator;
use crate::common;
use crate::common::mock_collaborators::{FailingProbe, FixedMusicLibrary, StaticDurationProbe};

/// Controller over the real filesystem with an injected probe
fn controller_with(config: Config, probe: Arc<dyn DurationProbe>) -> Controller {
    Controller::with_collaborators(config, Arc::new(FsAssetStore::new()), probe, None)
}

/// Test that a full manifest assembles into a valid timeline
#[test]
fn test_assemble_withFullManifest_shouldComposeValidTimeline() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;

    let probe: Arc<dyn DurationProbe> = Arc::new(
        StaticDurationProbe::new().with_duration(temp_dir.path().join("voice.mp3"), 2.0),
    );
    let controller = controller_with(Config::default(), probe);

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    assert_eq!(timeline.total_duration, 2.0);
    assert_eq!(timeline.slots.len(), 3);
    assert_eq!(timeline.captions.len(), 2);
    assert_eq!(timeline.captions[0].text, "Hello");
    // Voice plus the one timed effect; no music is configured
    assert_eq!(timeline.mix.entries.len(), 2);
    assert_eq!(timeline.mix.entries_of(MixSourceKind::Music).count(), 0);

    let report = TimelineValidator::new().validate(&timeline);
    assert!(report.passed, "audit found issues: {:?}", report.issues);

    Ok(())
}

/// Test that running a manifest writes the timeline and the SRT sidecar
#[test]
fn test_run_withManifest_shouldWriteTimelineAndSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;
    let controller = controller_with(Config::default(), Arc::new(FailingProbe));

    tokio_test::block_on(controller.run(
        manifest_path,
        temp_dir.path().to_path_buf(),
        false,
    ))?;

    let timeline_path = temp_dir.path().join("story.timeline.json");
    assert!(timeline_path.exists(), "timeline output should exist");
    let timeline = Timeline::from_json_str(&fs::read_to_string(&timeline_path)?)?;
    assert_eq!(timeline.slots.len(), 3);

    let srt_path = temp_dir.path().join("story.srt");
    let srt = fs::read_to_string(&srt_path)?;
    assert!(srt.starts_with("1\n"));
    assert!(srt.contains("Hello"));

    Ok(())
}

/// Test that an existing timeline is left alone unless forced
#[test]
fn test_run_withExistingTimeline_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;
    let timeline_path = temp_dir.path().join("story.timeline.json");
    fs::write(&timeline_path, "sentinel")?;

    let controller = controller_with(Config::default(), Arc::new(FailingProbe));

    tokio_test::block_on(controller.run(
        manifest_path.clone(),
        temp_dir.path().to_path_buf(),
        false,
    ))?;
    assert_eq!(fs::read_to_string(&timeline_path)?, "sentinel");

    tokio_test::block_on(controller.run(
        manifest_path,
        temp_dir.path().to_path_buf(),
        true,
    ))?;
    let timeline = Timeline::from_json_str(&fs::read_to_string(&timeline_path)?)?;
    assert_eq!(timeline.slots.len(), 3);

    Ok(())
}

/// Test that disabling the sidecar leaves only the timeline behind
#[test]
fn test_run_withSrtDisabled_shouldNotWriteSidecar() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;

    let mut config = Config::default();
    config.assembly.write_srt = false;
    let controller = controller_with(config, Arc::new(FailingProbe));

    tokio_test::block_on(controller.run(
        manifest_path,
        temp_dir.path().to_path_buf(),
        false,
    ))?;

    assert!(temp_dir.path().join("story.timeline.json").exists());
    assert!(!temp_dir.path().join("story.srt").exists());

    Ok(())
}

/// Test that a failing probe falls back to the alignment's end time
#[test]
fn test_assemble_withFailingProbe_shouldFallBackToAlignmentEnd() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;
    let controller = controller_with(Config::default(), Arc::new(FailingProbe));

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    // The sample alignment's last word ends at 1.0s
    assert_eq!(timeline.total_duration, 1.0);

    Ok(())
}

/// Test that a manifest's own music track is mixed at the configured gain
#[test]
fn test_assemble_withExplicitMusic_shouldMixConfiguredGain() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_assembly(temp_dir.path(), "story")?;
    common::create_test_file(temp_dir.path(), "bed.mp3", "stub audio")?;
    let manifest_path = common::create_test_file(
        temp_dir.path(),
        "scored.manifest.json",
        r#"{
            "voice": { "audio": "voice.mp3", "alignment": "voice.alignment.json" },
            "images": ["img_1.png", "img_2.png"],
            "music": "bed.mp3"
        }"#,
    )?;

    let mut config = Config::default();
    config.music.gain = 0.2;
    let controller = controller_with(config, Arc::new(FailingProbe));

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    let music: Vec<_> = timeline.mix.entries_of(MixSourceKind::Music).collect();
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].gain, 0.2);
    assert_eq!(music[0].source, temp_dir.path().join("bed.mp3"));

    Ok(())
}

/// Test that disabled music suppresses even a manifest-named track
#[test]
fn test_assemble_withMusicDisabled_shouldIgnoreManifestTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_assembly(temp_dir.path(), "story")?;
    common::create_test_file(temp_dir.path(), "bed.mp3", "stub audio")?;
    let manifest_path = common::create_test_file(
        temp_dir.path(),
        "scored.manifest.json",
        r#"{
            "voice": { "audio": "voice.mp3", "alignment": "voice.alignment.json" },
            "images": ["img_1.png"],
            "music": "bed.mp3"
        }"#,
    )?;

    let mut config = Config::default();
    config.music.enabled = false;
    let controller = controller_with(config, Arc::new(FailingProbe));

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    assert_eq!(timeline.mix.entries_of(MixSourceKind::Music).count(), 0);

    Ok(())
}

/// Test that the configured library supplies a track when the manifest
/// names none
#[test]
fn test_assemble_withLibrary_shouldPickTrackWhenManifestSilent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;
    let bed = common::create_test_file(temp_dir.path(), "bed.mp3", "stub audio")?;

    let store: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new());
    let probe: Arc<dyn DurationProbe> = Arc::new(FailingProbe);
    let library: Arc<dyn MusicLibrary> = Arc::new(FixedMusicLibrary::offering(&bed));
    let controller =
        Controller::with_collaborators(Config::default(), store, probe, Some(library));

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    let music: Vec<_> = timeline.mix.entries_of(MixSourceKind::Music).collect();
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].source, bed);

    Ok(())
}

/// Test that an empty library leaves the mix without a music bed
#[test]
fn test_assemble_withEmptyLibrary_shouldMixWithoutMusic() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let manifest_path = common::create_test_assembly(temp_dir.path(), "story")?;

    let store: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new());
    let probe: Arc<dyn DurationProbe> = Arc::new(FailingProbe);
    let library: Arc<dyn MusicLibrary> = Arc::new(FixedMusicLibrary::empty());
    let controller =
        Controller::with_collaborators(Config::default(), store, probe, Some(library));

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    assert_eq!(timeline.mix.entries_of(MixSourceKind::Music).count(), 0);

    Ok(())
}

/// Test that untimed cues are spread evenly across the voice track
#[test]
fn test_assemble_withUntimedSfx_shouldSpreadAcrossTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_assembly(temp_dir.path(), "story")?;
    common::create_test_file(temp_dir.path(), "wind.wav", "stub audio")?;
    let manifest_path = common::create_test_file(
        temp_dir.path(),
        "ambient.manifest.json",
        r#"{
            "voice": { "audio": "voice.mp3", "alignment": "voice.alignment.json" },
            "images": ["img_1.png", "img_2.png"],
            "sfx": [
                { "audio": "whoosh.wav" },
                { "audio": "wind.wav" }
            ]
        }"#,
    )?;

    let controller = controller_with(Config::default(), Arc::new(FailingProbe));

    let timeline = tokio_test::block_on(controller.assemble(&manifest_path))?;

    // Fallback duration is 1.0s, so two cues land at the third points
    let effects: Vec<_> = timeline.mix.entries_of(MixSourceKind::Sfx).collect();
    assert_eq!(effects.len(), 2);
    assert!((effects[0].start_offset - 1.0 / 3.0).abs() < 1e-9);
    assert!((effects[1].start_offset - 2.0 / 3.0).abs() < 1e-9);

    Ok(())
}

/// Test that a missing manifest path is reported as an error
#[test]
fn test_run_withMissingManifest_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::new_for_test()?;

    let result = tokio_test::block_on(controller.run(
        temp_dir.path().join("ghost.manifest.json"),
        temp_dir.path().to_path_buf(),
        false,
    ));

    assert!(result.is_err());
    Ok(())
}
