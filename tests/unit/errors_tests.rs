/*!
 * Tests for error types and conversions
 */

use std::path::PathBuf;

use reelforge::errors::{
    AnimationError, AppError, ComposeError, MixError, ProbeError, TimingError,
};

#[test]
fn test_timingError_emptyInput_shouldDisplayCorrectly() {
    let error = TimingError::EmptyInput;
    let display = format!("{}", error);
    assert!(display.contains("empty"));
}

#[test]
fn test_animationError_invalidDuration_shouldDisplayTheValue() {
    let error = AnimationError::InvalidDuration { duration: -3.0 };
    let display = format!("{}", error);
    assert!(display.contains("positive"));
    assert!(display.contains("-3"));
}

#[test]
fn test_mixError_missingAudio_shouldDisplayThePath() {
    let error = MixError::MissingAudio {
        path: PathBuf::from("assets/boom.wav"),
    };
    let display = format!("{}", error);
    assert!(display.contains("assets/boom.wav"));
    assert!(display.contains("missing or unreadable"));
}

#[test]
fn test_mixError_eventOutsideTrack_shouldDisplayBothTimes() {
    let error = MixError::EventOutsideTrack {
        at: 12.5,
        total: 10.0,
    };
    let display = format!("{}", error);
    assert!(display.contains("12.5"));
    assert!(display.contains("10.0"));
}

#[test]
fn test_composeError_emptyImageSet_shouldDisplayCorrectly() {
    let error = ComposeError::EmptyImageSet;
    let display = format!("{}", error);
    assert!(display.contains("empty image set"));
}

#[test]
fn test_composeError_durationMismatch_shouldDisplayBothDurations() {
    let error = ComposeError::DurationMismatch {
        audio: 9.5,
        video: 10.0,
    };
    let display = format!("{}", error);
    assert!(display.contains("9.5"));
    assert!(display.contains("10.0"));
}

#[test]
fn test_composeError_fromAnimationError_shouldWrapCorrectly() {
    let animation_error = AnimationError::InvalidDuration { duration: 0.0 };
    let compose_error: ComposeError = animation_error.into();
    let display = format!("{}", compose_error);
    assert!(display.contains("animation error"));
}

#[test]
fn test_probeError_timeout_shouldDisplaySeconds() {
    let error = ProbeError::Timeout(60);
    let display = format!("{}", error);
    assert!(display.contains("60"));
    assert!(display.contains("timed out"));
}

#[test]
fn test_appError_fromMixError_shouldWrapCorrectly() {
    let mix_error = MixError::MissingAudio {
        path: PathBuf::from("voice.mp3"),
    };
    let app_error: AppError = mix_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Audio mix error"));
}

#[test]
fn test_appError_fromComposeError_shouldWrapCorrectly() {
    let compose_error = ComposeError::EmptyImageSet;
    let app_error: AppError = compose_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Composition error"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let anyhow_error = anyhow::anyhow!("something unexpected");
    let app_error: AppError = anyhow_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("something unexpected"));
}
