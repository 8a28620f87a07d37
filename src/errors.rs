/*!
 * Error types for the reelforge engine.
 *
 * This module contains custom error types for each stage of timeline
 * composition, using the thiserror crate for ergonomic error definitions.
 * Every stage fails fast on invalid input; nothing is silently repaired.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when grouping character timings into word spans
#[derive(Error, Debug)]
pub enum TimingError {
    /// Error when the character timing stream contains no records
    #[error("character timing stream is empty")]
    EmptyInput,
}

/// Errors that can occur when constructing a zoom animation
#[derive(Error, Debug)]
pub enum AnimationError {
    /// Error when the animation duration is zero, negative or not finite
    #[error("animation duration must be a positive number of seconds, got {duration}")]
    InvalidDuration {
        /// The rejected duration in seconds
        duration: f64,
    },
}

/// Errors that can occur while planning the audio mix
#[derive(Error, Debug)]
pub enum MixError {
    /// Error when a referenced audio source cannot be read
    #[error("audio source is missing or unreadable: {}", path.display())]
    MissingAudio {
        /// Path of the unreadable source
        path: PathBuf,
    },

    /// Error when a sound effect is scheduled outside the voice track
    #[error("sound effect at {at:.3}s falls outside the voice track (0.000..={total:.3}s)")]
    EventOutsideTrack {
        /// Requested placement in seconds
        at: f64,
        /// Voice track duration in seconds
        total: f64,
    },
}

/// Errors that can occur during timeline composition
#[derive(Error, Debug)]
pub enum ComposeError {
    /// Error when no images were supplied
    #[error("cannot compose a timeline from an empty image set")]
    EmptyImageSet,

    /// Error when a referenced image cannot be read
    #[error("image is missing or unreadable: {}", path.display())]
    MissingImage {
        /// Path of the unreadable image
        path: PathBuf,
    },

    /// Error when the audio plan and the visual track disagree on length
    #[error("audio plan covers {audio:.6}s but the visual track covers {video:.6}s")]
    DurationMismatch {
        /// Total duration of the audio plan in seconds
        audio: f64,
        /// Requested visual duration in seconds
        video: f64,
    },

    /// Error from building a slot animation
    #[error("animation error: {0}")]
    Animation(#[from] AnimationError),
}

/// Errors that can occur while probing media files for their duration
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Error spawning the probe process
    #[error("failed to run ffprobe: {0}")]
    Spawn(String),

    /// Error reported by the probe process itself
    #[error("ffprobe exited with an error: {0}")]
    CommandFailed(String),

    /// Error when the probe did not finish in time
    #[error("ffprobe timed out after {0} seconds")]
    Timeout(u64),

    /// Error when the probe output cannot be interpreted
    #[error("could not parse ffprobe output: {0}")]
    Malformed(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from word span grouping
    #[error("Timing error: {0}")]
    Timing(#[from] TimingError),

    /// Error from animation construction
    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    /// Error from audio mix planning
    #[error("Audio mix error: {0}")]
    Mix(#[from] MixError),

    /// Error from timeline composition
    #[error("Composition error: {0}")]
    Compose(#[from] ComposeError),

    /// Error from media probing
    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
