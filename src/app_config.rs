use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Visual rendering settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Background music settings
    #[serde(default)]
    pub music: MusicConfig,

    /// Assembly and batch settings
    #[serde(default)]
    pub assembly: AssemblyConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Visual settings applied to every composed timeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RenderConfig {
    // @field: Peak zoom applied at each image slot midpoint
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,

    // @field: Caption anchor as a fraction of frame height from the top
    #[serde(default = "default_caption_vertical_fraction")]
    pub caption_vertical_fraction: f64,

    // @field: Caption fade-in hint in seconds
    #[serde(default = "default_caption_fade_in_secs")]
    pub caption_fade_in_secs: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            zoom_factor: default_zoom_factor(),
            caption_vertical_fraction: default_caption_vertical_fraction(),
            caption_fade_in_secs: default_caption_fade_in_secs(),
        }
    }
}

/// Background music settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MusicConfig {
    // @field: Whether a background bed is mixed in at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    // @field: Linear gain applied to the background bed
    #[serde(default = "default_music_gain")]
    pub gain: f64,

    // @field: Directory scanned for tracks when a manifest names none
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gain: default_music_gain(),
            dir: None,
        }
    }
}

/// Assembly and batch behavior
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AssemblyConfig {
    // @field: Whether to write the word-level SRT sidecar next to the timeline
    #[serde(default = "default_true")]
    pub write_srt: bool,

    // @field: ffprobe timeout in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    // @field: Concurrent assemblies in folder mode
    #[serde(default = "default_concurrent_jobs")]
    pub concurrent_jobs: usize,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            write_srt: true,
            probe_timeout_secs: default_probe_timeout_secs(),
            concurrent_jobs: default_concurrent_jobs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_zoom_factor() -> f64 {
    crate::animation::DEFAULT_ZOOM_FACTOR
}

fn default_caption_vertical_fraction() -> f64 {
    crate::captions::DEFAULT_VERTICAL_FRACTION
}

fn default_caption_fade_in_secs() -> f64 {
    crate::captions::DEFAULT_FADE_IN_SECS
}

fn default_music_gain() -> f64 {
    crate::audio_mix::DEFAULT_MUSIC_GAIN
}

fn default_probe_timeout_secs() -> u64 {
    crate::media_probe::DEFAULT_PROBE_TIMEOUT_SECS
}

fn default_concurrent_jobs() -> usize {
    4
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !self.render.zoom_factor.is_finite() || self.render.zoom_factor < 1.0 {
            return Err(anyhow!(
                "zoom_factor must be at least 1.0, got {}",
                self.render.zoom_factor
            ));
        }

        if !(0.0..=1.0).contains(&self.render.caption_vertical_fraction) {
            return Err(anyhow!(
                "caption_vertical_fraction must be between 0.0 and 1.0, got {}",
                self.render.caption_vertical_fraction
            ));
        }

        if !self.render.caption_fade_in_secs.is_finite()
            || self.render.caption_fade_in_secs < 0.0
        {
            return Err(anyhow!(
                "caption_fade_in_secs must be non-negative, got {}",
                self.render.caption_fade_in_secs
            ));
        }

        if !(0.0..=1.0).contains(&self.music.gain) {
            return Err(anyhow!(
                "music gain must be between 0.0 and 1.0, got {}",
                self.music.gain
            ));
        }

        if self.assembly.concurrent_jobs == 0 {
            return Err(anyhow!("concurrent_jobs must be at least 1"));
        }

        if self.assembly.probe_timeout_secs == 0 {
            return Err(anyhow!("probe_timeout_secs must be at least 1"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            render: RenderConfig::default(),
            music: MusicConfig::default(),
            assembly: AssemblyConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
