/*!
 * Assembly manifests.
 *
 * A manifest is the JSON input naming every asset of one video: the voice
 * track and its alignment, the ordered image set, sound effect cues and an
 * optional background track. Relative paths are resolved against the
 * manifest's own directory so asset folders can move as a unit.
 */

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name suffix that marks a file as an assembly manifest
pub const MANIFEST_SUFFIX: &str = ".manifest.json";

/// Manifest for one assembly run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblyManifest {
    /// Voice track and its alignment
    pub voice: VoiceSpec,

    /// Images in display order; the count defines the slot partition
    pub images: Vec<PathBuf>,

    /// Sound effect cues
    #[serde(default)]
    pub sfx: Vec<SfxCue>,

    /// Explicit background track, overriding any configured music directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub music: Option<PathBuf>,
}

/// The synthesized voice track and its timing sidecar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceSpec {
    /// Voice audio file
    pub audio: PathBuf,

    /// Alignment JSON with per-character timing
    pub alignment: PathBuf,
}

/// One sound effect cue. Without an explicit time the cue is spread
/// evenly across the track together with the other untimed cues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfxCue {
    /// Effect audio file
    pub audio: PathBuf,

    /// Placement in seconds from the start of the voice track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at: Option<f64>,
}

impl AssemblyManifest {
    /// Parse a manifest from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse assembly manifest JSON")
    }

    /// Read and parse a manifest file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file: {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid manifest: {}", path.display()))
    }

    /// Validate the manifest shape before any probing happens
    pub fn validate(&self) -> Result<()> {
        if self.images.is_empty() {
            return Err(anyhow!("Manifest lists no images"));
        }
        for cue in &self.sfx {
            if let Some(at) = cue.at {
                if !at.is_finite() || at < 0.0 {
                    return Err(anyhow!(
                        "Sound effect {} has an invalid time: {}",
                        cue.audio.display(),
                        at
                    ));
                }
            }
        }
        Ok(())
    }

    /// Resolve every relative path against `base`, leaving absolute
    /// paths untouched
    pub fn resolve_relative_to(&mut self, base: &Path) {
        resolve(&mut self.voice.audio, base);
        resolve(&mut self.voice.alignment, base);
        for image in &mut self.images {
            resolve(image, base);
        }
        for cue in &mut self.sfx {
            resolve(&mut cue.audio, base);
        }
        if let Some(music) = &mut self.music {
            resolve(music, base);
        }
    }
}

fn resolve(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}
