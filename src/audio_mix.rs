/*!
 * Declarative audio mix planning.
 *
 * The planner merges the voice track, scheduled sound effects and an
 * optional background music bed into one ordered plan. A plan schedules
 * and gains sources; decoding, resampling and the actual summation are
 * renderer concerns. Overlapping effects stack additively, and music is
 * meant to be looped or trimmed by the renderer to the plan's duration.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::assets::AssetStore;
use crate::errors::MixError;

/// Gain applied to the voice track, the reference level of the mix
pub const VOICE_GAIN: f64 = 1.0;

/// Gain applied to each sound effect
pub const SFX_GAIN: f64 = 1.0;

/// Default attenuation for the background music bed
pub const DEFAULT_MUSIC_GAIN: f64 = 0.3;

/// A sound effect placed on the master clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfxEvent {
    /// Audio source of the effect
    pub audio: PathBuf,
    /// Placement in seconds from the start of the voice track
    pub at: f64,
}

impl SfxEvent {
    /// Create a new sound effect cue
    pub fn new<P: Into<PathBuf>>(audio: P, at: f64) -> Self {
        Self {
            audio: audio.into(),
            at,
        }
    }

    /// Spread cues evenly across a track of `total_duration` seconds:
    /// cue `i` of `n` lands at `(i + 1) * total / (n + 1)`, so three cues
    /// sit at 25%, 50% and 75% of the track.
    pub fn spread_evenly<I>(audio: I, total_duration: f64) -> Vec<SfxEvent>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let paths: Vec<PathBuf> = audio.into_iter().collect();
        let count = paths.len() as f64;
        paths
            .into_iter()
            .enumerate()
            .map(|(i, path)| {
                let at = (i as f64 + 1.0) * total_duration / (count + 1.0);
                SfxEvent::new(path, at)
            })
            .collect()
    }
}

/// Role of a source in the mix. Voice and effects play once from their
/// offset; music is looped or trimmed by the renderer to fill the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MixSourceKind {
    Voice,
    Sfx,
    Music,
}

/// One source placement in the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixEntry {
    /// Audio source to play
    pub source: PathBuf,
    /// Offset from the start of the mix in seconds
    pub start_offset: f64,
    /// Linear gain multiplier
    pub gain: f64,
    /// Role of this source
    pub kind: MixSourceKind,
}

/// Ordered, declarative audio mix. `total_duration` always equals the
/// voice track duration; nothing else may stretch the mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioMixPlan {
    /// Entries ordered by start offset, voice first among ties
    pub entries: Vec<MixEntry>,
    /// Mix duration in seconds, equal to the voice track duration
    pub total_duration: f64,
}

impl AudioMixPlan {
    /// The voice entry of the plan
    pub fn voice_entry(&self) -> Option<&MixEntry> {
        self.entries
            .iter()
            .find(|entry| entry.kind == MixSourceKind::Voice)
    }

    /// Entries of one kind, in plan order
    pub fn entries_of(&self, kind: MixSourceKind) -> impl Iterator<Item = &MixEntry> {
        self.entries.iter().filter(move |entry| entry.kind == kind)
    }
}

/// Plans the audio mix, checking every referenced source through the
/// injected asset store before it is admitted
#[derive(Debug)]
pub struct AudioMixPlanner<'a> {
    store: &'a dyn AssetStore,
}

impl<'a> AudioMixPlanner<'a> {
    /// Create a planner backed by `store`
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self { store }
    }

    /// Build the mix plan for one assembly.
    ///
    /// The voice track anchors the mix at offset zero with unit gain, and
    /// its duration becomes the plan duration. Sound effects must land
    /// inside `0.0..=voice_duration`. Music, when present, starts at zero
    /// with `music_gain`. Any unreadable source fails the whole plan.
    pub fn plan(
        &self,
        voice: &Path,
        voice_duration: f64,
        sfx: &[SfxEvent],
        music: Option<&Path>,
        music_gain: f64,
    ) -> Result<AudioMixPlan, MixError> {
        self.ensure_readable(voice)?;

        let mut entries = vec![MixEntry {
            source: voice.to_path_buf(),
            start_offset: 0.0,
            gain: VOICE_GAIN,
            kind: MixSourceKind::Voice,
        }];

        if let Some(track) = music {
            self.ensure_readable(track)?;
            entries.push(MixEntry {
                source: track.to_path_buf(),
                start_offset: 0.0,
                gain: music_gain,
                kind: MixSourceKind::Music,
            });
        }

        for event in sfx {
            self.ensure_readable(&event.audio)?;
            if !(event.at >= 0.0 && event.at <= voice_duration) {
                return Err(MixError::EventOutsideTrack {
                    at: event.at,
                    total: voice_duration,
                });
            }
            entries.push(MixEntry {
                source: event.audio.clone(),
                start_offset: event.at,
                gain: SFX_GAIN,
                kind: MixSourceKind::Sfx,
            });
        }

        // Stable sort keeps voice ahead of music at offset zero
        entries.sort_by(|a, b| {
            a.start_offset
                .partial_cmp(&b.start_offset)
                .unwrap_or(Ordering::Equal)
        });

        debug!(
            "Planned audio mix: {} entries over {:.3}s",
            entries.len(),
            voice_duration
        );

        Ok(AudioMixPlan {
            entries,
            total_duration: voice_duration,
        })
    }

    fn ensure_readable(&self, path: &Path) -> Result<(), MixError> {
        if self.store.exists(path) {
            Ok(())
        } else {
            Err(MixError::MissingAudio {
                path: path.to_path_buf(),
            })
        }
    }
}
