/*!
 * Timeline composition.
 *
 * Partitions the voice track into equal image slots, seeds each slot with
 * a zoom ramp, attaches the caption track and the audio mix plan, and
 * returns a renderer-ready `Timeline`. Composition is arithmetic only;
 * all I/O stays behind the injected asset store.
 */

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::animation::{DEFAULT_ZOOM_FACTOR, KenBurns};
use crate::assets::AssetStore;
use crate::audio_mix::AudioMixPlan;
use crate::captions::{CaptionElement, CaptionTrackBuilder};
use crate::errors::ComposeError;
use crate::timing::WordSpan;

/// Tolerance for the audio/visual duration agreement check, in seconds
const DURATION_EPSILON: f64 = 1e-9;

/// One still image's slot on the master clock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSlot {
    /// Image shown during the slot
    pub image: PathBuf,
    /// Slot onset in seconds
    pub slot_start: f64,
    /// Slot length in seconds, always positive
    pub slot_duration: f64,
    /// Zoom ramp seeded with this slot's duration
    pub zoom: KenBurns,
}

impl ImageSlot {
    /// End of the slot in seconds
    pub fn slot_end(&self) -> f64 {
        self.slot_start + self.slot_duration
    }

    /// Whether the slot is on screen at `t` seconds
    pub fn is_active(&self, t: f64) -> bool {
        t >= self.slot_start && t < self.slot_end()
    }
}

/// The composed, renderer-ready timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Image slots in display order, contiguous from zero
    pub slots: Vec<ImageSlot>,
    /// Word captions ordered by visibility onset
    pub captions: Vec<CaptionElement>,
    /// Audio mix plan
    pub mix: AudioMixPlan,
    /// Master clock length in seconds, equal to the voice track duration
    pub total_duration: f64,
}

impl Timeline {
    /// Serialize the timeline as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize timeline")
    }

    /// Parse a timeline from JSON
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse timeline JSON")
    }

    /// Slot on screen at `t` seconds, if any
    pub fn slot_at(&self, t: f64) -> Option<&ImageSlot> {
        self.slots.iter().find(|slot| slot.is_active(t))
    }
}

/// Composes timelines from pre-built parts
#[derive(Debug)]
pub struct TimelineComposer<'a> {
    store: &'a dyn AssetStore,
    zoom_factor: f64,
    captions: CaptionTrackBuilder,
}

impl<'a> TimelineComposer<'a> {
    /// Create a composer backed by `store` with default visual settings
    pub fn new(store: &'a dyn AssetStore) -> Self {
        Self {
            store,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            captions: CaptionTrackBuilder::default(),
        }
    }

    /// Override the peak zoom applied at each slot midpoint
    pub fn with_zoom_factor(mut self, zoom_factor: f64) -> Self {
        self.zoom_factor = zoom_factor;
        self
    }

    /// Override the caption track settings
    pub fn with_caption_builder(mut self, captions: CaptionTrackBuilder) -> Self {
        self.captions = captions;
        self
    }

    /// Compose a timeline from images, word spans and a planned mix.
    ///
    /// The voice duration is split into one slot per image. Interior slots
    /// share the same base length and each next slot starts exactly where
    /// the previous one ends; the final slot runs to `voice_duration`, so
    /// the visual track absorbs all rounding remainder at its tail. The
    /// mix plan must agree with `voice_duration`, every image must be
    /// readable, and at least one image is required.
    pub fn compose(
        &self,
        images: &[PathBuf],
        voice_duration: f64,
        spans: &[WordSpan],
        mix: AudioMixPlan,
    ) -> Result<Timeline, ComposeError> {
        if images.is_empty() {
            return Err(ComposeError::EmptyImageSet);
        }
        for image in images {
            if !self.store.exists(image) {
                return Err(ComposeError::MissingImage {
                    path: image.clone(),
                });
            }
        }
        if (mix.total_duration - voice_duration).abs() > DURATION_EPSILON {
            return Err(ComposeError::DurationMismatch {
                audio: mix.total_duration,
                video: voice_duration,
            });
        }

        let count = images.len();
        let base = voice_duration / count as f64;
        let mut slots = Vec::with_capacity(count);
        let mut slot_start = 0.0;

        for (index, image) in images.iter().enumerate() {
            let slot_duration = if index + 1 == count {
                voice_duration - slot_start
            } else {
                base
            };
            // KenBurns rejects non-positive lengths, so a degenerate
            // partition fails here instead of producing an empty slot
            let zoom = KenBurns::new(slot_duration, self.zoom_factor)?;
            slots.push(ImageSlot {
                image: image.clone(),
                slot_start,
                slot_duration,
                zoom,
            });
            slot_start += slot_duration;
        }

        let captions = self.captions.build(spans);

        debug!(
            "Composed timeline: {} slots, {} captions, {} mix entries over {:.3}s",
            slots.len(),
            captions.len(),
            mix.entries.len(),
            voice_duration
        );

        Ok(Timeline {
            slots,
            captions,
            mix,
            total_duration: voice_duration,
        })
    }
}
