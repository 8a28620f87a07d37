/*!
 * Word-level caption track construction.
 *
 * Every word span becomes exactly one caption element, horizontally
 * centered and anchored at a configurable fraction of the frame height.
 * The element is visible for exactly the span's interval; the short
 * fade-in carried alongside is a rendering hint and never widens or
 * narrows that window.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::timing::WordSpan;

/// Default vertical anchor, as a fraction of frame height from the top
pub const DEFAULT_VERTICAL_FRACTION: f64 = 0.8;

/// Default fade-in hint in seconds
pub const DEFAULT_FADE_IN_SECS: f64 = 0.1;

/// Horizontal placement of a caption within the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    Left,
    Center,
    Right,
}

/// Where a caption sits in the frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptionAnchor {
    /// Horizontal placement
    pub horizontal: HorizontalAlign,
    /// Vertical position as a fraction of frame height, 0.0 being the top
    pub vertical_fraction: f64,
}

/// One timed, positioned caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionElement {
    /// Text to display, a single word
    pub text: String,
    /// Start of the visibility window in seconds
    pub visible_from: f64,
    /// End of the visibility window in seconds
    pub visible_to: f64,
    /// Placement in the frame
    pub anchor: CaptionAnchor,
    /// Fade-in hint in seconds; does not alter the visibility window
    pub fade_in: f64,
}

impl CaptionElement {
    /// Format a second count as an SRT timestamp (HH:MM:SS,mmm)
    fn format_timestamp(seconds: f64) -> String {
        let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;
        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for CaptionElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --> {}\n{}",
            Self::format_timestamp(self.visible_from),
            Self::format_timestamp(self.visible_to),
            self.text
        )
    }
}

/// Builds the caption track from word spans
#[derive(Debug, Clone)]
pub struct CaptionTrackBuilder {
    vertical_fraction: f64,
    fade_in: f64,
}

impl CaptionTrackBuilder {
    /// Create a builder anchoring captions at `vertical_fraction` of the
    /// frame height
    pub fn new(vertical_fraction: f64) -> Self {
        Self {
            vertical_fraction,
            fade_in: DEFAULT_FADE_IN_SECS,
        }
    }

    /// Override the fade-in hint
    pub fn with_fade_in(mut self, fade_in: f64) -> Self {
        self.fade_in = fade_in;
        self
    }

    /// One caption per span, in span order. Since spans arrive time
    /// ordered the elements come out ordered by `visible_from` as well.
    pub fn build(&self, spans: &[WordSpan]) -> Vec<CaptionElement> {
        spans
            .iter()
            .map(|span| CaptionElement {
                text: span.word.clone(),
                visible_from: span.start,
                visible_to: span.end,
                anchor: CaptionAnchor {
                    horizontal: HorizontalAlign::Center,
                    vertical_fraction: self.vertical_fraction,
                },
                fade_in: self.fade_in,
            })
            .collect()
    }
}

impl Default for CaptionTrackBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_VERTICAL_FRACTION)
    }
}

/// Render a caption track as an SRT document, one numbered entry per
/// caption. A convenience sidecar for editors; the timeline JSON remains
/// the canonical output.
pub fn to_srt(captions: &[CaptionElement]) -> String {
    let mut output = String::new();
    for (index, caption) in captions.iter().enumerate() {
        output.push_str(&format!("{}\n{}\n\n", index + 1, caption));
    }
    output
}
