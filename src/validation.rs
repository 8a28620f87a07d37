/*!
 * Post-composition timeline auditing.
 *
 * The composer guarantees its invariants by construction; this validator
 * re-checks a finished timeline as a safety net before it is written out:
 * - Slots are contiguous, positive and cover exactly the master clock
 * - Captions are ordered and stay inside the track
 * - Mix entries stay inside the track and the voice anchor is present
 */

use log::debug;

use crate::audio_mix::MixSourceKind;
use crate::composer::Timeline;

/// Default tolerance for float comparisons, in seconds
const DEFAULT_TOLERANCE_SECS: f64 = 1e-6;

/// Issues a timeline audit can surface
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineIssue {
    /// A slot does not start where the previous one ended
    SlotGap {
        index: usize,
        expected_start: f64,
        actual_start: f64,
    },
    /// A slot has zero or negative length
    SlotNotPositive { index: usize, duration: f64 },
    /// The slots do not cover the master clock
    CoverageMismatch { covered: f64, total: f64 },
    /// A caption becomes visible before its predecessor
    CaptionOutOfOrder { index: usize },
    /// A caption stays visible past the end of the track
    CaptionPastEnd {
        index: usize,
        visible_to: f64,
        total: f64,
    },
    /// A mix entry starts outside the track
    EntryOutsideTrack {
        index: usize,
        start_offset: f64,
        total: f64,
    },
    /// The mix has no voice anchor at offset zero
    MissingVoiceAnchor,
}

impl std::fmt::Display for TimelineIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimelineIssue::SlotGap {
                index,
                expected_start,
                actual_start,
            } => {
                write!(
                    f,
                    "Slot {} starts at {:.6}s, expected {:.6}s",
                    index, actual_start, expected_start
                )
            }
            TimelineIssue::SlotNotPositive { index, duration } => {
                write!(f, "Slot {} has non-positive duration {:.6}s", index, duration)
            }
            TimelineIssue::CoverageMismatch { covered, total } => {
                write!(
                    f,
                    "Slots cover {:.6}s of a {:.6}s track",
                    covered, total
                )
            }
            TimelineIssue::CaptionOutOfOrder { index } => {
                write!(f, "Caption {} appears before its predecessor", index)
            }
            TimelineIssue::CaptionPastEnd {
                index,
                visible_to,
                total,
            } => {
                write!(
                    f,
                    "Caption {} visible until {:.3}s on a {:.3}s track",
                    index, visible_to, total
                )
            }
            TimelineIssue::EntryOutsideTrack {
                index,
                start_offset,
                total,
            } => {
                write!(
                    f,
                    "Mix entry {} starts at {:.3}s on a {:.3}s track",
                    index, start_offset, total
                )
            }
            TimelineIssue::MissingVoiceAnchor => {
                write!(f, "Mix has no voice entry at offset zero")
            }
        }
    }
}

/// Outcome of a timeline audit
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Overall pass/fail status
    pub passed: bool,
    /// Issues found, in timeline order
    pub issues: Vec<TimelineIssue>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<TimelineIssue>) -> Self {
        Self {
            passed: issues.is_empty(),
            issues,
        }
    }
}

/// Audits composed timelines
pub struct TimelineValidator {
    tolerance: f64,
}

impl TimelineValidator {
    /// Create a validator with the default tolerance
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Create a validator with a custom float tolerance in seconds
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Audit one timeline
    pub fn validate(&self, timeline: &Timeline) -> ValidationReport {
        let mut issues = Vec::new();
        self.check_slots(timeline, &mut issues);
        self.check_captions(timeline, &mut issues);
        self.check_mix(timeline, &mut issues);

        debug!(
            "Timeline audit: {} issue(s) across {} slots / {} captions / {} mix entries",
            issues.len(),
            timeline.slots.len(),
            timeline.captions.len(),
            timeline.mix.entries.len()
        );

        ValidationReport::from_issues(issues)
    }

    fn check_slots(&self, timeline: &Timeline, issues: &mut Vec<TimelineIssue>) {
        let mut cursor = 0.0;
        for (index, slot) in timeline.slots.iter().enumerate() {
            if slot.slot_duration <= 0.0 {
                issues.push(TimelineIssue::SlotNotPositive {
                    index,
                    duration: slot.slot_duration,
                });
            }
            if (slot.slot_start - cursor).abs() > self.tolerance {
                issues.push(TimelineIssue::SlotGap {
                    index,
                    expected_start: cursor,
                    actual_start: slot.slot_start,
                });
            }
            cursor = slot.slot_end();
        }
        if (cursor - timeline.total_duration).abs() > self.tolerance {
            issues.push(TimelineIssue::CoverageMismatch {
                covered: cursor,
                total: timeline.total_duration,
            });
        }
    }

    fn check_captions(&self, timeline: &Timeline, issues: &mut Vec<TimelineIssue>) {
        let mut previous_from = f64::NEG_INFINITY;
        for (index, caption) in timeline.captions.iter().enumerate() {
            if caption.visible_from < previous_from {
                issues.push(TimelineIssue::CaptionOutOfOrder { index });
            }
            if caption.visible_to > timeline.total_duration + self.tolerance {
                issues.push(TimelineIssue::CaptionPastEnd {
                    index,
                    visible_to: caption.visible_to,
                    total: timeline.total_duration,
                });
            }
            previous_from = caption.visible_from;
        }
    }

    fn check_mix(&self, timeline: &Timeline, issues: &mut Vec<TimelineIssue>) {
        for (index, entry) in timeline.mix.entries.iter().enumerate() {
            if entry.start_offset < -self.tolerance
                || entry.start_offset > timeline.total_duration + self.tolerance
            {
                issues.push(TimelineIssue::EntryOutsideTrack {
                    index,
                    start_offset: entry.start_offset,
                    total: timeline.total_duration,
                });
            }
        }

        let anchored = timeline
            .mix
            .entries
            .iter()
            .any(|entry| entry.kind == MixSourceKind::Voice && entry.start_offset == 0.0);
        if !anchored {
            issues.push(TimelineIssue::MissingVoiceAnchor);
        }
    }
}

impl Default for TimelineValidator {
    fn default() -> Self {
        Self::new()
    }
}
