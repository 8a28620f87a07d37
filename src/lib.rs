/*!
 * # ReelForge - Timeline Composition for Narrated Slideshows
 *
 * A Rust library that assembles generated assets (still images, a
 * synthesized voice track with per-character timing, sound effects and
 * background music) into a renderer-ready timeline.
 *
 * ## Features
 *
 * - Group per-character voice timings into word spans
 * - Word-by-word caption tracks synchronized to speech
 * - Ken Burns zoom ramps over evenly partitioned image slots
 * - Declarative audio mix plans (voice, effects, attenuated music bed)
 * - `[SFX: ...]` marker extraction from narration scripts
 * - Timeline auditing before anything is written out
 * - Batch assembly of manifest folders
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timing`: Alignment parsing and word span grouping
 * - `animation`: Ken Burns zoom ramps
 * - `captions`: Caption track construction and SRT rendering
 * - `audio_mix`: Audio mix planning
 * - `composer`: Timeline composition over the master clock
 * - `validation`: Post-composition timeline audits
 * - `assets`: Asset store and music library capabilities
 * - `script`: Narration script marker handling
 * - `media_probe`: Media duration resolution via ffprobe
 * - `manifest`: Assembly manifest model
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod animation;
pub mod app_config;
pub mod app_controller;
pub mod assets;
pub mod audio_mix;
pub mod captions;
pub mod composer;
pub mod errors;
pub mod file_utils;
pub mod manifest;
pub mod media_probe;
pub mod script;
pub mod timing;
pub mod validation;

// Re-export main types for easier usage
pub use animation::KenBurns;
pub use app_config::Config;
pub use audio_mix::{AudioMixPlan, AudioMixPlanner, SfxEvent};
pub use captions::{CaptionElement, CaptionTrackBuilder};
pub use composer::{ImageSlot, Timeline, TimelineComposer};
pub use errors::{AnimationError, AppError, ComposeError, MixError, TimingError};
pub use manifest::AssemblyManifest;
pub use timing::{CharacterTiming, VoiceAlignment, WordSpan, build_word_spans};
