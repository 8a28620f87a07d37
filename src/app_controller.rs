use anyhow::{Result, anyhow};
use futures::stream::{self, StreamExt};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::assets::{AssetStore, DirMusicLibrary, FsAssetStore, MusicLibrary};
use crate::audio_mix::{AudioMixPlanner, SfxEvent};
use crate::captions::{self, CaptionTrackBuilder};
use crate::composer::{Timeline, TimelineComposer};
use crate::file_utils::{FileManager, SRT_SUFFIX, TIMELINE_SUFFIX};
use crate::manifest::{AssemblyManifest, SfxCue};
use crate::media_probe::{DurationProbe, FfprobeDurationProbe};
use crate::timing::{VoiceAlignment, build_word_spans};
use crate::validation::TimelineValidator;

// @module: Application controller for timeline assembly

/// Name of the log file collecting audit issues and batch summaries
const ISSUES_LOG_NAME: &str = "reelforge.issues.log";

/// Outcome of one folder-mode assembly job
enum JobOutcome {
    Assembled,
    Skipped,
    Failed,
}

/// Main application controller for timeline assembly
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Asset readability checks
    store: Arc<dyn AssetStore>,
    // @field: Media duration resolution
    probe: Arc<dyn DurationProbe>,
    // @field: Background track selection, when enabled and configured
    music: Option<Arc<dyn MusicLibrary>>,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with filesystem-backed collaborators
    pub fn with_config(config: Config) -> Result<Self> {
        let probe = FfprobeDurationProbe::with_timeout(Duration::from_secs(
            config.assembly.probe_timeout_secs,
        ));

        let music: Option<Arc<dyn MusicLibrary>> = if config.music.enabled {
            config
                .music
                .dir
                .as_ref()
                .map(|dir| Arc::new(DirMusicLibrary::new(dir)) as Arc<dyn MusicLibrary>)
        } else {
            None
        };

        Ok(Self {
            config,
            store: Arc::new(FsAssetStore::new()),
            probe: Arc::new(probe),
            music,
        })
    }

    /// Create a controller with injected collaborators
    pub fn with_collaborators(
        config: Config,
        store: Arc<dyn AssetStore>,
        probe: Arc<dyn DurationProbe>,
        music: Option<Arc<dyn MusicLibrary>>,
    ) -> Self {
        Self {
            config,
            store,
            probe,
            music,
        }
    }

    /// Run the assembly workflow for one manifest and write the outputs
    pub async fn run(
        &self,
        manifest_path: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !manifest_path.exists() {
            return Err(anyhow!("Manifest does not exist: {:?}", manifest_path));
        }

        // Ensure the output directory exists
        FileManager::ensure_dir(&output_dir)?;

        // Check if the timeline already exists
        let timeline_path =
            FileManager::generate_output_path(&manifest_path, &output_dir, TIMELINE_SUFFIX);
        if timeline_path.exists() && !force_overwrite {
            warn!("Skipping manifest, timeline already exists (use -f to force overwrite)");
            return Ok(());
        }

        let timeline = self.assemble(&manifest_path).await?;

        // Audit the finished timeline before anything lands on disk
        let report = TimelineValidator::new().validate(&timeline);
        if !report.passed {
            let log_path = output_dir.join(ISSUES_LOG_NAME);
            for issue in &report.issues {
                warn!("Timeline audit: {}", issue);
                let entry = format!("{}: {}", manifest_path.display(), issue);
                if let Err(e) = FileManager::append_to_log_file(&log_path, &entry) {
                    debug!("Could not record audit issue: {}", e);
                }
            }
        }

        FileManager::write_atomic(&timeline_path, &timeline.to_json()?)?;
        info!("Success: {}", timeline_path.display());

        // Caption sidecar for editors
        if self.config.assembly.write_srt {
            let srt_path =
                FileManager::generate_output_path(&manifest_path, &output_dir, SRT_SUFFIX);
            FileManager::write_atomic(&srt_path, &captions::to_srt(&timeline.captions))?;
            debug!("Caption sidecar: {}", srt_path.display());
        }

        info!(
            "Assembly completed in {}.",
            Self::format_duration(start_time.elapsed())
        );

        Ok(())
    }

    /// Compose the timeline for one manifest without writing anything
    pub async fn assemble(&self, manifest_path: &Path) -> Result<Timeline> {
        let mut manifest = AssemblyManifest::from_file(manifest_path)?;
        manifest.validate()?;

        // Asset paths travel with the manifest
        let base = manifest_path.parent().unwrap_or(Path::new("."));
        manifest.resolve_relative_to(base);

        let alignment = VoiceAlignment::from_file(&manifest.voice.alignment)?;
        let characters = alignment.flatten();
        let spans = build_word_spans(&characters)?;
        debug!(
            "Alignment: {} characters grouped into {} word spans",
            characters.len(),
            spans.len()
        );

        let voice_duration = self
            .resolve_voice_duration(&manifest.voice.audio, &alignment)
            .await;

        let sfx_events = Self::schedule_sfx(&manifest.sfx, voice_duration);
        let music = self.select_music(&manifest);

        let planner = AudioMixPlanner::new(self.store.as_ref());
        let mix = planner.plan(
            &manifest.voice.audio,
            voice_duration,
            &sfx_events,
            music.as_deref(),
            self.config.music.gain,
        )?;

        let caption_builder =
            CaptionTrackBuilder::new(self.config.render.caption_vertical_fraction)
                .with_fade_in(self.config.render.caption_fade_in_secs);
        let composer = TimelineComposer::new(self.store.as_ref())
            .with_zoom_factor(self.config.render.zoom_factor)
            .with_caption_builder(caption_builder);

        let timeline = composer.compose(&manifest.images, voice_duration, &spans, mix)?;
        Ok(timeline)
    }

    /// Resolve the voice track duration, falling back to the alignment end
    /// when probing is unavailable
    async fn resolve_voice_duration(
        &self,
        voice_audio: &Path,
        alignment: &VoiceAlignment,
    ) -> f64 {
        match self.probe.duration_secs(voice_audio).await {
            Ok(duration) => duration,
            Err(e) => {
                let fallback = alignment.end_seconds();
                warn!(
                    "Could not probe {} ({}); using alignment end {:.3}s",
                    voice_audio.display(),
                    e,
                    fallback
                );
                fallback
            }
        }
    }

    /// Turn manifest cues into scheduled events. Explicit times are kept;
    /// the untimed remainder is spread evenly across the track.
    fn schedule_sfx(cues: &[SfxCue], voice_duration: f64) -> Vec<SfxEvent> {
        let mut events: Vec<SfxEvent> = cues
            .iter()
            .filter_map(|cue| cue.at.map(|at| SfxEvent::new(cue.audio.clone(), at)))
            .collect();

        let untimed: Vec<PathBuf> = cues
            .iter()
            .filter(|cue| cue.at.is_none())
            .map(|cue| cue.audio.clone())
            .collect();
        events.extend(SfxEvent::spread_evenly(untimed, voice_duration));

        events
    }

    /// Pick the background track for one assembly. An explicit manifest
    /// track wins over the configured library; disabled music wins over
    /// everything.
    fn select_music(&self, manifest: &AssemblyManifest) -> Option<PathBuf> {
        if !self.config.music.enabled {
            if manifest.music.is_some() {
                debug!("Music disabled; ignoring track named by manifest");
            }
            return None;
        }

        manifest
            .music
            .clone()
            .or_else(|| self.music.as_ref().and_then(|library| library.pick()))
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode, assembling every manifest under a
    /// directory. Manifests whose timeline already exists are skipped.
    pub async fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !input_dir.exists() {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let manifests = FileManager::find_manifest_files(&input_dir)?;
        if manifests.is_empty() {
            return Err(anyhow!(
                "No assembly manifests found in directory: {:?}",
                input_dir
            ));
        }

        // Create a progress bar for folder processing
        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(manifests.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} manifests ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Assembling");

        // Assemble manifests concurrently; each failure is logged and
        // counted without stopping the batch
        let outcomes = stream::iter(manifests.iter())
            .map(|manifest_path| {
                let folder_pb = folder_pb.clone();
                let output_dir = manifest_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| input_dir.clone());
                let timeline_path = FileManager::generate_output_path(
                    manifest_path,
                    &output_dir,
                    TIMELINE_SUFFIX,
                );
                let name = manifest_path
                    .file_name()
                    .map(|f| f.to_string_lossy().to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                let skip = timeline_path.exists() && !force_overwrite;

                async move {
                    if skip {
                        warn!(
                            "Skipping {}, timeline already exists (use -f to force overwrite)",
                            name
                        );
                        folder_pb.inc(1);
                        return JobOutcome::Skipped;
                    }

                    folder_pb.set_message(format!("Assembling: {}", name));
                    let outcome = match self
                        .run(manifest_path.clone(), output_dir, force_overwrite)
                        .await
                    {
                        Ok(()) => JobOutcome::Assembled,
                        Err(e) => {
                            error!("Error assembling {}: {}", name, e);
                            JobOutcome::Failed
                        }
                    };
                    folder_pb.inc(1);
                    outcome
                }
            })
            .buffer_unordered(self.config.assembly.concurrent_jobs)
            .collect::<Vec<_>>()
            .await;

        // Finish the folder progress bar
        folder_pb.finish_with_message("Folder processing complete");

        let assembled = outcomes
            .iter()
            .filter(|o| matches!(o, JobOutcome::Assembled))
            .count();
        let skipped = outcomes
            .iter()
            .filter(|o| matches!(o, JobOutcome::Skipped))
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, JobOutcome::Failed))
            .count();

        let duration = start_time.elapsed();
        let summary_message = format!(
            "Folder processing completed: {} assembled, {} skipped, {} errors",
            assembled, skipped, failed
        );
        info!("{}", summary_message);

        // Write summary to the issues log
        let log_path = input_dir.join(ISSUES_LOG_NAME);
        let entry = format!(
            "{} - Duration: {}",
            summary_message,
            Self::format_duration(duration)
        );
        if let Err(e) = FileManager::append_to_log_file(&log_path, &entry) {
            warn!("Failed to write folder summary: {}", e);
        }

        Ok(())
    }
}
