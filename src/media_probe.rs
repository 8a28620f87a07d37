/*!
 * Media duration probing.
 *
 * The composition core treats durations as plain numbers; resolving them
 * from real media is this collaborator's job. `FfprobeDurationProbe`
 * shells out to ffprobe with a timeout and memoizes results, since batch
 * runs keep asking about the same background tracks.
 */

use async_trait::async_trait;
use log::{debug, error};
use parking_lot::RwLock;
use serde_json::{Value, from_str};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::errors::ProbeError;

/// Default ffprobe timeout in seconds
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 60;

/// Resolves the playable duration of a media file
#[async_trait]
pub trait DurationProbe: Send + Sync + std::fmt::Debug {
    /// Duration of `path` in seconds
    async fn duration_secs(&self, path: &Path) -> Result<f64, ProbeError>;
}

/// ffprobe-backed probe with an in-memory result cache
#[derive(Debug)]
pub struct FfprobeDurationProbe {
    timeout: Duration,
    cache: RwLock<HashMap<PathBuf, f64>>,
}

impl FfprobeDurationProbe {
    /// Create a probe with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
    }

    /// Create a probe with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn cached(&self, path: &Path) -> Option<f64> {
        let cache = self.cache.read();
        let hit = cache.get(path).copied();
        if hit.is_some() {
            debug!("Probe cache hit: {}", path.display());
        }
        hit
    }

    fn remember(&self, path: &Path, duration: f64) {
        self.cache.write().insert(path.to_path_buf(), duration);
    }

    /// Pull `format.duration` out of ffprobe's JSON output
    fn parse_duration(stdout: &str) -> Result<f64, ProbeError> {
        let json: Value =
            from_str(stdout).map_err(|e| ProbeError::Malformed(e.to_string()))?;

        json.get("format")
            .and_then(|format| format.get("duration"))
            .and_then(|duration| duration.as_str())
            .and_then(|duration| duration.parse::<f64>().ok())
            .ok_or_else(|| {
                ProbeError::Malformed("no format.duration in ffprobe output".to_string())
            })
    }
}

impl Default for FfprobeDurationProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DurationProbe for FfprobeDurationProbe {
    async fn duration_secs(&self, path: &Path) -> Result<f64, ProbeError> {
        if let Some(duration) = self.cached(path) {
            return Ok(duration);
        }

        // Timeout prevents hanging on problematic files
        let ffprobe_future = Command::new("ffprobe")
            .args([
                "-v", "quiet",
                "-print_format", "json",
                "-show_format",
                path.to_str().unwrap_or_default(),
            ])
            .output();

        let output = tokio::select! {
            result = ffprobe_future => {
                result.map_err(|e| ProbeError::Spawn(e.to_string()))?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(ProbeError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("ffprobe failed for {}: {}", path.display(), stderr.trim());
            return Err(ProbeError::CommandFailed(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let duration = Self::parse_duration(&stdout)?;
        self.remember(path, duration);
        debug!("Probed {}: {:.3}s", path.display(), duration);
        Ok(duration)
    }
}
