/*!
 * Asset capabilities injected into the composition core.
 *
 * The core never touches the filesystem directly. Readability checks go
 * through an `AssetStore` and background track selection goes through a
 * `MusicLibrary`, so composition stays deterministic and testable while
 * the binary wires in filesystem-backed implementations.
 */

use log::debug;
use rand::seq::IndexedRandom;
use std::collections::HashSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Readability capability for referenced assets
pub trait AssetStore: Send + Sync + Debug {
    /// Whether `path` resolves to a readable source
    fn exists(&self, path: &Path) -> bool;
}

/// Filesystem-backed store: a path is readable when it is an existing file
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetStore;

impl FsAssetStore {
    /// Create a new filesystem-backed store
    pub fn new() -> Self {
        Self
    }
}

impl AssetStore for FsAssetStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// In-memory store holding exactly the paths it was seeded with.
/// Useful for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetStore {
    paths: HashSet<PathBuf>,
}

impl StaticAssetStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `paths`
    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Register another readable path
    pub fn add<P: Into<PathBuf>>(&mut self, path: P) {
        self.paths.insert(path.into());
    }
}

impl AssetStore for StaticAssetStore {
    fn exists(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

/// Background track selection capability.
/// Offering no track is a valid outcome, not an error.
pub trait MusicLibrary: Send + Sync + Debug {
    /// Pick one track, or none when the library has nothing to offer
    fn pick(&self) -> Option<PathBuf>;
}

/// Audio file extensions recognized when scanning a music directory
pub const MUSIC_EXTENSIONS: &[&str] = &["wav", "mp3", "ogg", "flac", "m4a"];

/// Directory-backed library: scans a folder tree for audio files and picks
/// one uniformly at random per assembly
#[derive(Debug, Clone)]
pub struct DirMusicLibrary {
    root: PathBuf,
    extensions: Vec<String>,
}

impl DirMusicLibrary {
    /// Create a library over `root` recognizing [`MUSIC_EXTENSIONS`]
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            extensions: MUSIC_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Replace the recognized extension set
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().to_lowercase())
            .collect();
        self
    }

    /// All recognized tracks under the root, sorted for determinism
    pub fn tracks(&self) -> Vec<PathBuf> {
        let mut tracks: Vec<PathBuf> = WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.to_lowercase())
                    .is_some_and(|ext| self.extensions.iter().any(|known| *known == ext))
            })
            .collect();
        tracks.sort();
        tracks
    }
}

impl MusicLibrary for DirMusicLibrary {
    fn pick(&self) -> Option<PathBuf> {
        let tracks = self.tracks();
        let picked = tracks.choose(&mut rand::rng()).cloned();
        match &picked {
            Some(track) => debug!("Picked background track: {}", track.display()),
            None => debug!("Music library {} offered no tracks", self.root.display()),
        }
        picked
    }
}
