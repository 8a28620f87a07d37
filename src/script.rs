/*!
 * Narration script utilities.
 *
 * Generated scripts carry inline sound effect suggestions written as
 * `[SFX: description]`. Those markers must never reach voice synthesis or
 * the captions, so this module strips them out and reports them in
 * document order together with their positions in the original text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an inline sound effect marker, capturing its description
static SFX_MARKER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[SFX:(.*?)\]").unwrap());

/// One `[SFX: ...]` marker lifted from a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SfxMarker {
    /// Effect description from inside the marker, trimmed
    pub description: String,
    /// Byte offset of the marker in the original script
    pub offset: usize,
}

/// Strip all `[SFX: ...]` markers from a script.
///
/// Returns the cleaned script together with the markers in document order.
/// Surrounding whitespace in the script is left untouched; only the marker
/// text itself is removed.
pub fn extract_sfx_markers(script: &str) -> (String, Vec<SfxMarker>) {
    let markers = SFX_MARKER_REGEX
        .captures_iter(script)
        .map(|caps| {
            let offset = caps.get(0).map_or(0, |m| m.start());
            let description = caps
                .get(1)
                .map_or(String::new(), |m| m.as_str().trim().to_string());
            SfxMarker {
                description,
                offset,
            }
        })
        .collect();

    let clean = SFX_MARKER_REGEX.replace_all(script, "").into_owned();
    (clean, markers)
}
