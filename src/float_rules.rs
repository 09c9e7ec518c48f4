//! Deciding whether a newly tracked window tiles or floats.
//!
//! User overrides come first; the most specific matching record wins
//! (window id, then class + title pattern, then bare class; the later of
//! two equally specific records).  Without a match, a few heuristics
//! float dialogs and other windows that are not meant to be tiled.

use crate::command::{WindowInfo, WindowType};
use crate::tree::{WindowId, WindowMode};
use serde::{Deserialize, Serialize};

/// Mode an override forces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideMode {
    Tile,
    Float,
}

impl From<OverrideMode> for WindowMode {
    fn from(mode: OverrideMode) -> Self {
        match mode {
            OverrideMode::Tile => WindowMode::Tile,
            OverrideMode::Float => WindowMode::Float,
        }
    }
}

/// One user override record.
///
/// ```json
/// { "wm_class": "firefox", "wm_title": "Picture-in-Picture", "mode": "float" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatOverride {
    #[serde(default)]
    pub wm_class: String,
    /// Comma-separated title terms; `!term` matches titles that do not
    /// contain `term`.
    #[serde(default)]
    pub wm_title: Option<String>,
    /// Pins the record to a single window.
    #[serde(default)]
    pub wm_id: Option<WindowId>,
    pub mode: OverrideMode,
}

impl FloatOverride {
    /// How specifically this record matches the window, if at all.
    /// Higher is more specific.
    fn specificity(&self, window: WindowId, info: &WindowInfo) -> Option<u8> {
        if let Some(id) = self.wm_id {
            return (id == window).then_some(3);
        }
        if self.wm_class != info.class {
            return None;
        }
        match &self.wm_title {
            Some(pattern) => title_matches(pattern, &info.title).then_some(2),
            None => Some(1),
        }
    }
}

/// Whether `title` matches a comma-separated list of terms.  Any matching
/// term is enough.  Blank terms are ignored.
pub fn title_matches(pattern: &str, title: &str) -> bool {
    pattern
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty() && *term != "!")
        .any(|term| match term.strip_prefix('!') {
            Some(negated) => !title.contains(negated),
            None => title.contains(term),
        })
}

/// The override that applies to the window, if any.
pub fn find_override<'a>(
    overrides: &'a [FloatOverride],
    window: WindowId,
    info: &WindowInfo,
) -> Option<&'a FloatOverride> {
    let mut best: Option<(u8, &FloatOverride)> = None;
    for record in overrides {
        if let Some(score) = record.specificity(window, info) {
            if best.map_or(true, |(top, _)| score >= top) {
                best = Some((score, record));
            }
        }
    }
    best.map(|(_, record)| record)
}

/// Built-in rules: float dialogs, utility/splash windows, transients,
/// unnamed windows and fixed-size windows.
pub fn floats_by_default(info: &WindowInfo) -> bool {
    matches!(
        info.window_type,
        WindowType::Dialog | WindowType::ModalDialog | WindowType::Utility | WindowType::Splash
    ) || info.transient
        || info.class.is_empty()
        || info.title.is_empty()
        || !info.resizable
}

/// Initial mode of a newly tracked window.
pub fn resolve_mode(overrides: &[FloatOverride], window: WindowId, info: &WindowInfo) -> WindowMode {
    match find_override(overrides, window, info) {
        Some(record) => record.mode.into(),
        None if floats_by_default(info) => WindowMode::Float,
        None => WindowMode::Tile,
    }
}
