//! Generated scene sources
//!
//! Model output is untrusted text. These helpers do the only two things the
//! pipeline assumes about it: strip markdown fences, and find the class that
//! derives from a `*Scene` base.

use std::sync::LazyLock;

use regex::Regex;

/// Fixed filename the source is persisted under inside the workspace
pub const SCRIPT_FILE_NAME: &str = "scene.py";

const FENCE: &str = "```";

static SCENE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // literal pattern
    Regex::new(r"class\s+(\w+)\s*\(\s*[A-Za-z0-9_.]*Scene\s*\)\s*:").expect("valid regex")
});

/// Source text produced by the model for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScene {
    /// Source with code fences removed
    pub raw_text: String,
}

impl GeneratedScene {
    /// Normalise model output into a scene source
    pub fn from_model_output(text: &str) -> Self {
        Self {
            raw_text: strip_code_fences(text),
        }
    }

    /// Name of the Scene subclass, if the source defines one
    pub fn class_name(&self) -> Option<&str> {
        find_scene_class(&self.raw_text)
    }
}

impl std::fmt::Display for GeneratedScene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw_text)
    }
}

/// Remove a leading and a trailing markdown code fence, best effort
///
/// A language tag is dropped only when it sits alone on the fence line.
/// Text without fences comes back trimmed; partial fences are not repaired.
pub fn strip_code_fences(text: &str) -> String {
    let mut code = text.trim();

    if let Some(rest) = code.strip_prefix(FENCE) {
        code = match rest.split_once('\n') {
            Some((tag, body)) if is_language_tag(tag) => body,
            _ => rest,
        };
    }

    if let Some(rest) = code.strip_suffix(FENCE) {
        code = rest;
    }

    code.trim().to_string()
}

fn is_language_tag(line: &str) -> bool {
    line.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+'))
}

/// Find the first class whose (single) base type name ends in `Scene`
pub fn find_scene_class(source: &str) -> Option<&str> {
    SCENE_CLASS
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
