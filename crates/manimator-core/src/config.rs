//! Render configuration
//!
//! The render step never reads ambient defaults. A [`RenderConfig`] is passed
//! to the backend explicitly, and the host-wide [`RenderSettings`] is only
//! changed through a [`ConfigScope`] guard that puts the previous value back
//! when it is dropped.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use parking_lot::Mutex;
use tracing::debug;

use crate::Error;

/// Container format of the rendered artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Mp4,
    Mov,
    Webm,
    Gif,
}

impl OutputFormat {
    /// File extension (also the value of manim's `--format` flag)
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mp4 => "mp4",
            OutputFormat::Mov => "mov",
            OutputFormat::Webm => "webm",
            OutputFormat::Gif => "gif",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mp4" => Ok(OutputFormat::Mp4),
            "mov" => Ok(OutputFormat::Mov),
            "webm" => Ok(OutputFormat::Webm),
            "gif" => Ok(OutputFormat::Gif),
            other => Err(Error::Config(format!(
                "Unknown format '{other}'. Valid options: mp4, mov, webm, gif"
            ))),
        }
    }
}

/// Render quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    /// 480p15
    #[default]
    Low,
    /// 720p30
    Medium,
    /// 1080p60
    High,
    /// 1440p60
    Production,
    /// 2160p60
    FourK,
}

impl Quality {
    /// Value of manim's `--quality` flag
    pub fn flag(&self) -> &'static str {
        match self {
            Quality::Low => "l",
            Quality::Medium => "m",
            Quality::High => "h",
            Quality::Production => "p",
            Quality::FourK => "k",
        }
    }
}

impl FromStr for Quality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "low_quality" | "l" => Ok(Quality::Low),
            "medium" | "medium_quality" | "m" => Ok(Quality::Medium),
            "high" | "high_quality" | "h" => Ok(Quality::High),
            "production" | "production_quality" | "p" => Ok(Quality::Production),
            "fourk" | "fourk_quality" | "4k" | "k" => Ok(Quality::FourK),
            other => Err(Error::Config(format!(
                "Unknown quality '{other}'. Valid options: low, medium, high, production, fourk"
            ))),
        }
    }
}

/// Rendering backend used by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Renderer {
    /// CPU renderer, works headless
    #[default]
    Cairo,
    /// GPU renderer
    OpenGl,
}

impl Renderer {
    /// Value of manim's `--renderer` flag
    pub fn flag(&self) -> &'static str {
        match self {
            Renderer::Cairo => "cairo",
            Renderer::OpenGl => "opengl",
        }
    }
}

impl FromStr for Renderer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cairo" => Ok(Renderer::Cairo),
            "opengl" | "gl" => Ok(Renderer::OpenGl),
            other => Err(Error::Config(format!(
                "Unknown renderer '{other}'. Valid options: cairo, opengl"
            ))),
        }
    }
}

/// Configuration applied to a single render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Directory the engine writes all media into
    pub media_dir: PathBuf,
    pub format: OutputFormat,
    pub quality: Quality,
    pub renderer: Renderer,
}

impl RenderConfig {
    /// Create a config writing into `media_dir` with default format, quality and renderer
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
            format: OutputFormat::default(),
            quality: Quality::default(),
            renderer: Renderer::default(),
        }
    }

    /// Set the media directory
    pub fn with_media_dir(mut self, media_dir: impl Into<PathBuf>) -> Self {
        self.media_dir = media_dir.into();
        self
    }

    /// Set the output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the quality tier
    pub fn with_quality(mut self, quality: Quality) -> Self {
        self.quality = quality;
        self
    }

    /// Set the renderer backend
    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Same settings, rooted at another media directory
    pub fn for_workspace(&self, root: &Path) -> Self {
        self.clone().with_media_dir(root)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new("media")
    }
}

/// Host-wide render configuration
///
/// Readers always see either the defaults or exactly one in-flight override.
#[derive(Debug, Default)]
pub struct RenderSettings {
    current: Mutex<RenderConfig>,
}

impl RenderSettings {
    /// Create settings holding `defaults`
    pub fn new(defaults: RenderConfig) -> Self {
        Self {
            current: Mutex::new(defaults),
        }
    }

    /// Snapshot of the active configuration
    pub fn current(&self) -> RenderConfig {
        self.current.lock().clone()
    }

    /// Install `config` until the returned guard is dropped
    pub fn scoped(&self, config: RenderConfig) -> ConfigScope<'_> {
        let previous = std::mem::replace(&mut *self.current.lock(), config.clone());
        debug!(media_dir = %config.media_dir.display(), "render config override installed");

        ConfigScope {
            settings: self,
            previous: Some(previous),
            active: config,
        }
    }
}

/// Guard for a temporary configuration override
#[must_use = "the override is reverted as soon as the guard is dropped"]
pub struct ConfigScope<'a> {
    settings: &'a RenderSettings,
    previous: Option<RenderConfig>,
    active: RenderConfig,
}

impl ConfigScope<'_> {
    /// The configuration in force for this scope
    pub fn config(&self) -> &RenderConfig {
        &self.active
    }
}

impl Drop for ConfigScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.settings.current.lock() = previous;
            debug!("render config restored");
        }
    }
}
