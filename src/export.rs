//! Image export of the board through an external renderer.

use crate::{
    config::ExportSettings,
    domain::Board,
    error::{Result, TierError},
};
use async_trait::async_trait;
use std::{fmt, sync::Arc};
use tracing::{debug, error};

/// Stem used when the title sanitizes down to nothing
const FALLBACK_STEM: &str = "tier-list";

/// Characters that are not allowed in file names on common platforms
const RESERVED_CHARS: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Parts of the rendered board a renderer may be asked to skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Title,
    Tier,
    TierLabel,
    TierDeleteButton,
    TierItems,
    Item,
    Pool,
}

type ExcludeFn = dyn Fn(ElementKind) -> bool + Send + Sync;

/// Options passed to the renderer
#[derive(Clone)]
pub struct ExportConfig {
    pub background_color: Option<String>,
    pub scale: f64,
    exclude: Arc<ExcludeFn>,
}

impl ExportConfig {
    /// Builds renderer options from settings. Tier delete buttons are
    /// excluded from the image.
    pub fn from_settings(settings: &ExportSettings) -> Self {
        Self {
            background_color: settings.background_color.clone(),
            scale: settings.scale,
            exclude: Arc::new(|kind: ElementKind| kind == ElementKind::TierDeleteButton),
        }
    }

    pub fn with_exclude(
        mut self,
        exclude: impl Fn(ElementKind) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.exclude = Arc::new(exclude);
        self
    }

    pub fn excludes(&self, kind: ElementKind) -> bool {
        (self.exclude)(kind)
    }
}

impl fmt::Debug for ExportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportConfig")
            .field("background_color", &self.background_color)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

/// Turns the board's visual representation into an encoded image
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, board: &Board, config: &ExportConfig) -> anyhow::Result<Vec<u8>>;
}

/// A rendered PNG and the name to save it under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Derives a safe file name from a board title.
///
/// Path separators, reserved punctuation and control characters are
/// dropped, the rest is trimmed and capped at `filename_max_chars`
/// characters before the suffix and `.png` extension are added.
pub fn sanitize_filename(title: &str, settings: &ExportSettings) -> String {
    let cleaned: String = title
        .chars()
        .filter(|&c| !c.is_control() && !RESERVED_CHARS.contains(&c))
        .collect();
    let stem: String = cleaned
        .trim()
        .trim_matches('.')
        .chars()
        .take(settings.filename_max_chars)
        .collect();
    let stem = match stem.trim() {
        "" => FALLBACK_STEM,
        stem => stem,
    };

    format!("{}{}.png", stem, settings.filename_suffix)
}

/// Renders the board and names the result after its title
pub async fn export_board(
    board: &Board,
    renderer: &dyn Renderer,
    settings: &ExportSettings,
) -> Result<ExportedImage> {
    let filename = sanitize_filename(board.title(), settings);
    let config = ExportConfig::from_settings(settings);

    let bytes = renderer.render(board, &config).await.map_err(|e| {
        error!(filename = %filename, error = %e, "export failed");
        TierError::ExportFailed(e.to_string())
    })?;

    debug!(filename = %filename, size = bytes.len(), "board exported");
    Ok(ExportedImage { filename, bytes })
}
