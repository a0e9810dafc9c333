use crate::{
    drag::{pointer::DEFAULT_DRAG_THRESHOLD, CancelPolicy},
    error::{Result, TierError},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Export settings handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Background fill; `None` keeps the board transparent
    pub background_color: Option<String>,
    pub scale: f64,
    /// Upper bound on the title-derived part of the file name, in characters
    pub filename_max_chars: usize,
    /// Appended to the sanitized title before the extension
    pub filename_suffix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            background_color: None,
            scale: 2.0,
            filename_max_chars: 60,
            filename_suffix: "-排名表".to_string(),
        }
    }
}

/// Tier list configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierListConfig {
    /// Title used when none is set or the user clears it
    pub default_title: String,
    /// Tiers created when there is no usable saved board
    pub default_tiers: Vec<String>,
    /// Key the board snapshot is stored under
    pub storage_key: String,
    /// Distance a touch or pen press must travel before it drags
    pub drag_threshold: f64,
    pub tier_cancel: CancelPolicy,
    pub export: ExportSettings,
}

impl Default for TierListConfig {
    fn default() -> Self {
        Self {
            default_title: "从夯到拉".to_string(),
            default_tiers: ["夯", "顶级", "人上人", "NPC", "拉完了"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            storage_key: "hot-tier-maker-v1".to_string(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            tier_cancel: CancelPolicy::default(),
            export: ExportSettings::default(),
        }
    }
}

impl TierListConfig {
    /// Parses a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| TierError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).await?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.default_title.trim().is_empty() {
            return Err(TierError::ConfigError(
                "default_title must not be empty".to_string(),
            ));
        }
        if self.default_tiers.is_empty() {
            return Err(TierError::ConfigError(
                "default_tiers must name at least one tier".to_string(),
            ));
        }
        if self.default_tiers.iter().any(|name| name.trim().is_empty()) {
            return Err(TierError::ConfigError(
                "default_tiers must not contain blank names".to_string(),
            ));
        }
        if self.storage_key.trim().is_empty() {
            return Err(TierError::ConfigError(
                "storage_key must not be empty".to_string(),
            ));
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(TierError::ConfigError(format!(
                "drag_threshold must be a non-negative number, got {}",
                self.drag_threshold
            )));
        }
        if !self.export.scale.is_finite() || self.export.scale <= 0.0 {
            return Err(TierError::ConfigError(format!(
                "export.scale must be positive, got {}",
                self.export.scale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TierListConfig::default();
        assert_eq!(config.default_title, "从夯到拉");
        assert_eq!(config.default_tiers.len(), 5);
        assert_eq!(config.default_tiers[0], "夯");
        assert_eq!(config.storage_key, "hot-tier-maker-v1");
        assert_eq!(config.tier_cancel, CancelPolicy::Restore);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = TierListConfig::from_toml_str(
            r#"
            default_title = "Snacks"
            tier_cancel = "keep-position"

            [export]
            scale = 3.0
            "#,
        )
        .unwrap();

        assert_eq!(config.default_title, "Snacks");
        assert_eq!(config.tier_cancel, CancelPolicy::KeepPosition);
        assert_eq!(config.export.scale, 3.0);
        assert_eq!(config.export.filename_max_chars, 60);
        assert_eq!(config.storage_key, "hot-tier-maker-v1");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            TierListConfig::from_toml_str("default_title = ["),
            Err(TierError::ConfigError(_))
        ));
        assert!(matches!(
            TierListConfig::from_toml_str("drag_threshold = -1.0"),
            Err(TierError::ConfigError(_))
        ));
        assert!(matches!(
            TierListConfig::from_toml_str("default_title = \"  \""),
            Err(TierError::ConfigError(_))
        ));
        assert!(matches!(
            TierListConfig::from_toml_str("default_tiers = []"),
            Err(TierError::ConfigError(_))
        ));
        assert!(matches!(
            TierListConfig::from_toml_str("default_tiers = [\"S\", \" \"]"),
            Err(TierError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tierlist.toml");
        tokio::fs::write(&path, "default_tiers = [\"S\", \"A\"]\n")
            .await
            .unwrap();

        let config = TierListConfig::load(&path).await.unwrap();
        assert_eq!(config.default_tiers, vec!["S".to_string(), "A".to_string()]);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = TierListConfig::load(temp_dir.path().join("missing.toml")).await;
        assert!(matches!(result, Err(TierError::IoError(_))));
    }
}
