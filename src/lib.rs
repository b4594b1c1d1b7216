use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub mod stamp;

pub use stamp::{BatchSummary, Position, StampError, WatermarkStyle};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub watermark: WatermarkConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatermarkConfig {
    pub font_size: u32,
    /// Hex (`#RRGGBB`, `#RGB`) or a CSS color name
    pub color: String,
    pub position: Position,
    pub opacity: u8,
    pub margin: u32,
    pub shadow: bool,
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended to the input directory name to form the output directory
    pub directory_suffix: String,
    /// Appended to each file stem
    pub file_suffix: String,
    pub jpeg_quality: u8,
    pub webp_quality: f32,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 32,
            color: "#FFFFFF".to_string(),
            position: Position::BottomRight,
            opacity: 220,
            margin: 16,
            shadow: true,
            font_path: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory_suffix: "_watermark".to_string(),
            file_suffix: "_wm".to_string(),
            jpeg_quality: 92,
            webp_quality: 90.0,
        }
    }
}

impl Config {
    /// Load from a TOML file, or defaults when the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, StampError> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = toml_edit::de::from_str::<Config>(&content)?;
        info!("Configuration loaded from: {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), StampError> {
        if self.watermark.font_size == 0 {
            return Err(StampError::InvalidConfig(
                "font_size must be greater than 0".to_string(),
            ));
        }
        if self.watermark.font_size > stamp::MAX_FONT_SIZE {
            return Err(StampError::InvalidConfig(format!(
                "font_size must be at most {}, got {}",
                stamp::MAX_FONT_SIZE,
                self.watermark.font_size
            )));
        }
        if !(1..=100).contains(&self.output.jpeg_quality) {
            return Err(StampError::InvalidConfig(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.output.jpeg_quality
            )));
        }
        if !(0.0..=100.0).contains(&self.output.webp_quality) {
            return Err(StampError::InvalidConfig(format!(
                "webp_quality must be between 0 and 100, got {}",
                self.output.webp_quality
            )));
        }
        if self.output.directory_suffix.is_empty() {
            return Err(StampError::InvalidConfig(
                "directory_suffix must not be empty".to_string(),
            ));
        }
        stamp::parse_color(&self.watermark.color)?;
        Ok(())
    }

    /// Build the style shared by every image in a run
    pub fn style(&self) -> Result<WatermarkStyle, StampError> {
        Ok(WatermarkStyle {
            font_size: self.watermark.font_size,
            color: stamp::parse_color(&self.watermark.color)?,
            opacity: self.watermark.opacity,
            position: self.watermark.position,
            margin: self.watermark.margin,
            shadow: self.watermark.shadow,
            font_path: self.watermark.font_path.clone(),
        })
    }
}
