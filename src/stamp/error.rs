use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StampError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml_edit::de::Error),

    #[error("Input path not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Not an image file: {}", .0.display())]
    NotAnImage(PathBuf),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
