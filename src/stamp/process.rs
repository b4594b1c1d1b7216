use super::compositor::composite;
use super::date::{ResolvedDate, resolve};
use super::font::WatermarkFont;
use super::formats::{self, OutputFormat};
use super::metadata::{ExifTags, read_exif_tags};
use super::scan::{ScanEntry, collect_images, find_output_dir, output_file_name};
use super::style::WatermarkStyle;
use super::StampError;
use crate::Config;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, error, info, warn};

/// An image opened for watermarking
pub struct ImageRecord {
    pub path: PathBuf,
    pub image: DynamicImage,
    pub exif: Option<ExifTags>,
    pub modified: SystemTime,
    pub format: OutputFormat,
    pub icc_profile: Option<Vec<u8>>,
}

impl ImageRecord {
    pub fn open(path: &Path) -> Result<Self, StampError> {
        let format = OutputFormat::from_path(path)
            .ok_or_else(|| StampError::NotAnImage(path.to_path_buf()))?;

        let modified = std::fs::metadata(path)?.modified().unwrap_or_else(|e| {
            warn!(
                "No modification time for {} ({}), using current time",
                path.display(),
                e
            );
            SystemTime::now()
        });

        debug!("Opening image file: {:?}, format: {:?}", path, format);
        let image = image::open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            image,
            exif: read_exif_tags(path),
            modified,
            format,
            icc_profile: formats::extract_icc_profile(path, format),
        })
    }

    pub fn resolve_date(&self) -> ResolvedDate {
        resolve(self.exif.as_ref(), self.modified)
    }
}

/// Read-only state shared by every image in a run
pub struct BatchContext<'a> {
    pub style: &'a WatermarkStyle,
    pub font: &'a WatermarkFont,
    pub jpeg_quality: u8,
    pub webp_quality: f32,
    pub file_suffix: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
}

/// Watermark one image and write it below `output_root`
pub fn process_image_file(
    entry: &ScanEntry,
    output_root: &Path,
    ctx: &BatchContext<'_>,
) -> Result<PathBuf, StampError> {
    let record = ImageRecord::open(&entry.path)?;
    let date = record.resolve_date();
    let text = date.to_string();
    debug!("{}: date {} from {:?}", entry.path.display(), text, date.source);

    let watermarked = composite(&record.image, &text, ctx.style, ctx.font);

    let output_dir = output_root.join(&entry.relative_dir);
    std::fs::create_dir_all(&output_dir)?;
    let file_name = output_file_name(&entry.path, ctx.file_suffix)
        .ok_or_else(|| StampError::NotAnImage(entry.path.clone()))?;
    let output_path = output_dir.join(file_name);

    formats::save_image(
        &watermarked,
        &output_path,
        record.format,
        ctx.jpeg_quality,
        ctx.webp_quality,
        record.icc_profile.as_deref(),
    )?;

    info!("Wrote {} ({})", output_path.display(), text);
    Ok(output_path)
}

/// Watermark every image under `input`.
///
/// A missing input or a non-image file fails the run. Failures on individual
/// images, including write errors, are logged and counted; the batch carries on.
pub fn run(input: &Path, config: &Config) -> Result<BatchSummary, StampError> {
    config.validate()?;
    let entries = collect_images(input)?;
    let output_dir = find_output_dir(input, &config.output.directory_suffix)?;
    std::fs::create_dir_all(&output_dir)?;

    let style = config.style()?;
    let font = WatermarkFont::load(style.font_path.as_deref());
    let ctx = BatchContext {
        style: &style,
        font: &font,
        jpeg_quality: config.output.jpeg_quality,
        webp_quality: config.output.webp_quality,
        file_suffix: &config.output.file_suffix,
    };

    let mut summary = BatchSummary {
        processed: 0,
        failed: 0,
        output_dir,
    };

    for entry in &entries {
        match process_image_file(entry, &summary.output_dir, &ctx) {
            Ok(_) => summary.processed += 1,
            Err(e) => {
                error!("Failed to process {}: {}", entry.path.display(), e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "Done. Processed {} image(s). Output: {}",
        summary.processed,
        summary.output_dir.display()
    );
    if summary.failed > 0 {
        warn!("{} image(s) failed", summary.failed);
    }

    Ok(summary)
}
