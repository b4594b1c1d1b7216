use super::StampError;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

/// One image found under the input path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub path: PathBuf,
    /// Directory of the image relative to the input root, mirrored in the output
    pub relative_dir: PathBuf,
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Output directory for a run: `<dir-name><suffix>` next to the input directory.
///
/// The input is canonicalized first so `.`, `..` and symlinks name the real
/// directory. For a single file the file's directory is used. A directory
/// without a parent (the filesystem root) gets the output directory inside it.
pub fn find_output_dir(input: &Path, suffix: &str) -> Result<PathBuf, StampError> {
    let input = std::fs::canonicalize(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StampError::InputNotFound(input.to_path_buf()),
        _ => StampError::IoError(e),
    })?;
    let base_dir = if input.is_file() {
        input
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| StampError::InputNotFound(input.clone()))?
    } else {
        input
    };

    match (base_dir.parent(), base_dir.file_name()) {
        (Some(parent), Some(name)) => {
            let mut output_name = name.to_os_string();
            output_name.push(suffix);
            Ok(parent.join(output_name))
        }
        _ => Ok(base_dir.join(suffix.trim_start_matches('_'))),
    }
}

/// Enumerate the images to process.
///
/// A file yields itself; a directory is walked recursively in file-name
/// order. Unreadable entries below the root are skipped with a warning.
pub fn collect_images(input: &Path) -> Result<Vec<ScanEntry>, StampError> {
    if !input.exists() {
        return Err(StampError::InputNotFound(input.to_path_buf()));
    }

    if input.is_file() {
        if !is_image_file(input) {
            return Err(StampError::NotAnImage(input.to_path_buf()));
        }
        return Ok(vec![ScanEntry {
            path: input.to_path_buf(),
            relative_dir: PathBuf::new(),
        }]);
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(input)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !is_image_file(path) {
            continue;
        }

        let relative_dir = path
            .parent()
            .and_then(|parent| parent.strip_prefix(input).ok())
            .map(Path::to_path_buf)
            .unwrap_or_default();
        entries.push(ScanEntry {
            path: path.to_path_buf(),
            relative_dir,
        });
    }

    debug!("Found {} images under {}", entries.len(), input.display());
    Ok(entries)
}

/// File name of the watermarked copy: `<stem><suffix>.<original extension>`
pub fn output_file_name(source: &Path, suffix: &str) -> Option<String> {
    let stem = source.file_stem()?.to_string_lossy();
    let extension = source.extension()?.to_string_lossy();
    Some(format!("{}{}.{}", stem, suffix, extension))
}
