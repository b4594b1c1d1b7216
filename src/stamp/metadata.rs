use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// EXIF date fields in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTag {
    /// When the shutter fired
    DateTimeOriginal,
    /// When the image was digitized
    DateTimeDigitized,
    /// Last modification recorded by the camera or editor
    DateTime,
}

impl DateTag {
    pub const PRIORITY: [DateTag; 3] = [
        DateTag::DateTimeOriginal,
        DateTag::DateTimeDigitized,
        DateTag::DateTime,
    ];

    /// Canonical EXIF name, also the key used in [`ExifTags`]
    pub fn name(&self) -> &'static str {
        match self {
            DateTag::DateTimeOriginal => "DateTimeOriginal",
            DateTag::DateTimeDigitized => "DateTimeDigitized",
            DateTag::DateTime => "DateTime",
        }
    }
}

/// Readable EXIF values keyed by tag name.
///
/// Only the first occurrence of a tag is kept, so values from the primary
/// IFD shadow the thumbnail IFD.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExifTags {
    entries: BTreeMap<String, String>,
}

impl ExifTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(name.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn date_value(&self, tag: DateTag) -> Option<&str> {
        self.get(tag.name())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExifTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tags = ExifTags::new();
        for (name, value) in iter {
            tags.insert(name, value);
        }
        tags
    }
}

/// Read the EXIF block of an image file.
///
/// Corrupt files and containers rexif does not understand (PNG, WebP, BMP)
/// are reported as "no metadata".
pub fn read_exif_tags(image_path: &Path) -> Option<ExifTags> {
    match rexif::parse_file(image_path) {
        Ok(exif_data) => {
            let tags: ExifTags = exif_data
                .entries
                .iter()
                .map(|entry| {
                    (
                        format!("{:?}", entry.tag),
                        entry.value_more_readable.to_string(),
                    )
                })
                .collect();
            trace!("Read {} EXIF tags from {}", tags.len(), image_path.display());
            Some(tags)
        }
        Err(e) => {
            trace!("No EXIF data for {}: {}", image_path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut tags = ExifTags::new();
        tags.insert("DateTime", "2020:01:01 00:00:00");
        tags.insert("DateTime", "1999:12:31 23:59:59");
        assert_eq!(tags.get("DateTime"), Some("2020:01:01 00:00:00"));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_date_value_uses_canonical_name() {
        let tags: ExifTags = [("DateTimeDigitized", "2021:06:01 08:00:00")]
            .into_iter()
            .collect();
        assert_eq!(
            tags.date_value(DateTag::DateTimeDigitized),
            Some("2021:06:01 08:00:00")
        );
        assert_eq!(tags.date_value(DateTag::DateTimeOriginal), None);
    }

    #[test]
    fn test_missing_file_has_no_metadata() {
        assert!(read_exif_tags(Path::new("/nonexistent/photo.jpg")).is_none());
    }
}
