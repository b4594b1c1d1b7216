use super::metadata::{DateTag, ExifTags};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use std::fmt;
use std::time::SystemTime;
use tracing::debug;

/// Where a [`ResolvedDate`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSource {
    Exif(DateTag),
    FileModified,
}

/// Calendar date rendered onto the image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// Pick the display date for an image.
///
/// The first date tag that is present and parses wins. Without one, the local
/// calendar date of `fallback` is used, so this never fails.
pub fn resolve(metadata: Option<&ExifTags>, fallback: SystemTime) -> ResolvedDate {
    if let Some(tags) = metadata {
        for tag in DateTag::PRIORITY {
            let Some(raw) = tags.date_value(tag) else {
                continue;
            };
            match parse_exif_date(raw) {
                Some(date) => {
                    debug!("Found capture date in {:?}: {}", tag, date);
                    return ResolvedDate {
                        date,
                        source: DateSource::Exif(tag),
                    };
                }
                None => debug!("Ignoring unparseable {:?} value {:?}", tag, raw),
            }
        }
    }

    let date = DateTime::<Local>::from(fallback).date_naive();
    debug!("Using file modification date: {}", date);
    ResolvedDate {
        date,
        source: DateSource::FileModified,
    }
}

/// Parse an EXIF date-time value, keeping only the date.
///
/// EXIF writes "2005:07:30 07:22:46"; some tools use dashes or drop the time.
pub fn parse_exif_date(raw: &str) -> Option<NaiveDate> {
    let value = raw
        .trim_matches(|c: char| c == '\0' || c == '"' || c.is_whitespace());

    for format in ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive_dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive_dt.date());
        }
    }

    for format in ["%Y:%m:%d", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    None
}
