// Stamp module - date resolution, text compositing and the batch driver
pub mod compositor;
pub mod date;
mod error;
pub mod font;
pub mod formats;
pub mod metadata;
pub mod process;
pub mod scan;
pub mod style;

// Re-export public items
pub use compositor::composite;
pub use date::{DateSource, ResolvedDate, resolve};
pub use error::StampError;
pub use font::{MAX_FONT_SIZE, WatermarkFont};
pub use metadata::{DateTag, ExifTags, read_exif_tags};
pub use process::{BatchSummary, ImageRecord, process_image_file, run};
pub use style::{Position, WatermarkStyle, parse_color};
