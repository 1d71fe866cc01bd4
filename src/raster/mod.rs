//! Colour and picture types, plus PNG encoding for finished and intermediate fills.

pub mod pixmap;
pub mod png;

pub use pixmap::{Pixmap, Rgb};
pub use png::{PngSnapshotSink, read_image, write_png};
