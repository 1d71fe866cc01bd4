//! PNG output and reference-image input, built on the `image` crate.

use crate::raster::pixmap::Pixmap;
use crate::utils::error::Result;
use crate::utils::progress::SnapshotSink;
use std::path::{Path, PathBuf};

/// Encodes `pixmap` as an 8-bit RGB PNG at `path`.
pub fn write_png(path: impl AsRef<Path>, pixmap: &Pixmap) -> Result<()> {
    let (width, height) = pixmap.dimensions();
    ::image::save_buffer_with_format(
        path.as_ref(),
        pixmap.as_raw(),
        width,
        height,
        ::image::ColorType::Rgb8,
        ::image::ImageFormat::Png,
    )?;
    Ok(())
}

/// Decodes a PNG or JPEG seed image into a pixmap, dropping any alpha.
pub fn read_image(path: impl AsRef<Path>) -> Result<Pixmap> {
    let img = ::image::open(path.as_ref())?.to_rgb8();
    Ok(Pixmap::from_rgb_image(&img))
}

/// Writes every snapshot as `<dir>/<tag>.<milestone>.png`.
#[derive(Debug, Clone)]
pub struct PngSnapshotSink {
    dir: PathBuf,
    tag: String,
}

impl PngSnapshotSink {
    pub fn new(dir: impl Into<PathBuf>, tag: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            tag: tag.into(),
        }
    }

    pub fn path_for(&self, milestone: u32) -> PathBuf {
        self.dir.join(format!("{}.{}.png", self.tag, milestone))
    }
}

impl SnapshotSink for PngSnapshotSink {
    fn write_snapshot(&self, milestone: u32, percent: u32, pixmap: &Pixmap) -> Result<()> {
        let path = self.path_for(milestone);
        log::debug!("Drawing {} ({}% filled)", path.display(), percent);
        write_png(path, pixmap)
    }
}
