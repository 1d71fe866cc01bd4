//! Flood-fill pictures in which every pixel has a distinct colour.
//!
//! A fill starts from one or more seed pixels and grows outwards. Each new
//! pixel asks for the average colour of its painted neighbours and receives the
//! nearest colour of the 24-bit RGB cube that no other pixel holds yet, so the
//! finished picture is a smooth gradient with no repeated colour.
//!
//! # Quick Start
//!
//! ```no_run
//! use colour_flood::{FillConfig, FloodScheduler, Rgb, SeedSource};
//! use colour_flood::raster::write_png;
//!
//! let config = FillConfig::new(512, 512).with_queue_capacity(8);
//! let scheduler = FloodScheduler::new(config)?;
//!
//! let outcome = scheduler.fill(SeedSource::point(256, 256, Rgb::black()), None)?;
//! write_png("flood.png", &outcome.pixmap)?;
//! # Ok::<(), colour_flood::FillError>(())
//! ```
//!
//! # Modules
//!
//! - [`colour`]: the colour cube and the nearest-unused allocator
//! - [`fill`]: canvas, seed sources and the propagation scheduler
//! - [`raster`]: pixel types and PNG input/output
//! - [`utils`]: errors, logging and progress reporting

pub mod colour;
pub mod fill;
pub mod raster;
pub mod utils;

// Fill API
pub use fill::{
    FillConfig, FillOutcome, FloodScheduler, ImageSeed, PixelCanvas, SeedPixel, SeedSource, Spiral,
};

// Colour allocation
pub use colour::{AxisPermutation, ColourAllocator};

// Picture types
pub use raster::{Pixmap, Rgb};

// Progress reporting
pub use utils::progress::SnapshotSink;

// Error types
pub use utils::error::{FillError, Result};

// Constants
pub const COLOUR_FLOOD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(COLOUR_FLOOD_VERSION, "0.3.0");
    }

    #[test]
    fn test_public_api_fill() -> Result<()> {
        let scheduler = FloodScheduler::new(FillConfig::new(8, 4).with_axes(AxisPermutation::Brg))?;
        let outcome = scheduler.fill(SeedSource::point(0, 3, Rgb::new(40, 80, 120)), None)?;
        assert_eq!(outcome.pixmap.dimensions(), (8, 4));
        assert_eq!(outcome.pixmap.get_pixel(0, 3), Rgb::new(40, 80, 120));
        assert_eq!(outcome.seeded, 1);
        Ok(())
    }

    #[test]
    fn test_allocator_reexport() {
        let mut allocator = ColourAllocator::new(AxisPermutation::Rgb);
        assert_eq!(allocator.allocate(Rgb::white()), Rgb::white());
        assert_ne!(allocator.allocate(Rgb::white()), Rgb::white());
    }
}
