//! Flood-fill propagation: the shared canvas, seed sources and the scheduler.

pub mod canvas;
pub mod config;
pub mod scheduler;
pub mod seed;

pub use canvas::PixelCanvas;
pub use config::FillConfig;
pub use scheduler::{FillOutcome, FloodScheduler};
pub use seed::{ImageSeed, SeedPixel, SeedSource, Spiral};
