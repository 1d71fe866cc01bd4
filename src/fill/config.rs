//! Run parameters for a fill.

use crate::colour::axes::AxisPermutation;
use crate::colour::cube::CUBE_CAPACITY;
use crate::utils::error::{FillError, Result};

/// Largest supported canvas edge.
pub const MAX_DIMENSION: u32 = 4096;

/// Largest supported neighbourhood half-width.
pub const MAX_BLUR_RADIUS: u32 = 50;

/// Largest supported number of progress steps.
pub const MAX_PROGRESS_STEPS: u32 = 4096;

/// Immutable parameters of one fill.
///
/// # Example
/// ```
/// use colour_flood::{AxisPermutation, FillConfig};
///
/// let config = FillConfig::new(256, 128)
///     .with_queue_capacity(64)
///     .with_blur_radius(2)
///     .with_axes(AxisPermutation::Gbr);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FillConfig {
    pub width: u32,
    pub height: u32,
    /// Capacity of the work queue. Small values give smooth gradients, large
    /// ones geometric artefacts around the seeds.
    pub queue_capacity: usize,
    /// Half-width of the square averaged for each target colour.
    pub blur_radius: u32,
    pub axes: AxisPermutation,
    /// Fraction of the colour cube after which colours are recycled; 0 disables.
    pub echo_spacing: f64,
    /// Paint seeds whose colour is already taken (with the nearest free one).
    pub allow_duplicate_seeds: bool,
    /// Invert every channel of the finished picture and of snapshots.
    pub invert_output: bool,
    /// Number of progress steps; milestones fire at `k / steps` of the canvas.
    pub progress_steps: u32,
    /// Threads for the neighbour fan-out pool; 0 lets rayon decide.
    pub workers: usize,
}

impl FillConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            queue_capacity: 8,
            blur_radius: 1,
            axes: AxisPermutation::Rgb,
            echo_spacing: 0.0,
            allow_duplicate_seeds: false,
            invert_output: false,
            progress_steps: 10,
            workers: 0,
        }
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_blur_radius(mut self, radius: u32) -> Self {
        self.blur_radius = radius;
        self
    }

    pub fn with_axes(mut self, axes: AxisPermutation) -> Self {
        self.axes = axes;
        self
    }

    pub fn with_echo_spacing(mut self, fraction: f64) -> Self {
        self.echo_spacing = fraction;
        self
    }

    pub fn with_duplicate_seeds(mut self, allow: bool) -> Self {
        self.allow_duplicate_seeds = allow;
        self
    }

    pub fn with_inverted_output(mut self, invert: bool) -> Self {
        self.invert_output = invert;
        self
    }

    pub fn with_progress_steps(mut self, steps: u32) -> Self {
        self.progress_steps = steps;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Allocations a colour stays reserved for before it is recycled; 0 when off.
    pub fn echo_window(&self) -> usize {
        (self.echo_spacing * CUBE_CAPACITY as f64) as usize
    }

    /// Painted-pixel count at which the allocator switches to pruned search.
    pub fn endgame_threshold(&self) -> u64 {
        self.pixel_count() * 15 / 16
    }

    /// Rejects configurations the fill cannot honour.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(FillError::InvalidConfig(msg));

        if self.width == 0 || self.width > MAX_DIMENSION {
            return invalid(format!(
                "width {} should be between 1 and {}",
                self.width, MAX_DIMENSION
            ));
        }
        if self.height == 0 || self.height > MAX_DIMENSION {
            return invalid(format!(
                "height {} should be between 1 and {}",
                self.height, MAX_DIMENSION
            ));
        }
        if self.pixel_count() > CUBE_CAPACITY as u64 {
            return invalid(format!(
                "{} pixels exceed the {} available colours",
                self.pixel_count(),
                CUBE_CAPACITY
            ));
        }
        if self.queue_capacity == 0 {
            return invalid("queue capacity should be at least 1".to_string());
        }
        if self.blur_radius == 0 || self.blur_radius > MAX_BLUR_RADIUS {
            return invalid(format!(
                "blur {} should be between 1 and {}",
                self.blur_radius, MAX_BLUR_RADIUS
            ));
        }
        if !(0.0..=1.0).contains(&self.echo_spacing) {
            return invalid(format!(
                "echo spacing {} should be between 0.0 (off) and 1.0",
                self.echo_spacing
            ));
        }
        if self.progress_steps == 0 || self.progress_steps > MAX_PROGRESS_STEPS {
            return invalid(format!(
                "progress steps {} should be between 1 and {}",
                self.progress_steps, MAX_PROGRESS_STEPS
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = FillConfig::new(4096, 4096);
        assert!(config.validate().is_ok());
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.blur_radius, 1);
        assert_eq!(config.echo_window(), 0);
        assert_eq!(config.endgame_threshold(), 4096 * 4096 * 15 / 16);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let base = FillConfig::new(16, 16);
        assert!(FillConfig::new(0, 16).validate().is_err());
        assert!(FillConfig::new(16, 4097).validate().is_err());
        assert!(base.clone().with_queue_capacity(0).validate().is_err());
        assert!(base.clone().with_blur_radius(0).validate().is_err());
        assert!(base.clone().with_blur_radius(51).validate().is_err());
        assert!(base.clone().with_echo_spacing(1.5).validate().is_err());
        assert!(base.clone().with_echo_spacing(f64::NAN).validate().is_err());
        assert!(base.clone().with_progress_steps(0).validate().is_err());
    }

    #[test]
    fn test_echo_window_scales_with_cube() {
        let config = FillConfig::new(16, 16).with_echo_spacing(0.25);
        assert_eq!(config.echo_window(), CUBE_CAPACITY / 4);
    }
}
