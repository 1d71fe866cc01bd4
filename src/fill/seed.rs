//! Where a fill starts: a single point, or a reference image walked in a spiral.

use crate::raster::pixmap::{Pixmap, Rgb};
use crate::utils::error::{FillError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Magenta, the chroma key used when none is given.
pub const DEFAULT_CHROMA_KEY: Rgb = Rgb::from_hex(0xFF00FF);

/// A location and the colour requested for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedPixel {
    pub x: u32,
    pub y: u32,
    pub colour: Rgb,
}

impl SeedPixel {
    pub fn new(x: u32, y: u32, colour: Rgb) -> Self {
        Self { x, y, colour }
    }
}

// ============================================================================
// Spiral traversal
// ============================================================================

/// In-bounds coordinates of a `width × height` grid, spiralling out from `origin`.
///
/// The origin comes first, then ring after ring (every cell at Chebyshev
/// distance `n` from the origin forms ring `n`). Each ring is walked along its
/// top edge right to left, down its left edge, along its bottom edge left to
/// right and up its right edge. Iteration ends once a ring lies entirely
/// outside the grid on all four sides.
#[derive(Debug, Clone)]
pub struct Spiral {
    width: i64,
    height: i64,
    cx: i64,
    cy: i64,
    layer: i64,
    step: i64,
    started: bool,
}

impl Spiral {
    pub fn new(width: u32, height: u32, origin: (u32, u32)) -> Self {
        Self {
            width: width as i64,
            height: height as i64,
            cx: origin.0 as i64,
            cy: origin.1 as i64,
            layer: 1,
            step: 0,
            started: false,
        }
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    fn ring_outside(&self, layer: i64) -> bool {
        self.cx - layer < 0
            && self.cy - layer < 0
            && self.cx + layer >= self.width
            && self.cy + layer >= self.height
    }

    /// Whether the fixed row or column of a ring side crosses the grid.
    fn side_visible(&self, side: i64, layer: i64) -> bool {
        match side {
            0 => self.cy - layer >= 0,
            1 => self.cx - layer >= 0,
            2 => self.cy + layer < self.height,
            _ => self.cx + layer < self.width,
        }
    }

    fn ring_cell(&self, side: i64, k: i64, layer: i64) -> (i64, i64) {
        match side {
            0 => (self.cx + layer - k, self.cy - layer),
            1 => (self.cx - layer, self.cy - layer + k),
            2 => (self.cx - layer + k, self.cy + layer),
            _ => (self.cx + layer, self.cy + layer - k),
        }
    }
}

impl Iterator for Spiral {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            if self.in_bounds(self.cx, self.cy) {
                return Some((self.cx as u32, self.cy as u32));
            }
        }

        loop {
            let side_len = 2 * self.layer;
            if self.step == 4 * side_len {
                self.layer += 1;
                self.step = 0;
                continue;
            }
            if self.step == 0 && self.ring_outside(self.layer) {
                return None;
            }

            let (side, k) = (self.step / side_len, self.step % side_len);
            if k == 0 && !self.side_visible(side, self.layer) {
                self.step += side_len;
                continue;
            }

            let (x, y) = self.ring_cell(side, k, self.layer);
            self.step += 1;
            if self.in_bounds(x, y) {
                return Some((x as u32, y as u32));
            }
        }
    }
}

// ============================================================================
// Seed sources
// ============================================================================

/// Seeds taken from a reference image the size of the canvas.
#[derive(Debug, Clone)]
pub struct ImageSeed {
    pub reference: Pixmap,
    pub origin: (u32, u32),
    /// Pixels of exactly this colour are treated as empty.
    pub chroma_key: Option<Rgb>,
    /// Probability of dropping each surviving pixel.
    pub rejection_rate: f64,
    /// Invert each seed colour before it is emitted.
    pub invert: bool,
    /// Fixes the rejection sampling; drawn from the OS when absent.
    pub rng_seed: Option<u64>,
}

impl ImageSeed {
    pub fn new(reference: Pixmap, origin: (u32, u32)) -> Self {
        Self {
            reference,
            origin,
            chroma_key: Some(DEFAULT_CHROMA_KEY),
            rejection_rate: 0.0,
            invert: false,
            rng_seed: None,
        }
    }

    pub fn with_chroma_key(mut self, key: Option<Rgb>) -> Self {
        self.chroma_key = key;
        self
    }

    pub fn with_rejection_rate(mut self, rate: f64) -> Self {
        self.rejection_rate = rate;
        self
    }

    pub fn with_inverted(mut self, invert: bool) -> Self {
        self.invert = invert;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Origin of the pixels a fill starts from.
#[derive(Debug, Clone)]
pub enum SeedSource {
    /// One pixel with an explicit colour.
    Point(SeedPixel),
    /// Every non-background pixel of a reference image.
    Image(ImageSeed),
}

impl SeedSource {
    pub fn point(x: u32, y: u32, colour: Rgb) -> Self {
        SeedSource::Point(SeedPixel::new(x, y, colour))
    }

    /// Checks the source against a `width × height` canvas.
    pub fn validate(&self, width: u32, height: u32) -> Result<()> {
        match self {
            SeedSource::Point(px) => {
                if px.x >= width || px.y >= height {
                    return Err(FillError::SeedOutOfBounds {
                        x: px.x,
                        y: px.y,
                        width,
                        height,
                    });
                }
            }
            SeedSource::Image(seed) => {
                let actual = seed.reference.dimensions();
                if actual != (width, height) {
                    return Err(FillError::DimensionMismatch {
                        expected: (width, height),
                        actual,
                    });
                }
                let (x, y) = seed.origin;
                if x >= width || y >= height {
                    return Err(FillError::SeedOutOfBounds {
                        x,
                        y,
                        width,
                        height,
                    });
                }
                if !(0.0..=1.0).contains(&seed.rejection_rate) {
                    return Err(FillError::InvalidConfig(format!(
                        "seed rejection rate {} should be between 0 and 1",
                        seed.rejection_rate
                    )));
                }
            }
        }
        Ok(())
    }

    /// The seed pixels in emission order.
    pub fn pixels(self) -> SeedPixels {
        match self {
            SeedSource::Point(px) => SeedPixels::Point(Some(px)),
            SeedSource::Image(seed) => {
                let (w, h) = seed.reference.dimensions();
                let rng = match seed.rng_seed {
                    Some(s) => StdRng::seed_from_u64(s),
                    None => StdRng::from_os_rng(),
                };
                SeedPixels::Image {
                    spiral: Spiral::new(w, h, seed.origin),
                    seed,
                    rng,
                }
            }
        }
    }

    /// Streams the seed pixels from a background thread.
    ///
    /// The channel closes once the source is exhausted, which is how the
    /// scheduler knows seeding is over. Dropping the receiver early stops the
    /// producer.
    pub fn spawn(self) -> Result<flume::Receiver<SeedPixel>> {
        let (tx, rx) = flume::unbounded();
        std::thread::Builder::new()
            .name("seed-source".to_string())
            .spawn(move || {
                for px in self.pixels() {
                    if tx.send(px).is_err() {
                        break;
                    }
                }
            })?;
        Ok(rx)
    }
}

/// Iterator returned by [`SeedSource::pixels`].
pub enum SeedPixels {
    Point(Option<SeedPixel>),
    Image {
        seed: ImageSeed,
        spiral: Spiral,
        rng: StdRng,
    },
}

impl Iterator for SeedPixels {
    type Item = SeedPixel;

    fn next(&mut self) -> Option<SeedPixel> {
        match self {
            SeedPixels::Point(px) => px.take(),
            SeedPixels::Image { seed, spiral, rng } => {
                for (x, y) in spiral.by_ref() {
                    let colour = seed.reference.get_pixel(x, y);
                    if seed.chroma_key == Some(colour) {
                        continue;
                    }
                    if seed.rejection_rate > 0.0 && rng.random::<f64>() < seed.rejection_rate {
                        continue;
                    }
                    let colour = if seed.invert { colour.inverted() } else { colour };
                    return Some(SeedPixel::new(x, y, colour));
                }
                None
            }
        }
    }
}
