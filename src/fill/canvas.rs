//! The shared pixel grid a fill paints into.

use crate::raster::pixmap::{Pixmap, Rgb};
use std::sync::atomic::{AtomicU32, Ordering};

const COLOUR_MASK: u32 = 0x00FF_FFFF;
const FILLED: u32 = 1 << 24;
const QUEUED: u32 = 1 << 25;

/// Offsets of the 8-neighbourhood, x offset varying slowest.
const NEIGHBOURS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Fixed-size grid of cells, each a packed colour plus `filled` and `queued` flags.
///
/// Every cell is one `AtomicU32`, so the grid can be shared between the
/// propagation loop and the neighbour fan-out tasks without a lock. The flag
/// checks in [`try_queue`](Self::try_queue) are deliberately not a
/// compare-and-swap: two tasks may both see a cell as free and both queue it,
/// and the propagation loop discards the second copy once the cell is filled.
pub struct PixelCanvas {
    width: u32,
    height: u32,
    cells: Vec<AtomicU32>,
}

impl PixelCanvas {
    /// Creates a canvas with every cell black, unfilled and unqueued.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = (0..width as usize * height as usize)
            .map(|_| AtomicU32::new(0))
            .collect();
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Checks signed coordinates against the canvas bounds.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    fn cell(&self, x: u32, y: u32) -> &AtomicU32 {
        assert!(x < self.width && y < self.height);
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    #[inline]
    fn state(&self, x: u32, y: u32) -> u32 {
        self.cell(x, y).load(Ordering::Relaxed)
    }

    pub fn colour_at(&self, x: u32, y: u32) -> Rgb {
        Rgb::from_hex(self.state(x, y) & COLOUR_MASK)
    }

    pub fn is_filled(&self, x: u32, y: u32) -> bool {
        self.state(x, y) & FILLED != 0
    }

    pub fn is_queued(&self, x: u32, y: u32) -> bool {
        self.state(x, y) & QUEUED != 0
    }

    /// Paints a cell: stores the colour and marks it filled and queued.
    ///
    /// Painting a cell twice is a caller error that is not guarded against;
    /// the last write wins.
    pub fn set(&self, x: u32, y: u32, colour: Rgb) {
        self.cell(x, y)
            .store(colour.to_hex() | FILLED | QUEUED, Ordering::Relaxed);
    }

    /// Marks a cell queued unless it is already queued or filled.
    ///
    /// Returns `true` if the caller should push the cell onto the work queue.
    pub fn try_queue(&self, x: u32, y: u32) -> bool {
        let cell = self.cell(x, y);
        if cell.load(Ordering::Relaxed) & (QUEUED | FILLED) != 0 {
            return false;
        }
        cell.fetch_or(QUEUED, Ordering::Relaxed);
        true
    }

    /// In-bounds 8-neighbours of `(x, y)`.
    pub fn neighbours(&self, x: u32, y: u32) -> impl Iterator<Item = (u32, u32)> + '_ {
        NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            self.contains(nx, ny).then_some((nx as u32, ny as u32))
        })
    }

    /// Average colour of the filled cells around `(x, y)`.
    ///
    /// Looks at the square of half-width `blur_radius`, excluding the centre
    /// and anything off the canvas. Each channel is the arithmetic mean
    /// rounded half up. Black when no neighbour is filled yet.
    pub fn target_colour(&self, x: u32, y: u32, blur_radius: u32) -> Rgb {
        let blur = blur_radius as i64;
        let (mut r, mut g, mut b, mut n) = (0u64, 0u64, 0u64, 0u64);

        for dx in -blur..=blur {
            let nx = x as i64 + dx;
            if nx < 0 || nx >= self.width as i64 {
                continue;
            }
            for dy in -blur..=blur {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let ny = y as i64 + dy;
                if ny < 0 || ny >= self.height as i64 {
                    continue;
                }
                let state = self.state(nx as u32, ny as u32);
                if state & FILLED != 0 {
                    let c = Rgb::from_hex(state & COLOUR_MASK);
                    r += c.r as u64;
                    g += c.g as u64;
                    b += c.b as u64;
                    n += 1;
                }
            }
        }

        if n == 0 {
            return Rgb::black();
        }
        let mean = |sum: u64| ((2 * sum + n) / (2 * n)) as u8;
        Rgb::new(mean(r), mean(g), mean(b))
    }

    /// Number of painted cells. Walks the whole grid.
    pub fn filled_count(&self) -> u64 {
        self.cells
            .iter()
            .filter(|c| c.load(Ordering::Relaxed) & FILLED != 0)
            .count() as u64
    }

    /// Copies the colours out, optionally inverting every channel.
    ///
    /// Safe to call while a fill is running; cells painted during the copy
    /// may or may not be included.
    pub fn to_pixmap(&self, invert: bool) -> Pixmap {
        Pixmap::from_fn(self.width, self.height, |x, y| {
            let c = self.colour_at(x, y);
            if invert { c.inverted() } else { c }
        })
    }
}
