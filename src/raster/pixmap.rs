// src/raster/pixmap.rs

//! In-memory colour types shared by the allocator, the canvas and the encoders.
//!
//! `Rgb` is the 24-bit colour triple every component speaks in. `Pixmap` is a
//! plain row-major buffer of `Rgb` used for snapshots, the finished picture and
//! decoded reference images. Both are `Pod`, so a pixmap can be handed to an
//! encoder as packed RGB bytes without copying.

use crate::utils::error::{FillError, Result};
use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::str::FromStr;

// --- Colour Triple ---

/// A single RGB colour with 8-bit components.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub const fn black() -> Self {
        Rgb { r: 0, g: 0, b: 0 }
    }

    pub const fn white() -> Self {
        Rgb {
            r: 255,
            g: 255,
            b: 255,
        }
    }

    /// Builds a colour from a packed `0xRRGGBB` value. Bits above 24 are ignored.
    pub const fn from_hex(value: u32) -> Self {
        Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Packs the colour as `0xRRGGBB`.
    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    /// Channel-wise inversion (`255 - c`), used by flip drawing.
    pub const fn inverted(self) -> Self {
        Rgb {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
        }
    }

    /// Squared Euclidean distance between two colours.
    pub fn dist_sqr(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(arr: [u8; 3]) -> Self {
        Rgb {
            r: arr[0],
            g: arr[1],
            b: arr[2],
        }
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

/// Accepts `0xRRGGBB`, `#RRGGBB` or bare `RRGGBB` hex strings.
impl FromStr for Rgb {
    type Err = FillError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .or_else(|| trimmed.strip_prefix('#'))
            .unwrap_or(trimmed);
        let value = u32::from_str_radix(digits, 16)
            .map_err(|_| FillError::InvalidArg(format!("'{}' is not a hex colour", s)))?;
        if value > 0xFF_FFFF {
            return Err(FillError::InvalidArg(format!(
                "'{}' does not fit in 24 bits",
                s
            )));
        }
        Ok(Rgb::from_hex(value))
    }
}

// --- Pixmap Type ---

/// A 2D buffer of colours stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<Rgb>,
}

impl Pixmap {
    /// Creates a new pixmap with the given dimensions, initialized to black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_pixel(width, height, Rgb::black())
    }

    /// Creates a pixmap from a raw vector of colours in row-major order.
    pub fn from_vec(width: u32, height: u32, data: Vec<Rgb>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(FillError::InvalidArg(format!(
                "pixmap of {}x{} needs {} pixels, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Pixmap {
            width,
            height,
            data,
        })
    }

    /// Creates a pixmap filled with a single colour.
    pub fn from_pixel(width: u32, height: u32, pixel: Rgb) -> Self {
        Pixmap {
            width,
            height,
            data: vec![pixel; width as usize * height as usize],
        }
    }

    /// Creates a pixmap by calling a function for each pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> Rgb,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Pixmap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions as a tuple (width, height).
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Rgb {
        assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, pixel: Rgb) {
        assert!(x < self.width && y < self.height);
        self.data[y as usize * self.width as usize + x as usize] = pixel;
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.data
    }

    /// Returns raw pixel data as packed RGB bytes.
    pub fn as_raw(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Builds a pixmap from a decoded 8-bit RGB image.
    pub fn from_rgb_image(img: &::image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let data = bytemuck::cast_slice::<u8, Rgb>(img.as_raw()).to_vec();
        Pixmap {
            width,
            height,
            data,
        }
    }

    /// Converts into an `image` buffer for encoding.
    pub fn into_rgb_image(self) -> Result<::image::RgbImage> {
        let (width, height) = self.dimensions();
        let bytes: Vec<u8> = bytemuck::cast_slice(&self.data).to_vec();
        ::image::RgbImage::from_raw(width, height, bytes)
            .ok_or_else(|| FillError::Encode("pixel buffer does not match dimensions".to_string()))
    }
}
