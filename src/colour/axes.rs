//! Orderings of the colour cube's physical axes.

use crate::raster::pixmap::Rgb;
use crate::utils::error::{FillError, Result};
use std::fmt;
use std::str::FromStr;

/// Which logical channel lives on each physical axis of the colour cube.
///
/// The shell search sweeps physical axis one in its outermost loop and axis
/// three in its innermost, so the ordering decides which channel varies
/// fastest between neighbouring picks. `Gbr` stores `(g, b, r)`: green is the
/// outer axis, red the inner one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisPermutation {
    #[default]
    Rgb,
    Rbg,
    Gbr,
    Grb,
    Bgr,
    Brg,
}

impl AxisPermutation {
    pub const ALL: [AxisPermutation; 6] = [
        AxisPermutation::Rgb,
        AxisPermutation::Rbg,
        AxisPermutation::Gbr,
        AxisPermutation::Grb,
        AxisPermutation::Bgr,
        AxisPermutation::Brg,
    ];

    /// Maps a logical colour onto physical cube coordinates.
    #[inline]
    pub fn to_physical(self, c: Rgb) -> [u8; 3] {
        match self {
            AxisPermutation::Rgb => [c.r, c.g, c.b],
            AxisPermutation::Rbg => [c.r, c.b, c.g],
            AxisPermutation::Gbr => [c.g, c.b, c.r],
            AxisPermutation::Grb => [c.g, c.r, c.b],
            AxisPermutation::Bgr => [c.b, c.g, c.r],
            AxisPermutation::Brg => [c.b, c.r, c.g],
        }
    }

    /// Inverse of [`to_physical`](Self::to_physical).
    #[inline]
    pub fn to_logical(self, p: [u8; 3]) -> Rgb {
        match self {
            AxisPermutation::Rgb => Rgb::new(p[0], p[1], p[2]),
            AxisPermutation::Rbg => Rgb::new(p[0], p[2], p[1]),
            AxisPermutation::Gbr => Rgb::new(p[2], p[0], p[1]),
            AxisPermutation::Grb => Rgb::new(p[1], p[0], p[2]),
            AxisPermutation::Bgr => Rgb::new(p[2], p[1], p[0]),
            AxisPermutation::Brg => Rgb::new(p[1], p[2], p[0]),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AxisPermutation::Rgb => "rgb",
            AxisPermutation::Rbg => "rbg",
            AxisPermutation::Gbr => "gbr",
            AxisPermutation::Grb => "grb",
            AxisPermutation::Bgr => "bgr",
            AxisPermutation::Brg => "brg",
        }
    }
}

impl fmt::Display for AxisPermutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AxisPermutation {
    type Err = FillError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        AxisPermutation::ALL
            .into_iter()
            .find(|axes| axes.as_str() == lower)
            .ok_or_else(|| {
                FillError::InvalidArg(format!(
                    "colour basis '{}' should be one of rgb, rbg, gbr, grb, bgr, brg",
                    s
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_physical_layouts() {
        let c = Rgb::new(1, 2, 3);
        assert_eq!(AxisPermutation::Rgb.to_physical(c), [1, 2, 3]);
        assert_eq!(AxisPermutation::Rbg.to_physical(c), [1, 3, 2]);
        assert_eq!(AxisPermutation::Gbr.to_physical(c), [2, 3, 1]);
        assert_eq!(AxisPermutation::Grb.to_physical(c), [2, 1, 3]);
        assert_eq!(AxisPermutation::Bgr.to_physical(c), [3, 2, 1]);
        assert_eq!(AxisPermutation::Brg.to_physical(c), [3, 1, 2]);
    }

    #[test]
    fn test_logical_inverts_physical() {
        let c = Rgb::new(10, 120, 250);
        for axes in AxisPermutation::ALL {
            assert_eq!(axes.to_logical(axes.to_physical(c)), c, "{}", axes);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("GBR".parse::<AxisPermutation>().unwrap(), AxisPermutation::Gbr);
        assert_eq!(" brg ".parse::<AxisPermutation>().unwrap(), AxisPermutation::Brg);
        assert!("rgba".parse::<AxisPermutation>().is_err());
        assert!("rrg".parse::<AxisPermutation>().is_err());
    }
}
