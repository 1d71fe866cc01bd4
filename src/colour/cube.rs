//! Presence bitmap over the 256×256×256 colour cube.
//!
//! The cube only knows physical coordinates; mapping from logical RGB is the
//! allocator's job (see [`AxisPermutation`](crate::colour::AxisPermutation)).

use bitvec::prelude::*;

/// Number of values per channel.
pub const CHANNEL_RANGE: usize = 256;

/// Number of distinct 24-bit colours.
pub const CUBE_CAPACITY: usize = CHANNEL_RANGE * CHANNEL_RANGE * CHANNEL_RANGE;

/// Per-axis counts of still-unused colours, one row per physical axis.
type Marginals = [[u32; CHANNEL_RANGE]; 3];

/// One bit per colour: set means the colour has been handed out.
///
/// The optional marginal counters record, for every axis and coordinate, how
/// many colours in that plane are still free. They are built on demand by
/// [`build_marginals`](Self::build_marginals) and kept exact from then on by
/// [`mark_used`](Self::mark_used) and [`release`](Self::release).
#[derive(Clone)]
pub struct ColourCube {
    bits: BitVec<u64, Lsb0>,
    used: usize,
    marginals: Option<Box<Marginals>>,
}

#[inline]
fn index(p: [u8; 3]) -> usize {
    ((p[0] as usize) << 16) | ((p[1] as usize) << 8) | p[2] as usize
}

impl ColourCube {
    pub fn new() -> Self {
        Self {
            bits: bitvec![u64, Lsb0; 0; CUBE_CAPACITY],
            used: 0,
            marginals: None,
        }
    }

    #[inline]
    pub fn is_used(&self, p: [u8; 3]) -> bool {
        self.bits[index(p)]
    }

    /// Marks `p` used. Returns `false` if it already was.
    pub fn mark_used(&mut self, p: [u8; 3]) -> bool {
        let i = index(p);
        if self.bits[i] {
            return false;
        }
        self.bits.set(i, true);
        self.used += 1;
        if let Some(m) = self.marginals.as_deref_mut() {
            for (axis, &v) in p.iter().enumerate() {
                m[axis][v as usize] -= 1;
            }
        }
        true
    }

    /// Clears `p` so it can be allocated again. Returns `false` if it was free.
    pub fn release(&mut self, p: [u8; 3]) -> bool {
        let i = index(p);
        if !self.bits[i] {
            return false;
        }
        self.bits.set(i, false);
        self.used -= 1;
        if let Some(m) = self.marginals.as_deref_mut() {
            for (axis, &v) in p.iter().enumerate() {
                m[axis][v as usize] += 1;
            }
        }
        true
    }

    /// Number of colours currently marked used.
    pub fn used_count(&self) -> usize {
        self.used
    }

    pub fn is_full(&self) -> bool {
        self.used == CUBE_CAPACITY
    }

    /// Counts the free colours of every axis plane. Idempotent.
    pub fn build_marginals(&mut self) {
        if self.marginals.is_some() {
            return;
        }
        let mut m: Box<Marginals> = Box::new([[0; CHANNEL_RANGE]; 3]);
        for a in 0..CHANNEL_RANGE {
            for b in 0..CHANNEL_RANGE {
                let start = (a << 16) | (b << 8);
                let row = &self.bits[start..start + CHANNEL_RANGE];
                let free = row.count_zeros() as u32;
                if free == 0 {
                    continue;
                }
                m[0][a] += free;
                m[1][b] += free;
                for c in row.iter_zeros() {
                    m[2][c] += 1;
                }
            }
        }
        self.marginals = Some(m);
    }

    pub fn has_marginals(&self) -> bool {
        self.marginals.is_some()
    }

    /// `true` when the marginals prove no free colour has `value` on `axis`.
    /// Always `false` before [`build_marginals`](Self::build_marginals).
    #[inline]
    pub fn plane_exhausted(&self, axis: usize, value: usize) -> bool {
        match &self.marginals {
            Some(m) => m[axis][value] == 0,
            None => false,
        }
    }

    /// Free colours on one axis plane, if the marginals are built.
    pub fn free_in_plane(&self, axis: usize, value: u8) -> Option<u32> {
        self.marginals.as_ref().map(|m| m[axis][value as usize])
    }
}

impl Default for ColourCube {
    fn default() -> Self {
        Self::new()
    }
}
