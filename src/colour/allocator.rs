//! Nearest-unused-colour allocation.
//!
//! A request for a colour that is still free is granted as-is. Otherwise the
//! allocator searches integer-radius spherical shells around the request,
//! radius 1 first, and grants the closest free colour of the first shell that
//! holds one. Each shell is swept as a stack of discs (physical axis one),
//! each disc as a stack of segments (axis two), each segment along axis three;
//! the run of a segment that lies inside the previous shell is jumped over, so
//! no colour is examined twice across shells.

use crate::colour::axes::AxisPermutation;
use crate::colour::cube::{CHANNEL_RANGE, ColourCube};
use crate::colour::echo::EchoQueue;
use crate::raster::pixmap::Rgb;
use std::ops::RangeInclusive;

/// Largest squared distance between two colours of the cube.
const MAX_DIST_SQR: i32 = 3 * 255 * 255;

const LAST_RADIUS: i32 = CHANNEL_RANGE as i32;

#[inline]
fn isqrt(v: i32) -> i32 {
    (v as u32).isqrt() as i32
}

/// Coordinates within `reach` of `centre`, clipped to the channel range.
#[inline]
fn axis_span(centre: i32, reach: i32) -> RangeInclusive<i32> {
    (centre - reach).max(0)..=(centre + reach).min(LAST_RADIUS - 1)
}

/// Hands out colours from the cube, nearest free colour first.
///
/// All search and bookkeeping happens in the physical axis order chosen by the
/// [`AxisPermutation`]; callers speak logical RGB on both sides.
#[derive(Clone)]
pub struct ColourAllocator {
    axes: AxisPermutation,
    cube: ColourCube,
    echo: Option<EchoQueue>,
    allocated: u64,
}

impl ColourAllocator {
    pub fn new(axes: AxisPermutation) -> Self {
        Self {
            axes,
            cube: ColourCube::new(),
            echo: None,
            allocated: 0,
        }
    }

    /// Recycles colours: once `window` allocations have been made, every
    /// allocation releases the oldest colour still held. `0` disables it.
    pub fn with_echo_window(mut self, window: usize) -> Self {
        self.echo = (window > 0).then(|| EchoQueue::new(window));
        self
    }

    pub fn axes(&self) -> AxisPermutation {
        self.axes
    }

    pub fn echo_window(&self) -> Option<usize> {
        self.echo.as_ref().map(EchoQueue::window)
    }

    /// Total number of allocations, including recycled colours.
    pub fn allocated(&self) -> u64 {
        self.allocated
    }

    /// Colours currently held.
    pub fn used_count(&self) -> usize {
        self.cube.used_count()
    }

    pub fn is_used(&self, colour: Rgb) -> bool {
        self.cube.is_used(self.axes.to_physical(colour))
    }

    /// Switches to the pruned search. The marginal counters are built once,
    /// from the current occupancy; later calls do nothing.
    pub fn enable_pruning(&mut self) {
        self.cube.build_marginals();
    }

    pub fn is_pruning(&self) -> bool {
        self.cube.has_marginals()
    }

    /// Grants the free colour nearest to `target` and marks it used.
    ///
    /// # Panics
    ///
    /// Panics if every colour of the cube is in use. Callers guarantee the
    /// canvas has no more pixels than the cube has colours.
    pub fn allocate(&mut self, target: Rgb) -> Rgb {
        let t = self.axes.to_physical(target);
        let chosen = if !self.cube.is_used(t) {
            t
        } else {
            match self.search(t) {
                Some(p) => p,
                None => panic!(
                    "colour cube exhausted after {} allocations",
                    self.allocated
                ),
            }
        };

        self.cube.mark_used(chosen);
        self.allocated += 1;

        if let Some(expired) = self.echo.as_mut().and_then(|q| q.push(chosen)) {
            self.cube.release(expired);
        }

        self.axes.to_logical(chosen)
    }

    /// The colour [`allocate`](Self::allocate) would grant, without taking it.
    pub fn nearest_unused(&self, target: Rgb) -> Option<Rgb> {
        let t = self.axes.to_physical(target);
        if !self.cube.is_used(t) {
            return Some(target);
        }
        self.search(t).map(|p| self.axes.to_logical(p))
    }

    fn search(&self, t: [u8; 3]) -> Option<[u8; 3]> {
        let t = [t[0] as i32, t[1] as i32, t[2] as i32];
        for radius in 1..=LAST_RADIUS {
            let prev = radius - 1;
            if let Some(p) = self.scan_shell(t, prev * prev, radius * radius) {
                return Some(p);
            }
        }
        // Corners of the cube lie further out than the channel range.
        self.scan_shell(t, LAST_RADIUS * LAST_RADIUS, MAX_DIST_SQR)
    }

    /// Closest free colour with `inner_sqr < d² <= outer_sqr`.
    ///
    /// Ties go to the first colour in sweep order: lowest axis-one coordinate,
    /// then axis two, then axis three.
    fn scan_shell(&self, t: [i32; 3], inner_sqr: i32, outer_sqr: i32) -> Option<[u8; 3]> {
        let mut best: Option<(i32, [u8; 3])> = None;

        for a in axis_span(t[0], isqrt(outer_sqr)) {
            if self.cube.plane_exhausted(0, a as usize) {
                continue;
            }
            let da2 = (a - t[0]) * (a - t[0]);
            let disc_sqr = outer_sqr - da2;

            for b in axis_span(t[1], isqrt(disc_sqr)) {
                if self.cube.plane_exhausted(1, b as usize) {
                    continue;
                }
                let dab2 = da2 + (b - t[1]) * (b - t[1]);
                let segment = axis_span(t[2], isqrt(outer_sqr - dab2));

                // Points with |dc| <= hole were covered by earlier shells.
                let hole_sqr = inner_sqr - dab2;
                let (skip_lo, skip_hi) = if hole_sqr >= 0 {
                    let hole = isqrt(hole_sqr);
                    (t[2] - hole, t[2] + hole)
                } else {
                    (i32::MAX, i32::MIN)
                };

                let (mut c, hi) = segment.into_inner();
                while c <= hi {
                    if c >= skip_lo && c <= skip_hi {
                        c = skip_hi + 1;
                        continue;
                    }
                    if !self.cube.plane_exhausted(2, c as usize) {
                        let p = [a as u8, b as u8, c as u8];
                        if !self.cube.is_used(p) {
                            let d = dab2 + (c - t[2]) * (c - t[2]);
                            if best.is_none_or(|(bd, _)| d < bd) {
                                best = Some((d, p));
                            }
                        }
                    }
                    c += 1;
                }
            }
        }

        best.map(|(_, p)| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Deterministic stream of colours near `centre`.
    fn requests(centre: Rgb, spread: u32, n: usize) -> Vec<Rgb> {
        let mut state: u32 = 0x2545_F491;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };
        let jitter = |v: u8, r: u32| {
            let off = (r % (2 * spread + 1)) as i32 - spread as i32;
            (v as i32 + off).clamp(0, 255) as u8
        };
        (0..n)
            .map(|_| {
                Rgb::new(
                    jitter(centre.r, next()),
                    jitter(centre.g, next()),
                    jitter(centre.b, next()),
                )
            })
            .collect()
    }

    #[test]
    fn test_fresh_allocator_grants_target() {
        for axes in AxisPermutation::ALL {
            let mut alloc = ColourAllocator::new(axes);
            for c in [Rgb::black(), Rgb::white(), Rgb::new(12, 200, 99)] {
                assert_eq!(alloc.allocate(c), c, "{}", axes);
            }
        }
    }

    #[test]
    fn test_repeated_target_walks_shells_in_sweep_order() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Rgb);
        let t = Rgb::new(128, 128, 128);
        let got: Vec<Rgb> = (0..8).map(|_| alloc.allocate(t)).collect();
        assert_eq!(
            got,
            vec![
                Rgb::new(128, 128, 128),
                Rgb::new(127, 128, 128),
                Rgb::new(128, 127, 128),
                Rgb::new(128, 128, 127),
                Rgb::new(128, 128, 129),
                Rgb::new(128, 129, 128),
                Rgb::new(129, 128, 128),
                Rgb::new(127, 127, 128),
            ]
        );
    }

    #[test]
    fn test_permutation_changes_sweep_direction() {
        let mut rgb = ColourAllocator::new(AxisPermutation::Rgb);
        let mut bgr = ColourAllocator::new(AxisPermutation::Bgr);
        rgb.allocate(Rgb::black());
        bgr.allocate(Rgb::black());
        assert_eq!(rgb.allocate(Rgb::black()), Rgb::new(0, 0, 1));
        assert_eq!(bgr.allocate(Rgb::black()), Rgb::new(1, 0, 0));
    }

    #[test]
    fn test_skips_exhausted_ball() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Rgb);
        let t = Rgb::new(100, 100, 100);
        for r in 90..=110u8 {
            for g in 90..=110u8 {
                for b in 90..=110u8 {
                    let c = Rgb::new(r, g, b);
                    if c.dist_sqr(t) <= 50 {
                        alloc.allocate(c);
                    }
                }
            }
        }
        // 51 = 7² + 1² + 1²; the first such point in sweep order.
        let got = alloc.allocate(t);
        assert_eq!(got.dist_sqr(t), 51);
        assert_eq!(got, Rgb::new(93, 99, 99));
    }

    #[test]
    fn test_clipped_at_cube_edges() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Grb);
        let corner = Rgb::white();
        // 29 colours of the clipped cube lie within distance 3 of the corner.
        let got: HashSet<Rgb> = (0..29).map(|_| alloc.allocate(corner)).collect();
        assert_eq!(got.len(), 29);
        assert!(got.iter().all(|c| c.dist_sqr(corner) <= 9));
    }

    #[test]
    fn test_allocations_are_distinct() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Gbr);
        let reqs = requests(Rgb::new(40, 40, 40), 3, 3000);
        let mut seen = HashSet::new();
        for r in reqs {
            assert!(seen.insert(alloc.allocate(r)));
        }
        assert_eq!(alloc.used_count(), 3000);
        assert_eq!(alloc.allocated(), 3000);
    }

    #[test]
    fn test_nearest_unused_does_not_allocate() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Rgb);
        alloc.allocate(Rgb::black());
        assert_eq!(alloc.nearest_unused(Rgb::black()), Some(Rgb::new(0, 0, 1)));
        assert_eq!(alloc.used_count(), 1);
    }

    #[test]
    fn test_pruning_matches_plain_search() {
        let mut base = ColourAllocator::new(AxisPermutation::Brg);
        // Exhaust whole planes so pruning has lanes to skip.
        for a in 0..4u8 {
            for b in 0..=255u8 {
                for c in 0..=255u8 {
                    base.cube.mark_used([a, b, c]);
                }
            }
        }
        for b in 0..=255u8 {
            for c in 0..=255u8 {
                base.cube.mark_used([b, 10, c]);
            }
        }
        for r in requests(Rgb::new(2, 10, 2), 4, 400) {
            base.allocate(r);
        }

        let mut plain = base.clone();
        let mut pruned = base;
        pruned.enable_pruning();
        assert!(pruned.is_pruning() && !plain.is_pruning());

        for r in requests(Rgb::new(1, 9, 3), 6, 600) {
            assert_eq!(plain.allocate(r), pruned.allocate(r), "request {}", r);
        }
    }

    #[test]
    fn test_echo_releases_oldest_colour() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Rgb).with_echo_window(3);
        assert_eq!(alloc.allocate(Rgb::black()), Rgb::black());
        assert_eq!(alloc.allocate(Rgb::black()), Rgb::new(0, 0, 1));
        assert!(alloc.is_used(Rgb::black()));
        assert_eq!(alloc.allocate(Rgb::black()), Rgb::new(0, 1, 0));
        // Third allocation reached the window and released the first.
        assert!(!alloc.is_used(Rgb::black()));
        assert!(alloc.is_used(Rgb::new(0, 0, 1)));
        assert_eq!(alloc.allocate(Rgb::black()), Rgb::black());
        assert_eq!(alloc.used_count(), 2);
        assert_eq!(alloc.allocated(), 4);
    }

    #[test]
    fn test_echo_keeps_marginals_exact() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Rgb).with_echo_window(2);
        alloc.enable_pruning();
        let plane = (CHANNEL_RANGE * CHANNEL_RANGE) as u32;
        alloc.allocate(Rgb::new(5, 5, 5));
        alloc.allocate(Rgb::new(6, 6, 6));
        assert_eq!(alloc.cube.free_in_plane(0, 5), Some(plane));
        assert_eq!(alloc.cube.free_in_plane(0, 6), Some(plane - 1));
    }

    #[test]
    fn test_full_cube_sweep_reaches_far_corner() {
        let mut alloc = ColourAllocator::new(AxisPermutation::Rgb);
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                for c in 0..=255u8 {
                    if (a, b, c) != (255, 255, 255) {
                        alloc.cube.mark_used([a, b, c]);
                    }
                }
            }
        }
        alloc.enable_pruning();
        assert_eq!(alloc.allocate(Rgb::black()), Rgb::white());
        assert!(alloc.cube.is_full());
    }
}
