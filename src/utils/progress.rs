use crate::raster::pixmap::Pixmap;
use crate::utils::error::Result;

/// Receives intermediate pictures while a fill is running.
///
/// Snapshots are delivered from a background thread, never from the
/// propagation loop, so an implementation may take its time (encode a PNG,
/// push a texture to a window). Failures are logged and otherwise ignored.
pub trait SnapshotSink: Send + Sync {
    /// `milestone` counts from 1; `percent` is the share of the canvas painted.
    fn write_snapshot(&self, milestone: u32, percent: u32, pixmap: &Pixmap) -> Result<()>;
}

impl<F> SnapshotSink for F
where
    F: Fn(u32, u32, &Pixmap) -> Result<()> + Send + Sync,
{
    fn write_snapshot(&self, milestone: u32, percent: u32, pixmap: &Pixmap) -> Result<()> {
        self(milestone, percent, pixmap)
    }
}

/// Tracks which progress milestones a run has crossed.
///
/// With `steps = 10` the milestones are the deciles: milestone `k` fires the
/// first time the painted count exceeds `k * total / 10`, for `k` in `1..10`.
#[derive(Debug, Clone)]
pub struct Milestones {
    steps: u32,
    total: u64,
    next: u32,
}

impl Milestones {
    pub fn new(total: u64, steps: u32) -> Self {
        Self {
            steps: steps.max(1),
            total,
            next: 1,
        }
    }

    /// Returns the next milestone crossed by reaching `painted`, if any.
    ///
    /// One call reports at most one milestone. On a canvas with fewer pixels
    /// than steps a single paint can cross several, so call it until it
    /// returns `None`.
    pub fn crossed(&mut self, painted: u64) -> Option<u32> {
        if self.next >= self.steps {
            return None;
        }
        let threshold = self.next as u64 * self.total / self.steps as u64;
        if painted > threshold {
            let hit = self.next;
            self.next += 1;
            Some(hit)
        } else {
            None
        }
    }

    pub fn percent(&self, milestone: u32) -> u32 {
        milestone * 100 / self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deciles_fire_once_each() {
        let mut m = Milestones::new(100, 10);
        let hits: Vec<u32> = (0..=100).filter_map(|p| m.crossed(p)).collect();
        assert_eq!(hits, (1..10).collect::<Vec<_>>());
        assert_eq!(m.percent(3), 30);
    }

    #[test]
    fn test_decile_threshold_is_strict() {
        let mut m = Milestones::new(100, 10);
        assert_eq!(m.crossed(10), None);
        assert_eq!(m.crossed(11), Some(1));
        assert_eq!(m.crossed(11), None);
    }

    #[test]
    fn test_small_total_crosses_several_per_paint() {
        let mut m = Milestones::new(4, 10);
        let mut hits = Vec::new();
        for painted in 1..=4 {
            while let Some(k) = m.crossed(painted) {
                hits.push((painted, k));
            }
        }
        assert_eq!(
            hits,
            vec![(1, 1), (1, 2), (2, 3), (2, 4), (3, 5), (3, 6), (3, 7), (4, 8), (4, 9)]
        );
    }

    #[test]
    fn test_single_step_never_fires() {
        let mut m = Milestones::new(16, 1);
        assert!((0..=16).all(|p| m.crossed(p).is_none()));
    }
}
