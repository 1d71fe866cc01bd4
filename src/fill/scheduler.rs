//! The flood-fill driver.
//!
//! One coordinating thread (the caller of [`FloodScheduler::run`]) owns the
//! allocator and paints pixels one at a time. After every paint a task on the
//! scheduler's rayon pool pushes the pixel's free 8-neighbours onto a bounded
//! flume channel, which is the work queue. When the queue is full those tasks
//! block, which is what throttles the fan-out; the coordinating thread never
//! sends, so it can always drain.

use crate::colour::allocator::ColourAllocator;
use crate::fill::canvas::PixelCanvas;
use crate::fill::config::FillConfig;
use crate::fill::seed::{SeedPixel, SeedSource};
use crate::raster::pixmap::{Pixmap, Rgb};
use crate::utils::error::{FillError, Result};
use crate::utils::progress::{Milestones, SnapshotSink};
use log::{debug, info, warn};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Snapshots copied but not yet picked up by the writer thread.
const SNAPSHOT_BACKLOG: usize = 1;

/// A canvas copy taken at a milestone, waiting to be written.
struct Snapshot {
    milestone: u32,
    percent: u32,
    pixmap: Pixmap,
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// The completed picture, inverted if the config asked for it.
    pub pixmap: Pixmap,
    /// Seeds painted during the seeding phase.
    pub seeded: u64,
    /// Seeds dropped because their cell or colour was already taken.
    pub skipped_seeds: u64,
    /// Queue entries popped for cells that were already painted.
    pub discarded: u64,
    /// Whether the allocator switched to the pruned search.
    pub pruning_engaged: bool,
    /// Colours handed out by the allocator, recycled ones included.
    pub allocated: u64,
}

/// Runs fills with one [`FillConfig`] on a dedicated worker pool.
pub struct FloodScheduler {
    config: FillConfig,
    pool: rayon::ThreadPool,
}

impl FloodScheduler {
    /// Validates `config` and starts the neighbour fan-out pool.
    pub fn new(config: FillConfig) -> Result<Self> {
        config.validate()?;

        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(|i| format!("flood-fanout-{}", i));
        if config.workers > 0 {
            builder = builder.num_threads(config.workers);
        }
        let pool = builder.build()?;
        debug!(
            "fan-out pool ready with {} threads, queue capacity {}",
            pool.current_num_threads(),
            config.queue_capacity
        );

        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Threads in the fan-out pool.
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Checks `source` against the canvas, streams it and runs the fill.
    pub fn fill(
        &self,
        source: SeedSource,
        sink: Option<Arc<dyn SnapshotSink>>,
    ) -> Result<FillOutcome> {
        source.validate(self.config.width, self.config.height)?;
        let seeds = source.spawn()?;
        self.run(seeds, sink)
    }

    /// Paints every pixel of the canvas.
    ///
    /// Seeds are read until `seeds` is closed, then the fill propagates from
    /// them until the canvas is full.
    ///
    /// With a sink, the canvas is copied at each milestone and the copy is
    /// handed to a single writer thread. At most one copy waits behind the
    /// one being written; a slower sink holds up the fill instead of piling
    /// up copies. `run` waits for the writer before returning.
    pub fn run(
        &self,
        seeds: flume::Receiver<SeedPixel>,
        sink: Option<Arc<dyn SnapshotSink>>,
    ) -> Result<FillOutcome> {
        let config = &self.config;
        let canvas = Arc::new(PixelCanvas::new(config.width, config.height));
        let allocator = ColourAllocator::new(config.axes).with_echo_window(config.echo_window());
        let (queue_tx, queue_rx) = flume::bounded(config.queue_capacity);

        let mut run = Run {
            pool: &self.pool,
            canvas,
            allocator,
            queue_tx,
            total: config.pixel_count(),
            painted: 0,
            endgame_at: config.endgame_threshold(),
            milestones: Milestones::new(config.pixel_count(), config.progress_steps),
            invert: config.invert_output,
            snapshots: None,
            writer: None,
        };
        if let Some(sink) = sink {
            run.start_writer(sink);
        }

        let mut seeded = 0u64;
        let mut skipped_seeds = 0u64;
        for seed in seeds.iter() {
            let SeedPixel { x, y, colour } = seed;
            if !run.canvas.contains(x as i64, y as i64) {
                return Err(FillError::SeedOutOfBounds {
                    x,
                    y,
                    width: config.width,
                    height: config.height,
                });
            }
            if run.canvas.is_filled(x, y) {
                warn!("Seed ({}, {}) is already painted, skipping", x, y);
                skipped_seeds += 1;
                continue;
            }
            if !config.allow_duplicate_seeds && run.allocator.is_used(colour) {
                debug!("Seed colour {} at ({}, {}) already used, skipping", colour, x, y);
                skipped_seeds += 1;
                continue;
            }
            let granted = run.allocator.allocate(colour);
            run.paint(x, y, granted);
            seeded += 1;
        }

        if seeded == 0 {
            return Err(FillError::NoSeeds);
        }
        info!("{} seeded pixels", seeded);
        if skipped_seeds > 0 {
            info!("{} seeds skipped", skipped_seeds);
        }

        let mut discarded = 0u64;
        while run.painted < run.total {
            // The pool tasks hold clones of the sender, and so does `run`, so
            // the channel cannot disconnect while cells remain.
            let Ok((x, y)) = queue_rx.recv() else {
                break;
            };
            if run.canvas.is_filled(x, y) {
                discarded += 1;
                continue;
            }
            let target = run.canvas.target_colour(x, y, config.blur_radius);
            let granted = run.allocator.allocate(target);
            run.paint(x, y, granted);
        }

        // Fan-out tasks still blocked on a full queue give up once it closes.
        drop(queue_rx);
        debug!("{} duplicate queue entries discarded", discarded);

        run.join_snapshots();

        Ok(FillOutcome {
            pixmap: run.canvas.to_pixmap(config.invert_output),
            seeded,
            skipped_seeds,
            discarded,
            pruning_engaged: run.allocator.is_pruning(),
            allocated: run.allocator.allocated(),
        })
    }
}

/// State of one fill, owned by the coordinating thread.
struct Run<'a> {
    pool: &'a rayon::ThreadPool,
    canvas: Arc<PixelCanvas>,
    allocator: ColourAllocator,
    queue_tx: flume::Sender<(u32, u32)>,
    total: u64,
    painted: u64,
    endgame_at: u64,
    milestones: Milestones,
    invert: bool,
    snapshots: Option<flume::Sender<Snapshot>>,
    writer: Option<JoinHandle<()>>,
}

impl Run<'_> {
    fn paint(&mut self, x: u32, y: u32, colour: Rgb) {
        self.canvas.set(x, y, colour);
        self.painted += 1;
        self.fan_out(x, y);

        if !self.allocator.is_pruning() && self.painted >= self.endgame_at {
            info!("Endgame optimisation engaged at {} pixels", self.painted);
            self.allocator.enable_pruning();
        }

        // One paint can cross several milestones on a small canvas.
        while let Some(milestone) = self.milestones.crossed(self.painted) {
            let percent = self.milestones.percent(milestone);
            info!("{}% of pixels filled", percent);
            self.snapshot(milestone, percent);
        }
    }

    /// Queues the free neighbours of `(x, y)` from the pool.
    fn fan_out(&self, x: u32, y: u32) {
        let canvas = Arc::clone(&self.canvas);
        let tx = self.queue_tx.clone();
        self.pool.spawn(move || {
            for (nx, ny) in canvas.neighbours(x, y) {
                if canvas.try_queue(nx, ny) && tx.send((nx, ny)).is_err() {
                    return;
                }
            }
        });
    }

    fn start_writer(&mut self, sink: Arc<dyn SnapshotSink>) {
        let (tx, rx) = flume::bounded::<Snapshot>(SNAPSHOT_BACKLOG);
        let spawned = std::thread::Builder::new()
            .name("snapshot-writer".to_string())
            .spawn(move || {
                for snap in rx.iter() {
                    let Snapshot {
                        milestone,
                        percent,
                        pixmap,
                    } = snap;
                    if let Err(e) = sink.write_snapshot(milestone, percent, &pixmap) {
                        warn!("Snapshot {} failed: {}", milestone, e);
                    }
                }
            });
        match spawned {
            Ok(handle) => {
                self.snapshots = Some(tx);
                self.writer = Some(handle);
            }
            Err(e) => warn!("Could not start the snapshot writer, snapshots disabled: {}", e),
        }
    }

    /// Copies the canvas now and queues the copy for the writer.
    fn snapshot(&mut self, milestone: u32, percent: u32) {
        let Some(tx) = &self.snapshots else {
            return;
        };
        let snap = Snapshot {
            milestone,
            percent,
            pixmap: self.canvas.to_pixmap(self.invert),
        };
        if tx.send(snap).is_err() {
            warn!("Snapshot writer stopped, dropping later snapshots");
            self.snapshots = None;
        }
    }

    fn join_snapshots(&mut self) {
        self.snapshots = None;
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                warn!("The snapshot writer panicked");
            }
        }
    }
}

impl Drop for Run<'_> {
    /// Error returns leave the writer running; wait for it here too.
    fn drop(&mut self) {
        self.join_snapshots();
    }
}
