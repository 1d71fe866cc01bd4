// CLI entry for colour-flood
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueHint};
use colour_flood::raster::{PngSnapshotSink, read_image, write_png};
use colour_flood::utils::log::{Level, init_logger};
use colour_flood::{
    AxisPermutation, FillConfig, FloodScheduler, ImageSeed, Rgb, SeedSource, SnapshotSink,
};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "colour-flood",
    version,
    about = "Flood-fill an image so that every pixel gets a different colour"
)]
struct Cli {
    /// Red value of the initial point
    #[arg(long = "seed-red", default_value_t = 0)]
    seed_red: u8,
    /// Green value of the initial point
    #[arg(long = "seed-green", default_value_t = 0)]
    seed_green: u8,
    /// Blue value of the initial point
    #[arg(long = "seed-blue", default_value_t = 0)]
    seed_blue: u8,
    /// Seed colour such as 0xFFFFFF; overrides the channel flags
    #[arg(long = "seed")]
    seed: Option<Rgb>,

    /// Colour axes to search in: one of rgb, rbg, gbr, grb, bgr, brg
    #[arg(long = "colour-basis", default_value = "rgb")]
    colour_basis: AxisPermutation,

    /// Output width (ignored with a seed image)
    #[arg(long = "width", default_value_t = 4096)]
    width: u32,
    /// Output height (ignored with a seed image)
    #[arg(long = "height", default_value_t = 4096)]
    height: u32,

    /// X position of the initial point, or the spiral centre of a seed image
    #[arg(long = "seed-x", default_value_t = 0)]
    seed_x: u32,
    /// Y position of the initial point, or the spiral centre of a seed image
    #[arg(long = "seed-y", default_value_t = 0)]
    seed_y: u32,

    /// Pre-seeded PNG or JPEG to fill; sets the output size
    #[arg(long = "seed-image", value_hint = ValueHint::FilePath)]
    seed_image: Option<PathBuf>,
    /// Random rejection rate of seeded pixels, between 0 and 1
    #[arg(long = "seed-rr", default_value_t = 0.0)]
    seed_rr: f64,
    /// Colour to treat as empty in the seed image
    #[arg(long = "seed-chroma-key", default_value = "0xFF00FF")]
    seed_chroma_key: Rgb,
    /// Keep seed pixels whose colour was already used
    #[arg(long = "seed-dupes", action = ArgAction::SetTrue)]
    seed_dupes: bool,
    /// Fix the rejection sampling for reproducible runs
    #[arg(long = "seed-rng")]
    seed_rng: Option<u64>,

    /// Neighbourhood radius averaged for each pixel; higher is slower
    #[arg(long = "blur", default_value_t = 1)]
    blur: u32,
    /// Work queue size; very high values produce geometric patterns
    #[arg(long = "chan", default_value_t = 8)]
    chan: usize,

    /// Name of the final image file
    #[arg(long = "name", value_hint = ValueHint::FilePath)]
    name: Option<PathBuf>,
    /// Prefix for intermediate images and the default final name
    #[arg(long = "tag", default_value = "art")]
    tag: String,
    /// Draw intermediate images at every progress step
    #[arg(long = "ir", action = ArgAction::SetTrue)]
    ir: bool,
    /// Invert every colour after running
    #[arg(long = "flip-draw", action = ArgAction::SetTrue)]
    flip_draw: bool,
    /// Fraction of the colour cube after which colours are reused; 0 is off
    #[arg(long = "es", default_value_t = 0.0)]
    es: f64,
    /// Worker threads; 0 or negative uses every core
    #[arg(long = "cpus", default_value_t = -1, allow_hyphen_values = true)]
    cpus: i32,
    /// Number of progress reports (and intermediate images) per run
    #[arg(long = "progress-steps", default_value_t = 10)]
    progress_steps: u32,

    /// Log debug output
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool,
}

impl Cli {
    fn seed_colour(&self) -> Rgb {
        self.seed
            .unwrap_or_else(|| Rgb::new(self.seed_red, self.seed_green, self.seed_blue))
    }

    fn workers(&self) -> usize {
        self.cpus.max(0) as usize
    }

    /// Final file name derived from the run parameters.
    fn default_name(&self, cpus: usize) -> String {
        let flipped = if self.flip_draw { ".flip" } else { "" };
        let seed = if self.seed_image.is_some() {
            format!("rr{:.3}", self.seed_rr)
        } else {
            let c = self.seed_colour();
            format!("r{}g{}b{}", c.r, c.g, c.b)
        };
        format!(
            "{}.{}.{}.x{}y{}.blur{}.ch{}.cpu{}{}.png",
            self.tag,
            self.colour_basis,
            seed,
            self.seed_x,
            self.seed_y,
            self.blur,
            self.chan,
            cpus,
            flipped
        )
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(if cli.verbose { Level::Debug } else { Level::Info });

    let started = Instant::now();

    let (source, width, height) = match &cli.seed_image {
        Some(path) => {
            let reference = read_image(path)
                .with_context(|| format!("failed to read seed image {}", path.display()))?;
            let (w, h) = reference.dimensions();
            let mut seed = ImageSeed::new(reference, (cli.seed_x, cli.seed_y))
                .with_chroma_key(Some(cli.seed_chroma_key))
                .with_rejection_rate(cli.seed_rr)
                .with_inverted(cli.flip_draw);
            if let Some(s) = cli.seed_rng {
                seed = seed.with_rng_seed(s);
            }
            (SeedSource::Image(seed), w, h)
        }
        None => (
            SeedSource::point(cli.seed_x, cli.seed_y, cli.seed_colour()),
            cli.width,
            cli.height,
        ),
    };

    let config = FillConfig::new(width, height)
        .with_queue_capacity(cli.chan)
        .with_blur_radius(cli.blur)
        .with_axes(cli.colour_basis)
        .with_echo_spacing(cli.es)
        .with_duplicate_seeds(cli.seed_dupes)
        .with_inverted_output(cli.flip_draw)
        .with_progress_steps(cli.progress_steps)
        .with_workers(cli.workers());

    let scheduler = FloodScheduler::new(config)?;
    let cpus = scheduler.worker_count();
    if cpus == 1 {
        info!("Using 1 CPU");
    } else {
        info!("Using {} CPUs", cpus);
    }

    let name = cli
        .name
        .clone()
        .unwrap_or_else(|| PathBuf::from(cli.default_name(cpus)));
    if name.as_os_str().is_empty() {
        bail!("output name must not be empty");
    }

    let sink: Option<Arc<dyn SnapshotSink>> = cli
        .ir
        .then(|| Arc::new(PngSnapshotSink::new(".", cli.tag.clone())) as Arc<dyn SnapshotSink>);

    let outcome = scheduler.fill(source, sink)?;
    info!(
        "{} colours allocated, {} duplicate queue entries discarded",
        outcome.allocated, outcome.discarded
    );

    info!("Drawing {}", name.display());
    write_png(&name, &outcome.pixmap)
        .with_context(|| format!("failed to write {}", name.display()))?;

    info!("Image drawn in {:.2?}", started.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli_contract() {
        let cli = Cli::parse_from(["colour-flood"]);
        assert_eq!(cli.chan, 8);
        assert_eq!(cli.blur, 1);
        assert_eq!(cli.tag, "art");
        assert_eq!(cli.cpus, -1);
        assert_eq!(cli.workers(), 0);
        assert_eq!(cli.seed_chroma_key, Rgb::from_hex(0xFF00FF));
        assert_eq!(cli.colour_basis, AxisPermutation::Rgb);
    }

    #[test]
    fn test_seed_flag_overrides_channels() {
        let cli = Cli::parse_from(["colour-flood", "--seed-red", "5", "--seed", "0x102030"]);
        assert_eq!(cli.seed_colour(), Rgb::new(0x10, 0x20, 0x30));
        let cli = Cli::parse_from(["colour-flood", "--seed-green", "7"]);
        assert_eq!(cli.seed_colour(), Rgb::new(0, 7, 0));
    }

    #[test]
    fn test_default_name_for_point_seed() {
        let cli = Cli::parse_from([
            "colour-flood",
            "--colour-basis",
            "gbr",
            "--seed-blue",
            "255",
            "--seed-x",
            "12",
            "--seed-y",
            "34",
            "--flip-draw",
        ]);
        assert_eq!(
            cli.default_name(4),
            "art.gbr.r0g0b255.x12y34.blur1.ch8.cpu4.flip.png"
        );
    }

    #[test]
    fn test_default_name_for_image_seed() {
        let cli = Cli::parse_from([
            "colour-flood",
            "--seed-image",
            "in.png",
            "--seed-rr",
            "0.25",
            "--tag",
            "x",
            "--chan",
            "32",
        ]);
        assert_eq!(cli.default_name(1), "x.rgb.rr0.250.x0y0.blur1.ch32.cpu1.png");
    }

    #[test]
    fn test_rejects_unknown_basis() {
        assert!(Cli::try_parse_from(["colour-flood", "--colour-basis", "xyz"]).is_err());
    }
}
