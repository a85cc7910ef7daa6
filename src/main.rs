use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use fern::{load_from_csv, ChaosGame, PointSequence, Preset, TransformSet, DEFAULT_NUM_POINTS};


/// Generate the points of a Barnsley-fern style attractor and write them as
/// `x,y` lines.
#[derive(Parser, Debug)]
#[command(name = "fern", version, about)]
struct Cli {
    /// Number of points to generate after the origin
    #[arg(default_value_t = DEFAULT_NUM_POINTS)]
    num_points: usize,

    /// Headerless CSV with one `a,b,c,d,e,f,probability` row per transform
    #[arg(short, long, value_name = "FILE", conflicts_with = "preset")]
    table: Option<PathBuf>,

    /// Built-in transform table: barnsley, leaf-first or fishbone
    #[arg(short, long, default_value_t = Preset::Barnsley)]
    preset: Preset,

    /// Seed for the random source; a random seed is chosen and logged if omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write points here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long)]
    debug: bool,
}


fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}


fn run() -> Result<()> {
    let cli = Cli::parse();

    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("warn")
    };
    env_logger::Builder::from_env(env).init();

    let set = match &cli.table {
        Some(path) => read_table(path)?,
        None => TransformSet::preset(cli.preset),
    };
    let game = ChaosGame::new(set).context("transform table cannot drive generation")?;
    info!("using {} transforms", game.transform_set().len());

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!("seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let points = game.generate(cli.num_points, &mut rng);
    if let Some(bounds) = points.bounds() {
        let extent = bounds.extent();
        let center = bounds.center();
        info!(
            "{} points spanning {:.3} x {:.3} around ({:.3}, {:.3})",
            points.len(), extent.x, extent.y, center.x, center.y
        );
    }

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_points(&points, BufWriter::new(file))
                .with_context(|| format!("failed to write {}", path.display()))
        },
        None => write_points(&points, io::stdout().lock()).context("failed to write points"),
    }
}


fn read_table(path: &Path) -> Result<TransformSet> {
    let file = File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    load_from_csv(BufReader::new(file))
        .with_context(|| format!("failed to parse transform table {}", path.display()))
}


fn write_points<W: Write>(points: &PointSequence, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for point in points {
        csv_writer.serialize((point.x, point.y))?;
    }
    csv_writer.flush()?;

    Ok(())
}
