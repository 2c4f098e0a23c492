use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use gridpaste::{
    Grid, GridView, Index, InputBounds, PasteConfig, PasteFilter, PlacementSpec, ProgressCounter,
    Region, Rgba,
};

#[derive(Parser, Debug)]
#[command(name = "gridpaste", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paste a region of one image onto another and write a PNG.
    Paste(PasteArgs),
    /// Validate a placement and print what each input must supply.
    Check(PlacementArgs),
}

#[derive(Args, Debug)]
struct PlacementArgs {
    /// Destination image.
    #[arg(long)]
    dest: PathBuf,

    /// Source image.
    #[arg(long)]
    src: PathBuf,

    /// Destination index receiving the source region's first pixel, as `X,Y`.
    #[arg(long, value_parser = parse_index)]
    at: Option<Index<2>>,

    /// Source region as `X,Y,W,H`. Defaults to the whole source image.
    #[arg(long = "src-region", value_parser = parse_region)]
    src_region: Option<Region<2>>,

    /// JSON paste config. Command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PasteArgs {
    #[command(flatten)]
    placement: PlacementArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Reuse the destination buffer as the output.
    #[arg(long)]
    in_place: bool,

    /// Composite partitions on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Number of partitions (0 = one per worker thread). Replaces any tiling from `--config`.
    #[arg(long)]
    partitions: Option<usize>,

    /// Worker thread count.
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Paste(args) => cmd_paste(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn parse_components<V: std::str::FromStr>(s: &str, n: usize) -> Result<Vec<V>, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<V>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("'{s}' is not a comma-separated list of numbers"))?;
    if parts.len() != n {
        return Err(format!("expected {n} components, got {}", parts.len()));
    }
    Ok(parts)
}

fn parse_index(s: &str) -> Result<Index<2>, String> {
    let v = parse_components::<i64>(s, 2)?;
    Ok(Index([v[0], v[1]]))
}

fn parse_region(s: &str) -> Result<Region<2>, String> {
    let v = parse_components::<i64>(s, 4)?;
    let w = u64::try_from(v[2]).map_err(|_| format!("negative width in '{s}'"))?;
    let h = u64::try_from(v[3]).map_err(|_| format!("negative height in '{s}'"))?;
    Ok(Region::from_arrays([v[0], v[1]], [w, h]))
}

struct Loaded {
    filter: PasteFilter<2>,
    dest: Grid<Rgba, 2>,
    src: Grid<Rgba, 2>,
}

fn load(args: &PlacementArgs) -> anyhow::Result<Loaded> {
    let dest = gridpaste::raster::load_rgba(&args.dest)
        .with_context(|| format!("load destination '{}'", args.dest.display()))?;
    let src = gridpaste::raster::load_rgba(&args.src)
        .with_context(|| format!("load source '{}'", args.src.display()))?;

    let mut filter = match &args.config {
        Some(path) => PasteConfig::<2>::from_path(path)?.into_filter(),
        None => PasteFilter::new(PlacementSpec::new(Index::zero(), src.region())),
    };
    if let Some(at) = args.at {
        filter.set_destination_index(at);
    }
    if let Some(region) = args.src_region {
        filter.set_source_region(region);
    }

    Ok(Loaded { filter, dest, src })
}

fn cmd_paste(args: PasteArgs) -> anyhow::Result<()> {
    let Loaded {
        mut filter,
        mut dest,
        src,
    } = load(&args.placement)?;

    if args.in_place {
        filter.set_in_place(true);
    }
    let mut execution = *filter.execution();
    execution.parallel |= args.parallel;
    if let Some(n) = args.partitions {
        // Tiling takes precedence in `ExecutionOpts::partition`.
        execution.tile = None;
        execution.partitions = n;
    }
    if args.threads.is_some() {
        execution.threads = args.threads;
    }
    filter.set_execution(execution);

    let requested = dest.region();
    let progress = ProgressCounter::new();
    let (report, output) = if filter.in_place() {
        let report = filter.paste_in_place(&mut dest, &src, requested, &progress)?;
        (report, dest)
    } else {
        let mut output = Grid::filled(requested, [0u8; 4])?;
        let report = filter.paste_into(&dest, &src, &mut output, requested, &progress)?;
        (report, output)
    };

    gridpaste::raster::save_png(&output, &args.out)?;

    eprintln!(
        "composited {} partitions ({} copies, {} elided)",
        progress.completed(),
        report.copies_issued,
        report.copies_elided
    );
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_check(args: PlacementArgs) -> anyhow::Result<()> {
    let Loaded { filter, dest, src } = load(&args)?;
    let bounds = InputBounds {
        destination: dest.valid_region(),
        source: src.valid_region(),
    };
    let demand = filter.propagate(dest.region(), &bounds)?;

    println!("{}", filter.placement());
    println!("Placement: {}", filter.placement().placement_in_destination());
    println!("DestinationRequest: {}", demand.destination);
    println!("SourceRequest: {}", demand.source);
    Ok(())
}
