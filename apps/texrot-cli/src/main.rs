use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use texrot_common::BlockPos;
use texrot_model::Mode;
use texrot_schema::{Limits, read_request, run_request, write_response};
use texrot_search::CancelToken;
use texrot_tools::{MAX_LAYER_RADIUS, RotationInspector, SampleSpec};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "texrot",
    version,
    about = "Locate block coordinates from observed texture rotations",
    args_conflicts_with_subcommands = true,
    subcommand_negates_reqs = true
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Request JSON to read
    #[arg(required = true)]
    input: Option<PathBuf>,

    /// Response JSON to write
    #[arg(required = true)]
    output: Option<PathBuf>,

    /// Override the worker count (<= 0 means one per core)
    #[arg(long, allow_negative_numbers = true)]
    threads: Option<i64>,

    /// Stop after this many candidates are held
    #[arg(long)]
    max_matches: Option<usize>,

    /// Stop after this many milliseconds, keeping partial results
    #[arg(long)]
    deadline_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print predicted rotation codes on the layer around a position
    Predict {
        #[arg(short, long, value_parser = parse_mode)]
        mode: Mode,
        #[arg(long, allow_negative_numbers = true)]
        x: i64,
        #[arg(long, allow_negative_numbers = true)]
        y: i64,
        #[arg(long, allow_negative_numbers = true)]
        z: i64,
        /// Blocks to show in each direction
        #[arg(
            short,
            long,
            default_value = "4",
            value_parser = clap::value_parser!(i64).range(0..=MAX_LAYER_RADIUS)
        )]
        radius: i64,
        /// Show the side view of each code
        #[arg(long)]
        side_only: bool,
    },
    /// Write a request whose observations come from a known origin
    Sample {
        #[arg(short, long, value_parser = parse_mode)]
        mode: Mode,
        /// Hidden origin as X,Y,Z
        #[arg(long, value_parser = parse_pos, allow_hyphen_values = true)]
        origin: BlockPos,
        /// Number of observations
        #[arg(short, long, default_value = "12")]
        count: usize,
        /// Record every K-th observation side-only
        #[arg(long)]
        side_only_every: Option<usize>,
        /// Horizontal half-width of the search box
        #[arg(long, default_value = "64")]
        margin: i64,
        /// Request JSON to write
        output: PathBuf,
    },
}

fn parse_mode(s: &str) -> Result<Mode, String> {
    s.parse::<Mode>().map_err(|e| {
        let known: Vec<&str> = Mode::ALL.iter().map(|m| m.name()).collect();
        format!("{e}; expected one of {}", known.join(", "))
    })
}

fn parse_pos(s: &str) -> Result<BlockPos, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        return Err(format!("expected X,Y,Z, got {s:?}"));
    };
    let num = |v: &str| v.parse::<i64>().map_err(|e| format!("{v:?}: {e}"));
    Ok(BlockPos::new(num(x)?, num(y)?, num(z)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Predict {
            mode,
            x,
            y,
            z,
            radius,
            side_only,
        }) => {
            let layer = RotationInspector::layer(mode, BlockPos::new(x, y, z), radius, side_only);
            print!("{layer}");
        }
        Some(Commands::Sample {
            mode,
            origin,
            count,
            side_only_every,
            margin,
            output,
        }) => {
            let spec = SampleSpec {
                count,
                side_only_every,
                margin,
                ..SampleSpec::new(mode, origin)
            };
            let text = serde_json::to_string_pretty(&spec.to_request())?;
            std::fs::write(&output, text + "\n")
                .with_context(|| format!("writing {}", output.display()))?;
            println!("Sample request written to {} (origin {origin})", output.display());
        }
        None => {
            let (Some(input), Some(output)) = (cli.input.as_deref(), cli.output.as_deref()) else {
                anyhow::bail!("input and output paths are required");
            };
            solve(input, output, cli.threads, cli.max_matches, cli.deadline_ms)?;
        }
    }

    Ok(())
}

fn solve(
    input: &Path,
    output: &Path,
    threads: Option<i64>,
    max_matches: Option<usize>,
    deadline_ms: Option<u64>,
) -> anyhow::Result<()> {
    let mut loaded =
        read_request(input).with_context(|| format!("reading request {}", input.display()))?;
    tracing::info!(
        input = %input.display(),
        mode = %loaded.request.mode,
        observations = loaded.request.observations.len(),
        "request loaded"
    );

    let request = &mut loaded.request;
    if threads.is_some() {
        request.threads = threads;
    }
    if max_matches.is_some() || deadline_ms.is_some() {
        let limits = request.limits.get_or_insert_with(Limits::default);
        limits.max_matches = max_matches.or(limits.max_matches);
        limits.deadline_ms = deadline_ms.or(limits.deadline_ms);
    }

    let response = run_request(&loaded, &CancelToken::new());
    write_response(output, &response)
        .with_context(|| format!("writing response {}", output.display()))?;

    match &response.error {
        Some(err) => println!("{}: {}", err.kind, err.message),
        None => println!(
            "{:?}: {} candidate(s), {} tested",
            response.status,
            response.candidates.len(),
            response.tested.unwrap_or(0)
        ),
    }
    Ok(())
}
