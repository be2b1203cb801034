use std::{env, error::Error, path::PathBuf, process};

use tracing::info;

use transit_core::{
    capture_snapshot, generate_network, load_presets_from_env, load_region_cells, render_network,
    write_snapshot, RegionGrid, StationPool,
};

const USAGE: &str =
    "usage: generate <region-cells.csv> [preset-id] [--snapshot <path>] [--render <path>]";

struct Args {
    region_cells: PathBuf,
    preset_id: Option<String>,
    snapshot_path: PathBuf,
    render_path: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    if let Err(err) = run() {
        eprintln!("generation failed: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let presets = load_presets_from_env();
    let preset = match &args.preset_id {
        Some(id) => presets
            .get(id)
            .ok_or_else(|| format!("unknown preset {id:?}"))?,
        None => presets
            .get("default-city")
            .or_else(|| presets.first())
            .ok_or("preset catalogue is empty")?,
    };
    let config = preset.params.clone();
    info!(
        target: "transit::config",
        preset = %preset.id,
        seed = config.seed,
        routes = config.route_count,
        "generate.preset"
    );

    let points = load_region_cells(&args.region_cells)?;
    let mut grid = RegionGrid::from_points(points.iter().copied());
    let pool = StationPool::filter_and_sort(points, config.min_station_size);
    info!(
        target: "transit::network",
        eligible = pool.len(),
        grid = grid.len(),
        "generate.pool_prepared"
    );

    let network = generate_network(&mut grid, &pool, &config)?;

    let snapshot = capture_snapshot(&network, &grid);
    write_snapshot(&args.snapshot_path, &snapshot)?;

    if let Some(render_path) = &args.render_path {
        render_network(&network, &grid, render_path)?;
    }

    info!(
        target: "transit::network",
        routes = network.routes.len(),
        edges = network.edges.len(),
        "generate.done"
    );
    Ok(())
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut positional = Vec::new();
    let mut snapshot_path = PathBuf::from("network.json");
    let mut render_path = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--snapshot" => {
                snapshot_path = PathBuf::from(args.next().ok_or("--snapshot needs a path")?);
            }
            "--render" => {
                render_path = Some(PathBuf::from(args.next().ok_or("--render needs a path")?));
            }
            "--help" | "-h" => {
                println!("{USAGE}");
                process::exit(0);
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let region_cells = positional
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| USAGE.to_string())?;
    let preset_id = positional.next();

    Ok(Args {
        region_cells,
        preset_id,
        snapshot_path,
        render_path,
    })
}
