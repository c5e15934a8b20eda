use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tile_core::{ObservationTile, TileConfig};
use tile_fhir::{render_bundle_str, render_observation_str};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "tile-cli",
    about = "Dựng tile hiển thị từ Observation hoặc Bundle FHIR JSON."
)]
struct Args {
    /// Đường dẫn tới file JSON.
    #[arg(short, long)]
    input: PathBuf,

    /// File là Bundle, dựng tile cho mọi Observation bên trong.
    #[arg(long)]
    bundle: bool,

    /// In kết quả dạng JSON.
    #[arg(long)]
    json: bool,

    /// Độ lệch múi giờ (phút) khi hiển thị `issued`.
    #[arg(long, allow_hyphen_values = true)]
    offset_minutes: Option<i32>,

    /// Tăng mức log (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let data = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Không đọc được file {:?}", args.input))?;

    let mut config = TileConfig::default();
    if let Some(minutes) = args.offset_minutes {
        config.display_offset_minutes = minutes;
    }

    let tiles = if args.bundle {
        render_bundle_str(&data, &config)?
    } else {
        vec![render_observation_str(&data, &config)?]
    };
    info!(count = tiles.len(), "rendered observation tiles");

    if args.json {
        let output = if args.bundle {
            serde_json::to_string_pretty(&tiles)?
        } else {
            serde_json::to_string_pretty(&tiles[0])?
        };
        println!("{output}");
        return Ok(());
    }

    for (index, tile) in tiles.iter().enumerate() {
        if index > 0 {
            println!();
        }
        print!("{}", format_tile(tile));
    }

    Ok(())
}

fn format_tile(tile: &ObservationTile) -> String {
    let mut out = String::new();
    if let Some(header) = &tile.header {
        out.push_str(&format!("== {header} ==\n"));
    }
    for row in &tile.attributes {
        out.push_str(&format!("{}: {}\n", row.label, row.value));
    }
    out
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "tile_fhir=warn",
        1 => "tile_fhir=info,tile_cli=info",
        _ => "tile_fhir=debug,tile_cli=debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
