use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use ppu_packer::{
    preview::{write_tile_sheet, DEFAULT_COLUMNS},
    report::BundleSummary,
    AssetPacker, Bundle,
};

#[derive(Parser, Debug)]
#[command(about = "Packs sprite sheets and levels into a tile/palette bundle")]
struct Args {
    /// Log every tile and palette decision
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a bundle from a JSON manifest
    Pack {
        /// Manifest listing sprite sheets and level images
        #[arg(long)]
        manifest: PathBuf,

        /// Bundle path, overriding the manifest's `output`
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write JSON progress updates to this file
        #[arg(long)]
        progress: Option<PathBuf>,
    },
    /// Print the contents of a bundle
    Inspect {
        bundle: PathBuf,

        /// Print as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Render every tile of a bundle into a PNG
    Preview {
        bundle: PathBuf,

        #[arg(long)]
        output: PathBuf,

        /// Tiles per row
        #[arg(long, default_value_t = DEFAULT_COLUMNS)]
        columns: u32,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match args.command {
        Command::Pack {
            manifest,
            output,
            progress,
        } => {
            info!("processing assets from {}", manifest.display());
            let packer = AssetPacker::from_manifest_path(&manifest)
                .with_context(|| format!("failed to load manifest {}", manifest.display()))?;
            let output = output.unwrap_or_else(|| packer.manifest().output_path());
            packer
                .pack_to_file(&output, progress.as_deref())
                .context("packing failed, no bundle written")?;
            info!("done! bundle at {}", output.display());
        }
        Command::Inspect { bundle, json } => {
            let loaded = Bundle::load(&bundle)
                .with_context(|| format!("failed to read bundle {}", bundle.display()))?;
            let summary = BundleSummary::from_bundle(&loaded);
            summary.log_warnings();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary.to_text());
            }
        }
        Command::Preview {
            bundle,
            output,
            columns,
        } => {
            let loaded = Bundle::load(&bundle)
                .with_context(|| format!("failed to read bundle {}", bundle.display()))?;
            write_tile_sheet(&loaded, columns, &output)
                .with_context(|| format!("failed to write preview {}", output.display()))?;
            info!("rendered {} tiles to {}", loaded.tiles.len(), output.display());
        }
    }

    Ok(())
}
