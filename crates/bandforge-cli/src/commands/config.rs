use std::path::PathBuf;

use anyhow::{Context, Result};
use bandforge_core::consts::{DEFAULT_LEDGER_FILE, DEFAULT_OUTPUT_DIR};
use bandforge_core::io::manifest::{BatchManifest, SceneEntry};
use bandforge_core::ledger::LedgerFormat;
use bandforge_core::pipeline::config::ProductConfig;
use bandforge_core::raster::RasterGeometry;
use clap::Args;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the manifest to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Print or save a default batch manifest as TOML.
pub fn run(args: &ConfigArgs) -> Result<()> {
    let manifest = BatchManifest {
        output: PathBuf::from(DEFAULT_OUTPUT_DIR),
        ledger: PathBuf::from(DEFAULT_LEDGER_FILE),
        ledger_format: LedgerFormat::default(),
        processing: ProductConfig::default(),
        scenes: vec![SceneEntry {
            id: "tile_001".into(),
            bands: (1..=4)
                .map(|b| PathBuf::from(format!("tile_001_b{b}.tif")))
                .collect(),
            geometry: RasterGeometry {
                pixel_width: 3.0,
                pixel_height: 3.0,
                raster_width: 1024,
                raster_height: 1024,
                crs: "EPSG:32633".into(),
            },
        }],
    };
    let toml_str = manifest.to_toml()?;

    if let Some(ref path) = args.output {
        std::fs::write(path, &toml_str)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
        println!("Default manifest saved to {}", path.display());
    } else {
        print!("{}", toml_str);
    }

    Ok(())
}
