use std::path::PathBuf;

use anyhow::{Context, Result};
use bandforge_core::io::manifest::BatchManifest;
use bandforge_core::pipeline::SceneSource;
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Batch manifest (TOML)
    pub manifest: PathBuf,

    /// Decode every band to report its shape
    #[arg(long)]
    pub decode: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let manifest = BatchManifest::load(&args.manifest)
        .with_context(|| format!("Failed to load manifest {}", args.manifest.display()))?;

    println!("Manifest:    {}", args.manifest.display());
    println!("Scenes:      {}", manifest.scenes.len());
    println!("Output:      {}", manifest.output.display());
    println!("Ledger:      {}", manifest.ledger.display());

    for entry in &manifest.scenes {
        let g = &entry.geometry;
        println!();
        println!("Scene:       {}", entry.id);
        println!("Bands:       {}", entry.bands.len());
        println!("Raster:      {}x{} px", g.raster_width, g.raster_height);
        println!("Pixel size:  {} x {}", g.pixel_width, g.pixel_height);
        println!("CRS:         {}", g.crs);

        if args.decode {
            match entry.load() {
                Ok(scene) => {
                    let (h, w) = scene.shape();
                    println!("Decoded:     {}x{} px, {} bands", w, h, scene.band_count());
                    if let Err(e) = manifest.processing.bands.validate(scene.band_count()) {
                        println!("Mapping:     {}", e);
                    }
                }
                Err(e) => println!("Decoded:     failed ({})", e),
            }
        }
    }

    Ok(())
}
