use tracing::debug;

use crate::algebra::normalized_difference;
use crate::bands::BandRole;
use crate::composite::{composite, rgba_composite};
use crate::error::Result;
use crate::ledger::MetadataRecord;
use crate::normalize::quantize;
use crate::raster::QuantizedImage;
use crate::threshold::classify;

use super::config::ProductConfig;
use super::scene::Scene;
use super::types::{Product, SceneProducts};

/// Derive every configured product and the metadata record for one scene.
///
/// Nothing is written here; a scene either yields all of its products or an error.
pub fn derive_products(scene: &Scene, config: &ProductConfig) -> Result<SceneProducts> {
    let mapping = &config.bands;
    mapping.validate(scene.band_count())?;

    let mut products = Vec::new();

    for spectral in &config.indices {
        let (a, b) = spectral.operands(mapping, scene.bands())?;
        let index = normalized_difference(a, b)?;
        let classified = classify(index, config.threshold);
        let levels = quantize(&classified, config.index_scaling);
        debug!(
            file = scene.file_id(),
            index = %spectral,
            threshold = %config.threshold,
            "Derived index product"
        );
        products.push(Product::new(spectral.name(), QuantizedImage::gray(levels)));
    }

    for entry in &config.composites {
        let bands = entry
            .bands
            .iter()
            .map(|&role| scene.band(mapping, role))
            .collect::<Result<Vec<_>>>()?;
        let image = composite(&bands)?;
        debug!(
            file = scene.file_id(),
            composite = %entry.name,
            channels = image.channels(),
            "Derived composite product"
        );
        products.push(Product::new(entry.name.clone(), image));
    }

    if let Some(rgba) = &config.rgba {
        let red = scene.band(mapping, BandRole::Red)?;
        let green = scene.band(mapping, BandRole::Green)?;
        let blue = scene.band(mapping, BandRole::Blue)?;
        let (a, b) = rgba.index.operands(mapping, scene.bands())?;
        let index = normalized_difference(a, b)?;
        let image = rgba_composite(red, green, blue, &index, rgba.alpha_cutoff)?;
        products.push(Product::new(rgba.name.clone(), image));
    }

    Ok(SceneProducts {
        file_id: scene.file_id().to_string(),
        products,
        record: MetadataRecord::from_geometry(scene.file_id(), scene.geometry()),
    })
}
