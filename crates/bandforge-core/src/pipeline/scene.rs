use tracing::warn;

use crate::bands::{BandMapping, BandRole};
use crate::error::{BandforgeError, Result};
use crate::raster::{ensure_same_shape, BandArray, RasterGeometry};

/// One decoded multi-band raster file ready for processing.
#[derive(Clone, Debug)]
pub struct Scene {
    file_id: String,
    bands: Vec<BandArray>,
    geometry: RasterGeometry,
}

impl Scene {
    /// Bands are in container order (band 1 first) and must all share one shape.
    pub fn new(
        file_id: impl Into<String>,
        bands: Vec<BandArray>,
        geometry: RasterGeometry,
    ) -> Result<Self> {
        let first = bands.first().ok_or(BandforgeError::EmptyScene)?;
        let shape = first.dim();
        for band in &bands[1..] {
            ensure_same_shape(shape, band.dim())?;
        }

        let file_id = file_id.into();
        if (geometry.raster_height, geometry.raster_width) != shape {
            warn!(
                file = %file_id,
                bands = ?shape,
                geometry = ?(geometry.raster_height, geometry.raster_width),
                "Band shape differs from reported raster size"
            );
        }

        Ok(Self {
            file_id,
            bands,
            geometry,
        })
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn bands(&self) -> &[BandArray] {
        &self.bands
    }

    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// (height, width) shared by every band.
    pub fn shape(&self) -> (usize, usize) {
        self.bands[0].dim()
    }

    pub fn geometry(&self) -> &RasterGeometry {
        &self.geometry
    }

    pub fn band(&self, mapping: &BandMapping, role: BandRole) -> Result<&BandArray> {
        mapping.resolve(role, &self.bands)
    }
}

/// Anything the batch loop can turn into a `Scene`.
///
/// Decoding happens inside `load`, so a decode failure is reported against
/// this source alone.
pub trait SceneSource {
    fn id(&self) -> &str;

    fn load(&self) -> Result<Scene>;
}

impl SceneSource for Scene {
    fn id(&self) -> &str {
        &self.file_id
    }

    fn load(&self) -> Result<Scene> {
        Ok(self.clone())
    }
}
