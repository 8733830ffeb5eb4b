use ndarray::Array2;

use bandforge_core::pipeline::Scene;
use bandforge_core::raster::{BandArray, RasterGeometry};

/// Band filled with a single value.
pub fn constant_band(h: usize, w: usize, value: f32) -> BandArray {
    Array2::from_elem((h, w), value)
}

/// Band from row-major values.
pub fn band_from(h: usize, w: usize, values: &[f32]) -> BandArray {
    Array2::from_shape_vec((h, w), values.to_vec()).expect("shape matches values")
}

pub fn geometry(h: usize, w: usize) -> RasterGeometry {
    RasterGeometry {
        pixel_width: 3.0,
        pixel_height: 3.0,
        raster_width: w,
        raster_height: h,
        crs: "EPSG:32633".into(),
    }
}

/// Four-band (blue, green, red, nir) scene with constant bands.
pub fn four_band_scene(id: &str, h: usize, w: usize, values: [f32; 4]) -> Scene {
    let bands = values.iter().map(|&v| constant_band(h, w, v)).collect();
    Scene::new(id, bands, geometry(h, w)).expect("valid scene")
}
