use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{DEFAULT_LEDGER_FILE, DEFAULT_OUTPUT_DIR};
use crate::error::{BandforgeError, Result};
use crate::ledger::LedgerFormat;
use crate::pipeline::config::{check_name, ProductConfig};
use crate::pipeline::{Scene, SceneSource};
use crate::raster::RasterGeometry;

use super::image_io::load_band;

/// A batch description: processing settings plus an ordered scene list.
///
/// Relative paths are resolved against the manifest's own directory by
/// [`BatchManifest::load`]. Scenes are processed in listed order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchManifest {
    /// Directory receiving image products.
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Ledger file, opened in append mode.
    #[serde(default = "default_ledger")]
    pub ledger: PathBuf,
    #[serde(default)]
    pub ledger_format: LedgerFormat,
    pub processing: ProductConfig,
    #[serde(default, rename = "scene")]
    pub scenes: Vec<SceneEntry>,
}

fn default_output() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_ledger() -> PathBuf {
    PathBuf::from(DEFAULT_LEDGER_FILE)
}

impl BatchManifest {
    /// Parse a manifest from TOML text without touching the filesystem.
    pub fn from_toml(text: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(text)?;
        manifest.check()?;
        Ok(manifest)
    }

    /// Read a manifest file and resolve its relative paths.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut manifest = Self::from_toml(&text)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.resolve_paths(base);
        debug!(path = %path.display(), scenes = manifest.scenes.len(), "Loaded manifest");
        Ok(manifest)
    }

    /// Make every relative path absolute with respect to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        self.output = resolve(base, &self.output);
        self.ledger = resolve(base, &self.ledger);
        for scene in &mut self.scenes {
            for band in &mut scene.bands {
                *band = resolve(base, band);
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn check(&self) -> Result<()> {
        if self.scenes.is_empty() {
            warn!("Manifest lists no scenes");
        }
        for scene in &self.scenes {
            if scene.id.trim().is_empty() {
                return Err(BandforgeError::Manifest("scene with empty id".into()));
            }
            check_name(&scene.id)?;
        }
        Ok(())
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// One scene: an identifier, its band files in band order, and its geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneEntry {
    pub id: String,
    /// Single-band image files; the first is band 1.
    pub bands: Vec<PathBuf>,
    pub geometry: RasterGeometry,
}

impl SceneSource for SceneEntry {
    fn id(&self) -> &str {
        &self.id
    }

    fn load(&self) -> Result<Scene> {
        let bands = self
            .bands
            .iter()
            .map(|path| load_band(path))
            .collect::<Result<Vec<_>>>()?;
        Scene::new(self.id.clone(), bands, self.geometry.clone())
    }
}
