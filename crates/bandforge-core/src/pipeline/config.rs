use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::bands::{BandMapping, BandRole, SpectralIndex};
use crate::composite::AlphaCutoff;
use crate::error::{BandforgeError, Result};
use crate::normalize::ScaleStrategy;
use crate::threshold::Threshold;

/// What to derive from every scene of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Role → 1-based band number.
    pub bands: BandMapping,
    /// Index products, one grayscale image each.
    #[serde(default = "default_indices")]
    pub indices: Vec<SpectralIndex>,
    /// Optional reclassification applied to index products before quantization.
    #[serde(default)]
    pub threshold: Threshold,
    /// Quantization used for index products.
    #[serde(default)]
    pub index_scaling: ScaleStrategy,
    /// Band-selection composites (2 or 3 roles each).
    #[serde(default)]
    pub composites: Vec<CompositeConfig>,
    /// Alpha-masked true-color composite.
    pub rgba: Option<RgbaConfig>,
}

fn default_indices() -> Vec<SpectralIndex> {
    vec![SpectralIndex::Ndvi]
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            bands: BandMapping::four_band(),
            indices: default_indices(),
            threshold: Threshold::default(),
            index_scaling: ScaleStrategy::default(),
            composites: vec![CompositeConfig {
                name: "true_color".into(),
                bands: vec![BandRole::Red, BandRole::Green, BandRole::Blue],
            }],
            rgba: Some(RgbaConfig::default()),
        }
    }
}

impl ProductConfig {
    /// Check the configuration before any scene is touched: at least one
    /// product, unique file-safe product names, 2 or 3 bands per composite, and
    /// a mapped band for every referenced role.
    pub fn validate(&self) -> Result<()> {
        if self.indices.is_empty() && self.composites.is_empty() && self.rgba.is_none() {
            return Err(BandforgeError::Manifest("no products configured".into()));
        }

        let mut seen = BTreeSet::new();
        for name in self.product_names() {
            check_name(name)?;
            if !seen.insert(name) {
                return Err(BandforgeError::DuplicateProduct(name.to_string()));
            }
        }

        for composite in &self.composites {
            if !matches!(composite.bands.len(), 2 | 3) {
                return Err(BandforgeError::UnsupportedBandCount(composite.bands.len()));
            }
        }

        for role in self.referenced_roles() {
            if self.bands.get(role).is_none() {
                return Err(BandforgeError::MissingBand { role });
            }
        }

        Ok(())
    }

    /// Product names in derivation order.
    pub fn product_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indices.iter().map(|i| i.name()).collect();
        names.extend(self.composites.iter().map(|c| c.name.as_str()));
        if let Some(rgba) = &self.rgba {
            names.push(&rgba.name);
        }
        names
    }

    /// Every role some configured product reads.
    pub fn referenced_roles(&self) -> Vec<BandRole> {
        let mut roles = Vec::new();
        for index in &self.indices {
            let (a, b) = index.roles();
            roles.extend([a, b]);
        }
        for composite in &self.composites {
            roles.extend(composite.bands.iter().copied());
        }
        if let Some(rgba) = &self.rgba {
            let (a, b) = rgba.index.roles();
            roles.extend([BandRole::Red, BandRole::Green, BandRole::Blue, a, b]);
        }
        roles.sort();
        roles.dedup();
        roles
    }
}

/// Reject names that are empty or could escape the output directory once
/// joined into a file name.
pub(crate) fn check_name(name: &str) -> Result<()> {
    if name.trim().is_empty() || name.contains(['/', '\\']) || name.contains("..") {
        return Err(BandforgeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// A named band-selection composite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompositeConfig {
    pub name: String,
    pub bands: Vec<BandRole>,
}

/// True-color composite with alpha keyed to an index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RgbaConfig {
    #[serde(default = "default_rgba_name")]
    pub name: String,
    /// Index whose values drive the alpha mask.
    #[serde(default = "default_rgba_index")]
    pub index: SpectralIndex,
    /// Pixels with index below this value are opaque. Independent of `threshold`.
    #[serde(default)]
    pub alpha_cutoff: AlphaCutoff,
}

fn default_rgba_name() -> String {
    "rgba".into()
}

fn default_rgba_index() -> SpectralIndex {
    SpectralIndex::Ndvi
}

impl Default for RgbaConfig {
    fn default() -> Self {
        Self {
            name: default_rgba_name(),
            index: default_rgba_index(),
            alpha_cutoff: AlphaCutoff::default(),
        }
    }
}
