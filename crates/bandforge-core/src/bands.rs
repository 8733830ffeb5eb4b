use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{BandforgeError, Result};
use crate::raster::BandArray;

/// Spectral role a raster band plays in index and composite formulas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandRole {
    Blue,
    Green,
    Red,
    RedEdge,
    Nir,
    Swir1,
    Swir2,
}

impl std::fmt::Display for BandRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blue => write!(f, "blue"),
            Self::Green => write!(f, "green"),
            Self::Red => write!(f, "red"),
            Self::RedEdge => write!(f, "red_edge"),
            Self::Nir => write!(f, "nir"),
            Self::Swir1 => write!(f, "swir1"),
            Self::Swir2 => write!(f, "swir2"),
        }
    }
}

/// Explicit role → band number mapping for one dataset.
///
/// Band numbers are 1-based, matching raster container numbering. A mapping
/// is checked against the actual band count of each scene before any
/// computation runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandMapping {
    roles: BTreeMap<BandRole, usize>,
}

impl BandMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blue, green, red, NIR as bands 1-4.
    pub fn four_band() -> Self {
        Self::new()
            .with(BandRole::Blue, 1)
            .with(BandRole::Green, 2)
            .with(BandRole::Red, 3)
            .with(BandRole::Nir, 4)
    }

    /// Blue, green, red, red edge, NIR as bands 1-5.
    pub fn five_band() -> Self {
        Self::new()
            .with(BandRole::Blue, 1)
            .with(BandRole::Green, 2)
            .with(BandRole::Red, 3)
            .with(BandRole::RedEdge, 4)
            .with(BandRole::Nir, 5)
    }

    pub fn with(mut self, role: BandRole, band: usize) -> Self {
        self.insert(role, band);
        self
    }

    pub fn insert(&mut self, role: BandRole, band: usize) {
        self.roles.insert(role, band);
    }

    pub fn get(&self, role: BandRole) -> Option<usize> {
        self.roles.get(&role).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BandRole, usize)> + '_ {
        self.roles.iter().map(|(&role, &band)| (role, band))
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Check every mapped band number against `band_count`.
    pub fn validate(&self, band_count: usize) -> Result<()> {
        for (role, index) in self.iter() {
            if index == 0 || index > band_count {
                return Err(BandforgeError::BandOutOfRange {
                    role,
                    index,
                    band_count,
                });
            }
        }
        Ok(())
    }

    /// Look up the band playing `role` in `bands`.
    pub fn resolve<'a>(&self, role: BandRole, bands: &'a [BandArray]) -> Result<&'a BandArray> {
        let index = self.get(role).ok_or(BandforgeError::MissingBand { role })?;
        index
            .checked_sub(1)
            .and_then(|i| bands.get(i))
            .ok_or(BandforgeError::BandOutOfRange {
                role,
                index,
                band_count: bands.len(),
            })
    }
}

/// Named normalized-difference index, resolved to a (minuend, subtrahend) role pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectralIndex {
    /// (NIR - Red) / (NIR + Red)
    Ndvi,
    /// (Green - NIR) / (Green + NIR), McFeeters
    Ndwi,
    /// (Green - SWIR1) / (Green + SWIR1), Xu
    Mndwi,
    /// (SWIR1 - NIR) / (SWIR1 + NIR)
    Ndbi,
    /// (NIR - SWIR2) / (NIR + SWIR2)
    Nbr,
    /// (NIR - RedEdge) / (NIR + RedEdge)
    Ndre,
    /// (NIR - Green) / (NIR + Green)
    Gndvi,
    /// Any other pair; `name` becomes the product name.
    Custom {
        name: String,
        a: BandRole,
        b: BandRole,
    },
}

impl SpectralIndex {
    pub fn roles(&self) -> (BandRole, BandRole) {
        match self {
            Self::Ndvi => (BandRole::Nir, BandRole::Red),
            Self::Ndwi => (BandRole::Green, BandRole::Nir),
            Self::Mndwi => (BandRole::Green, BandRole::Swir1),
            Self::Ndbi => (BandRole::Swir1, BandRole::Nir),
            Self::Nbr => (BandRole::Nir, BandRole::Swir2),
            Self::Ndre => (BandRole::Nir, BandRole::RedEdge),
            Self::Gndvi => (BandRole::Nir, BandRole::Green),
            Self::Custom { a, b, .. } => (*a, *b),
        }
    }

    /// Lowercase product name used in output file names.
    pub fn name(&self) -> &str {
        match self {
            Self::Ndvi => "ndvi",
            Self::Ndwi => "ndwi",
            Self::Mndwi => "mndwi",
            Self::Ndbi => "ndbi",
            Self::Nbr => "nbr",
            Self::Ndre => "ndre",
            Self::Gndvi => "gndvi",
            Self::Custom { name, .. } => name,
        }
    }

    /// Resolve both operand bands through `mapping`.
    pub fn operands<'a>(
        &self,
        mapping: &BandMapping,
        bands: &'a [BandArray],
    ) -> Result<(&'a BandArray, &'a BandArray)> {
        let (a, b) = self.roles();
        Ok((mapping.resolve(a, bands)?, mapping.resolve(b, bands)?))
    }
}

impl std::fmt::Display for SpectralIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (a, b) = self.roles();
        write!(f, "{} ({a} - {b})", self.name().to_uppercase())
    }
}
