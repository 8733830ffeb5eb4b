use crate::error::{BandforgeError, Result};
use crate::ledger::MetadataRecord;
use crate::raster::QuantizedImage;

/// Per-scene processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Deriving,
    Writing,
    Recording,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading bands"),
            Self::Deriving => write!(f, "Deriving products"),
            Self::Writing => write!(f, "Writing images"),
            Self::Recording => write!(f, "Recording metadata"),
        }
    }
}

/// One named visual product of a scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Product {
    pub name: String,
    pub image: QuantizedImage,
}

impl Product {
    pub fn new(name: impl Into<String>, image: QuantizedImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }
}

/// Everything derived from one scene, ready for the output boundary.
#[derive(Clone, Debug)]
pub struct SceneProducts {
    pub file_id: String,
    pub products: Vec<Product>,
    pub record: MetadataRecord,
}

/// Destination for finished images.
pub trait ProductSink {
    fn write(&mut self, file_id: &str, product: &Product) -> Result<()>;
}

/// Keeps written products in memory, in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub written: Vec<(String, Product)>,
}

impl ProductSink for MemorySink {
    fn write(&mut self, file_id: &str, product: &Product) -> Result<()> {
        self.written.push((file_id.to_string(), product.clone()));
        Ok(())
    }
}

/// Result of processing one scene.
#[derive(Debug)]
pub struct FileOutcome {
    pub file_id: String,
    /// Number of products written, or the error that stopped this scene.
    pub result: std::result::Result<usize, BandforgeError>,
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-file outcomes of a batch, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed files with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &BandforgeError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_id.as_str(), e)))
    }

    pub fn products_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .sum()
    }
}

/// Progress reporting for the batch loop.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter {
    /// The batch is starting with `total_scenes` scenes.
    fn begin_batch(&self, _total_scenes: usize) {}

    /// Scene `file_id` has entered `stage`.
    fn begin_stage(&self, _file_id: &str, _stage: PipelineStage) {}

    /// `scenes_done` scenes have finished, successfully or not.
    fn advance(&self, _scenes_done: usize) {}

    /// The batch is finished.
    fn finish_batch(&self) {}
}

/// No-op progress reporter, used when `run_batch` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
