pub mod config;
mod orchestrator;
mod products;
mod scene;
mod types;

pub use orchestrator::{run_batch, run_batch_reported};
pub use products::derive_products;
pub use scene::{Scene, SceneSource};
pub use types::{
    BatchReport, FileOutcome, MemorySink, PipelineStage, Product, ProductSink, ProgressReporter,
    SceneProducts,
};
