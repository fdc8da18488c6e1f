pub mod adapters;
pub mod classifier;
pub mod config;
pub mod normalize;
pub mod pipeline;
pub mod sources;
pub mod tags;

pub use classifier::CategoryModel;
pub use pipeline::{Analysis, Analyzer, PipelineError};
pub use sources::Platform;
