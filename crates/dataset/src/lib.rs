//! Video frame dataset feeding the stylization network.
//!
//! `FrameDataset` maps an index to the full decoded frame sequence of one
//! video file; `DataLoader` batches (and optionally shuffles) the dataset on
//! a single background worker.

pub mod dataset;
pub mod error;
pub mod loader;
pub mod transform;

pub use dataset::{FrameDataset, FrameSequence, Opener};
pub use error::DatasetError;
pub use loader::{Batch, Batches, BlockingBatches, DataLoader, DataLoaderConfig, get_loader};
pub use transform::{FrameTransform, Transform};
