pub mod error;
pub mod inference;
pub mod stylization;

pub use error::InferError;
pub use inference::Inference;
pub use stylization::{StylizationConfig, StylizationNetwork};
