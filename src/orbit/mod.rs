pub mod elements;
pub mod error;
pub mod phase;
pub mod predictor;
pub mod types;

pub use elements::ElementsProvider;
pub use error::{GenerateError, PredictError};
pub use predictor::{BatchSummary, Generator, SourceFix};
pub use types::{GroundFix, PredictionBatch, PredictionMethod, PredictionPoint};
