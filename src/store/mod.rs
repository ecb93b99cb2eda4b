pub mod document;
pub mod file;
pub mod fixes;
#[cfg(test)]
pub mod memory;
pub mod predictions;

pub use document::{Direction, DocumentStore, RangeOp, StoreError};
pub use file::FileStore;
pub use fixes::{FixHistory, FIX_HISTORY_COLLECTION};
pub use predictions::{PredictionStore, PREDICTIONS_COLLECTION};
