use chrono::{DateTime, Utc};
use thiserror::Error;

/// Failures while deriving orbital parameters from the element source.
///
/// These never escape [`ElementsProvider::fetch`]; they select the
/// fallback parameters and are logged.
///
/// [`ElementsProvider::fetch`]: super::elements::ElementsProvider::fetch
#[derive(Debug, Error)]
pub enum ElementsError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("expected at least 3 lines of element text, got {0}")]
    TooFewLines(usize),
    #[error("expected at least 8 fields in element line 2, got {0}")]
    TooFewFields(usize),
    #[error("unparseable numeric field: {0}")]
    Numeric(#[from] std::num::ParseFloatError),
    #[error("inclination {0} outside (0, 90]")]
    InclinationOutOfRange(f64),
    #[error("orbital period {0} is not a positive finite number")]
    PeriodOutOfRange(f64),
}

/// Hard failures of batch generation. Retrieval paths never raise these;
/// only the write path surfaces errors to the caller.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("no fix stored before {0}; two fixes are required to derive a velocity")]
    MissingPrecedent(DateTime<Utc>),
    #[error("fix interval of {0:.2} minutes is not positive")]
    InvalidInterval(f64),
}

/// Everything that can abort the write path as a whole.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("store error: {0}")]
    Store(#[from] crate::store::StoreError),
}
