mod retriever;

pub use retriever::{
    CurrentPoint, CurrentPredictions, HistoricalPoint, HistoricalPredictions, PredictionData,
    RetrievalStatus, Retriever,
};
