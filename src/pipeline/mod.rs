//! Training pipeline: the driver side of the engine
//!
//! Runs many games serially against one opponent, tallies outcomes per
//! block and feeds every event to the registered observers.

pub mod observers;
pub mod training;

pub use observers::{
    DecisionObservation, JsonlObserver, MetricsHandle, MetricsObserver, MetricsSummary,
    MoveObservation, Observation, ProgressObserver,
};
pub use training::{Tally, TrainingConfig, TrainingPipeline, TrainingReport};

pub use crate::ports::Observer;
