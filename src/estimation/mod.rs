//! Construction cost and duration estimation engine

pub mod estimator;
pub mod financing;
pub mod rates;

pub use estimator::{estimate, EstimationResult, ProjectSpecification};
pub use financing::SimulatorVariant;
pub use rates::{DurationRange, FinishTier, ProjectCategory, RateTable};
