pub mod orchestrator;

pub use orchestrator::{
    FundingOutcome, LifecycleError, LifecycleReport, LifecycleSettings, LifecycleStep,
    StepFailure, TokenLifecycle,
};
