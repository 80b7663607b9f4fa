//! Operation pipeline for the tweet API.
//!
//! 1. **Classification** (`classify`): `RawRequest` -> `Result<Operation, ClassifyError>`
//! 2. **Middleware** (`middleware`): Tower layers (metrics, load-shedding)
//! 3. **Orchestration** (`orchestrator`): domain call, envelope, notification

pub mod classify;
pub mod config;
pub mod middleware;
pub mod operation;
pub mod orchestrator;

pub use classify::{ClassifyError, RawRequest, RequestClassifier};
pub use config::ServerConfig;
pub use middleware::{build_operation_pipeline, OperationPipeline};
pub use operation::{
    Operation, OperationContext, OperationError, OperationFailure, OperationKind,
};
pub use orchestrator::TweetOrchestrator;
