//! Pipeline composition: combines all middleware layers into a single service stack.

use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;
use tweetapp_core::ResponseEnvelope;

use super::load_shed::LoadShedLayer;
use super::metrics::MetricsLayer;
use crate::service::config::ServerConfig;
use crate::service::operation::{Operation, OperationError};
use crate::service::orchestrator::TweetOrchestrator;

/// Type-erased operation pipeline, cloneable and shareable across handlers.
pub type OperationPipeline = BoxCloneSyncService<Operation, ResponseEnvelope, OperationError>;

/// Build the operation pipeline by wrapping the orchestrator with middleware layers.
///
/// Layer order (outermost to innermost):
/// 1. `MetricsLayer` -- record timing and outcome, shed operations included
/// 2. `LoadShedLayer` -- reject when overloaded before doing any work
///
/// Domain-call timeouts are enforced inside the orchestrator so that an
/// expiry still concludes and notifies like any other failure.
#[must_use]
pub fn build_operation_pipeline(
    orchestrator: TweetOrchestrator,
    config: &ServerConfig,
) -> OperationPipeline {
    let svc = ServiceBuilder::new()
        .layer(MetricsLayer)
        .layer(LoadShedLayer::new(config.max_concurrent_operations))
        .service(orchestrator);
    BoxCloneSyncService::new(svc)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
