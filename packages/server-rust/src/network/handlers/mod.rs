//! HTTP handler definitions for the tweet API server.
//!
//! Defines `AppState` (the shared state carried through axum extractors) and
//! the route table.

pub mod health;
pub mod tweets;

pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use axum::routing::{delete, get, post, put};
use axum::Router;

use super::{NetworkConfig, ShutdownController};
use crate::service::{
    build_operation_pipeline, OperationPipeline, RequestClassifier, ServerConfig,
    TweetOrchestrator,
};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references and cloneable service handles, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub shutdown: Arc<ShutdownController>,
    pub config: Arc<NetworkConfig>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
    pub classifier: Arc<RequestClassifier>,
    /// Load shedding and metrics around the orchestrator.
    pub pipeline: OperationPipeline,
    /// Used directly to conclude requests that never entered the pipeline.
    pub orchestrator: TweetOrchestrator,
}

impl AppState {
    #[must_use]
    pub fn new(
        shutdown: Arc<ShutdownController>,
        config: Arc<NetworkConfig>,
        server_config: &ServerConfig,
        orchestrator: TweetOrchestrator,
    ) -> Self {
        Self {
            shutdown,
            config,
            start_time: Instant::now(),
            classifier: Arc::new(RequestClassifier::new(Arc::new(server_config.clone()))),
            pipeline: build_operation_pipeline(orchestrator.clone(), server_config),
            orchestrator,
        }
    }
}

/// All routes, without HTTP middleware or state attached.
///
/// - `GET /health`, `GET /health/live`, `GET /health/ready`
/// - the tweet API under `/api/v1/tweets`
///
/// `like/{id}` and `details/{id}` also accept `POST`, so authors named `like`
/// or `details` can still reach `/{username}/add`.
pub fn routes() -> Router<AppState> {
    let tweets = Router::new()
        .route("/all", get(tweets::list_tweets))
        .route("/reactions", get(tweets::list_reactions))
        .route("/replies", get(tweets::list_replies))
        .route(
            "/details/{id}",
            get(tweets::get_tweet).post(tweets::create_tweet_as_details),
        )
        .route(
            "/like/{id}",
            get(tweets::count_likes).post(tweets::create_tweet_as_like),
        )
        .route("/{username}", get(tweets::list_tweets_by_author))
        .route("/{username}/add", post(tweets::create_tweet))
        .route("/{username}/update/{id}", put(tweets::update_tweet))
        .route("/{username}/delete/{id}", delete(tweets::delete_tweet))
        .route("/{username}/reply/{id}", post(tweets::reply_tweet))
        .route("/{username}/like/{id}", post(tweets::like_tweet));

    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .nest("/api/v1/tweets", tweets)
}
