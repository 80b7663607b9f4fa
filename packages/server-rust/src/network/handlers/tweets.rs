//! Tweet API handlers.
//!
//! Every handler turns its path segments and body into a [`RawRequest`] and
//! hands it to [`respond`]. The response is always HTTP 200 with the JSON
//! envelope; success or failure is reported inside it.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use tower::ServiceExt;
use tweetapp_core::{ReplyBody, ResponseEnvelope, TweetDraft};

use super::AppState;
use crate::network::middleware::REQUEST_ID_HEADER;
use crate::service::classify::RawBody;
use crate::service::RawRequest;

fn body_of<T>(body: Result<Json<T>, JsonRejection>) -> RawBody<T> {
    body.map(|Json(inner)| inner).map_err(|e| e.body_text())
}

fn request_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Classify, run through the pipeline, and conclude.
///
/// Validation and pipeline errors are concluded by the orchestrator directly,
/// so they still produce a well-formed envelope and, for notifying
/// operations, a notification.
async fn respond(state: &AppState, headers: &HeaderMap, raw: RawRequest) -> Json<ResponseEnvelope> {
    let _guard = state.shutdown.in_flight_guard();
    let kind = raw.kind();

    let envelope = match state.classifier.classify(raw, request_id(headers)) {
        Ok(op) => match state.pipeline.clone().oneshot(op).await {
            Ok(envelope) => envelope,
            Err(e) => state.orchestrator.reject(kind, e.into()).await,
        },
        Err(e) => state.orchestrator.reject(kind, e.into()).await,
    };
    Json(envelope)
}

pub async fn create_tweet(
    State(state): State<AppState>,
    Path(author): Path<String>,
    headers: HeaderMap,
    body: Result<Json<TweetDraft>, JsonRejection>,
) -> Json<ResponseEnvelope> {
    let raw = RawRequest::CreateTweet {
        author,
        body: body_of(body),
    };
    respond(&state, &headers, raw).await
}

/// `POST /{username}/add` for usernames that shadow the static `like/{id}`
/// and `details/{id}` routes. Any other second segment is not a route.
async fn create_tweet_shadowed(
    author: &str,
    state: &AppState,
    segment: &str,
    headers: &HeaderMap,
    body: Result<Json<TweetDraft>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, StatusCode> {
    if segment != "add" {
        return Err(StatusCode::NOT_FOUND);
    }
    let raw = RawRequest::CreateTweet {
        author: author.to_string(),
        body: body_of(body),
    };
    Ok(respond(state, headers, raw).await)
}

pub async fn create_tweet_as_like(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    body: Result<Json<TweetDraft>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, StatusCode> {
    create_tweet_shadowed("like", &state, &segment, &headers, body).await
}

pub async fn create_tweet_as_details(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    headers: HeaderMap,
    body: Result<Json<TweetDraft>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, StatusCode> {
    create_tweet_shadowed("details", &state, &segment, &headers, body).await
}

pub async fn list_tweets(State(state): State<AppState>, headers: HeaderMap) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::ListTweets).await
}

pub async fn list_tweets_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
    headers: HeaderMap,
) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::ListTweetsByAuthor { author }).await
}

pub async fn update_tweet(
    State(state): State<AppState>,
    Path((author, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Result<Json<TweetDraft>, JsonRejection>,
) -> Json<ResponseEnvelope> {
    let raw = RawRequest::UpdateTweet {
        author,
        id,
        body: body_of(body),
    };
    respond(&state, &headers, raw).await
}

pub async fn delete_tweet(
    State(state): State<AppState>,
    Path((author, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::DeleteTweet { author, id }).await
}

pub async fn reply_tweet(
    State(state): State<AppState>,
    Path((author, id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Result<Json<ReplyBody>, JsonRejection>,
) -> Json<ResponseEnvelope> {
    let raw = RawRequest::ReplyTweet {
        author,
        id,
        body: body_of(body),
    };
    respond(&state, &headers, raw).await
}

pub async fn like_tweet(
    State(state): State<AppState>,
    Path((author, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::LikeTweet { author, id }).await
}

pub async fn get_tweet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::GetTweet { id }).await
}

pub async fn count_likes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::CountLikes { id }).await
}

pub async fn list_reactions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::ListReactions).await
}

pub async fn list_replies(State(state): State<AppState>, headers: HeaderMap) -> Json<ResponseEnvelope> {
    respond(&state, &headers, RawRequest::ListReplies).await
}
