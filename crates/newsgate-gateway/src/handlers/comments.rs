//! Comment endpoints
//!
//! POST /add-comment - validated comment submission
//! GET  /comment     - the comment thread of a news item

use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use newsgate_kernel::{Comment, SubmissionOutcome, UpstreamCallSpec};
use std::sync::Arc;
use tracing::info;

use super::news::{NewsIdQuery, parse_news_id};
use super::{report_local, with_status};
use crate::compose::submit_comment;
use crate::error::{GatewayError, WithError};
use crate::middleware::RequestCorrelation;
use crate::state::AppState;

/// POST /add-comment
///
/// Answers `{"Error": 0}` once the comment has been written, otherwise
/// `{"Error": <code>}` with the matching status.
pub async fn add_comment(
    State(state): State<Arc<AppState>>,
    RequestCorrelation(correlation_id): RequestCorrelation,
    body: Result<Json<Comment>, JsonRejection>,
) -> Response {
    let result = match body {
        Ok(Json(comment)) => submit_comment(&state.coordinator, comment, &correlation_id).await,
        Err(rejection) => Err(GatewayError::MalformedBody(rejection.body_text())),
    };

    match result {
        Ok(()) => Json(SubmissionOutcome { error: 0 }).into_response(),
        Err(err) => {
            info!(request_id = %correlation_id, error = %err, "comment not submitted");
            report_local(&state.sink, &correlation_id, &err).await;
            err.into_response()
        }
    }
}

/// GET /comment
///
/// Unlike `/news+comments`, a news item without comments is a 404 here.
pub async fn get_comments(
    State(state): State<Arc<AppState>>,
    RequestCorrelation(correlation_id): RequestCorrelation,
    query: Result<Query<NewsIdQuery>, QueryRejection>,
) -> Response {
    let news_id = match parse_news_id(query) {
        Ok(id) => id,
        Err(err) => {
            report_local(&state.sink, &correlation_id, &err).await;
            let class = err.status_class();
            return with_status(class.http_status(), WithError::<Comment>::failed(class));
        }
    };

    let outcome = state
        .coordinator
        .run_one(UpstreamCallSpec::fetch_thread(news_id), &correlation_id)
        .await;
    match outcome.into_thread() {
        Ok(comments) => with_status(0, comments),
        Err(class) => with_status(class.http_status(), WithError::<Comment>::failed(class)),
    }
}

/// Build the comments router sub-tree
pub fn comments_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::{get, post};
    axum::Router::new()
        .route("/add-comment", post(add_comment))
        .route("/comment", get(get_comments))
}
