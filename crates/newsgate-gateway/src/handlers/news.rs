//! News endpoints
//!
//! GET /newsList       - one page of headlines, optionally filtered by title
//! GET /news           - a single news item
//! GET /news+comments  - a news item together with its comment thread

use axum::{
    extract::{Query, State, rejection::QueryRejection},
    response::Response,
};
use newsgate_kernel::{
    CorrelationId, NewsComments, NewsItem, PaginationNewsList, StatusClass, UpstreamCallSpec,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use super::params::{self, DEFAULT_AMOUNT, DEFAULT_PAGE};
use super::{report_local, with_status};
use crate::compose::fetch_news_with_comments;
use crate::error::{GatewayError, WithError};
use crate::middleware::RequestCorrelation;
use crate::state::AppState;

/// Query string of `GET /newsList`
#[derive(Debug, Default, Deserialize)]
pub struct NewsListQuery {
    pub amount: Option<String>,
    pub page: Option<String>,
    pub search: Option<String>,
}

/// Query string of the single-item endpoints
#[derive(Debug, Default, Deserialize)]
pub struct NewsIdQuery {
    pub news_id: Option<String>,
}

struct ListRequest {
    amount: u32,
    page: u32,
    search: String,
}

fn list_request(query: Result<Query<NewsListQuery>, QueryRejection>) -> Result<ListRequest, GatewayError> {
    let Query(query) = query.map_err(params::undecodable_query)?;
    Ok(ListRequest {
        amount: params::positive_or("amount", query.amount.as_deref(), DEFAULT_AMOUNT)?,
        page: params::positive_or("page", query.page.as_deref(), DEFAULT_PAGE)?,
        search: query.search.unwrap_or_default(),
    })
}

pub(crate) fn parse_news_id(query: Result<Query<NewsIdQuery>, QueryRejection>) -> Result<i64, GatewayError> {
    let Query(query) = query.map_err(params::undecodable_query)?;
    params::required_positive("news_id", query.news_id.as_deref()).map_err(GatewayError::from)
}

async fn reject(state: &AppState, correlation_id: &CorrelationId, err: GatewayError) -> StatusClass {
    info!(request_id = %correlation_id, error = %err, "request rejected");
    report_local(&state.sink, correlation_id, &err).await;
    err.status_class()
}

/// GET /newsList
///
/// `amount` and `page` default to 10 and 1 and must be positive. On failure
/// the body is an empty page carrying the error code.
pub async fn list_news(
    State(state): State<Arc<AppState>>,
    RequestCorrelation(correlation_id): RequestCorrelation,
    query: Result<Query<NewsListQuery>, QueryRejection>,
) -> Response {
    let request = match list_request(query) {
        Ok(request) => request,
        Err(err) => {
            let class = reject(&state, &correlation_id, err).await;
            return failed_page(class);
        }
    };

    let outcome = state
        .coordinator
        .run_one(
            UpstreamCallSpec::list_news(request.amount, request.page, request.search),
            &correlation_id,
        )
        .await;
    match outcome.into_news_page() {
        Ok(page) => with_status(0, page),
        Err(class) => failed_page(class),
    }
}

fn failed_page(class: StatusClass) -> Response {
    let body = PaginationNewsList {
        error: class.http_status(),
        ..PaginationNewsList::default()
    };
    with_status(body.error, body)
}

/// GET /news
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    RequestCorrelation(correlation_id): RequestCorrelation,
    query: Result<Query<NewsIdQuery>, QueryRejection>,
) -> Response {
    let news_id = match parse_news_id(query) {
        Ok(id) => id,
        Err(err) => {
            let class = reject(&state, &correlation_id, err).await;
            return with_status(class.http_status(), WithError::<NewsItem>::failed(class));
        }
    };

    let outcome = state
        .coordinator
        .run_one(UpstreamCallSpec::fetch_news(news_id), &correlation_id)
        .await;
    match outcome.into_news() {
        Ok(item) => with_status(0, WithError::ok(item)),
        Err(class) => with_status(class.http_status(), WithError::<NewsItem>::failed(class)),
    }
}

/// GET /news+comments
///
/// Status mirrors the `Error` field of the body.
pub async fn news_with_comments(
    State(state): State<Arc<AppState>>,
    RequestCorrelation(correlation_id): RequestCorrelation,
    query: Result<Query<NewsIdQuery>, QueryRejection>,
) -> Response {
    let news_id = match parse_news_id(query) {
        Ok(id) => id,
        Err(err) => {
            let class = reject(&state, &correlation_id, err).await;
            let body = NewsComments::failed(class.http_status());
            return with_status(body.error, body);
        }
    };

    let body = fetch_news_with_comments(&state.coordinator, news_id, &correlation_id).await;
    with_status(body.error, body)
}

/// Build the news router sub-tree
pub fn news_router() -> axum::Router<Arc<AppState>> {
    use axum::routing::get;
    axum::Router::new()
        .route("/newsList", get(list_news))
        .route("/news", get(get_news))
        .route("/news+comments", get(news_with_comments))
}
