//! reqwest-backed [`UpstreamClient`].
//!
//! [`HttpUpstream`] maps each [`UpstreamOperation`] onto the dependency's HTTP
//! endpoint, always appending `request_id=<correlation id>`, and folds the
//! answer into an [`UpstreamOutcome`]:
//!
//! | Answer | Outcome |
//! |--------|---------|
//! | 2xx (body decoded when the operation has one) | `Ok` |
//! | 400 / 404 / other status | `Rejected(BadRequest / NotFound / InternalError)` |
//! | connect error, timeout, undecodable body | `Unavailable` |

use crate::config::UpstreamEndpoints;
use crate::middleware::REQUEST_ID_PARAM;
use async_trait::async_trait;
use newsgate_kernel::{
    Comment, CorrelationId, NewsItem, PaginationNewsList, StatusClass, UpstreamCallSpec,
    UpstreamClient, UpstreamOperation, UpstreamOutcome, UpstreamPayload,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

/// Talks to the news, comments and verification services over HTTP.
pub struct HttpUpstream {
    endpoints: UpstreamEndpoints,
    client: Client,
}

impl HttpUpstream {
    /// Build a client whose own timeout matches the per-call deadline.
    pub fn new(endpoints: UpstreamEndpoints, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoints, client))
    }

    pub fn with_client(endpoints: UpstreamEndpoints, client: Client) -> Self {
        let trim = |url: String| url.trim_end_matches('/').to_string();
        Self {
            endpoints: UpstreamEndpoints {
                news: trim(endpoints.news),
                comments: trim(endpoints.comments),
                verification: trim(endpoints.verification),
            },
            client,
        }
    }

    fn request(&self, operation: &UpstreamOperation, correlation_id: &CorrelationId) -> RequestBuilder {
        let news = &self.endpoints.news;
        let comments = &self.endpoints.comments;
        let verification = &self.endpoints.verification;

        let builder = match operation {
            UpstreamOperation::ListNews {
                amount,
                page,
                search,
            } => self.client.get(format!("{news}/newsList")).query(&[
                ("amount", amount.to_string()),
                ("page", page.to_string()),
                ("search", search.clone()),
            ]),
            UpstreamOperation::FetchNews { news_id } => self
                .client
                .get(format!("{news}/news"))
                .query(&[("news_id", news_id)]),
            UpstreamOperation::NewsExists { news_id } => self
                .client
                .get(format!("{news}/newsCheck"))
                .query(&[("news_id", news_id)]),
            UpstreamOperation::FetchThread { news_id } => self
                .client
                .get(format!("{comments}/comments"))
                .query(&[("news_id", news_id)]),
            UpstreamOperation::ParentCommentExists {
                parent_comment_id,
                news_id,
            } => self
                .client
                .get(format!("{comments}/commentsCheck"))
                .query(&[("p_comment_id", parent_comment_id), ("news_id", news_id)]),
            UpstreamOperation::ValidateComment { comment } => self
                .client
                .post(format!("{verification}/verification"))
                .json(comment),
            UpstreamOperation::StoreComment { comment } => self
                .client
                .post(format!("{comments}/add-comment"))
                .json(comment),
        };
        builder.query(&[(REQUEST_ID_PARAM, correlation_id.as_str())])
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    #[instrument(
        skip_all,
        fields(request_id = %correlation_id, dependency = %spec.dependency(), operation = spec.name())
    )]
    async fn call(&self, spec: &UpstreamCallSpec, correlation_id: &CorrelationId) -> UpstreamOutcome {
        let response = match self.request(spec.operation(), correlation_id).send().await {
            Ok(response) => response,
            Err(e) => return UpstreamOutcome::Unavailable(format!("request failed: {e}")),
        };

        let status = response.status().as_u16();
        debug!(status, "upstream answered");
        if let Some(class) = StatusClass::from_http_status(status) {
            return UpstreamOutcome::Rejected(class, format!("{} answered {status}", spec.dependency()));
        }

        match spec.operation() {
            UpstreamOperation::ListNews { .. } => {
                decode::<PaginationNewsList>(response).await.map_or_else(
                    UpstreamOutcome::Unavailable,
                    |page| UpstreamOutcome::Ok(UpstreamPayload::NewsPage(page)),
                )
            }
            UpstreamOperation::FetchNews { .. } => decode::<NewsItem>(response).await.map_or_else(
                UpstreamOutcome::Unavailable,
                |item| UpstreamOutcome::Ok(UpstreamPayload::News(item)),
            ),
            UpstreamOperation::FetchThread { .. } => {
                decode::<Option<Vec<Comment>>>(response).await.map_or_else(
                    UpstreamOutcome::Unavailable,
                    |thread| UpstreamOutcome::Ok(UpstreamPayload::Thread(thread.unwrap_or_default())),
                )
            }
            UpstreamOperation::NewsExists { .. }
            | UpstreamOperation::ParentCommentExists { .. }
            | UpstreamOperation::ValidateComment { .. }
            | UpstreamOperation::StoreComment { .. } => UpstreamOutcome::ok_empty(),
        }
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("undecodable response body: {e}"))
}
