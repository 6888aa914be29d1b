//! Combined news item + comment thread retrieval.

use crate::fanout::FanOutCoordinator;
use newsgate_kernel::{
    CorrelationId, NewsComments, StatusClass, UpstreamCallSpec, UpstreamOutcome,
};
use tracing::{info, instrument};

/// Fetch a news item and its thread concurrently and merge them.
///
/// `news_id` must already have been validated by the caller.
#[instrument(skip(coordinator, correlation_id), fields(request_id = %correlation_id))]
pub async fn fetch_news_with_comments(
    coordinator: &FanOutCoordinator,
    news_id: i64,
    correlation_id: &CorrelationId,
) -> NewsComments {
    let outcomes = coordinator
        .run(
            vec![
                UpstreamCallSpec::fetch_news(news_id),
                UpstreamCallSpec::fetch_thread(news_id),
            ],
            correlation_id,
        )
        .await;

    let merged = match <[UpstreamOutcome; 2]>::try_from(outcomes) {
        Ok([news, thread]) => merge_news_and_thread(news, thread),
        Err(_) => NewsComments::failed(StatusClass::InternalError.http_status()),
    };
    if merged.error != 0 {
        info!(status = merged.error, "news+comments failed");
    }
    merged
}

/// Merge policy for the two reads.
///
/// The news item decides first: any failure there fails the whole result,
/// whatever the thread read produced. A missing thread (`NotFound`) is an
/// empty thread. Any other thread failure is fatal. A failed result carries
/// no payload.
pub fn merge_news_and_thread(news: UpstreamOutcome, thread: UpstreamOutcome) -> NewsComments {
    let news = match news.into_news() {
        Ok(item) => item,
        Err(class) => return NewsComments::failed(class.http_status()),
    };

    let comments = if thread.is_not_found() {
        Vec::new()
    } else {
        match thread.into_thread() {
            Ok(comments) => comments,
            Err(class) => return NewsComments::failed(class.http_status()),
        }
    };

    NewsComments::merged(news, comments)
}
