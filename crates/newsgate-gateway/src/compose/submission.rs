//! Validated comment submission.
//!
//! Up to three independent checks run concurrently; the single write to the
//! discussion store is issued only when every one of them succeeded.

use crate::error::{GatewayError, GatewayResult};
use crate::fanout::FanOutCoordinator;
use newsgate_kernel::{
    Comment, CorrelationId, Dependency, StatusClass, UpstreamCallSpec, UpstreamOutcome,
};
use tracing::{info, instrument};

/// Checks required before `comment` may be written, in dispatch order.
///
/// The parent check is only present for replies.
pub fn submission_checks(comment: &Comment) -> Vec<UpstreamCallSpec> {
    let mut checks = Vec::with_capacity(3);
    if comment.is_reply() {
        checks.push(UpstreamCallSpec::parent_comment_exists(
            comment.parent_comment_id,
            comment.news_id,
        ));
    }
    checks.push(UpstreamCallSpec::news_exists(comment.news_id));
    checks.push(UpstreamCallSpec::validate_comment(comment.clone()));
    checks
}

/// Check `comment` against every dependency and store it if all agree.
///
/// When several checks fail, the reported class follows
/// [`UpstreamOutcome::decisive_failure`]. A failed write is always an
/// internal error: the comment is not considered submitted.
#[instrument(skip_all, fields(request_id = %correlation_id, news_id = comment.news_id))]
pub async fn submit_comment(
    coordinator: &FanOutCoordinator,
    comment: Comment,
    correlation_id: &CorrelationId,
) -> GatewayResult<()> {
    comment.validate_draft()?;

    let checks = submission_checks(&comment);
    let outcomes = coordinator.run(checks.clone(), correlation_id).await;

    if let Some((index, class)) = UpstreamOutcome::decisive_failure(&outcomes) {
        let failed = &checks[index];
        info!(
            dependency = %failed.dependency(),
            operation = failed.name(),
            status = class.http_status(),
            "comment rejected by pre-write checks"
        );
        return Err(GatewayError::Upstream {
            class,
            dependency: failed.dependency(),
            operation: failed.name(),
        });
    }

    let write = UpstreamCallSpec::store_comment(comment);
    let operation = write.name();
    let outcome = coordinator.run_one(write, correlation_id).await;
    if !outcome.is_ok() {
        return Err(GatewayError::Upstream {
            class: StatusClass::InternalError,
            dependency: Dependency::DiscussionStore,
            operation,
        });
    }

    info!("comment stored");
    Ok(())
}
