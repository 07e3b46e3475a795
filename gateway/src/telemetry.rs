//! Best-effort telemetry: anonymous session actions and aggregate stats.

use chrono::Utc;
use content_hub_shared::{ContentStats, Envelope, SessionAction};
use tokio::task::JoinHandle;

use crate::{content::ContentGateway, error::Result};

const USER_SESSIONS_ENDPOINT: &str = "/user-sessions";
const CONTENT_STATS_ENDPOINT: &str = "/content-stats";

impl ContentGateway {
    /// Post one session action and wait for the CMS to accept it.
    ///
    /// The action is stamped with the current time. Only success or
    /// failure is observed; the response body is ignored.
    pub async fn record_session_action(&self, session_id: &str, action: SessionAction) -> Result<()> {
        let record = action.into_record(session_id, Utc::now());
        self.http
            .post_discard(USER_SESSIONS_ENDPOINT, &Envelope::new(record))
            .await
    }

    /// Fire-and-forget form of [`ContentGateway::record_session_action`].
    ///
    /// The post runs on a detached tokio task bounded by the configured
    /// telemetry timeout; failures and timeouts are logged and dropped.
    /// Must be called from within a tokio runtime.
    pub fn spawn_session_action(
        &self,
        session_id: impl Into<String>,
        action: SessionAction,
    ) -> JoinHandle<()> {
        let gateway = self.clone();
        let session_id = session_id.into();
        let limit = self.config().telemetry_timeout();

        tokio::spawn(async move {
            let kind = action.kind;
            let content_type = action.content_type;
            let content_id = action.content_id;
            match tokio::time::timeout(limit, gateway.record_session_action(&session_id, action))
                .await
            {
                Ok(Ok(())) => {
                    tracing::debug!(%kind, %content_type, content_id, "session action recorded");
                },
                Ok(Err(err)) => {
                    tracing::warn!(
                        %kind,
                        %content_type,
                        content_id,
                        error = %err,
                        "session action dropped"
                    );
                },
                Err(_) => {
                    tracing::warn!(
                        %kind,
                        %content_type,
                        content_id,
                        timeout_ms = limit.as_millis() as u64,
                        "session action timed out"
                    );
                },
            }
        })
    }

    /// Site-wide counters, or [`ContentStats::FALLBACK`] when the stats
    /// endpoint cannot be reached or answers with something unusable.
    pub async fn get_stats(&self) -> ContentStats {
        match self
            .http
            .get_json::<ContentStats>(CONTENT_STATS_ENDPOINT, None)
            .await
        {
            Ok(stats) => stats,
            Err(err) => {
                tracing::warn!(error = %err, "content stats unavailable, serving fallback figures");
                ContentStats::FALLBACK
            },
        }
    }
}
