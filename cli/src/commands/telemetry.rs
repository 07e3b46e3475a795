//! Stats and session-action commands.

use anyhow::{Context, Result};
use content_hub_gateway::{
    model::{Collection, SessionAction, SessionActionKind},
    ContentGateway,
};
use serde::Serialize;

use super::print_json;
use crate::utils;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrackResult {
    session_id: String,
    action: SessionActionKind,
    content_type: Collection,
    content_id: u64,
    confirmed: bool,
}

/// `hub-cli stats`.
pub async fn stats(gateway: &ContentGateway) -> Result<()> {
    print_json(&gateway.get_stats().await)
}

/// `hub-cli track`.
///
/// With `best_effort` the action goes through the detached path and
/// `confirmed` is always `false`, since failures are only logged there.
pub async fn track(
    gateway: &ContentGateway,
    session_id: String,
    kind: SessionActionKind,
    collection: Collection,
    content_id: u64,
    metadata: Option<&str>,
    best_effort: bool,
) -> Result<()> {
    let mut action = SessionAction::new(kind, collection, content_id);
    if let Some(raw) = metadata {
        action = action.with_metadata(utils::parse_metadata(raw)?);
    }

    let confirmed = if best_effort {
        gateway
            .spawn_session_action(session_id.clone(), action)
            .await
            .context("session action task panicked")?;
        false
    } else {
        gateway
            .record_session_action(&session_id, action)
            .await
            .context("failed to record session action")?;
        true
    };

    print_json(&TrackResult {
        session_id,
        action: kind,
        content_type: collection,
        content_id,
        confirmed,
    })
}
