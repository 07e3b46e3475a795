//! Helpers shared by the commands.

use anyhow::{bail, Context, Result};
use content_hub_gateway::{model::ContentItem, GatewayConfig};
use serde_json::{Map, Value};

/// Resolve gateway settings from `lookup` (normally the environment) with
/// the command-line overrides applied on top.
pub fn resolve_config<F>(lookup: F, base_url: Option<&str>, token: Option<&str>) -> Result<GatewayConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = GatewayConfig::from_lookup(|key| match (key, base_url) {
        ("STRAPI_URL", Some(url)) => Some(url.to_string()),
        _ => lookup(key),
    })
    .context("failed to resolve CMS settings")?;

    Ok(match token {
        Some(token) => config.with_token(token),
        None => config,
    })
}

/// Parse `--metadata`, which must be a JSON object.
pub fn parse_metadata(raw: &str) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(raw).context("metadata is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("metadata must be a JSON object, got `{other}`"),
    }
}

/// Client-side narrowing of an already fetched page.
pub fn narrow_items(items: Vec<ContentItem>, matching: Option<&str>) -> Vec<ContentItem> {
    match matching {
        Some(text) => items
            .into_iter()
            .filter(|item| item.matches_text(text))
            .collect(),
        None => items,
    }
}
