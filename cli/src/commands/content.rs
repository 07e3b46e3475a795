//! Read-only content commands.

use anyhow::{Context, Result};
use content_hub_gateway::{
    model::{Category, Collection, SearchResults, Tag},
    ContentGateway, ListParams,
};
use serde::Serialize;

use super::print_json;
use crate::utils;

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    total: usize,
    results: SearchResults,
}

#[derive(Serialize)]
struct CategoriesResponse {
    total: usize,
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct TagsResponse {
    total: usize,
    tags: Vec<Tag>,
}

/// `hub-cli list`.
pub async fn list(
    gateway: &ContentGateway,
    collection: Collection,
    params: &ListParams,
    matching: Option<&str>,
) -> Result<()> {
    let mut envelope = gateway
        .list_collection(collection, params)
        .await
        .with_context(|| format!("failed to list {collection}"))?;

    let fetched = envelope.data.len();
    envelope.data = utils::narrow_items(envelope.data, matching);
    if envelope.data.len() != fetched {
        tracing::info!(%collection, fetched, kept = envelope.data.len(), "narrowed page locally");
    }
    print_json(&envelope)
}

/// `hub-cli get`.
pub async fn get(gateway: &ContentGateway, collection: Collection, slug: &str) -> Result<()> {
    let item = gateway
        .get_by_slug(collection, slug)
        .await
        .with_context(|| format!("failed to fetch {collection} `{slug}`"))?;
    print_json(&item)
}

/// `hub-cli search`.
pub async fn search(gateway: &ContentGateway, query: String, collections: &[Collection]) -> Result<()> {
    let scope = (!collections.is_empty()).then_some(collections);
    let results = gateway.search(&query, scope).await;
    print_json(&SearchResponse {
        total: results.total(),
        results,
        query,
    })
}

/// `hub-cli categories`.
pub async fn categories(gateway: &ContentGateway) -> Result<()> {
    let categories = gateway
        .list_categories()
        .await
        .context("failed to list categories")?;
    print_json(&CategoriesResponse {
        total: categories.len(),
        categories,
    })
}

/// `hub-cli tags`.
pub async fn tags(gateway: &ContentGateway) -> Result<()> {
    let tags = gateway.list_tags().await.context("failed to list tags")?;
    print_json(&TagsResponse {
        total: tags.len(),
        tags,
    })
}
