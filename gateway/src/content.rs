use std::sync::Arc;

use content_hub_shared::{
    Category, CategoryAttributes, Collection, ContentItem, Entity, Envelope, SearchResults, Tag,
    TagAttributes,
};
use futures::future::join_all;

use crate::{
    auth::AuthRelay,
    config::GatewayConfig,
    error::{GatewayError, Result},
    http::CmsHttp,
    query::{self, CmsQuery, ListParams},
};

const CATEGORIES_ENDPOINT: &str = "/categories";
const TAGS_ENDPOINT: &str = "/tags";

/// Typed client for the CMS content collections.
///
/// Cloning is cheap: clones share one connection pool and configuration.
/// The gateway holds no mutable state, so concurrent callers never
/// interfere.
#[derive(Debug, Clone)]
pub struct ContentGateway {
    pub(crate) http: Arc<CmsHttp>,
}

impl ContentGateway {
    /// Build a gateway for `config`.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Ok(Self {
            http: Arc::new(CmsHttp::new(config)?),
        })
    }

    /// Build a gateway from `STRAPI_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GatewayConfig::from_env()?)
    }

    /// Settings the gateway was built with.
    pub fn config(&self) -> &GatewayConfig {
        self.http.config()
    }

    /// Auth relay sharing this gateway's transport.
    pub fn auth(&self) -> AuthRelay {
        AuthRelay::from_shared(Arc::clone(&self.http))
    }

    /// One page of `collection` with image, category, tags and author
    /// inlined (plus the video asset for videos).
    pub async fn list_collection(
        &self,
        collection: Collection,
        params: &ListParams,
    ) -> Result<Envelope<Vec<ContentItem>>> {
        let query = query::list_query(collection, params);
        let envelope: Envelope<Vec<ContentItem>> = self
            .http
            .get_json(&endpoint(collection), Some(&query))
            .await?;

        if let Some(pagination) = envelope.pagination() {
            if !pagination.is_consistent(envelope.data.len()) {
                tracing::warn!(
                    %collection,
                    page = pagination.page,
                    page_count = pagination.page_count,
                    total = pagination.total,
                    returned = envelope.data.len(),
                    "cms returned inconsistent pagination"
                );
            }
        }
        Ok(envelope)
    }

    /// The fully populated record behind `slug`.
    ///
    /// Slugs are expected to be unique per collection. When the CMS returns
    /// several records anyway, the most recently published one wins (drafts
    /// rank last, ties keep server order) and a warning is logged.
    pub async fn get_by_slug(&self, collection: Collection, slug: &str) -> Result<ContentItem> {
        let items = self.fetch_items(collection, &query::slug_query(slug)).await?;
        let matches = items.len();
        let item = latest_published(items).ok_or_else(|| GatewayError::NotFound {
            collection,
            slug: slug.to_string(),
        })?;

        if matches > 1 {
            tracing::warn!(
                %collection,
                slug,
                matches,
                chosen_id = item.id,
                "slug is not unique; using the most recently published record"
            );
        }
        Ok(item)
    }

    /// Search title, content and excerpt of several collections at once.
    ///
    /// `collections` defaults to all four. Requests run concurrently; a
    /// collection whose request fails contributes no hits instead of failing
    /// the whole search. A blank query returns empty results without
    /// contacting the CMS.
    pub async fn search(&self, text: &str, collections: Option<&[Collection]>) -> SearchResults {
        let mut results = SearchResults::default();
        let text = text.trim();
        if text.is_empty() {
            return results;
        }

        let mut requested: Vec<Collection> = Vec::new();
        for collection in collections.unwrap_or(&Collection::ALL) {
            if !requested.contains(collection) {
                requested.push(*collection);
            }
        }

        let query = query::search_query(text);
        let lookups = requested.into_iter().map(|collection| {
            let query = &query;
            async move { (collection, self.fetch_items(collection, query).await) }
        });

        for (collection, outcome) in join_all(lookups).await {
            match outcome {
                Ok(items) => results.insert(collection, items),
                Err(err) => {
                    tracing::warn!(%collection, error = %err, "search skipped failing collection");
                },
            }
        }
        results
    }

    /// Every category.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let envelope: Envelope<Vec<Entity<CategoryAttributes>>> =
            self.http.get_json(CATEGORIES_ENDPOINT, None).await?;
        Ok(envelope.data.into_iter().map(Category::from).collect())
    }

    /// Every tag.
    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        let envelope: Envelope<Vec<Entity<TagAttributes>>> =
            self.http.get_json(TAGS_ENDPOINT, None).await?;
        Ok(envelope.data.into_iter().map(Tag::from).collect())
    }

    async fn fetch_items(&self, collection: Collection, query: &CmsQuery) -> Result<Vec<ContentItem>> {
        let envelope: Envelope<Vec<ContentItem>> = self
            .http
            .get_json(&endpoint(collection), Some(query))
            .await?;
        Ok(envelope.data)
    }
}

fn endpoint(collection: Collection) -> String {
    format!("/{collection}")
}

fn latest_published(items: Vec<ContentItem>) -> Option<ContentItem> {
    items.into_iter().fold(None, |best, candidate| match best {
        Some(best) if candidate.attributes.published_at <= best.attributes.published_at => {
            Some(best)
        },
        _ => Some(candidate),
    })
}
