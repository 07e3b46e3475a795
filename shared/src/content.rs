//! Content items, relations and the CMS response envelope.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One of the four content kinds served by the CMS.
///
/// Every collection shares the same attribute shape and is exposed by the
/// CMS as `/{collection}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Short news posts.
    News,
    /// Long-form articles.
    Articles,
    /// Stories.
    Stories,
    /// Video entries; the only collection with a `video` media relation.
    Videos,
}

impl Collection {
    /// All collections in their canonical order.
    pub const ALL: [Collection; 4] =
        [Collection::News, Collection::Articles, Collection::Stories, Collection::Videos];

    /// Resource name used in CMS paths and search result keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::News => "news",
            Collection::Articles => "articles",
            Collection::Stories => "stories",
            Collection::Videos => "videos",
        }
    }

    /// Relations inlined by list requests, in wire order.
    pub fn populated_relations(self) -> &'static [&'static str] {
        match self {
            Collection::Videos => &["image", "video", "category", "tags", "author"],
            _ => &["image", "category", "tags", "author"],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known collection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection `{0}` (expected news, articles, stories or videos)")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Collection::ALL
            .into_iter()
            .find(|collection| collection.as_str() == normalized)
            .ok_or_else(|| UnknownCollection(value.to_string()))
    }
}

/// A CMS record: numeric identity plus its attribute record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity<T> {
    /// CMS-assigned identifier.
    pub id: u64,
    /// Entity attributes.
    pub attributes: T,
}

/// A to-one relation in the CMS wrapper shape `{ "data": Entity | null }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Related<T> {
    /// The related entity, absent when unset or not populated.
    #[serde(default)]
    pub data: Option<Entity<T>>,
}

impl<T> Default for Related<T> {
    fn default() -> Self {
        Self {
            data: None,
        }
    }
}

impl<T> Related<T> {
    /// Borrow the related entity, if any.
    pub fn get(&self) -> Option<&Entity<T>> {
        self.data.as_ref()
    }
}

/// A to-many relation in the CMS wrapper shape `{ "data": [Entity] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct RelatedMany<T> {
    /// Related entities; the CMS gives no ordering guarantee.
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<Entity<T>>,
}

impl<T> Default for RelatedMany<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
        }
    }
}

/// Attributes of a category entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAttributes {
    /// Display name.
    pub name: String,
    /// URL identifier.
    pub slug: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Attributes of a tag entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagAttributes {
    /// Display name.
    pub name: String,
    /// URL identifier.
    pub slug: String,
}

/// Attributes of an author entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorAttributes {
    /// Display name.
    pub name: String,
    /// Contact address, when the CMS exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Attributes of an uploaded media asset (image or video).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAttributes {
    /// Public asset URL.
    pub url: String,
    /// Alt text for images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_text: Option<String>,
    /// Caption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    /// Human-readable duration for videos, e.g. `"12:30"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Attribute record shared by news, articles, stories and videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentAttributes {
    /// Headline.
    pub title: String,
    /// Body text; empty when the CMS sends `null` for a blank field.
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    /// Teaser shown on cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Collection-scoped unique identifier.
    pub slug: String,
    /// `None` for drafts.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Server-maintained view counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u64>,
    /// Server-aggregated rating.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// At most one category.
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Related<CategoryAttributes>,
    /// Tag set.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: RelatedMany<TagAttributes>,
    /// At most one author.
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: Related<AuthorAttributes>,
    /// Cover image.
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: Related<MediaAttributes>,
    /// Video asset, only populated for the videos collection.
    #[serde(default, deserialize_with = "null_as_default")]
    pub video: Related<MediaAttributes>,
}

/// One news post, article, story or video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    /// CMS-assigned identifier.
    pub id: u64,
    /// Content attributes and populated relations.
    pub attributes: ContentAttributes,
}

impl ContentItem {
    /// The item's category flattened into a [`Category`].
    pub fn category(&self) -> Option<Category> {
        self.attributes.category.get().map(Category::from)
    }

    /// The item's tags flattened into [`Tag`]s.
    pub fn tags(&self) -> Vec<Tag> {
        self.attributes.tags.data.iter().map(Tag::from).collect()
    }

    /// Author display name, if an author is populated.
    pub fn author_name(&self) -> Option<&str> {
        self.attributes
            .author
            .get()
            .map(|author| author.attributes.name.as_str())
    }

    /// Cover image URL, if an image is populated.
    pub fn image_url(&self) -> Option<&str> {
        self.attributes
            .image
            .get()
            .map(|image| image.attributes.url.as_str())
    }

    /// Case-insensitive containment check over title and excerpt.
    ///
    /// Used to narrow an already fetched page on the client side. A blank
    /// query matches every item.
    pub fn matches_text(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.attributes.title.to_lowercase().contains(&needle)
            || self
                .attributes
                .excerpt
                .as_deref()
                .map(|excerpt| excerpt.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }
}

/// Flattened category entry as returned by `/categories`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// CMS-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL identifier.
    pub slug: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Entity<CategoryAttributes>> for Category {
    fn from(entity: &Entity<CategoryAttributes>) -> Self {
        Self {
            id: entity.id,
            name: entity.attributes.name.clone(),
            slug: entity.attributes.slug.clone(),
            description: entity.attributes.description.clone(),
        }
    }
}

impl From<Entity<CategoryAttributes>> for Category {
    fn from(entity: Entity<CategoryAttributes>) -> Self {
        Self {
            id: entity.id,
            name: entity.attributes.name,
            slug: entity.attributes.slug,
            description: entity.attributes.description,
        }
    }
}

/// Flattened tag entry as returned by `/tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// CMS-assigned identifier.
    pub id: u64,
    /// Display name.
    pub name: String,
    /// URL identifier.
    pub slug: String,
}

impl From<&Entity<TagAttributes>> for Tag {
    fn from(entity: &Entity<TagAttributes>) -> Self {
        Self {
            id: entity.id,
            name: entity.attributes.name.clone(),
            slug: entity.attributes.slug.clone(),
        }
    }
}

impl From<Entity<TagAttributes>> for Tag {
    fn from(entity: Entity<TagAttributes>) -> Self {
        Self {
            id: entity.id,
            name: entity.attributes.name,
            slug: entity.attributes.slug,
        }
    }
}

/// The `{ data, meta }` wrapper returned by every CMS read endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Payload.
    pub data: T,
    /// Response metadata; list endpoints carry pagination here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl<T> Envelope<T> {
    /// Wrap a payload without metadata.
    pub fn new(data: T) -> Self {
        Self {
            data,
            meta: None,
        }
    }

    /// Pagination block, if the CMS sent one.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.meta.as_ref().and_then(|meta| meta.pagination.as_ref())
    }
}

/// Envelope metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Page position of a list response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Page position of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub page_size: u32,
    /// Number of pages available.
    pub page_count: u32,
    /// Number of matching records across all pages.
    pub total: u64,
}

impl Pagination {
    /// Whether the block is coherent with a page of `returned` items.
    ///
    /// `page` must lie in `[1, page_count]` and `total` must cover the
    /// returned items. An empty result (`page_count == 0`, `total == 0`) is
    /// coherent whatever page was requested.
    pub fn is_consistent(&self, returned: usize) -> bool {
        let page_in_range = if self.page_count == 0 {
            self.total == 0
        } else {
            (1..=self.page_count).contains(&self.page)
        };
        page_in_range && self.total >= returned as u64
    }
}

/// Federated search hits keyed by collection.
///
/// All four collections are always present; a collection that was not
/// searched or whose request failed maps to an empty sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults {
    hits: BTreeMap<Collection, Vec<ContentItem>>,
}

impl Default for SearchResults {
    fn default() -> Self {
        Self {
            hits: Collection::ALL
                .into_iter()
                .map(|collection| (collection, Vec::new()))
                .collect(),
        }
    }
}

impl SearchResults {
    /// Hits for one collection.
    pub fn get(&self, collection: Collection) -> &[ContentItem] {
        self.hits
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace the hits of one collection.
    pub fn insert(&mut self, collection: Collection, items: Vec<ContentItem>) {
        self.hits.insert(collection, items);
    }

    /// Number of hits across all collections.
    pub fn total(&self) -> usize {
        self.hits.values().map(Vec::len).sum()
    }

    /// Iterate collections in canonical order with their hits.
    pub fn iter(&self) -> impl Iterator<Item = (Collection, &[ContentItem])> {
        self.hits
            .iter()
            .map(|(collection, items)| (*collection, items.as_slice()))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn populated_item() -> serde_json::Value {
        json!({
            "id": 42,
            "attributes": {
                "title": "CMS analysis 2024",
                "content": "Body",
                "excerpt": "Headless CMS market overview",
                "slug": "cms-analysis-2024",
                "publishedAt": "2024-03-01T10:00:00.000Z",
                "createdAt": "2024-02-28T09:00:00.000Z",
                "updatedAt": "2024-03-02T11:30:00.000Z",
                "views": 1200,
                "rating": 4.5,
                "category": {
                    "data": { "id": 3, "attributes": { "name": "Tech", "slug": "tech" } }
                },
                "tags": {
                    "data": [
                        { "id": 1, "attributes": { "name": "Rust", "slug": "rust" } },
                        { "id": 2, "attributes": { "name": "CMS", "slug": "cms" } }
                    ]
                },
                "author": {
                    "data": { "id": 9, "attributes": { "name": "Ada", "email": "ada@example.com" } }
                },
                "image": {
                    "data": {
                        "id": 5,
                        "attributes": { "url": "/uploads/cover.png", "alternativeText": "cover" }
                    }
                }
            }
        })
    }

    #[test]
    fn decodes_populated_relations() {
        let item: ContentItem = serde_json::from_value(populated_item()).expect("decode item");

        assert_eq!(item.id, 42);
        assert_eq!(item.attributes.slug, "cms-analysis-2024");
        assert_eq!(item.attributes.views, Some(1200));
        assert_eq!(item.category().map(|category| category.slug), Some("tech".to_string()));
        assert_eq!(
            item.tags()
                .into_iter()
                .map(|tag| tag.name)
                .collect::<Vec<_>>(),
            vec!["Rust".to_string(), "CMS".to_string()]
        );
        assert_eq!(item.author_name(), Some("Ada"));
        assert_eq!(item.image_url(), Some("/uploads/cover.png"));
        assert!(item.attributes.video.get().is_none());
    }

    #[test]
    fn null_and_missing_relations_decode_as_absent() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": 1,
            "attributes": {
                "title": "Draft",
                "content": "",
                "slug": "draft",
                "publishedAt": null,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z",
                "category": { "data": null },
                "tags": null,
                "author": null
            }
        }))
        .expect("decode draft");

        assert!(item.attributes.published_at.is_none());
        assert!(item.category().is_none());
        assert!(item.tags().is_empty());
        assert!(item.author_name().is_none());
        assert!(item.image_url().is_none());
    }

    #[test]
    fn relation_wrappers_decode_without_default_attributes() {
        let category: Related<CategoryAttributes> = serde_json::from_value(json!({
            "data": { "id": 3, "attributes": { "name": "Tech", "slug": "tech" } }
        }))
        .expect("decode category relation");
        assert_eq!(category.get().map(|entity| entity.id), Some(3));

        let empty: Related<MediaAttributes> =
            serde_json::from_value(json!({})).expect("decode missing data");
        assert!(empty.get().is_none());

        let tags: RelatedMany<TagAttributes> =
            serde_json::from_value(json!({ "data": null })).expect("decode null tags");
        assert!(tags.data.is_empty());
    }

    #[test]
    fn null_body_decodes_as_empty_text() {
        let item: ContentItem = serde_json::from_value(json!({
            "id": 7,
            "attributes": {
                "title": "Placeholder",
                "content": null,
                "slug": "placeholder",
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }
        }))
        .expect("decode item with null body");

        assert_eq!(item.attributes.content, "");
        assert!(item.attributes.published_at.is_none());
    }

    #[test]
    fn collection_parses_case_insensitively() {
        assert_eq!(" Videos ".parse::<Collection>(), Ok(Collection::Videos));
        assert_eq!("news".parse::<Collection>(), Ok(Collection::News));
        assert!("podcasts".parse::<Collection>().is_err());
        assert_eq!(Collection::Stories.to_string(), "stories");
    }

    #[test]
    fn only_videos_populate_the_video_relation() {
        assert_eq!(Collection::Articles.populated_relations(), &[
            "image", "category", "tags", "author"
        ]);
        assert_eq!(Collection::Videos.populated_relations(), &[
            "image", "video", "category", "tags", "author"
        ]);
    }

    #[test]
    fn matches_text_checks_title_and_excerpt() {
        let item: ContentItem = serde_json::from_value(populated_item()).expect("decode item");

        assert!(item.matches_text("analysis"));
        assert!(item.matches_text("HEADLESS"));
        assert!(item.matches_text("   "));
        assert!(!item.matches_text("body"));
    }

    #[test]
    fn pagination_consistency() {
        let page = |page, page_count, total| Pagination {
            page,
            page_size: 10,
            page_count,
            total,
        };

        assert!(page(2, 3, 25).is_consistent(10));
        assert!(page(1, 0, 0).is_consistent(0));
        assert!(!page(4, 3, 25).is_consistent(5));
        assert!(!page(0, 3, 25).is_consistent(5));
        assert!(!page(1, 1, 2).is_consistent(3));
    }

    #[test]
    fn search_results_always_carry_every_collection() {
        let mut results = SearchResults::default();
        let item: ContentItem = serde_json::from_value(populated_item()).expect("decode item");
        results.insert(Collection::Articles, vec![item]);

        let value = serde_json::to_value(&results).expect("encode results");
        assert_eq!(value["news"], json!([]));
        assert_eq!(value["videos"], json!([]));
        assert_eq!(value["articles"][0]["id"], json!(42));
        assert_eq!(results.total(), 1);
        assert!(results.get(Collection::Stories).is_empty());
    }

    #[test]
    fn envelope_without_meta_roundtrips_to_data_only() {
        let envelope = Envelope::new(vec![1, 2, 3]);
        let value = serde_json::to_value(&envelope).expect("encode envelope");
        assert_eq!(value, json!({ "data": [1, 2, 3] }));
        assert!(envelope.pagination().is_none());
    }
}
