//! Wire and data model shared by the content hub crates.
//!
//! Everything here mirrors the JSON shapes served by the Strapi REST API:
//! content items with their populated relations, the `{ data, meta }`
//! envelope, taxonomy entries, telemetry payloads and aggregate stats.

pub mod content;
pub mod telemetry;

pub use content::{
    AuthorAttributes, Category, CategoryAttributes, Collection, ContentAttributes, ContentItem,
    Entity, Envelope, MediaAttributes, Meta, Pagination, Related, RelatedMany, SearchResults, Tag,
    TagAttributes, UnknownCollection,
};
pub use telemetry::{
    ContentStats, SessionAction, SessionActionKind, SessionActionRecord, UnknownSessionActionKind,
};
