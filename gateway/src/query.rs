//! Strapi query-string grammar.
//!
//! The CMS reads list parameters from bracketed path keys such as
//! `pagination[page]`, `filters[$or][0][title][$containsi]` and
//! `populate[0]`. [`CmsQuery`] collects those parameters and always renders
//! them in the same order (pagination, sort, filters, population) no matter
//! in which order they were set.

use std::{fmt, str::FromStr};

use content_hub_shared::Collection;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Page size used by federated search requests.
pub const SEARCH_PAGE_SIZE: u32 = 10;

/// Fields matched by federated search, in `$or` index order.
pub const SEARCH_FIELDS: [&str; 3] = ["title", "content", "excerpt"];

/// Bytes left literal in keys: unreserved characters plus the bracket-path
/// punctuation.
const KEY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'[')
    .remove(b']')
    .remove(b'$');

/// Bytes left literal in values: unreserved characters plus the separators
/// used by `sort` and `populate` values.
const VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b':')
    .remove(b',')
    .remove(b'*');

/// Common `sort` values. The CMS accepts any `field:asc` / `field:desc`.
pub mod sort {
    /// Most recently published first.
    pub const NEWEST: &str = "publishedAt:desc";
    /// Oldest publication first.
    pub const OLDEST: &str = "publishedAt:asc";
    /// Highest view count first.
    pub const MOST_VIEWED: &str = "views:desc";
    /// Highest rating first.
    pub const TOP_RATED: &str = "rating:desc";

    /// `field:asc`.
    pub fn ascending(field: &str) -> String {
        format!("{field}:asc")
    }

    /// `field:desc`.
    pub fn descending(field: &str) -> String {
        format!("{field}:desc")
    }
}

/// Comparison operators understood by the CMS filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// `$eq`
    Eq,
    /// `$ne`
    Ne,
    /// `$lt`
    Lt,
    /// `$lte`
    Lte,
    /// `$gt`
    Gt,
    /// `$gte`
    Gte,
    /// `$contains`
    Contains,
    /// `$containsi` (case-insensitive)
    Containsi,
    /// `$notContains`
    NotContains,
    /// `$startsWith`
    StartsWith,
    /// `$endsWith`
    EndsWith,
}

impl FilterOperator {
    const ALL: [FilterOperator; 11] = [
        FilterOperator::Eq,
        FilterOperator::Ne,
        FilterOperator::Lt,
        FilterOperator::Lte,
        FilterOperator::Gt,
        FilterOperator::Gte,
        FilterOperator::Contains,
        FilterOperator::Containsi,
        FilterOperator::NotContains,
        FilterOperator::StartsWith,
        FilterOperator::EndsWith,
    ];

    /// Operator as written inside the filter key, e.g. `$eq`.
    pub fn as_str(self) -> &'static str {
        match self {
            FilterOperator::Eq => "$eq",
            FilterOperator::Ne => "$ne",
            FilterOperator::Lt => "$lt",
            FilterOperator::Lte => "$lte",
            FilterOperator::Gt => "$gt",
            FilterOperator::Gte => "$gte",
            FilterOperator::Contains => "$contains",
            FilterOperator::Containsi => "$containsi",
            FilterOperator::NotContains => "$notContains",
            FilterOperator::StartsWith => "$startsWith",
            FilterOperator::EndsWith => "$endsWith",
        }
    }
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterOperator {
    type Err = String;

    /// Accepts the operator with or without its leading `$`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().trim_start_matches('$');
        FilterOperator::ALL
            .into_iter()
            .find(|operator| operator.as_str()[1..].eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown filter operator `{value}`"))
    }
}

/// One `filters[<field>][<operator>]=<value>` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Attribute name.
    pub field: String,
    /// Comparison.
    pub operator: FilterOperator,
    /// Right-hand side, sent as a string.
    pub value: String,
}

impl FieldFilter {
    /// Build a condition.
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Equality condition.
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Eq, value)
    }
}

impl FromStr for FieldFilter {
    type Err = String;

    /// Parses `field:operator:value`; the value may itself contain `:`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.splitn(3, ':');
        let field = parts.next().map(str::trim).unwrap_or_default();
        let (Some(operator), Some(rhs)) = (parts.next(), parts.next()) else {
            return Err(format!("filter `{value}` must look like field:operator:value"));
        };
        if field.is_empty() {
            return Err(format!("filter `{value}` has an empty field name"));
        }
        Ok(Self::new(field, operator.parse()?, rhs))
    }
}

/// Caller-facing list parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
    /// Verbatim `sort` value such as `rating:desc`; see [`sort`].
    pub sort: Option<String>,
    /// Conditions applied in order.
    pub filters: Vec<FieldFilter>,
}

impl ListParams {
    /// Request a page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Request a page size.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Sort by a verbatim `field:direction` value.
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Add a filter condition.
    pub fn filter(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Populate {
    #[default]
    Nothing,
    All,
    Relations(Vec<String>),
}

/// Ordered set of CMS query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CmsQuery {
    page: Option<u32>,
    page_size: Option<u32>,
    sort: Option<String>,
    filters: Vec<(String, String)>,
    or_conditions: usize,
    populate: Populate,
}

impl CmsQuery {
    /// An empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `pagination[page]`.
    pub fn page(&mut self, page: u32) -> &mut Self {
        self.page = Some(page);
        self
    }

    /// Set `pagination[pageSize]`.
    pub fn page_size(&mut self, page_size: u32) -> &mut Self {
        self.page_size = Some(page_size);
        self
    }

    /// Set `sort`, passed through verbatim.
    pub fn sort(&mut self, sort: impl Into<String>) -> &mut Self {
        self.sort = Some(sort.into());
        self
    }

    /// Append `filters[<field>][<operator>]=<value>`.
    pub fn filter(&mut self, filter: &FieldFilter) -> &mut Self {
        self.filters.push((
            format!("filters[{}][{}]", filter.field, filter.operator),
            filter.value.clone(),
        ));
        self
    }

    /// Append one `filters[$or][<n>][<field>][<operator>]=<value>` entry per
    /// field. Indices continue from any `$or` entries already present.
    pub fn any_of(&mut self, fields: &[&str], operator: FilterOperator, value: &str) -> &mut Self {
        for field in fields {
            self.filters.push((
                format!("filters[$or][{}][{}][{}]", self.or_conditions, field, operator),
                value.to_string(),
            ));
            self.or_conditions += 1;
        }
        self
    }

    /// Inline the named relations as `populate[0]`, `populate[1]`, ...
    pub fn populate<S: AsRef<str>>(&mut self, relations: &[S]) -> &mut Self {
        self.populate = Populate::Relations(
            relations
                .iter()
                .map(|relation| relation.as_ref().to_string())
                .collect(),
        );
        self
    }

    /// Inline every relation (`populate=*`).
    pub fn populate_all(&mut self) -> &mut Self {
        self.populate = Populate::All;
        self
    }

    /// Parameters in wire order, unencoded.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("pagination[page]".to_string(), page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pagination[pageSize]".to_string(), page_size.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        pairs.extend(self.filters.iter().cloned());
        match &self.populate {
            Populate::Nothing => {},
            Populate::All => pairs.push(("populate".to_string(), "*".to_string())),
            Populate::Relations(relations) => {
                pairs.extend(
                    relations
                        .iter()
                        .enumerate()
                        .map(|(index, relation)| (format!("populate[{index}]"), relation.clone())),
                );
            },
        }
        pairs
    }

    /// Whether no parameter is set.
    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }

    /// Percent-encoded `key=value&...` string without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, KEY_SET),
                    utf8_percent_encode(value, VALUE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for CmsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Query for one page of a collection with its card relations inlined.
pub fn list_query(collection: Collection, params: &ListParams) -> CmsQuery {
    let mut query = CmsQuery::new();
    // Pages are 1-based; zero means "let the CMS decide".
    if let Some(page) = params.page.filter(|page| *page > 0) {
        query.page(page);
    }
    if let Some(page_size) = params.page_size.filter(|page_size| *page_size > 0) {
        query.page_size(page_size);
    }
    if let Some(sort) = &params.sort {
        query.sort(sort.as_str());
    }
    for filter in &params.filters {
        query.filter(filter);
    }
    query.populate(collection.populated_relations());
    query
}

/// Query for the detail record behind `slug`, fully populated.
pub fn slug_query(slug: &str) -> CmsQuery {
    let mut query = CmsQuery::new();
    query.filter(&FieldFilter::equals("slug", slug)).populate_all();
    query
}

/// Query matching `text` case-insensitively in title, content or excerpt.
pub fn search_query(text: &str) -> CmsQuery {
    let mut query = CmsQuery::new();
    query
        .any_of(&SEARCH_FIELDS, FilterOperator::Containsi, text)
        .page_size(SEARCH_PAGE_SIZE)
        .populate_all();
    query
}
