//! Request policies and envelope transformations for blog operations
//!
//! Each content operation is a request descriptor with operation-specific
//! defaults, plus a pure function that unwraps the response envelope. The
//! shell crate only performs the HTTP call in between.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::query::{FilterValue, Filters, Operator, RequestDescriptor, Sort};
use crate::types::{Envelope, OneOrMany, Post};

pub const POSTS_PATH: &str = "/api/blog-posts";
pub const CATEGORIES_PATH: &str = "/api/categories";
pub const AUTHORS_PATH: &str = "/api/authors";
pub const TAGS_PATH: &str = "/api/tags";

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_RELATED_LIMIT: u32 = 3;
pub const DEFAULT_FEATURED_LIMIT: u32 = 5;
pub const DEFAULT_RECENT_LIMIT: u32 = 5;

/// Relations inlined with every post
pub const POST_RELATIONS: [&str; 4] = ["author", "categories", "tags", "heroImage"];

// ============================================================================
// Parameters
// ============================================================================

/// Optional parameters for post collection requests.
///
/// Unset fields take the defaults: page 1, page size 10, newest first,
/// author/categories/tags/hero image populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort: Option<Sort>,
    pub filters: Filters,
    pub populate: Option<Vec<String>>,
}

impl From<PostsParams> for RequestDescriptor {
    fn from(params: PostsParams) -> Self {
        let populate = params
            .populate
            .unwrap_or_else(|| POST_RELATIONS.iter().map(|r| r.to_string()).collect());

        RequestDescriptor::new()
            .paginate(
                params.page.unwrap_or(1),
                params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .sort(params.sort.unwrap_or_else(newest_first))
            .filters(params.filters)
            .populate(populate)
    }
}

fn newest_first() -> Sort {
    Sort::desc("publishedDate")
}

/// ISO-8601 UTC timestamp with millisecond precision (`2024-01-15T10:00:00.000Z`)
pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `publishedDate <= now`
pub fn published_before(now: DateTime<Utc>) -> FilterValue {
    FilterValue::op(Operator::Lte, iso_timestamp(now))
}

// ============================================================================
// Request policies
// ============================================================================

/// Generic post listing with defaults applied
pub fn posts_request(params: PostsParams) -> RequestDescriptor {
    params.into()
}

/// Published posts for the home page, newest first
pub fn home_posts_request(page: u32, page_size: u32, now: DateTime<Utc>) -> RequestDescriptor {
    posts_request(PostsParams {
        page: Some(page),
        page_size: Some(page_size),
        sort: Some(newest_first()),
        filters: Filters::new().with("publishedDate", published_before(now)),
        ..Default::default()
    })
}

/// Exact-match lookup by slug
pub fn post_by_slug_request(slug: &str) -> RequestDescriptor {
    RequestDescriptor::new()
        .filter("slug", FilterValue::op(Operator::Eq, slug))
        .populate(POST_RELATIONS)
}

/// Posts in a category; the category filter is added to the caller's filters
pub fn posts_by_category_request(category_id: u64, params: PostsParams) -> RequestDescriptor {
    let mut params = params;
    params.filters.insert(
        "categories",
        Filters::new().with("id", FilterValue::op(Operator::Eq, category_id)),
    );
    posts_request(params)
}

/// Other posts, excluding the current one; `limit` caps the page size
pub fn related_posts_request(current_post_id: u64, limit: u32) -> RequestDescriptor {
    posts_request(PostsParams {
        page_size: Some(limit),
        filters: Filters::new().with("id", FilterValue::op(Operator::Ne, current_post_id)),
        ..Default::default()
    })
}

/// Case-insensitive substring search across title OR description
pub fn search_posts_request(query: &str, page: u32, page_size: u32) -> RequestDescriptor {
    let matches = |field: &str| {
        Filters::new().with(field, FilterValue::op(Operator::Containsi, query))
    };

    RequestDescriptor::new()
        .paginate(page, page_size)
        .filter(Operator::Or, vec![matches("title"), matches("description")])
        .populate(POST_RELATIONS)
}

/// Featured, already published posts
pub fn featured_posts_request(limit: u32, now: DateTime<Utc>) -> RequestDescriptor {
    posts_request(PostsParams {
        page_size: Some(limit),
        sort: Some(newest_first()),
        filters: Filters::new()
            .with("featured", true)
            .with("publishedDate", published_before(now)),
        ..Default::default()
    })
}

/// Latest published posts
pub fn recent_posts_request(limit: u32, now: DateTime<Utc>) -> RequestDescriptor {
    posts_request(PostsParams {
        page_size: Some(limit),
        sort: Some(newest_first()),
        filters: Filters::new().with("publishedDate", published_before(now)),
        ..Default::default()
    })
}

pub fn categories_request() -> RequestDescriptor {
    RequestDescriptor::new().sort(Sort::asc("name"))
}

pub fn authors_request() -> RequestDescriptor {
    RequestDescriptor::new()
        .sort(Sort::asc("name"))
        .populate(["avatar"])
}

pub fn tags_request() -> RequestDescriptor {
    RequestDescriptor::new().sort(Sort::asc("name"))
}

// ============================================================================
// Envelope transformations
// ============================================================================

/// Pagination summary for a page of posts
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: u32,
    pub total_pages: u32,
    pub total_posts: u64,
}

impl Default for PageInfo {
    fn default() -> Self {
        Self {
            page: 1,
            total_pages: 1,
            total_posts: 0,
        }
    }
}

/// One page of posts with its pagination summary
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub pagination: PageInfo,
}

/// Summarize envelope pagination.
///
/// Absent fields (and zero page / page count) default to page 1 of 1 with
/// 0 total posts.
pub fn page_info<T>(envelope: &Envelope<T>) -> PageInfo {
    let defaults = PageInfo::default();
    let Some(pagination) = envelope.meta.pagination.as_ref() else {
        return defaults;
    };

    PageInfo {
        page: pagination.page.filter(|&p| p > 0).unwrap_or(defaults.page),
        total_pages: pagination
            .page_count
            .filter(|&p| p > 0)
            .unwrap_or(defaults.total_pages),
        total_posts: pagination.total.unwrap_or(defaults.total_posts),
    }
}

pub fn into_post_page(envelope: Envelope<Vec<Post>>) -> PostPage {
    let pagination = page_info(&envelope);
    PostPage {
        posts: envelope.data,
        pagination,
    }
}

/// First item of a lookup response, `None` when nothing matched
pub fn into_first<T>(envelope: Envelope<Option<OneOrMany<T>>>) -> Option<T> {
    envelope.data.and_then(OneOrMany::into_first)
}

// ============================================================================
// Degraded results
// ============================================================================

/// Result of a non-critical operation.
///
/// Auxiliary data (related posts, taxonomies, featured lists) must never
/// break a page render, so failures surface as `Degraded` with the cause
/// instead of an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded(String),
}

impl<T> Outcome<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded(_))
    }

    /// Cause of the degradation, if any
    pub fn cause(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded(cause) => Some(cause),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(value) => Outcome::Ok(f(value)),
            Outcome::Degraded(cause) => Outcome::Degraded(cause),
        }
    }
}

impl<T: Default> Outcome<T> {
    /// The value, or its empty default when degraded
    pub fn into_value(self) -> T {
        match self {
            Outcome::Ok(value) => value,
            Outcome::Degraded(_) => T::default(),
        }
    }
}

impl<T, E: std::fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Ok(value),
            Err(err) => Outcome::Degraded(err.to_string()),
        }
    }
}
