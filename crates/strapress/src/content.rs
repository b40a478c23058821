//! Content service: one method per blog operation
//!
//! Critical operations (home page, post by slug, category pages, search)
//! propagate failures so the caller can render an error state. Everything
//! else is auxiliary and degrades to an empty [`Outcome`] (or `false` for
//! the health check), logging the cause instead of failing the page.

use chrono::Utc;

use strapress_core::display::{format_post_for_display, PostView};
use strapress_core::query::Sort;
use strapress_core::requests::{
    featured_posts_request, home_posts_request, into_first, into_post_page,
    recent_posts_request, Outcome, PostPage, PostsParams,
};
use strapress_core::types::{Author, Category, Post, Tag};

use crate::client::StrapiClient;
use crate::error::Error;

/// Wrap a critical failure in a "Failed to load <what>" error
fn critical<T>(what: &'static str, result: Result<T, Error>) -> Result<T, Error> {
    result.map_err(|err| {
        log::error!("Failed to load {what}: {err}");
        Error::Load {
            what,
            source: Box::new(err),
        }
    })
}

/// Turn a non-critical failure into a logged, degraded outcome
fn degrade<T>(what: &'static str, result: Result<T, Error>) -> Outcome<T> {
    if let Err(err) = &result {
        log::warn!("Failed to load {what}: {err}");
    }
    result.into()
}

/// High-level blog operations on top of [`StrapiClient`]
#[derive(Debug, Clone)]
pub struct ContentManager {
    client: StrapiClient,
}

impl ContentManager {
    pub fn new(client: StrapiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &StrapiClient {
        &self.client
    }

    /// Published posts for the home page, newest first
    pub async fn posts_for_home(&self, page: u32, page_size: u32) -> Result<PostPage, Error> {
        let descriptor = home_posts_request(page, page_size, Utc::now());
        let result = self.client.fetch_posts(&descriptor).await.map(into_post_page);
        critical("posts", result)
    }

    /// A single post; [`Error::NotFound`] when no post has this slug
    pub async fn post_by_slug(&self, slug: &str) -> Result<Post, Error> {
        let result = match self.client.get_blog_post_by_slug(slug).await {
            Ok(envelope) => into_first(envelope).ok_or_else(|| Error::NotFound(slug.to_string())),
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            log::error!("Failed to load post {slug}: {err}");
        }
        result
    }

    /// Other posts to suggest below `post_id`
    pub async fn related_posts(&self, post_id: u64, limit: u32) -> Outcome<Vec<Post>> {
        let result = self
            .client
            .get_related_posts(post_id, limit)
            .await
            .map(|envelope| envelope.data);
        degrade("related posts", result)
    }

    pub async fn posts_by_category(&self, category_id: u64, page: u32) -> Result<PostPage, Error> {
        let params = PostsParams {
            page: Some(page),
            sort: Some(Sort::desc("publishedDate")),
            ..Default::default()
        };
        let result = self
            .client
            .get_posts_by_category(category_id, params)
            .await
            .map(into_post_page);
        critical("category posts", result)
    }

    pub async fn search_posts(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<PostPage, Error> {
        let result = self
            .client
            .search_posts(query, page, page_size)
            .await
            .map(into_post_page);
        critical("search results", result)
    }

    pub async fn categories(&self) -> Outcome<Vec<Category>> {
        let result = self.client.get_categories().await.map(|e| e.data);
        degrade("categories", result)
    }

    pub async fn authors(&self) -> Outcome<Vec<Author>> {
        let result = self.client.get_authors().await.map(|e| e.data);
        degrade("authors", result)
    }

    pub async fn tags(&self) -> Outcome<Vec<Tag>> {
        let result = self.client.get_tags().await.map(|e| e.data);
        degrade("tags", result)
    }

    pub async fn featured_posts(&self, limit: u32) -> Outcome<Vec<Post>> {
        let descriptor = featured_posts_request(limit, Utc::now());
        let result = self.client.fetch_posts(&descriptor).await.map(|e| e.data);
        degrade("featured posts", result)
    }

    pub async fn recent_posts(&self, limit: u32) -> Outcome<Vec<Post>> {
        let descriptor = recent_posts_request(limit, Utc::now());
        let result = self.client.fetch_posts(&descriptor).await.map(|e| e.data);
        degrade("recent posts", result)
    }

    /// Display view of a post, with image URLs resolved against this backend
    pub fn format_post_for_display(&self, post: Post) -> PostView {
        format_post_for_display(self.client.base_url(), post)
    }

    /// Whether the backend answers the categories listing
    pub async fn health_check(&self) -> bool {
        match self.client.get_categories().await {
            Ok(_) => true,
            Err(err) => {
                log::warn!("Health check failed: {err}");
                false
            }
        }
    }
}
