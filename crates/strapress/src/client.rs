//! HTTP transport for the Strapi REST API
//!
//! This module handles I/O only: it renders request descriptors from the core
//! crate into URLs, sends them with the configured credentials, and decodes
//! the `{ data, meta }` envelope. Non-2xx responses become
//! [`Error::Transport`]; nothing is retried.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;

use strapress_core::display::resolve_image_url;
use strapress_core::query::RequestDescriptor;
use strapress_core::requests::{
    authors_request, categories_request, post_by_slug_request, posts_by_category_request,
    posts_request, related_posts_request, search_posts_request, tags_request, PostsParams,
    AUTHORS_PATH, CATEGORIES_PATH, POSTS_PATH, TAGS_PATH,
};
use strapress_core::types::{Author, Category, Envelope, Image, ImageSize, OneOrMany, Post, Tag};

use crate::config::StrapiConfig;
use crate::error::Error;

/// Per-request transport options
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    /// Merged over the defaults; these win on conflict
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
        }
    }
}

/// Build request headers: JSON content type, bearer token when configured,
/// then caller-supplied headers replacing any default with the same name.
pub fn build_headers(api_token: &str, overrides: &HeaderMap) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if !api_token.is_empty() {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_token}"))
                .map_err(|e| Error::InvalidHeader(e.to_string()))?,
        );
    }

    headers.extend(overrides.clone());
    Ok(headers)
}

/// Typed client for the Strapi REST API.
///
/// Cheap to clone and safe to share between tasks: the configuration is
/// fixed at construction and `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct StrapiClient {
    base_url: String,
    api_token: String,
    http: reqwest::Client,
}

impl StrapiClient {
    pub fn new(config: &StrapiConfig) -> Result<Self, Error> {
        // Reject tokens that cannot be sent as a header up front
        build_headers(&config.api_token, &HeaderMap::new())?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fully-qualified URL for a request
    pub fn url(&self, path: &str, descriptor: &RequestDescriptor) -> String {
        descriptor.build_url(&self.base_url, path)
    }

    /// GET `path` with the given descriptor and decode the JSON body
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        descriptor: &RequestDescriptor,
    ) -> Result<T, Error> {
        self.request_with(path, descriptor, RequestOptions::default())
            .await
    }

    pub async fn request_with<T: DeserializeOwned>(
        &self,
        path: &str,
        descriptor: &RequestDescriptor,
        options: RequestOptions,
    ) -> Result<T, Error> {
        let url = self.url(path, descriptor);
        let headers = build_headers(&self.api_token, &options.headers)?;

        log::debug!("{} {}", options.method, url);

        let response = self
            .http
            .request(options.method, &url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| Error::Network(format!("Failed to send request to Strapi: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Transport {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Decode(e.to_string()))
    }

    /// Posts matching an arbitrary descriptor
    pub async fn fetch_posts(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Envelope<Vec<Post>>, Error> {
        self.request(POSTS_PATH, descriptor).await
    }

    /// Blog posts with pagination and filters; unset params take the defaults
    pub async fn get_blog_posts(&self, params: PostsParams) -> Result<Envelope<Vec<Post>>, Error> {
        self.fetch_posts(&posts_request(params)).await
    }

    pub async fn get_blog_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<Envelope<Option<OneOrMany<Post>>>, Error> {
        self.request(POSTS_PATH, &post_by_slug_request(slug)).await
    }

    pub async fn get_posts_by_category(
        &self,
        category_id: u64,
        params: PostsParams,
    ) -> Result<Envelope<Vec<Post>>, Error> {
        self.fetch_posts(&posts_by_category_request(category_id, params))
            .await
    }

    pub async fn get_related_posts(
        &self,
        current_post_id: u64,
        limit: u32,
    ) -> Result<Envelope<Vec<Post>>, Error> {
        self.fetch_posts(&related_posts_request(current_post_id, limit))
            .await
    }

    pub async fn search_posts(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Envelope<Vec<Post>>, Error> {
        self.fetch_posts(&search_posts_request(query, page, page_size))
            .await
    }

    pub async fn get_categories(&self) -> Result<Envelope<Vec<Category>>, Error> {
        self.request(CATEGORIES_PATH, &categories_request()).await
    }

    pub async fn get_authors(&self) -> Result<Envelope<Vec<Author>>, Error> {
        self.request(AUTHORS_PATH, &authors_request()).await
    }

    pub async fn get_tags(&self) -> Result<Envelope<Vec<Tag>>, Error> {
        self.request(TAGS_PATH, &tags_request()).await
    }

    /// Display URL for an image served by this Strapi instance
    pub fn optimized_image_url(&self, image: Option<&Image>, size: ImageSize) -> String {
        resolve_image_url(&self.base_url, image, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderName;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: &str) -> StrapiClient {
        let config = StrapiConfig {
            base_url: server.uri(),
            api_token: token.to_string(),
            ..Default::default()
        };
        StrapiClient::new(&config).unwrap()
    }

    fn posts_body() -> serde_json::Value {
        json!({
            "data": [
                { "id": 1, "title": "First", "slug": "first" },
                { "id": 2, "title": "Second", "slug": "second" }
            ],
            "meta": { "pagination": { "page": 1, "pageSize": 10, "pageCount": 1, "total": 2 } }
        })
    }

    #[test]
    fn test_build_headers_defaults() {
        let headers = build_headers("", &HeaderMap::new()).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers.get(AUTHORIZATION).is_none());

        let headers = build_headers("abc", &HeaderMap::new()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_build_headers_caller_wins() {
        let mut overrides = HeaderMap::new();
        overrides.insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));
        overrides.insert(
            HeaderName::from_static("x-preview"),
            HeaderValue::from_static("1"),
        );

        let headers = build_headers("abc", &overrides).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer other");
        assert_eq!(headers.get_all(AUTHORIZATION).iter().count(), 1);
        assert_eq!(headers.get("x-preview").unwrap(), "1");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let config = StrapiConfig {
            api_token: "bad\ntoken".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            StrapiClient::new(&config),
            Err(Error::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_url_trims_base() {
        let config = StrapiConfig {
            base_url: "http://cms.local/".to_string(),
            ..Default::default()
        };
        let client = StrapiClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://cms.local");
        assert_eq!(
            client.url(TAGS_PATH, &tags_request()),
            "http://cms.local/api/tags?sort=name:asc"
        );
    }

    #[tokio::test]
    async fn test_get_blog_posts_sends_bearer_and_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .and(header("authorization", "Bearer secret"))
            .and(header("content-type", "application/json"))
            .and(query_param("pagination[page]", "1"))
            .and(query_param("pagination[pageSize]", "10"))
            .and(query_param("sort", "publishedDate:desc"))
            .and(query_param("populate", "author,categories,tags,heroImage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts_body()))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server, "secret")
            .get_blog_posts(PostsParams::default())
            .await
            .unwrap();

        assert_eq!(envelope.data.len(), 2);
        assert_eq!(envelope.data[1].slug, "second");
        assert_eq!(envelope.meta.pagination.unwrap().total, Some(2));
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&server)
            .await;

        client_for(&server, "").get_tags().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
        assert_eq!(requests[0].url.query(), Some("sort=name:asc"));
    }

    #[tokio::test]
    async fn test_caller_header_overrides_bearer_on_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .and(header("authorization", "Bearer preview"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer preview"));
        let options = RequestOptions {
            headers,
            ..Default::default()
        };

        let envelope: Envelope<Vec<Category>> = client_for(&server, "secret")
            .request_with(CATEGORIES_PATH, &categories_request(), options)
            .await
            .unwrap();
        assert!(envelope.data.is_empty());
    }

    #[tokio::test]
    async fn test_other_methods() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tags/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": 4 } })))
            .expect(1)
            .mount(&server)
            .await;

        let options = RequestOptions {
            method: Method::DELETE,
            ..Default::default()
        };
        let envelope: Envelope<Tag> = client_for(&server, "")
            .request_with("/api/tags/4", &RequestDescriptor::new(), options)
            .await
            .unwrap();
        assert_eq!(envelope.data.id, 4);
    }

    #[tokio::test]
    async fn test_non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/authors"))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server, "").get_authors().await.unwrap_err();

        match &err {
            Error::Transport {
                status,
                status_text,
            } => {
                assert_eq!(*status, 403);
                assert_eq!(status_text, "Forbidden");
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(err.to_string(), "Strapi API error: 403 Forbidden");
    }

    #[tokio::test]
    async fn test_invalid_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, "").get_tags().await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let config = StrapiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Default::default()
        };
        let err = StrapiClient::new(&config)
            .unwrap()
            .get_tags()
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_get_blog_post_by_slug_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .and(query_param("filters[slug][$eq]", "hello world"))
            .and(query_param("populate", "author,categories,tags,heroImage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{ "id": 3, "slug": "hello world" }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let envelope = client_for(&server, "")
            .get_blog_post_by_slug("hello world")
            .await
            .unwrap();
        assert_eq!(envelope.data.unwrap().into_first().unwrap().id, 3);
    }

    #[tokio::test]
    async fn test_get_posts_by_category_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/blog-posts"))
            .and(query_param("filters[categories][id][$eq]", "7"))
            .and(query_param("pagination[page]", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(posts_body()))
            .expect(1)
            .mount(&server)
            .await;

        let params = PostsParams {
            page: Some(2),
            ..Default::default()
        };
        let envelope = client_for(&server, "")
            .get_posts_by_category(7, params)
            .await
            .unwrap();
        assert_eq!(envelope.data.len(), 2);
    }

    #[test]
    fn test_optimized_image_url() {
        let client = StrapiClient::new(&StrapiConfig::default()).unwrap();
        let image = Image {
            url: Some("/uploads/a.png".to_string()),
            ..Default::default()
        };
        assert_eq!(
            client.optimized_image_url(Some(&image), ImageSize::Medium),
            "http://localhost:1337/uploads/a.png"
        );
        assert_eq!(client.optimized_image_url(None, ImageSize::Medium), "");
    }
}
