//! Derived display fields for blog content
//!
//! Pure functions computing what page renderers show next to the raw
//! content: reading time, absolute image URLs, a long-form publication date,
//! and flattened author/category/tag names.

use chrono::{DateTime, Datelike, NaiveDate};
use serde::Serialize;

use crate::types::{Image, ImageSize, Post};

/// Words per minute used for reading-time estimates
pub const WORDS_PER_MINUTE: usize = 200;

/// Author name shown when a post has no author relation
pub const UNKNOWN_AUTHOR: &str = "Autor desconhecido";

const MONTHS_PT_BR: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Estimated minutes to read `content`, rounded up.
///
/// Empty or whitespace-only content reads in 0 minutes.
pub fn calculate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    u32::try_from(words.div_ceil(WORDS_PER_MINUTE)).unwrap_or(u32::MAX)
}

/// Reading time for a post, preferring a non-zero precomputed value
pub fn post_reading_time(post: &Post) -> u32 {
    match post.reading_time {
        Some(minutes) if minutes > 0 => minutes,
        _ => calculate_reading_time(&post.content),
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}

fn prefix_base(base_url: &str, url: &str) -> String {
    if is_absolute(url) {
        url.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), url)
    }
}

/// Resolve the URL to display for an image.
///
/// Never fails: missing image or URL yields an empty string. Root-relative
/// uploads are served from `base_url` as-is; otherwise the requested
/// format variant is used when present, falling back to the original.
pub fn resolve_image_url(base_url: &str, image: Option<&Image>, size: ImageSize) -> String {
    let Some(image) = image else {
        return String::new();
    };
    let Some(url) = image.url.as_deref().filter(|url| !url.is_empty()) else {
        return String::new();
    };

    if url.starts_with('/') {
        return prefix_base(base_url, url);
    }

    match image.formats.get(size).filter(|format| !format.url.is_empty()) {
        Some(format) => prefix_base(base_url, &format.url),
        None => prefix_base(base_url, url),
    }
}

/// Long-form date such as `15 de janeiro de 2024`.
///
/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates and renders the
/// calendar date as written (no timezone shift). Anything else is returned
/// unchanged.
pub fn format_date(date: &str) -> String {
    let parsed = DateTime::parse_from_rfc3339(date)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(date, "%Y-%m-%d"));

    match parsed {
        Ok(day) => format!(
            "{} de {} de {}",
            day.day(),
            MONTHS_PT_BR[day.month0() as usize],
            day.year()
        ),
        Err(_) => date.to_string(),
    }
}

pub fn category_names(post: &Post) -> Vec<String> {
    post.categories.iter().map(|c| c.name.clone()).collect()
}

pub fn tag_names(post: &Post) -> Vec<String> {
    post.tags.iter().map(|t| t.name.clone()).collect()
}

/// A post together with its display-ready derived fields
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub formatted_date: String,
    pub reading_minutes: u32,
    pub hero_image_url: String,
    pub author_name: String,
    pub author_avatar: Option<String>,
    pub category_names: Vec<String>,
    pub tag_names: Vec<String>,
}

/// Build the display view of a post
pub fn format_post_for_display(base_url: &str, post: Post) -> PostView {
    let author_name = post
        .author
        .as_ref()
        .map(|a| a.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

    let author_avatar = post
        .author
        .as_ref()
        .and_then(|a| a.avatar.as_ref())
        .map(|avatar| resolve_image_url(base_url, Some(avatar), ImageSize::Thumbnail));

    PostView {
        formatted_date: format_date(&post.published_date),
        reading_minutes: post_reading_time(&post),
        hero_image_url: resolve_image_url(base_url, post.hero_image.as_ref(), ImageSize::Large),
        author_name,
        author_avatar,
        category_names: category_names(&post),
        tag_names: tag_names(&post),
        post,
    }
}
