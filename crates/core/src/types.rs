//! Typed Strapi content models and the response envelope
//!
//! Every backend response is wrapped in `{ data, meta }`. Models are decoded
//! leniently: missing or `null` strings and lists fall back to empty values
//! so one sparse record does not fail a whole page. A missing `id` decodes
//! as 0.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat `null` the same as a missing field
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Envelope
// ============================================================================

/// `{ data, meta }` wrapper used by every Strapi response
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Envelope<T> {
    pub data: T,
    #[serde(default, deserialize_with = "nullable")]
    pub meta: Meta,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination metadata as reported by the backend
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Payload that may be a single item or a sequence.
///
/// Collection endpoints filtered down to one record still answer with an
/// array, so single-item lookups accept both shapes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// First item, if any
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().next(),
            OneOrMany::One(item) => Some(item),
        }
    }
}

// ============================================================================
// Media
// ============================================================================

/// Named image size variants generated by the upload plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    Thumbnail,
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Thumbnail => "thumbnail",
            ImageSize::Small => "small",
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
        }
    }
}

impl std::str::FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumbnail" => Ok(ImageSize::Thumbnail),
            "small" => Ok(ImageSize::Small),
            "medium" => Ok(ImageSize::Medium),
            "large" => Ok(ImageSize::Large),
            other => Err(format!(
                "Invalid image size: {other}. Valid sizes: thumbnail, small, medium, large"
            )),
        }
    }
}

/// A resized copy of an image
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ImageFormat {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub size: Option<f64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct ImageFormats {
    #[serde(default)]
    pub thumbnail: Option<ImageFormat>,
    #[serde(default)]
    pub small: Option<ImageFormat>,
    #[serde(default)]
    pub medium: Option<ImageFormat>,
    #[serde(default)]
    pub large: Option<ImageFormat>,
}

impl ImageFormats {
    pub fn get(&self, size: ImageSize) -> Option<&ImageFormat> {
        match size {
            ImageSize::Thumbnail => self.thumbnail.as_ref(),
            ImageSize::Small => self.small.as_ref(),
            ImageSize::Medium => self.medium.as_ref(),
            ImageSize::Large => self.large.as_ref(),
        }
    }
}

/// Uploaded media asset
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default)]
    pub id: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default, deserialize_with = "nullable")]
    pub formats: ImageFormats,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

// ============================================================================
// Content types
// ============================================================================

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub bio: String,
    #[serde(default)]
    pub avatar: Option<Image>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
}

/// Blog post as returned by `/api/blog-posts`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, deserialize_with = "nullable")]
    pub content: String,
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    #[serde(default, deserialize_with = "nullable")]
    pub published_date: String,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub featured: bool,
    #[serde(default)]
    pub reading_time: Option<u32>,
    #[serde(default)]
    pub hero_image: Option<Image>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "nullable")]
    pub categories: Vec<Category>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<Tag>,
}
