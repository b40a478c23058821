//! Strapi content client for the blog front-end
//!
//! The Imperative Shell around [`strapress_core`]: HTTP transport
//! ([`client`]), the content service page renderers call ([`content`]),
//! configuration and errors.
//!
//! Construct the service once at startup and share it:
//!
//! ```rust,no_run
//! use strapress::{ContentManager, StrapiClient, StrapiConfig};
//!
//! # async fn render() -> Result<(), strapress::Error> {
//! let config = StrapiConfig::from_env();
//! let content = ContentManager::new(StrapiClient::new(&config)?);
//!
//! let home = content.posts_for_home(1, 10).await?;
//! let categories = content.categories().await.into_value();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod content;
pub mod error;

pub use client::{RequestOptions, StrapiClient};
pub use config::StrapiConfig;
pub use content::ContentManager;
pub use error::Error;
