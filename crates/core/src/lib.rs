//! Core library for strapress
//!
//! This crate implements the **Functional Core** of the strapress client,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`strapress_core`** (this crate): Pure transformation functions with zero I/O
//! - **`strapress`**: HTTP transport, the content service, and the CLI (the Imperative Shell)
//!
//! Everything here is deterministic: request policies take the current time
//! as an argument, and response handling works on already-decoded envelopes,
//! so the whole crate is tested with fixture data and no HTTP mocking.
//!
//! # Module Organization
//!
//! - [`query`]: Request descriptors, the filter tree, and query-string serialization
//! - [`types`]: Strapi content models and the `{ data, meta }` envelope
//! - [`requests`]: Per-operation request defaults and envelope unwrapping
//! - [`display`]: Derived display fields (reading time, image URLs, dates)
//!
//! # Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use strapress_core::requests::home_posts_request;
//!
//! let url = home_posts_request(2, 5, Utc::now())
//!     .build_url("http://localhost:1337", "/api/blog-posts");
//!
//! assert!(url.contains("pagination[page]=2&pagination[pageSize]=5"));
//! ```

pub mod display;
pub mod query;
pub mod requests;
pub mod types;
