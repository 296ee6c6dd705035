//! URL handling module for Shelf-Scout
//!
//! This module provides host extraction, host-glob matching for politeness rules,
//! listing-page URL construction and relative link resolution.

mod domain;
mod matcher;
mod paging;

pub use domain::extract_domain;
pub use matcher::matches_glob;
pub use paging::{listing_base_url, listing_page_url, resolve_link};
