//! Product records
//!
//! - `RawProduct`: the text scraped from one detail page, with empty fields
//!   already folded into `None`
//! - `Product`: the typed record written to the output

mod raw;
mod record;

pub use raw::RawProduct;
pub(crate) use raw::non_empty;
pub use record::{Product, CSV_HEADER};
