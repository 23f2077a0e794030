// ABOUTME: Main library entry point for the wordcount article extractor.
// ABOUTME: Re-exports the public API: extract, Document, Options, Article, ExtractError, ReadingTime.

//! wordcount-extract - main-content extraction and reading-time estimation.
//!
//! Given an HTML page, the extractor scores paragraph containers, picks the
//! most article-like one, pulls in related siblings and cleans the result.
//! The word count of the cleaned content drives a reading-time estimate.
//!
//! # Example
//!
//! ```
//! use wordcount_extract::{extract_html, Options};
//!
//! let html = "<html><body><div><p>Plenty of words here, enough to be scored as a paragraph.</p></div></body></html>";
//! let article = extract_html(html, &Options::default()).unwrap();
//! assert_eq!(article.reading_time.label(), "1 minute");
//! ```

pub mod dom;
pub mod encoding;
pub mod error;
pub mod extract;
pub mod options;
pub mod reading_time;
pub mod result;

pub use crate::dom::tree::{ContentTree, Document};
pub use crate::error::{CosmeticError, ErrorCode, ExtractError};
pub use crate::extract::{extract, extract_bytes, extract_html, grab_article};
pub use crate::options::{Options, OptionsBuilder, Patterns};
pub use crate::reading_time::ReadingTime;
pub use crate::result::{Article, Report, Result};
