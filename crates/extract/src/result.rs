// ABOUTME: Article struct holding the extracted content tree, word count and reading time.
// ABOUTME: Report is the serializable summary handed to presentation layers.

use serde::Serialize;

use crate::dom::text::inner_text;
use crate::dom::tree::ContentTree;
use crate::error::ExtractError;
use crate::reading_time::ReadingTime;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// The extracted article.
#[derive(Debug, Clone)]
pub struct Article {
    pub content: ContentTree,
    pub word_count: usize,
    pub reading_time: ReadingTime,
}

impl Article {
    /// Serialized content, wrapper included.
    pub fn html(&self) -> String {
        self.content.html()
    }

    /// Whitespace-normalized text of the content.
    pub fn text(&self) -> String {
        inner_text(&self.content.doc, self.content.root, true)
    }

    /// Summary suitable for JSON output.
    pub fn report(&self, include_content: bool) -> Report {
        Report {
            word_count: self.word_count,
            minutes: self.reading_time.minutes,
            label: self.reading_time.label(),
            content: include_content.then(|| self.html()),
        }
    }
}

/// Serializable view of an [`Article`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub word_count: usize,
    pub minutes: u64,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}
