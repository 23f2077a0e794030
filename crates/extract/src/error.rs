// ABOUTME: Error types for extraction including ErrorCode enum and ExtractError struct.
// ABOUTME: CosmeticError covers markup-normalization passes whose failures are logged, not raised.

use std::fmt;

use ego_tree::NodeId;

/// Error codes representing different categories of extraction failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Extraction produced no visible text, even with every candidate kept.
    NoArticle,
    /// The document exceeded the configured node budget.
    TooLarge,
    /// The input could not be read as HTML.
    Parse,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::NoArticle => "no article detected",
            ErrorCode::TooLarge => "document too large",
            ErrorCode::Parse => "parse error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wordcount: {}: {}", self.op, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

impl ExtractError {
    /// Create a NoArticle error.
    pub fn no_article(op: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::NoArticle,
            op: op.into(),
            source: None,
        }
    }

    /// Create a TooLarge error.
    pub fn too_large(op: impl Into<String>, nodes: usize, limit: usize) -> Self {
        Self {
            code: ErrorCode::TooLarge,
            op: op.into(),
            source: Some(anyhow::anyhow!("{} nodes exceeds limit of {}", nodes, limit)),
        }
    }

    /// Create a Parse error.
    pub fn parse(op: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self {
            code: ErrorCode::Parse,
            op: op.into(),
            source: Some(source.into()),
        }
    }

    /// Returns true if this is a NoArticle error.
    pub fn is_no_article(&self) -> bool {
        self.code == ErrorCode::NoArticle
    }

    /// Returns true if this is a TooLarge error.
    pub fn is_too_large(&self) -> bool {
        self.code == ErrorCode::TooLarge
    }

    /// Returns true if this is a Parse error.
    pub fn is_parse(&self) -> bool {
        self.code == ErrorCode::Parse
    }
}

/// Failure of a cosmetic cleaning pass. The pipeline logs these and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CosmeticError {
    #[error("node {0:?} is no longer in the tree")]
    MissingNode(NodeId),
    #[error("node {0:?} is not a text node")]
    NotText(NodeId),
}
