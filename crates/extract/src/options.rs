// ABOUTME: Extraction options: regex patterns, thresholds and the unlikely-candidate switch.
// ABOUTME: OptionsBuilder provides a fluent API for constructing Options with custom settings.

use once_cell::sync::Lazy;
use regex::Regex;

static POSITIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)article|body|content|entry|hentry|page|pagination|post|text").unwrap()
});
static NEGATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)combx|comment|contact|foot|footer|footnote|link|media|meta|promo|related|scroll|shoutbox|sponsor|tags|widget").unwrap()
});
static UNLIKELY_CANDIDATES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)combx|comment|disqus|foot|header|menu|meta|nav|rss|shoutbox|sidebar|sponsor")
        .unwrap()
});
static MAYBE_CANDIDATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)and|article|body|column|main|text").unwrap());
static VIDEO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(youtube|vimeo)\.com").unwrap());

/// Words per minute used for the reading-time estimate.
pub const DEFAULT_WORDS_PER_MINUTE: u32 = 250;

/// Class of the marker element whose inline style is left alone.
pub const DEFAULT_STYLED_MARKER_CLASS: &str = "readability-styled";

/// Id given to the wrapper element of the extracted content.
pub const CONTENT_WRAPPER_ID: &str = "readability-content";

/// Regular expressions driving class weighting, candidate suppression and
/// video detection.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// Class/id hints of article content (+25).
    pub positive: Regex,
    /// Class/id hints of boilerplate (-25).
    pub negative: Regex,
    /// Class+id hints of nodes to drop before scoring.
    pub unlikely_candidates: Regex,
    /// Class+id hints that rescue a node from `unlikely_candidates`.
    pub maybe_candidate: Regex,
    /// Markup of embeds worth keeping.
    pub video: Regex,
}

impl Default for Patterns {
    fn default() -> Self {
        Self {
            positive: POSITIVE_RE.clone(),
            negative: NEGATIVE_RE.clone(),
            unlikely_candidates: UNLIKELY_CANDIDATES_RE.clone(),
            maybe_candidate: MAYBE_CANDIDATE_RE.clone(),
            video: VIDEO_RE.clone(),
        }
    }
}

/// Configuration options for content extraction.
#[derive(Debug, Clone)]
pub struct Options {
    /// Drop unlikely candidates (by class/id) before scoring. Off by default.
    pub strip_unlikely_candidates: bool,
    pub words_per_minute: u32,
    /// Reject documents with more nodes than this before doing any work.
    pub max_nodes: Option<usize>,
    /// Paragraphs shorter than this (in chars) are not scored.
    pub min_paragraph_len: usize,
    pub styled_marker_class: String,
    pub patterns: Patterns,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strip_unlikely_candidates: false,
            words_per_minute: DEFAULT_WORDS_PER_MINUTE,
            max_nodes: None,
            min_paragraph_len: 25,
            styled_marker_class: DEFAULT_STYLED_MARKER_CLASS.to_string(),
            patterns: Patterns::default(),
        }
    }
}

impl Options {
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}

/// Builder for constructing Options with custom configuration.
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    opts: Options,
}

impl OptionsBuilder {
    /// Create a new OptionsBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Enable or disable unlikely-candidate suppression.
    pub fn strip_unlikely_candidates(mut self, strip: bool) -> Self {
        self.opts.strip_unlikely_candidates = strip;
        self
    }

    /// Set the reading speed. Zero is replaced by the default.
    pub fn words_per_minute(mut self, wpm: u32) -> Self {
        self.opts.words_per_minute = if wpm == 0 {
            DEFAULT_WORDS_PER_MINUTE
        } else {
            wpm
        };
        self
    }

    /// Set the node budget.
    pub fn max_nodes(mut self, max: usize) -> Self {
        self.opts.max_nodes = Some(max);
        self
    }

    /// Set the minimum scored paragraph length.
    pub fn min_paragraph_len(mut self, len: usize) -> Self {
        self.opts.min_paragraph_len = len;
        self
    }

    /// Set the class that marks elements whose style must be kept.
    pub fn styled_marker_class(mut self, class: impl Into<String>) -> Self {
        self.opts.styled_marker_class = class.into();
        self
    }

    /// Replace the pattern set.
    pub fn patterns(mut self, patterns: Patterns) -> Self {
        self.opts.patterns = patterns;
        self
    }

    /// Build the Options.
    pub fn build(self) -> Options {
        self.opts
    }
}

impl Default for OptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}
