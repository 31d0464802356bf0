//! Unified Result Model
//!
//! Every command maps its output to this model before rendering, so bullets,
//! summaries, posts and drafts share one jsonl/json/md/raw surface.

use serde::{Deserialize, Serialize};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Bullet,
    Summary,
    Normalized,
    Similarity,
    Tags,
    Relevance,
    Post,
    Draft,
    Error,
}

/// Confidence level of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Source mode indicating how the result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Pulled from list markers in model output
    Extracted,
    /// Synthesized from summary sentences as seed bullets
    Synthesized,
    /// Synthesized after dedupe emptied the list
    Backstop,
    /// Computed from the input text (summary, normalize, scores)
    Derived,
    /// Rendered output (posts, drafts)
    Rendered,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Meta {
    /// Word count of the text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<usize>,

    /// Content hash (SHA1 hex)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    /// Whether the input or text was truncated
    #[serde(default)]
    pub truncated: bool,
}

/// Error information for a result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    pub code: String,
    pub message: String,
}

impl ItemError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// The unified result item that all commands must produce
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultItem {
    /// The kind of this result
    pub kind: Kind,

    /// Input or output file this item belongs to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Position within its list (bullets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// The text payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Structured data payload (scores, slugs, tag lists)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// Confidence level
    pub confidence: Confidence,

    /// How this result was obtained
    pub source_mode: SourceMode,

    /// Metadata
    pub meta: Meta,

    /// Errors (if any)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ItemError>,
}

impl ResultItem {
    fn base(kind: Kind, source_mode: SourceMode) -> Self {
        Self {
            kind,
            path: None,
            index: None,
            text: None,
            data: None,
            confidence: Confidence::High,
            source_mode,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    /// Create a bullet result; confidence follows the stage that produced it
    pub fn bullet(text: impl Into<String>, index: usize, source_mode: SourceMode) -> Self {
        let text = text.into();
        let confidence = match source_mode {
            SourceMode::Extracted => Confidence::High,
            SourceMode::Synthesized => Confidence::Medium,
            _ => Confidence::Low,
        };
        let mut item = Self::base(Kind::Bullet, source_mode);
        item.meta.words = Some(text.split_whitespace().count());
        item.text = Some(text);
        item.index = Some(index);
        item.confidence = confidence;
        item
    }

    /// Create a summary result
    pub fn summary(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut item = Self::base(Kind::Summary, SourceMode::Derived);
        item.meta.words = Some(text.split_whitespace().count());
        item.text = Some(text);
        item
    }

    /// Create a derived result of any kind carrying text
    pub fn derived(kind: Kind, text: impl Into<String>) -> Self {
        let mut item = Self::base(kind, SourceMode::Derived);
        item.text = Some(text.into());
        item
    }

    /// Create a rendered result (post or draft)
    pub fn rendered(kind: Kind, text: impl Into<String>) -> Self {
        let mut item = Self::base(kind, SourceMode::Rendered);
        item.text = Some(text.into());
        item
    }

    /// Create a new error result
    pub fn error(error: ItemError) -> Self {
        let mut item = Self::base(Kind::Error, SourceMode::Derived);
        item.errors.push(error);
        item
    }

    /// Set the path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set metadata
    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    /// Set confidence level
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set structured data payload
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Result set containing multiple result items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = ResultItem>) {
        self.items.extend(items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
