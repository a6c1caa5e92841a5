//! Decision options - the candidates a user is choosing between.

use serde::{Deserialize, Serialize};

/// Which kind of content an option carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Text,
    Image,
}

/// One candidate option.
///
/// Image options hold a base64 data URL. The raw bytes of the uploaded file
/// are kept alongside while the session is in memory but are never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DecisionOption {
    Text {
        content: String,
    },
    Image {
        content: String,
        #[serde(skip)]
        raw: Option<Vec<u8>>,
    },
}

impl DecisionOption {
    /// Creates a text option.
    pub fn text(content: impl Into<String>) -> Self {
        DecisionOption::Text {
            content: content.into(),
        }
    }

    /// Creates an empty text option.
    pub fn empty_text() -> Self {
        Self::text(String::new())
    }

    /// Creates an image option from a data URL and the bytes it was encoded from.
    pub fn image(data_url: impl Into<String>, raw: Option<Vec<u8>>) -> Self {
        DecisionOption::Image {
            content: data_url.into(),
            raw,
        }
    }

    /// Creates an empty image slot.
    pub fn empty_image() -> Self {
        Self::image(String::new(), None)
    }

    /// Creates an empty option of the given kind.
    pub fn empty(kind: OptionKind) -> Self {
        match kind {
            OptionKind::Text => Self::empty_text(),
            OptionKind::Image => Self::empty_image(),
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            DecisionOption::Text { .. } => OptionKind::Text,
            DecisionOption::Image { .. } => OptionKind::Image,
        }
    }

    pub fn is_image(&self) -> bool {
        self.kind() == OptionKind::Image
    }

    /// Returns the stored content (text, or the image data URL).
    pub fn content(&self) -> &str {
        match self {
            DecisionOption::Text { content } | DecisionOption::Image { content, .. } => content,
        }
    }

    /// Returns the raw image bytes, if this option still carries them.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match self {
            DecisionOption::Image { raw, .. } => raw.as_deref(),
            DecisionOption::Text { .. } => None,
        }
    }

    /// Whether the option counts as filled in.
    ///
    /// Whitespace-only text does not count.
    pub fn has_content(&self) -> bool {
        match self {
            DecisionOption::Text { content } => !content.trim().is_empty(),
            DecisionOption::Image { content, .. } => !content.is_empty(),
        }
    }

    /// The string sent to the decision service for this option.
    ///
    /// Text goes as-is. Images go as the bare base64 payload, without the
    /// `data:<mime>;base64,` prefix.
    pub fn service_payload(&self) -> String {
        match self {
            DecisionOption::Text { content } => content.clone(),
            DecisionOption::Image { content, .. } => match content.split_once(',') {
                Some((_, payload)) => payload.to_string(),
                None => content.clone(),
            },
        }
    }

    /// Returns a copy with any transient binary payload dropped.
    pub fn without_raw(&self) -> Self {
        match self {
            DecisionOption::Image { content, .. } => Self::image(content.clone(), None),
            text => text.clone(),
        }
    }
}
