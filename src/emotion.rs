use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Label shown for any emotion identifier outside the known categories.
pub const NEUTRAL_LABEL: &str = "中立";

/// Colour used for any emotion identifier outside the known categories.
pub const NEUTRAL_COLOR: Color = Color::Gray;

/// The eight emotion categories an entry can be tagged with.
///
/// Declaration order is significant: the classifier iterates categories in
/// this order and breaks score ties by it, and `Ord` follows it too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionCategory {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Trust,
    Anticipation,
}

impl EmotionCategory {
    pub const ALL: [EmotionCategory; 8] = [
        EmotionCategory::Joy,
        EmotionCategory::Sadness,
        EmotionCategory::Anger,
        EmotionCategory::Fear,
        EmotionCategory::Surprise,
        EmotionCategory::Disgust,
        EmotionCategory::Trust,
        EmotionCategory::Anticipation,
    ];

    /// Stable identifier, as stored on disk.
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionCategory::Joy => "joy",
            EmotionCategory::Sadness => "sadness",
            EmotionCategory::Anger => "anger",
            EmotionCategory::Fear => "fear",
            EmotionCategory::Surprise => "surprise",
            EmotionCategory::Disgust => "disgust",
            EmotionCategory::Trust => "trust",
            EmotionCategory::Anticipation => "anticipation",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmotionCategory::Joy => "喜び",
            EmotionCategory::Sadness => "悲しみ",
            EmotionCategory::Anger => "怒り",
            EmotionCategory::Fear => "恐れ",
            EmotionCategory::Surprise => "驚き",
            EmotionCategory::Disgust => "嫌悪",
            EmotionCategory::Trust => "信頼",
            EmotionCategory::Anticipation => "期待",
        }
    }

    pub fn color(self) -> Color {
        match self {
            EmotionCategory::Joy => Color::Yellow,
            EmotionCategory::Sadness => Color::Blue,
            EmotionCategory::Anger => Color::Red,
            EmotionCategory::Fear => Color::Magenta,
            EmotionCategory::Surprise => Color::LightRed,
            EmotionCategory::Disgust => Color::Green,
            EmotionCategory::Trust => Color::LightGreen,
            EmotionCategory::Anticipation => Color::LightMagenta,
        }
    }
}

impl fmt::Display for EmotionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion: {0}")]
pub struct UnknownEmotion(pub String);

impl FromStr for EmotionCategory {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// Display label for an untyped emotion identifier, e.g. a key read back
/// from data written by another version of the app.
pub fn label_for(emotion: &str) -> &'static str {
    emotion
        .parse::<EmotionCategory>()
        .map(EmotionCategory::label)
        .unwrap_or(NEUTRAL_LABEL)
}

/// Display colour for an untyped emotion identifier.
pub fn color_for(emotion: &str) -> Color {
    emotion
        .parse::<EmotionCategory>()
        .map(EmotionCategory::color)
        .unwrap_or(NEUTRAL_COLOR)
}

/// An emotion as recorded on an entry.
///
/// Identifiers outside the eight categories (written by another version of
/// the app) are kept verbatim so they survive a load and save, and render
/// with the neutral label and colour.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Emotion {
    Known(EmotionCategory),
    Other(String),
}

impl Emotion {
    pub fn as_str(&self) -> &str {
        match self {
            Emotion::Known(category) => category.as_str(),
            Emotion::Other(raw) => raw,
        }
    }

    pub fn category(&self) -> Option<EmotionCategory> {
        match self {
            Emotion::Known(category) => Some(*category),
            Emotion::Other(_) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        label_for(self.as_str())
    }

    pub fn color(&self) -> Color {
        color_for(self.as_str())
    }
}

impl From<EmotionCategory> for Emotion {
    fn from(category: EmotionCategory) -> Self {
        Emotion::Known(category)
    }
}

impl PartialEq<EmotionCategory> for Emotion {
    fn eq(&self, other: &EmotionCategory) -> bool {
        self.category() == Some(*other)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emotional profile attached to an entry when it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    pub primary: Emotion,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<Emotion>,
    pub intensity: f64,
    pub confidence: f64,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl EmotionAnalysis {
    pub fn involves(&self, category: EmotionCategory) -> bool {
        self.primary == category || self.secondary.as_ref().is_some_and(|s| *s == category)
    }
}
