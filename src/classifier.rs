//! Keyword-based emotion inference.
//!
//! Each category owns a small set of trigger phrases. A phrase counts once if
//! it occurs anywhere in the text; the best scoring categories become the
//! primary and secondary emotion. Text with no trigger phrase at all still
//! gets a weak, structurally inferred classification.

use crate::emotion::{EmotionAnalysis, EmotionCategory};
use tracing::debug;

pub const MATCH_CONFIDENCE: f64 = 0.7;
pub const FALLBACK_CONFIDENCE: f64 = 0.2;
pub const FALLBACK_INTENSITY: f64 = 0.1;

/// Number of matched phrases at which intensity saturates.
const SATURATION: f64 = 3.0;

const SHORT_TEXT_CHARS: usize = 30;
const LONG_TEXT_CHARS: usize = 150;

const INTERROGATIVE_CUES: &[&str] = &["なぜ", "どうして", "どうすれば", "だろうか", "でしょうか"];
/// Question particles that only count at the end of a sentence; inside one
/// they are usually part of a word (静かな, 確かな).
const INTERROGATIVE_ENDINGS: &[&str] = &["かな", "かしら"];
const PAST_TENSE_CUES: &[&str] = &["ました", "でした", "だった", "た。"];
const FUTURE_CUES: &[&str] = &["つもり", "予定", "しよう", "したい", "これから", "明日"];

/// Trigger phrases for a category, in matching order.
pub fn lexicon(category: EmotionCategory) -> &'static [&'static str] {
    match category {
        EmotionCategory::Joy => &[
            "嬉しい", "楽しい", "幸せ", "喜び", "満足", "良かった", "最高", "ハッピー",
        ],
        EmotionCategory::Sadness => &["悲しい", "辛い", "落ち込む", "憂鬱", "寂しい", "絶望", "涙"],
        EmotionCategory::Anger => &["怒り", "腹立つ", "イライラ", "許せない", "ムカつく", "頭にくる"],
        EmotionCategory::Fear => &["怖い", "不安", "心配", "恐れ", "ドキドキ", "緊張"],
        EmotionCategory::Surprise => &["驚き", "びっくり", "驚いた", "予想外", "意外"],
        EmotionCategory::Disgust => &["嫌", "気持ち悪い", "不快", "嫌悪"],
        EmotionCategory::Trust => &["信頼", "安心", "頼れる", "信じる", "任せる"],
        EmotionCategory::Anticipation => &["期待", "楽しみ", "ワクワク", "待ち遠しい", "希望"],
    }
}

pub fn classify(text: &str) -> EmotionAnalysis {
    let mut keywords = Vec::new();
    let mut ranked: Vec<(EmotionCategory, usize)> = Vec::with_capacity(EmotionCategory::ALL.len());

    for category in EmotionCategory::ALL {
        let mut score = 0;
        for phrase in lexicon(category) {
            if text.contains(phrase) {
                score += 1;
                keywords.push(phrase.to_string());
            }
        }
        if score > 0 {
            ranked.push((category, score));
        }
    }

    // sort_by is stable, so equal scores keep enumeration order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let Some(&(primary, max_score)) = ranked.first() else {
        let primary = infer_neutral(text);
        debug!(%primary, "no lexicon match, using structural fallback");
        return EmotionAnalysis {
            primary: primary.into(),
            secondary: None,
            intensity: FALLBACK_INTENSITY,
            confidence: FALLBACK_CONFIDENCE,
            keywords,
        };
    };

    let secondary = ranked.get(1).map(|&(category, _)| category);
    debug!(%primary, ?secondary, matches = keywords.len(), "classified entry");

    EmotionAnalysis {
        primary: primary.into(),
        secondary: secondary.map(Into::into),
        intensity: (max_score as f64 / SATURATION).min(1.0),
        confidence: MATCH_CONFIDENCE,
        keywords,
    }
}

/// Picks a category from the shape of the text alone. First rule wins.
fn infer_neutral(text: &str) -> EmotionCategory {
    let contains_any = |cues: &[&str]| cues.iter().any(|cue| text.contains(cue));

    if text.contains('?')
        || text.contains('？')
        || contains_any(INTERROGATIVE_CUES)
        || INTERROGATIVE_ENDINGS.iter().any(|cue| ends_a_sentence(text, cue))
    {
        return EmotionCategory::Anticipation;
    }
    if contains_any(PAST_TENSE_CUES) || text.trim_end().ends_with('た') {
        return EmotionCategory::Trust;
    }
    if contains_any(FUTURE_CUES) {
        return EmotionCategory::Anticipation;
    }

    let length = text.chars().count();
    if length < SHORT_TEXT_CHARS {
        EmotionCategory::Trust
    } else if length > LONG_TEXT_CHARS {
        EmotionCategory::Anticipation
    } else {
        EmotionCategory::Trust
    }
}

fn ends_a_sentence(text: &str, cue: &str) -> bool {
    text.split(|c: char| matches!(c, '。' | '！' | '!' | '\n'))
        .any(|sentence| sentence.trim_end().ends_with(cue))
}
