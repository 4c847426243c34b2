use crate::classifier::classify;
use crate::emotion::EmotionAnalysis;
use crate::error::DiaryError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(with = "calendar_date")]
    pub date: NaiveDate,
    pub emotions: EmotionAnalysis,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiaryEntry {
    /// Validates the author's input, classifies the content and builds the
    /// entry. Nothing is classified when validation fails.
    pub fn new(
        id: String,
        title: &str,
        content: &str,
        date: NaiveDate,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DiaryError> {
        let title = title.trim();
        let trimmed = content.trim();
        if title.is_empty() {
            return Err(DiaryError::EmptyTitle);
        }
        if trimmed.is_empty() {
            return Err(DiaryError::EmptyContent);
        }

        // stored trimmed, but analysed as typed
        Ok(DiaryEntry {
            id,
            title: title.to_string(),
            content: trimmed.to_string(),
            date,
            emotions: classify(content),
            created_at,
            updated_at: created_at,
        })
    }

    /// First line of the content, for list views.
    pub fn preview(&self) -> &str {
        self.content.lines().next().unwrap_or("")
    }
}

/// Calendar dates are written as `YYYY-MM-DD`. Older data stored a full
/// timestamp instead, so both forms are accepted on the way in.
mod calendar_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(date);
        }
        DateTime::parse_from_rfc3339(&raw)
            .map(|timestamp| timestamp.date_naive())
            .map_err(|_| de::Error::custom(format!("invalid calendar date: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionCategory;

    fn created() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T09:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn trims_and_classifies_content() {
        let entry = DiaryEntry::new(
            "1".into(),
            "  散歩  ",
            "\n公園で最高の一日だった\n",
            date(),
            created(),
        )
        .unwrap();
        assert_eq!(entry.title, "散歩");
        assert_eq!(entry.content, "公園で最高の一日だった");
        assert_eq!(entry.emotions.primary, EmotionCategory::Joy);
        assert_eq!(entry.updated_at, entry.created_at);
    }

    #[test]
    fn classifies_content_as_typed() {
        // 149 characters once trimmed, 154 as typed: over the long-text threshold
        let typed = format!("{}     ", "あ".repeat(149));
        let entry = DiaryEntry::new("1".into(), "題", &typed, date(), created()).unwrap();
        assert_eq!(entry.content.chars().count(), 149);
        assert_eq!(entry.emotions.primary, EmotionCategory::Anticipation);
        assert_eq!(entry.emotions, classify(&typed));
    }

    #[test]
    fn rejects_blank_title_or_content() {
        let err = DiaryEntry::new("1".into(), "   ", "内容", date(), created()).unwrap_err();
        assert!(matches!(err, DiaryError::EmptyTitle));
        let err = DiaryEntry::new("1".into(), "題", "\t\n", date(), created()).unwrap_err();
        assert!(matches!(err, DiaryError::EmptyContent));
    }

    #[test]
    fn writes_camel_case_and_plain_dates() {
        let entry = DiaryEntry::new("42".into(), "題", "安心した", date(), created()).unwrap();
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["createdAt"], "2024-05-01T09:30:00Z");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn reads_timestamp_dates() {
        let json = r#"{
            "id": "1714550400000",
            "title": "t",
            "content": "c",
            "date": "2024-05-01T00:00:00.000Z",
            "emotions": {"primary": "joy", "intensity": 0.33, "confidence": 0.7, "keywords": ["嬉しい"]},
            "createdAt": "2024-05-01T09:30:00.000Z",
            "updatedAt": "2024-05-01T09:30:00.000Z"
        }"#;
        let entry: DiaryEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.date, date());
        assert_eq!(entry.emotions.secondary, None);
    }

    #[test]
    fn rejects_garbage_dates() {
        let json = r#"{"id":"1","title":"t","content":"c","date":"yesterday",
            "emotions":{"primary":"joy","intensity":0.1,"confidence":0.2},
            "createdAt":"2024-05-01T09:30:00Z","updatedAt":"2024-05-01T09:30:00Z"}"#;
        assert!(serde_json::from_str::<DiaryEntry>(json).is_err());
    }
}
