use std::fs;

use chrono::{NaiveDate, TimeZone, Utc};
use emotion_diary::storage::ENTRIES_KEY;
use emotion_diary::{
    aggregate_on, filter_entries, DiaryState, Emotion, EmotionCategory, EmotionFilter, EntryStore,
    FileStore, KeyValueStore, SearchFilters, StatsWindow, Theme, ThemeStore,
};
use tempfile::TempDir;

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A diary file as the browser version of the app wrote it: full timestamps
/// for `date`, one secondary emotion, newest first.
const BROWSER_EXPORT: &str = r#"[
  {
    "id": "1717200000000",
    "title": "発表会",
    "content": "緊張したけど最高の発表ができて嬉しい",
    "date": "2024-06-01T00:00:00.000Z",
    "emotions": {
      "primary": "joy",
      "secondary": "fear",
      "intensity": 0.6666666666666666,
      "confidence": 0.7,
      "keywords": ["嬉しい", "最高", "緊張"]
    },
    "createdAt": "2024-06-01T12:00:00.000Z",
    "updatedAt": "2024-06-01T12:00:00.000Z"
  },
  {
    "id": "1714500000000",
    "title": "雨",
    "content": "一日中家にいた",
    "date": "2024-04-30T00:00:00.000Z",
    "emotions": {
      "primary": "trust",
      "intensity": 0.1,
      "confidence": 0.2,
      "keywords": []
    },
    "createdAt": "2024-04-30T20:00:00.000Z",
    "updatedAt": "2024-04-30T20:00:00.000Z"
  }
]"#;

// ============================================================
// Persistence
// ============================================================

#[test]
fn test_entries_survive_reopening_from_disk() {
    let dir = TempDir::new().unwrap();
    let created = Utc.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();

    let mut diary = DiaryState::open(EntryStore::new(FileStore::new(dir.path())));
    diary
        .create_entry_at("朝", "明日の旅行が楽しみでワクワクする", ymd(2024, 6, 2), created)
        .unwrap();

    let raw = fs::read_to_string(dir.path().join(format!("{ENTRIES_KEY}.json"))).unwrap();
    assert!(raw.contains("\"date\":\"2024-06-02\""));

    let reopened = DiaryState::open(EntryStore::new(FileStore::new(dir.path())));
    assert_eq!(reopened.entries(), diary.entries());
    assert_eq!(
        reopened.entries()[0].emotions.primary,
        EmotionCategory::Anticipation
    );
}

#[test]
fn test_store_directory_is_created_on_first_write() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("data").join("diary");
    let store = EntryStore::new(FileStore::new(&nested));

    assert!(store.load().is_empty());
    store.save(&[]);
    assert!(nested.join(format!("{ENTRIES_KEY}.json")).exists());
}

#[test]
fn test_corrupted_file_opens_as_empty_diary() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(format!("{ENTRIES_KEY}.json")), "[{\"id\": 1").unwrap();

    let diary = DiaryState::open(EntryStore::new(FileStore::new(dir.path())));
    assert!(diary.entries().is_empty());
}

#[test]
fn test_unknown_emotion_does_not_wipe_the_diary() {
    let dir = TempDir::new().unwrap();
    let stored = BROWSER_EXPORT.replacen("\"primary\": \"trust\"", "\"primary\": \"neutral\"", 1);
    fs::write(dir.path().join(format!("{ENTRIES_KEY}.json")), stored).unwrap();

    let mut diary = DiaryState::open(EntryStore::new(FileStore::new(dir.path())));
    assert_eq!(diary.entries().len(), 2);
    diary.create_entry("夜", "安心した", ymd(2024, 6, 3)).unwrap();

    let reopened = DiaryState::open(EntryStore::new(FileStore::new(dir.path())));
    let ids: Vec<_> = reopened.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids[1..], ["1717200000000", "1714500000000"]);
    assert_eq!(reopened.entries()[2].emotions.primary, Emotion::Other("neutral".to_string()));
    assert_eq!(reopened.entries()[2].emotions.primary.label(), "中立");
}

#[test]
fn test_browser_backup_imports_and_analyses() {
    let dir = TempDir::new().unwrap();
    let mut diary = DiaryState::open(EntryStore::new(FileStore::new(dir.path())));
    assert!(diary.import(BROWSER_EXPORT));
    assert_eq!(diary.entries().len(), 2);
    assert_eq!(diary.entries()[0].date, ymd(2024, 6, 1));

    let today = ymd(2024, 6, 5);
    let week = aggregate_on(diary.entries(), StatsWindow::Days(7), today);
    assert_eq!(week.total_entries, 1);
    assert_eq!(week.emotion_frequency[&Emotion::Known(EmotionCategory::Joy)], 1.0);
    assert_eq!(week.emotion_frequency[&Emotion::Known(EmotionCategory::Fear)], 0.5);

    let months: Vec<_> = week.monthly_trend.iter().map(|m| m.month.as_str()).collect();
    assert_eq!(months, ["2024-04", "2024-06"]);

    let fear = SearchFilters {
        emotion: EmotionFilter::Only(EmotionCategory::Fear),
        ..Default::default()
    };
    let found = filter_entries(diary.entries(), &fear);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "発表会");
}

#[test]
fn test_rejected_import_leaves_file_untouched() {
    let dir = TempDir::new().unwrap();
    let kv = FileStore::new(dir.path());
    let mut diary = DiaryState::open(EntryStore::new(&kv));
    diary.create_entry("題", "安心した", ymd(2024, 1, 1)).unwrap();
    let before = kv.get(ENTRIES_KEY).unwrap();

    assert!(!diary.import(r#"{"entries": []}"#));
    assert!(!diary.import("not json at all"));
    assert_eq!(kv.get(ENTRIES_KEY).unwrap(), before);
    assert_eq!(diary.entries().len(), 1);
}

#[test]
fn test_export_round_trips_through_import() {
    let dir = TempDir::new().unwrap();
    let mut diary = DiaryState::open(EntryStore::new(FileStore::new(dir.path().join("a"))));
    diary.create_entry("一", "イライラして腹立つ", ymd(2024, 2, 1)).unwrap();
    diary.create_entry("二", "意外な出来事にびっくり", ymd(2024, 2, 2)).unwrap();

    let mut copy = DiaryState::open(EntryStore::new(FileStore::new(dir.path().join("b"))));
    assert!(copy.import(&diary.export()));
    assert_eq!(copy.entries(), diary.entries());
}

#[test]
fn test_theme_is_shared_with_entry_store_directory() {
    let dir = TempDir::new().unwrap();
    let kv = FileStore::new(dir.path());

    ThemeStore::new(&kv).save(Theme::Light);
    let diary = DiaryState::open(EntryStore::new(&kv));

    assert!(diary.entries().is_empty());
    assert_eq!(ThemeStore::new(&kv).load(Theme::System), Theme::Light);
    assert!(dir.path().join("theme.json").exists());
}
