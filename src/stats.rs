//! Emotion statistics over a collection of entries.
//!
//! Frequency, intensity, the daily series and the weekday pattern only look
//! at entries inside the requested window. The monthly trend always covers
//! the whole diary so long-range patterns stay visible while a short window
//! is selected.

use crate::diary_entry::DiaryEntry;
use crate::emotion::{Emotion, EmotionAnalysis};
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const PRIMARY_WEIGHT: f64 = 1.0;
const SECONDARY_WEIGHT: f64 = 0.5;
const TREND_MONTHS: usize = 6;

/// Weekday names, Sunday first.
pub const WEEKDAYS: [&str; 7] = ["日", "月", "火", "水", "木", "金", "土"];

/// Weight per emotion. Identifiers the app does not know get their own key.
pub type EmotionWeights = BTreeMap<Emotion, f64>;

/// How far back the windowed statistics reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsWindow {
    Days(u32),
    All,
}

impl StatsWindow {
    /// Span used for `All`, and the longest window accepted.
    pub const ALL_DAYS: u32 = 3650;

    pub const PRESETS: [StatsWindow; 4] = [
        StatsWindow::All,
        StatsWindow::Days(7),
        StatsWindow::Days(30),
        StatsWindow::Days(90),
    ];

    pub fn days(self) -> u32 {
        match self {
            StatsWindow::Days(days) => days.min(Self::ALL_DAYS),
            StatsWindow::All => Self::ALL_DAYS,
        }
    }

    pub fn label(self) -> String {
        match self {
            StatsWindow::Days(days) => format!("{days}日間"),
            StatsWindow::All => "すべて".to_string(),
        }
    }

    /// Next preset, wrapping around.
    pub fn cycle(self) -> Self {
        let position = Self::PRESETS.iter().position(|w| *w == self);
        match position {
            Some(i) => Self::PRESETS[(i + 1) % Self::PRESETS.len()],
            None => Self::PRESETS[0],
        }
    }
}

impl Default for StatsWindow {
    fn default() -> Self {
        StatsWindow::Days(30)
    }
}

impl fmt::Display for StatsWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsWindow::Days(days) => write!(f, "{days}"),
            StatsWindow::All => f.write_str("all"),
        }
    }
}

impl FromStr for StatsWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(StatsWindow::All);
        }
        match s.parse::<u32>() {
            Ok(0) => Err("Window must be at least one day".to_string()),
            Ok(days) if days > StatsWindow::ALL_DAYS => Err(format!(
                "Window must be at most {} days, got {}",
                StatsWindow::ALL_DAYS,
                days
            )),
            Ok(days) => Ok(StatsWindow::Days(days)),
            Err(_) => Err(format!("Unknown window: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEmotions {
    pub date: NaiveDate,
    pub emotions: EmotionWeights,
    /// Mean intensity of that day's entries, 0 when there were none.
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayPattern {
    pub weekday: &'static str,
    pub emotions: EmotionWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    /// `YYYY-MM`
    pub month: String,
    pub emotions: EmotionWeights,
    pub average_intensity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmotionStats {
    pub emotion_frequency: EmotionWeights,
    pub average_intensity: EmotionWeights,
    pub total_entries: usize,
    pub time_range_data: Vec<DailyEmotions>,
    pub weekly_pattern: Vec<WeekdayPattern>,
    pub monthly_trend: Vec<MonthlyTrend>,
}

impl EmotionStats {
    /// Emotions by descending frequency, ties in enumeration order.
    pub fn ranked_emotions(&self) -> Vec<(Emotion, f64)> {
        let mut ranked: Vec<_> = self
            .emotion_frequency
            .iter()
            .map(|(emotion, weight)| (emotion.clone(), *weight))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Statistics as of today, local time.
pub fn aggregate(entries: &[DiaryEntry], window: StatsWindow) -> EmotionStats {
    aggregate_on(entries, window, Local::now().date_naive())
}

pub fn aggregate_on(entries: &[DiaryEntry], window: StatsWindow, today: NaiveDate) -> EmotionStats {
    if entries.is_empty() {
        return EmotionStats::default();
    }

    let days = window.days();
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);
    let in_window: Vec<&DiaryEntry> = entries
        .iter()
        .filter(|entry| entry.date >= start && entry.date <= today)
        .collect();

    let mut emotion_frequency = EmotionWeights::new();
    let mut intensity_sum = EmotionWeights::new();
    for entry in &in_window {
        let analysis = &entry.emotions;
        *emotion_frequency.entry(analysis.primary.clone()).or_insert(0.0) += PRIMARY_WEIGHT;
        *intensity_sum.entry(analysis.primary.clone()).or_insert(0.0) += analysis.intensity * PRIMARY_WEIGHT;
        if let Some(secondary) = &analysis.secondary {
            *emotion_frequency.entry(secondary.clone()).or_insert(0.0) += SECONDARY_WEIGHT;
            *intensity_sum.entry(secondary.clone()).or_insert(0.0) += analysis.intensity * SECONDARY_WEIGHT;
        }
    }

    let average_intensity = intensity_sum
        .into_iter()
        .map(|(emotion, sum)| {
            let weight = emotion_frequency[&emotion];
            (emotion, sum / weight)
        })
        .collect();

    let stats = EmotionStats {
        emotion_frequency,
        average_intensity,
        total_entries: in_window.len(),
        time_range_data: daily_series(&in_window, days, today),
        weekly_pattern: weekly_pattern(&in_window),
        monthly_trend: monthly_trend(entries),
    };
    debug!(
        window = %window,
        total = entries.len(),
        in_window = stats.total_entries,
        "aggregated emotion stats"
    );
    stats
}

fn add_weights(weights: &mut EmotionWeights, analysis: &EmotionAnalysis) {
    *weights.entry(analysis.primary.clone()).or_insert(0.0) += PRIMARY_WEIGHT;
    if let Some(secondary) = &analysis.secondary {
        *weights.entry(secondary.clone()).or_insert(0.0) += SECONDARY_WEIGHT;
    }
}

fn daily_series(entries: &[&DiaryEntry], days: u32, today: NaiveDate) -> Vec<DailyEmotions> {
    let mut by_day: BTreeMap<NaiveDate, Vec<&DiaryEntry>> = BTreeMap::new();
    for entry in entries {
        by_day.entry(entry.date).or_default().push(*entry);
    }

    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            let day_entries = by_day.get(&date).map(Vec::as_slice).unwrap_or_default();
            let mut emotions = EmotionWeights::new();
            let mut total_intensity = 0.0;
            for entry in day_entries {
                add_weights(&mut emotions, &entry.emotions);
                total_intensity += entry.emotions.intensity;
            }
            let intensity = if day_entries.is_empty() {
                0.0
            } else {
                total_intensity / day_entries.len() as f64
            };
            DailyEmotions {
                date,
                emotions,
                intensity,
            }
        })
        .collect()
}

fn weekly_pattern(entries: &[&DiaryEntry]) -> Vec<WeekdayPattern> {
    let mut pattern: Vec<WeekdayPattern> = WEEKDAYS
        .into_iter()
        .map(|weekday| WeekdayPattern {
            weekday,
            emotions: EmotionWeights::new(),
        })
        .collect();

    for entry in entries {
        let day = entry.date.weekday().num_days_from_sunday() as usize;
        add_weights(&mut pattern[day].emotions, &entry.emotions);
    }
    pattern
}

#[derive(Default)]
struct MonthAccumulator {
    emotions: EmotionWeights,
    intensity_sum: f64,
    count: usize,
}

fn monthly_trend(entries: &[DiaryEntry]) -> Vec<MonthlyTrend> {
    let mut months: BTreeMap<String, MonthAccumulator> = BTreeMap::new();
    for entry in entries {
        let key = format!("{:04}-{:02}", entry.date.year(), entry.date.month());
        let month = months.entry(key).or_default();
        add_weights(&mut month.emotions, &entry.emotions);
        month.intensity_sum += entry.emotions.intensity;
        month.count += 1;
    }

    let skip = months.len().saturating_sub(TREND_MONTHS);
    months
        .into_iter()
        .skip(skip)
        .map(|(month, acc)| MonthlyTrend {
            month,
            emotions: acc.emotions,
            average_intensity: acc.intensity_sum / acc.count as f64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::EmotionCategory;
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        // a Wednesday
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn entry(
        date: NaiveDate,
        primary: EmotionCategory,
        secondary: Option<EmotionCategory>,
        intensity: f64,
    ) -> DiaryEntry {
        let created = Utc.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap();
        DiaryEntry {
            id: format!("{date}-{primary}"),
            title: "題".to_string(),
            content: "本文".to_string(),
            date,
            emotions: EmotionAnalysis {
                primary: primary.into(),
                secondary: secondary.map(Into::into),
                intensity,
                confidence: 0.7,
                keywords: Vec::new(),
            },
            created_at: created,
            updated_at: created,
        }
    }

    fn days_ago(n: u64) -> NaiveDate {
        today().checked_sub_days(Days::new(n)).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    use EmotionCategory::*;

    fn key(category: EmotionCategory) -> Emotion {
        category.into()
    }

    #[test]
    fn empty_collection_is_all_empty() {
        let stats = aggregate_on(&[], StatsWindow::Days(7), today());
        assert_eq!(stats, EmotionStats::default());
        assert!(stats.time_range_data.is_empty());
        assert!(stats.weekly_pattern.is_empty());
    }

    #[test]
    fn secondary_contributes_half_weight() {
        let entries = vec![entry(today(), Joy, Some(Trust), 0.8)];
        let stats = aggregate_on(&entries, StatsWindow::Days(7), today());

        assert_eq!(stats.emotion_frequency[&key(Joy)], 1.0);
        assert_eq!(stats.emotion_frequency[&key(Trust)], 0.5);
        assert!(close(stats.average_intensity[&key(Joy)], 0.8));
        // 0.4 / 0.5
        assert!(close(stats.average_intensity[&key(Trust)], 0.8));
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn average_is_weighted_by_role() {
        let entries = vec![
            entry(today(), Joy, None, 0.9),
            entry(days_ago(1), Sadness, Some(Joy), 0.3),
        ];
        let stats = aggregate_on(&entries, StatsWindow::Days(7), today());
        assert_eq!(stats.emotion_frequency[&key(Joy)], 1.5);
        // (0.9 + 0.15) / 1.5
        assert!(close(stats.average_intensity[&key(Joy)], 0.7));
        assert_eq!(stats.ranked_emotions()[0], (key(Joy), 1.5));
    }

    #[test]
    fn window_excludes_old_and_future_entries() {
        let entries = vec![
            entry(today(), Joy, None, 0.3),
            entry(days_ago(7), Fear, None, 0.3),
            entry(days_ago(8), Anger, None, 0.3),
            entry(today().succ_opt().unwrap(), Surprise, None, 0.3),
        ];
        let stats = aggregate_on(&entries, StatsWindow::Days(7), today());
        assert_eq!(stats.total_entries, 2);
        assert!(stats.emotion_frequency.contains_key(&key(Fear)));
        assert!(!stats.emotion_frequency.contains_key(&key(Anger)));
        assert!(!stats.emotion_frequency.contains_key(&key(Surprise)));
    }

    #[test]
    fn daily_series_runs_oldest_to_newest() {
        let entries = vec![
            entry(today(), Joy, Some(Fear), 0.6),
            entry(today(), Sadness, None, 0.2),
            entry(days_ago(2), Trust, None, 1.0),
        ];
        let stats = aggregate_on(&entries, StatsWindow::Days(3), today());
        let series = &stats.time_range_data;

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, days_ago(2));
        assert_eq!(series[2].date, today());

        assert_eq!(series[0].emotions[&key(Trust)], 1.0);
        assert_eq!(series[0].intensity, 1.0);
        assert!(series[1].emotions.is_empty());
        assert_eq!(series[1].intensity, 0.0);
        assert_eq!(series[2].emotions[&key(Fear)], 0.5);
        assert!(close(series[2].intensity, 0.4));
    }

    #[test]
    fn weekly_pattern_buckets_by_weekday() {
        let entries = vec![
            entry(today(), Joy, Some(Trust), 0.5),
            entry(days_ago(7), Joy, None, 0.5),
            entry(days_ago(3), Anger, None, 0.5),
        ];
        let stats = aggregate_on(&entries, StatsWindow::Days(30), today());
        let pattern = &stats.weekly_pattern;

        assert_eq!(pattern.len(), 7);
        assert_eq!(pattern[0].weekday, "日");
        assert_eq!(pattern[3].weekday, "水");
        assert_eq!(pattern[3].emotions[&key(Joy)], 2.0);
        assert_eq!(pattern[3].emotions[&key(Trust)], 0.5);
        // 2024-06-09 was a Sunday
        assert_eq!(pattern[0].emotions[&key(Anger)], 1.0);
        assert!(pattern[1].emotions.is_empty());
    }

    #[test]
    fn monthly_trend_ignores_window() {
        let entries = vec![
            entry(today(), Joy, None, 0.4),
            entry(NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(), Sadness, Some(Fear), 0.6),
        ];
        let week = aggregate_on(&entries, StatsWindow::Days(7), today());
        let all = aggregate_on(&entries, StatsWindow::All, today());

        assert_eq!(week.monthly_trend, all.monthly_trend);
        assert_eq!(week.monthly_trend.len(), 2);
        assert_eq!(week.monthly_trend[0].month, "2023-01");
        assert_eq!(week.monthly_trend[0].emotions[&key(Fear)], 0.5);
        assert_eq!(week.total_entries, 1);
        assert_eq!(all.total_entries, 2);
    }

    #[test]
    fn monthly_trend_keeps_last_six_months() {
        let entries: Vec<_> = (1..=8)
            .map(|month| {
                entry(
                    NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
                    Joy,
                    None,
                    0.1 * f64::from(month),
                )
            })
            .chain([entry(NaiveDate::from_ymd_opt(2024, 8, 20).unwrap(), Fear, None, 0.2)])
            .collect();
        let trend = aggregate_on(&entries, StatsWindow::Days(7), today()).monthly_trend;

        let months: Vec<_> = trend.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, ["2024-03", "2024-04", "2024-05", "2024-06", "2024-07", "2024-08"]);
        // (0.8 + 0.2) / 2, secondary-free so plain mean
        assert!(close(trend[5].average_intensity, 0.5));
    }

    #[test]
    fn aggregation_is_repeatable() {
        let entries = vec![
            entry(today(), Joy, Some(Anticipation), 0.7),
            entry(days_ago(40), Disgust, None, 0.3),
        ];
        let first = aggregate_on(&entries, StatsWindow::Days(90), today());
        let second = aggregate_on(&entries, StatsWindow::Days(90), today());
        assert_eq!(first, second);
    }

    #[test]
    fn all_window_spans_ten_years() {
        assert_eq!(StatsWindow::All.days(), 3650);
        let entries = vec![entry(NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(), Trust, None, 0.1)];
        let stats = aggregate_on(&entries, StatsWindow::All, today());
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.time_range_data.len(), 3650);
    }

    #[test]
    fn window_parses_from_config_values() {
        assert_eq!("all".parse::<StatsWindow>(), Ok(StatsWindow::All));
        assert_eq!("30".parse::<StatsWindow>(), Ok(StatsWindow::Days(30)));
        assert!("0".parse::<StatsWindow>().is_err());
        assert!("month".parse::<StatsWindow>().is_err());
        assert_eq!(StatsWindow::All.cycle(), StatsWindow::Days(7));
        assert_eq!(StatsWindow::Days(90).cycle(), StatsWindow::All);
        assert_eq!(StatsWindow::Days(14).cycle(), StatsWindow::All);
    }

    #[test]
    fn window_is_capped_at_ten_years() {
        assert_eq!("3650".parse::<StatsWindow>(), Ok(StatsWindow::Days(3650)));
        assert!("3651".parse::<StatsWindow>().is_err());
        assert!("4000000000".parse::<StatsWindow>().is_err());

        assert_eq!(StatsWindow::Days(u32::MAX).days(), StatsWindow::ALL_DAYS);
        let entries = vec![entry(today(), Joy, None, 0.5)];
        let stats = aggregate_on(&entries, StatsWindow::Days(u32::MAX), today());
        assert_eq!(stats.time_range_data.len(), 3650);
    }

    #[test]
    fn unknown_emotions_are_counted_under_their_own_key() {
        let mut odd = entry(today(), Joy, None, 0.4);
        odd.emotions.primary = Emotion::Other("neutral".to_string());
        let entries = vec![odd, entry(today(), Joy, None, 0.8)];

        let stats = aggregate_on(&entries, StatsWindow::Days(7), today());
        let neutral = Emotion::Other("neutral".to_string());
        assert_eq!(stats.emotion_frequency[&neutral], 1.0);
        assert!(close(stats.average_intensity[&neutral], 0.4));
        assert_eq!(stats.emotion_frequency[&key(Joy)], 1.0);
        assert_eq!(stats.ranked_emotions()[0].0, key(Joy));
    }
}
