use crate::diary_entry::DiaryEntry;
use crate::emotion::EmotionCategory;
use chrono::{Days, Months, NaiveDate};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmotionFilter {
    #[default]
    All,
    Only(EmotionCategory),
}

impl EmotionFilter {
    pub fn label(self) -> &'static str {
        match self {
            EmotionFilter::All => "すべての感情",
            EmotionFilter::Only(category) => category.label(),
        }
    }

    /// All, then each category in enumeration order, wrapping around.
    pub fn cycle(self) -> Self {
        match self {
            EmotionFilter::All => EmotionFilter::Only(EmotionCategory::ALL[0]),
            EmotionFilter::Only(category) => {
                let i = EmotionCategory::ALL
                    .iter()
                    .position(|c| *c == category)
                    .unwrap_or(0);
                EmotionCategory::ALL
                    .get(i + 1)
                    .map_or(EmotionFilter::All, |next| EmotionFilter::Only(*next))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Title,
    Emotion,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Date => "日付",
            SortKey::Title => "タイトル",
            SortKey::Emotion => "感情",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            SortKey::Date => SortKey::Title,
            SortKey::Title => SortKey::Emotion,
            SortKey::Emotion => SortKey::Date,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "昇順",
            SortOrder::Desc => "降順",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub keyword: String,
    pub emotion: EmotionFilter,
    pub date_from: Option<NaiveDate>,
    /// Inclusive: entries dated on this day still match.
    pub date_to: Option<NaiveDate>,
    pub sort_by: SortKey,
    pub sort_order: SortOrder,
}

impl SearchFilters {
    pub fn is_default(&self) -> bool {
        *self == SearchFilters::default()
    }

    pub fn reset(&mut self) {
        *self = SearchFilters::default();
    }

    pub fn apply_quick_range(&mut self, range: QuickRange, today: NaiveDate) {
        let (from, to) = quick_date_range(range, today);
        self.date_from = Some(from);
        self.date_to = Some(to);
    }

    fn sorts(&self) -> bool {
        (self.sort_by, self.sort_order) != (SortKey::default(), SortOrder::default())
    }
}

/// Entries matching every active filter. Stored order is newest first, so the
/// default date-descending sort leaves it as is.
pub fn filter_entries(entries: &[DiaryEntry], filters: &SearchFilters) -> Vec<DiaryEntry> {
    // blank input disables the filter; otherwise the keyword is used as typed
    let active = !filters.keyword.trim().is_empty();
    let keyword = filters.keyword.to_lowercase();

    let mut results: Vec<DiaryEntry> = entries
        .iter()
        .filter(|e| {
            !active
                || e.title.to_lowercase().contains(&keyword)
                || e.content.to_lowercase().contains(&keyword)
        })
        .filter(|e| match filters.emotion {
            EmotionFilter::All => true,
            EmotionFilter::Only(category) => e.emotions.involves(category),
        })
        .filter(|e| filters.date_from.map_or(true, |from| e.date >= from))
        .filter(|e| filters.date_to.map_or(true, |to| e.date <= to))
        .cloned()
        .collect();

    if filters.sorts() {
        results.sort_by(|a, b| {
            let ordering = compare(a, b, filters.sort_by);
            match filters.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }

    results
}

fn compare(a: &DiaryEntry, b: &DiaryEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Title => a
            .title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title)),
        SortKey::Emotion => a.emotions.primary.as_str().cmp(b.emotions.primary.as_str()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickRange {
    Today,
    Week,
    Month,
    Year,
}

impl QuickRange {
    pub fn label(self) -> &'static str {
        match self {
            QuickRange::Today => "今日",
            QuickRange::Week => "1週間",
            QuickRange::Month => "1ヶ月",
            QuickRange::Year => "1年",
        }
    }
}

/// `(from, to)` ending today. `Today` starts at the beginning of today
/// instead of reaching back a day.
pub fn quick_date_range(range: QuickRange, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = match range {
        QuickRange::Today => Some(today),
        QuickRange::Week => today.checked_sub_days(Days::new(7)),
        QuickRange::Month => today.checked_sub_months(Months::new(1)),
        QuickRange::Year => today.checked_sub_months(Months::new(12)),
    };
    (from.unwrap_or(NaiveDate::MIN), today)
}
