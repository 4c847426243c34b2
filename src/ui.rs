use chrono::{Local, NaiveDate};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use emotion_diary::{
    aggregate, filter_entries, DiaryEntry, Emotion, EmotionFilter, EmotionStats, EmotionWeights,
    Palette, QuickRange, SearchFilters, StatsWindow, Theme,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Sparkline, Wrap},
    Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthStr;

const BAR_WIDTH: usize = 24;
const SPARKLINE_DAYS: usize = 60;

pub enum Action {
    Write,
    View,
    Search,
    Stats,
    Theme,
    Export,
    Import,
    Quit,
}

/// What the author typed into the new-entry form. The date stays text until
/// it is submitted.
#[derive(Debug, Clone, Default)]
pub struct EntryDraft {
    pub date: String,
    pub title: String,
    pub content: String,
}

impl EntryDraft {
    pub fn new(today: NaiveDate) -> Self {
        EntryDraft {
            date: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum FormField {
    Date,
    Title,
    Content,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Date => FormField::Title,
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Date,
        }
    }

    fn previous(self) -> Self {
        self.next().next()
    }
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    palette: Palette,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

impl UI {
    pub fn new(palette: Palette) -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            palette,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn display(&mut self, entries: &[DiaryEntry], status: &str, theme: Theme) -> Result<()> {
        let palette = self.palette;
        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(0),
                    Constraint::Length(1),
                    Constraint::Length(2),
                ])
                .split(f.area());

            f.render_widget(
                heading(
                    &format!("感情日記  ({} 件 / テーマ: {})", entries.len(), theme.label()),
                    palette,
                ),
                chunks[0],
            );

            if entries.is_empty() {
                let empty = Paragraph::new(vec![
                    Line::from("まだ日記がありません"),
                    Line::from("最初の日記を書いて、感情分析を体験してみましょう"),
                ])
                .style(Style::default().fg(palette.muted))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("日記"));
                f.render_widget(empty, chunks[1]);
            } else {
                let items: Vec<ListItem> =
                    entries.iter().map(|e| entry_item(e, palette)).collect();
                let entries_list =
                    List::new(items).block(Block::default().borders(Borders::ALL).title("日記"));
                f.render_widget(entries_list, chunks[1]);
            }

            let status_line =
                Paragraph::new(status.to_string()).style(Style::default().fg(palette.accent));
            f.render_widget(status_line, chunks[2]);

            let mut keys = vec![("w", "書く")];
            if !entries.is_empty() {
                keys.extend([("v", "一覧"), ("s", "検索"), ("a", "統計")]);
            }
            keys.extend([("t", "テーマ"), ("x", "書き出し"), ("i", "読み込み"), ("q", "終了")]);
            f.render_widget(key_hints(&keys, palette), chunks[3]);
        })?;

        Ok(())
    }

    pub fn handle_input(&self, has_entries: bool) -> Result<Option<Action>> {
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('w') => Ok(Some(Action::Write)),
                KeyCode::Char('q') => Ok(Some(Action::Quit)),
                KeyCode::Char('t') => Ok(Some(Action::Theme)),
                KeyCode::Char('x') => Ok(Some(Action::Export)),
                KeyCode::Char('i') => Ok(Some(Action::Import)),
                KeyCode::Char('v') if has_entries => Ok(Some(Action::View)),
                KeyCode::Char('s') if has_entries => Ok(Some(Action::Search)),
                KeyCode::Char('a') if has_entries => Ok(Some(Action::Stats)),
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Runs the new-entry form. `None` means the author cancelled.
    pub fn get_new_entry(
        &mut self,
        mut draft: EntryDraft,
        error: Option<&str>,
    ) -> Result<Option<EntryDraft>> {
        let palette = self.palette;
        let mut focus = FormField::Title;

        loop {
            self.blink();
            let cursor_visible = self.cursor_visible;
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(1),
                        Constraint::Length(2),
                    ])
                    .split(f.area());

                f.render_widget(heading("新しい日記を書く", palette), chunks[0]);

                let fields = [
                    (FormField::Date, "日付 (YYYY-MM-DD)", &draft.date, chunks[1]),
                    (FormField::Title, "タイトル", &draft.title, chunks[2]),
                    (FormField::Content, "内容", &draft.content, chunks[3]),
                ];
                for (field, label, value, area) in fields {
                    let focused = field == focus;
                    let mut text = value.clone();
                    if focused && cursor_visible {
                        text.push('|');
                    }
                    let border = if focused {
                        Style::default().fg(palette.accent)
                    } else {
                        Style::default().fg(palette.muted)
                    };
                    let input = Paragraph::new(text)
                        .wrap(Wrap { trim: false })
                        .block(
                            Block::default()
                                .borders(Borders::ALL)
                                .border_style(border)
                                .title(label),
                        );
                    f.render_widget(input, area);
                }

                if let Some(error) = error {
                    let message = Paragraph::new(error.to_string())
                        .style(Style::default().fg(ratatui::style::Color::Red));
                    f.render_widget(message, chunks[4]);
                }

                f.render_widget(
                    key_hints(
                        &[("Tab", "次の項目"), ("Ctrl+S", "保存して感情分析"), ("Esc", "キャンセル")],
                        palette,
                    ),
                    chunks[5],
                );
            })?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if is_ctrl(&key, 's') {
                return Ok(Some(draft));
            }
            let value = match focus {
                FormField::Date => &mut draft.date,
                FormField::Title => &mut draft.title,
                FormField::Content => &mut draft.content,
            };
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Tab => focus = focus.next(),
                KeyCode::BackTab => focus = focus.previous(),
                KeyCode::Enter if focus == FormField::Content => value.push('\n'),
                KeyCode::Enter => focus = focus.next(),
                KeyCode::Char(c) => value.push(c),
                KeyCode::Backspace => {
                    value.pop();
                }
                _ => {}
            }
        }
    }

    /// Lists every entry. Returns the id of an entry the author chose to
    /// delete from its detail view.
    pub fn view_entries(&mut self, entries: &[DiaryEntry]) -> Result<Option<String>> {
        let palette = self.palette;
        let mut selected_index = 0;

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(2),
                    ])
                    .split(f.area());

                f.render_widget(heading("日記一覧", palette), chunks[0]);

                let items: Vec<ListItem> = entries.iter().map(|e| entry_item(e, palette)).collect();
                let entries_list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("日記"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");

                f.render_stateful_widget(
                    entries_list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                f.render_widget(
                    key_hints(&[("↑/↓", "移動"), ("Enter", "詳細"), ("Esc", "戻る")], palette),
                    chunks[2],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < entries.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(entry) = entries.get(selected_index) {
                            if self.view_full_entry(entry)? {
                                return Ok(Some(entry.id.clone()));
                            }
                        }
                    }
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }

    /// Shows one entry with its analysis. Returns true when the author
    /// confirmed deleting it.
    fn view_full_entry(&mut self, entry: &DiaryEntry) -> Result<bool> {
        let palette = self.palette;
        let mut confirming = false;

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(6),
                        Constraint::Length(9),
                        Constraint::Length(2),
                    ])
                    .split(f.area());

                f.render_widget(
                    heading(
                        &format!("{}  ({})", entry.title, entry.date.format("%Y年%m月%d日")),
                        palette,
                    ),
                    chunks[0],
                );

                let content = Paragraph::new(entry.content.clone())
                    .wrap(Wrap { trim: false })
                    .block(Block::default().borders(Borders::ALL).title("内容"));
                f.render_widget(content, chunks[1]);

                let analysis = Paragraph::new(analysis_lines(entry, palette))
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("感情分析"));
                f.render_widget(analysis, chunks[2]);

                let hints = if confirming {
                    key_hints(&[("y", "削除する"), ("n", "やめる")], palette)
                } else {
                    key_hints(&[("d", "削除"), ("Esc", "戻る")], palette)
                };
                f.render_widget(hints, chunks[3]);
            })?;

            if let Event::Key(key) = event::read()? {
                match (confirming, key.code) {
                    (true, KeyCode::Char('y')) => return Ok(true),
                    (true, _) => confirming = false,
                    (false, KeyCode::Char('d')) => confirming = true,
                    (false, KeyCode::Esc) | (false, KeyCode::Char('q')) => return Ok(false),
                    _ => {}
                }
            }
        }
    }

    /// Live search over `entries`. `filters` is kept by the caller so the
    /// next search starts where this one left off.
    pub fn search(
        &mut self,
        entries: &[DiaryEntry],
        filters: &mut SearchFilters,
        today: NaiveDate,
    ) -> Result<Option<String>> {
        let palette = self.palette;
        let mut selected_index = 0;

        loop {
            let results = filter_entries(entries, filters);
            selected_index = selected_index.min(results.len().saturating_sub(1));

            self.blink();
            let cursor_visible = self.cursor_visible;
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(2),
                        Constraint::Min(6),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(heading("日記を検索", palette), chunks[0]);

                let mut keyword = filters.keyword.clone();
                if cursor_visible {
                    keyword.push('|');
                }
                let search_input = Paragraph::new(keyword)
                    .block(Block::default().borders(Borders::ALL).title("キーワード"));
                f.render_widget(search_input, chunks[1]);

                let range = match (filters.date_from, filters.date_to) {
                    (None, None) => "全期間".to_string(),
                    (from, to) => format!(
                        "{} 〜 {}",
                        from.map(|d| d.to_string()).unwrap_or_default(),
                        to.map(|d| d.to_string()).unwrap_or_default()
                    ),
                };
                let emotion_style = match filters.emotion {
                    EmotionFilter::All => Style::default().fg(palette.text),
                    EmotionFilter::Only(category) => Style::default().fg(category.color()),
                };
                let summary = Paragraph::new(vec![
                    Line::from(vec![
                        Span::raw("感情: "),
                        Span::styled(filters.emotion.label(), emotion_style),
                        Span::raw(format!(
                            "   並び順: {} {}   期間: {}",
                            filters.sort_by.label(),
                            filters.sort_order.label(),
                            range
                        )),
                    ]),
                    Line::from(Span::styled(
                        format!("{} 件中 {} 件を表示", entries.len(), results.len()),
                        Style::default().fg(palette.muted),
                    )),
                ]);
                f.render_widget(summary, chunks[2]);

                let items: Vec<ListItem> = results.iter().map(|e| entry_item(e, palette)).collect();
                let results_list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("検索結果"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    results_list,
                    chunks[3],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                let quick = [
                    QuickRange::Today,
                    QuickRange::Week,
                    QuickRange::Month,
                    QuickRange::Year,
                ];
                let quick_labels: Vec<String> = quick
                    .iter()
                    .enumerate()
                    .map(|(i, range)| format!("F{} {}", i + 1, range.label()))
                    .collect();
                let instructions = Paragraph::new(vec![
                    Line::from(format!(
                        "←/→ 感情  Ctrl+S 並び替え項目  Ctrl+O 昇順/降順  {}  F5 リセット",
                        quick_labels.join("  ")
                    )),
                    Line::from("↑/↓ 移動  Enter 詳細  Esc 戻る"),
                ])
                .style(Style::default().fg(palette.hint))
                .alignment(Alignment::Center);
                f.render_widget(instructions, chunks[4]);
            })?;

            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if is_ctrl(&key, 's') {
                filters.sort_by = filters.sort_by.cycle();
                continue;
            }
            if is_ctrl(&key, 'o') {
                filters.sort_order = filters.sort_order.toggle();
                continue;
            }
            match key.code {
                KeyCode::Esc => return Ok(None),
                KeyCode::Left | KeyCode::Right => filters.emotion = filters.emotion.cycle(),
                KeyCode::F(1) => filters.apply_quick_range(QuickRange::Today, today),
                KeyCode::F(2) => filters.apply_quick_range(QuickRange::Week, today),
                KeyCode::F(3) => filters.apply_quick_range(QuickRange::Month, today),
                KeyCode::F(4) => filters.apply_quick_range(QuickRange::Year, today),
                KeyCode::F(5) => filters.reset(),
                KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                KeyCode::Down => {
                    if selected_index + 1 < results.len() {
                        selected_index += 1;
                    }
                }
                KeyCode::Enter => {
                    if let Some(entry) = results.get(selected_index) {
                        if self.view_full_entry(entry)? {
                            return Ok(Some(entry.id.clone()));
                        }
                    }
                }
                KeyCode::Char(c) => {
                    filters.keyword.push(c);
                    selected_index = 0;
                }
                KeyCode::Backspace => {
                    filters.keyword.pop();
                    selected_index = 0;
                }
                _ => {}
            }
        }
    }

    /// Statistics dashboard. Returns the window that was on screen last.
    pub fn show_stats(&mut self, entries: &[DiaryEntry], window: StatsWindow) -> Result<StatsWindow> {
        let palette = self.palette;
        let mut window = window;
        let mut stats = aggregate(entries, window);

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(11),
                        Constraint::Length(5),
                        Constraint::Min(9),
                        Constraint::Length(2),
                    ])
                    .split(f.area());

                f.render_widget(
                    heading(
                        &format!(
                            "感情統計ダッシュボード  [{}]  {} 件",
                            window.label(),
                            stats.total_entries
                        ),
                        palette,
                    ),
                    chunks[0],
                );

                let frequency = Paragraph::new(frequency_lines(&stats, palette))
                    .block(Block::default().borders(Borders::ALL).title("感情の頻度と平均強度"));
                f.render_widget(frequency, chunks[1]);

                let series: Vec<u64> = stats
                    .time_range_data
                    .iter()
                    .rev()
                    .take(SPARKLINE_DAYS)
                    .rev()
                    .map(|day| (day.intensity * 100.0).round() as u64)
                    .collect();
                let sparkline = Sparkline::default()
                    .block(
                        Block::default()
                            .borders(Borders::ALL)
                            .title(format!("日ごとの平均強度 (直近{}日)", series.len())),
                    )
                    .data(&series)
                    .max(100)
                    .style(Style::default().fg(palette.accent));
                f.render_widget(sparkline, chunks[2]);

                let bottom = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(chunks[3]);

                let weekly: Vec<Line> = stats
                    .weekly_pattern
                    .iter()
                    .map(|day| weights_line(day.weekday, &day.emotions, palette))
                    .collect();
                let weekly = Paragraph::new(weekly)
                    .block(Block::default().borders(Borders::ALL).title("曜日別パターン"));
                f.render_widget(weekly, bottom[0]);

                let monthly: Vec<Line> = stats
                    .monthly_trend
                    .iter()
                    .map(|month| {
                        let mut line = weights_line(&format_month(&month.month), &month.emotions, palette);
                        line.spans.push(Span::styled(
                            format!("  強度 {:.0}%", month.average_intensity * 100.0),
                            Style::default().fg(palette.muted),
                        ));
                        line
                    })
                    .collect();
                let monthly = Paragraph::new(monthly)
                    .block(Block::default().borders(Borders::ALL).title("月間トレンド (直近6ヶ月)"));
                f.render_widget(monthly, bottom[1]);

                f.render_widget(
                    key_hints(&[("←/→", "期間を切り替え"), ("Esc", "戻る")], palette),
                    chunks[4],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                        window = window.cycle();
                        stats = aggregate(entries, window);
                    }
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(window),
                    _ => {}
                }
            }
        }
    }

    fn blink(&mut self) {
        let now = Instant::now();
        if now.duration_since(self.last_cursor_update) >= Duration::from_millis(500) {
            self.cursor_visible = !self.cursor_visible;
            self.last_cursor_update = now;
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

fn heading(text: &str, palette: Palette) -> Paragraph<'static> {
    Paragraph::new(text.to_string())
        .style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn key_hints(keys: &[(&str, &str)], palette: Palette) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, (key, action)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), Style::default().add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" {action}")));
    }
    Paragraph::new(Line::from(spans))
        .style(Style::default().fg(palette.hint))
        .alignment(Alignment::Center)
}

fn entry_item(entry: &DiaryEntry, palette: Palette) -> ListItem<'static> {
    let emotion = &entry.emotions.primary;
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(
                format!("[{}] ", entry.date.format("%Y-%m-%d")),
                Style::default().fg(palette.muted),
            ),
            Span::styled(
                entry.title.clone(),
                Style::default()
                    .fg(palette.text)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(emotion.label(), Style::default().fg(emotion.color())),
            Span::styled(
                format!(" {:.0}%", entry.emotions.intensity * 100.0),
                Style::default().fg(palette.muted),
            ),
        ]),
        Line::from(Span::styled(
            format!("    {}", entry.preview()),
            Style::default().fg(palette.muted),
        )),
    ])
}

fn analysis_lines(entry: &DiaryEntry, palette: Palette) -> Vec<Line<'static>> {
    let analysis = &entry.emotions;
    let muted = Style::default().fg(palette.muted);
    let emotion_span = |emotion: &Emotion| {
        Span::styled(
            emotion.label(),
            Style::default()
                .fg(emotion.color())
                .add_modifier(Modifier::BOLD),
        )
    };

    let mut lines = vec![Line::from(vec![
        Span::styled("主な感情: ", muted),
        emotion_span(&analysis.primary),
    ])];
    if let Some(secondary) = &analysis.secondary {
        lines.push(Line::from(vec![
            Span::styled("副次的な感情: ", muted),
            emotion_span(secondary),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("強度: ", muted),
        Span::raw(format!(
            "{} {:.0}%",
            bar(analysis.intensity, 1.0, BAR_WIDTH / 2),
            analysis.intensity * 100.0
        )),
    ]));
    lines.push(Line::from(vec![
        Span::styled("信頼度: ", muted),
        Span::raw(format!("{:.0}%", analysis.confidence * 100.0)),
    ]));
    let keywords = if analysis.keywords.is_empty() {
        "(なし)".to_string()
    } else {
        analysis.keywords.join(", ")
    };
    lines.push(Line::from(vec![
        Span::styled("検出キーワード: ", muted),
        Span::raw(keywords),
    ]));
    lines.push(Line::from(Span::styled(
        format!(
            "作成日時: {}",
            entry.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        ),
        muted,
    )));
    lines
}

fn frequency_lines(stats: &EmotionStats, palette: Palette) -> Vec<Line<'static>> {
    let ranked = stats.ranked_emotions();
    let Some(&(_, max)) = ranked.first() else {
        return vec![Line::from(Span::styled(
            "この期間の日記はありません",
            Style::default().fg(palette.muted),
        ))];
    };

    ranked
        .into_iter()
        .map(|(emotion, weight)| {
            let average = stats.average_intensity.get(&emotion).copied().unwrap_or(0.0);
            Line::from(vec![
                Span::raw(pad(emotion.label(), 8)),
                Span::styled(bar(weight, max, BAR_WIDTH), Style::default().fg(emotion.color())),
                Span::raw(format!(" {weight:>5.1}")),
                Span::styled(
                    format!("  平均強度 {:.0}%", average * 100.0),
                    Style::default().fg(palette.muted),
                ),
            ])
        })
        .collect()
}

/// `label` followed by the dominant emotion and the total weight.
fn weights_line(label: &str, weights: &EmotionWeights, palette: Palette) -> Line<'static> {
    let mut spans = vec![Span::raw(pad(label, 12))];
    match dominant(weights) {
        Some(emotion) => {
            let total: f64 = weights.values().sum();
            spans.push(Span::styled(
                pad(emotion.label(), 8),
                Style::default().fg(emotion.color()),
            ));
            spans.push(Span::styled(
                format!("計 {total:.1}"),
                Style::default().fg(palette.muted),
            ));
        }
        None => spans.push(Span::styled("-", Style::default().fg(palette.muted))),
    }
    Line::from(spans)
}

/// Heaviest emotion, earliest declared on ties.
fn dominant(weights: &EmotionWeights) -> Option<&Emotion> {
    weights
        .iter()
        .fold(None, |best: Option<(&Emotion, f64)>, (emotion, weight)| match best {
            Some((_, top)) if top >= *weight => best,
            _ => Some((emotion, *weight)),
        })
        .map(|(emotion, _)| emotion)
}

fn format_month(month: &str) -> String {
    match month.split_once('-') {
        Some((year, month)) => format!("{year}年{month}月"),
        None => month.to_string(),
    }
}

fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    let filled = filled.clamp(1, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Pads to a display width; Japanese labels are two columns per character.
fn pad(text: &str, width: usize) -> String {
    let used = text.width();
    format!("{text}{}", " ".repeat(width.saturating_sub(used)))
}
