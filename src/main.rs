mod ui;

use chrono::Local;
use color_eyre::eyre::{eyre, Result};
use emotion_diary::{
    init_tracing, DiaryConfig, DiaryState, EntryStore, FileStore, SearchFilters, SystemAppearance,
    ThemeStore,
};
use std::fs;
use tracing::{info, warn};
use ui::{Action, EntryDraft, UI};

const EXPORT_FILE: &str = "emotion_diary_export.json";
const IMPORT_FILE: &str = "emotion_diary_import.json";

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = DiaryConfig::load().map_err(|e| eyre!("Failed to load config: {}", e))?;
    let data_dir = config.data_dir();
    let _log_guard = init_tracing(&data_dir, config.log_level(), config.log_format());
    info!(data_dir = %data_dir.display(), "Starting emotion diary");

    let themes = ThemeStore::new(FileStore::new(&data_dir));
    let system = SystemAppearance::detect();
    let mut theme = themes.load(config.theme());

    let mut diary_state = DiaryState::open(EntryStore::new(FileStore::new(&data_dir)));
    let mut window = config.default_window();
    let mut filters = SearchFilters::default();
    let mut status = String::new();

    let mut ui = UI::new(theme.palette(system))?;

    loop {
        ui.display(diary_state.entries(), &status, theme)?;

        if let Some(action) = ui.handle_input(!diary_state.entries().is_empty())? {
            status.clear();
            match action {
                Action::Write => {
                    let today = Local::now().date_naive();
                    let mut draft = EntryDraft::new(today);
                    let mut error: Option<String> = None;
                    while let Some(submitted) = ui.get_new_entry(draft, error.as_deref())? {
                        let Some(date) = submitted.parsed_date() else {
                            error = Some("日付は YYYY-MM-DD 形式で入力してください".to_string());
                            draft = submitted;
                            continue;
                        };
                        match diary_state.create_entry(&submitted.title, &submitted.content, date) {
                            Ok(entry) => {
                                status = format!(
                                    "「{}」を保存しました: {}",
                                    entry.title,
                                    entry.emotions.primary.label()
                                );
                                break;
                            }
                            Err(e) => {
                                error = Some(e.to_string());
                                draft = submitted;
                            }
                        }
                    }
                }
                Action::View => {
                    if let Some(id) = ui.view_entries(diary_state.entries())? {
                        if diary_state.delete_entry(&id) {
                            status = "日記を削除しました".to_string();
                        }
                    }
                }
                Action::Search => {
                    let today = Local::now().date_naive();
                    if let Some(id) = ui.search(diary_state.entries(), &mut filters, today)? {
                        if diary_state.delete_entry(&id) {
                            status = "日記を削除しました".to_string();
                        }
                    }
                }
                Action::Stats => {
                    window = ui.show_stats(diary_state.entries(), window)?;
                }
                Action::Theme => {
                    theme = theme.next();
                    themes.save(theme);
                    ui.set_palette(theme.palette(system));
                    status = format!("テーマ: {}", theme.label());
                }
                Action::Export => {
                    let path = data_dir.join(EXPORT_FILE);
                    status = match fs::write(&path, diary_state.export()) {
                        Ok(()) => format!("{} に書き出しました", path.display()),
                        Err(e) => {
                            warn!(error = %e, path = %path.display(), "Export failed");
                            format!("書き出しに失敗しました: {}", e)
                        }
                    };
                }
                Action::Import => {
                    let path = data_dir.join(IMPORT_FILE);
                    status = match fs::read_to_string(&path) {
                        Ok(json) if diary_state.import(&json) => {
                            format!("{} 件の日記を読み込みました", diary_state.entries().len())
                        }
                        Ok(_) => "読み込めませんでした: 日記の一覧ではありません".to_string(),
                        Err(e) => {
                            warn!(error = %e, path = %path.display(), "Import failed");
                            format!("{} を読み込めませんでした: {}", path.display(), e)
                        }
                    };
                }
                Action::Quit => break,
            }
        }
    }

    info!("Exiting emotion diary");
    Ok(())
}
