use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiaryError {
    #[error("タイトルを入力してください")]
    EmptyTitle,

    #[error("内容を入力してください")]
    EmptyContent,

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to parse {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
