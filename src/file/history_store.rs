//! 編集履歴の永続化
//!
//! 終了時に `past` 全体を JSON として書き出す

use crate::editor::history::{Snapshot, TIMESTAMP_FORMAT};
use crate::error::{FileError, HistoryError, LineditError, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 既定の履歴ファイル名
pub const DEFAULT_HISTORY_FILE: &str = "edit_history.json";

/// 1セッション分の履歴レコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// セッション開始時刻
    pub session: String,
    /// 終了時に編集していたファイル
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// 古い順のスナップショット
    #[serde(default)]
    pub entries: Vec<Snapshot>,
}

impl HistoryRecord {
    pub fn new(started: DateTime<Local>, file: Option<PathBuf>, entries: Vec<Snapshot>) -> Self {
        Self {
            session: started.format(TIMESTAMP_FORMAT).to_string(),
            file,
            entries,
        }
    }
}

/// 履歴ファイルの読み書き
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// レコードを書き出す（4スペースインデント）
    pub fn save(&self, record: &HistoryRecord) -> Result<()> {
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        record.serialize(&mut serializer).map_err(|e| {
            LineditError::History(HistoryError::Serialize {
                message: e.to_string(),
            })
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
            }
        }
        fs::write(&self.path, buffer).map_err(|e| self.io_error(&e))?;

        log::info!(
            "saved {} history entries to {}",
            record.entries.len(),
            self.path.display()
        );
        Ok(())
    }

    /// 以前のセッションのレコードを読み込む
    pub fn load(&self) -> Result<HistoryRecord> {
        let raw = fs::read_to_string(&self.path).map_err(|e| self.io_error(&e))?;
        serde_json::from_str(&raw).map_err(|e| {
            LineditError::History(HistoryError::Parse {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })
        })
    }

    fn io_error(&self, error: &std::io::Error) -> LineditError {
        LineditError::File(FileError::from_io(error, &self.path.display().to_string()))
    }
}
