use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 履歴ファイルに書き出すタイムスタンプ形式
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// バッファ全体のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(with = "timestamp_format")]
    timestamp: DateTime<Local>,
    content: String,
}

impl Snapshot {
    pub fn new(content: String) -> Self {
        Self::at(Local::now(), content)
    }

    pub fn at(timestamp: DateTime<Local>, content: String) -> Self {
        Self { timestamp, content }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// undo/redo の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// スナップショットを移動し、新しい内容になった
    Moved(String),
    /// これ以上戻れない（内容は空、または現在のまま）
    NothingToUndo(String),
    /// やり直せる変更がない
    NothingToRedo(String),
}

impl Step {
    pub fn content(&self) -> &str {
        match self {
            Step::Moved(content) | Step::NothingToUndo(content) | Step::NothingToRedo(content) => {
                content
            }
        }
    }

    pub fn into_content(self) -> String {
        match self {
            Step::Moved(content) | Step::NothingToUndo(content) | Step::NothingToRedo(content) => {
                content
            }
        }
    }

    pub fn is_exhausted(&self) -> bool {
        !matches!(self, Step::Moved(_))
    }
}

/// 編集履歴スタック
///
/// `past` は古い順に並び、末尾が現在の状態。`future` は末尾が直近に取り消したもの。
#[derive(Debug, Clone, Default)]
pub struct EditHistory {
    past: Vec<Snapshot>,
    future: Vec<Snapshot>,
}

impl EditHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しい内容を記録する。やり直し用の分岐は破棄される
    pub fn record(&mut self, content: String) {
        self.push(Snapshot::new(content));
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        self.past.push(snapshot);
        if !self.future.is_empty() {
            log::debug!("discarding {} redo snapshot(s)", self.future.len());
            self.future.clear();
        }
    }

    /// 1つ前の状態に戻す
    ///
    /// 唯一のスナップショットを取り消した場合も `future` へ移し、内容は空になる。
    pub fn undo(&mut self) -> Step {
        let Some(snapshot) = self.past.pop() else {
            return Step::NothingToUndo(String::new());
        };
        self.future.push(snapshot);

        match self.past.last() {
            Some(previous) => Step::Moved(previous.content.clone()),
            None => Step::NothingToUndo(String::new()),
        }
    }

    /// 直前に取り消した状態をやり直す
    pub fn redo(&mut self) -> Step {
        let Some(snapshot) = self.future.pop() else {
            return Step::NothingToRedo(self.current().unwrap_or_default().to_string());
        };
        let content = snapshot.content.clone();
        self.past.push(snapshot);
        Step::Moved(content)
    }

    /// 現在の内容（`past` の末尾）
    pub fn current(&self) -> Option<&str> {
        self.past.last().map(Snapshot::content)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn past(&self) -> &[Snapshot] {
        &self.past
    }

    /// 直近に取り消したものが末尾
    pub fn future(&self) -> &[Snapshot] {
        &self.future
    }

    pub fn is_empty(&self) -> bool {
        self.past.is_empty() && self.future.is_empty()
    }

    pub fn into_past(self) -> Vec<Snapshot> {
        self.past
    }
}

mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Local>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&timestamp.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map_err(serde::de::Error::custom)?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| serde::de::Error::custom(format!("nonexistent local time: {raw}")))
    }
}
