//! ファイル操作モジュール
//!
//! ストレージ境界、パス展開、履歴の永続化

pub mod history_store;
pub mod io;
pub mod path;

pub use history_store::{HistoryRecord, HistoryStore, DEFAULT_HISTORY_FILE};
pub use io::{backup_path_for, FsStorage, Storage};
pub use path::expand_path;
