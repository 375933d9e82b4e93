//! エディタモジュール
//!
//! 編集履歴（undo/redo）

pub mod history;

pub use history::{EditHistory, Snapshot, Step};
