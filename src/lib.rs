//! linedit - menu-driven line editor with undo/redo history
//!
//! 行単位のテキスト編集とスナップショット履歴

// コアモジュール
pub mod error;
pub mod logging;
pub mod options;

// データ層
pub mod buffer;
pub mod file;

// 編集層
pub mod editor;
pub mod search;

// ロジック層
pub mod input;
pub mod session;

// 対話層
pub mod app;

// 公開API
pub use app::App;
pub use error::{LineditError, Result};
pub use session::{CommandResult, CommandSession, Intent};
