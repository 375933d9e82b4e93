//! エラーハンドリングシステム
//!
//! linedit 全体で使用される統一されたエラー型とユーティリティを定義
//! 回復可能なエラーはセッション境界でステータスメッセージに変換する

use std::io;
use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum LineditError {
    /// ファイル操作エラー
    #[error("File operation failed: {0}")]
    File(#[from] FileError),

    /// 履歴永続化エラー
    #[error("History persistence failed: {0}")]
    History(#[from] HistoryError),

    /// 入力処理エラー
    #[error("Input processing failed: {0}")]
    Input(#[from] InputError),

    /// 設定エラー
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// パスエラー
    #[error("Path error: {0}")]
    Path(String),
}

/// ファイル操作固有のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileError {
    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("File already exists: {path}")]
    AlreadyExists { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("IO error: {message}")]
    Io { message: String },
}

impl FileError {
    /// `io::Error` をパス情報付きで分類する
    pub fn from_io(error: &io::Error, path: &str) -> Self {
        let path = path.to_string();
        match error.kind() {
            io::ErrorKind::NotFound => FileError::NotFound { path },
            io::ErrorKind::AlreadyExists => FileError::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => FileError::PermissionDenied { path },
            _ => FileError::Io {
                message: format!("{path}: {error}"),
            },
        }
    }
}

/// 履歴永続化固有のエラー
#[derive(Error, Debug, Clone)]
pub enum HistoryError {
    #[error("Failed to serialize history: {message}")]
    Serialize { message: String },

    #[error("Failed to parse history file {path}: {message}")]
    Parse { path: String, message: String },
}

/// 入力処理固有のエラー
#[derive(Error, Debug, Clone)]
pub enum InputError {
    #[error("Input stream closed")]
    Closed,

    #[error("Failed to read input: {message}")]
    Io { message: String },
}

/// 設定固有のエラー
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid configuration file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// エラーレベル分類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorLevel {
    /// 再入力で回復できる
    Recoverable,
    /// 操作は中止されるがセッションは継続
    Error,
}

impl LineditError {
    /// エラーの重大度を判定
    pub fn level(&self) -> ErrorLevel {
        match self {
            LineditError::File(FileError::NotFound { .. })
            | LineditError::File(FileError::AlreadyExists { .. })
            | LineditError::Path(_) => ErrorLevel::Recoverable,
            _ => ErrorLevel::Error,
        }
    }

    /// ファイル名の再入力で回復できるか
    pub fn is_recoverable(&self) -> bool {
        self.level() == ErrorLevel::Recoverable
    }
}

/// ユーザー向けのステータスメッセージへ変換
pub fn status_message(error: &LineditError) -> String {
    match error {
        LineditError::File(FileError::NotFound { path }) => {
            format!("File '{}' not found. Please try again.", path)
        }
        LineditError::File(FileError::AlreadyExists { path }) => {
            format!(
                "File '{}' already exists. Please choose a different name.",
                path
            )
        }
        LineditError::File(FileError::PermissionDenied { path }) => {
            format!("Permission denied for '{}'.", path)
        }
        LineditError::File(FileError::InvalidPath { path }) => {
            format!("'{}' is not a regular file.", path)
        }
        LineditError::File(FileError::Io { message }) => format!("I/O error: {}", message),
        LineditError::History(err) => format!("Error saving edit history: {}", err),
        LineditError::Path(message) => format!("Invalid path: {}", message),
        _ => format!("Error: {}", error),
    }
}

/// パニックハンドラの設定
pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown location".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s
        } else {
            "Unknown panic payload"
        };

        log::error!("panic at {}: {}", location, message);
        eprintln!("PANIC at {}: {}", location, message);
        std::process::exit(1);
    }));
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, LineditError>;

// std::io::Error から LineditError への変換（パス不明時）
impl From<io::Error> for LineditError {
    fn from(error: io::Error) -> Self {
        LineditError::File(FileError::Io {
            message: error.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_classification() {
        let err = io::Error::new(io::ErrorKind::NotFound, "gone");
        assert_eq!(
            FileError::from_io(&err, "a.txt"),
            FileError::NotFound {
                path: "a.txt".to_string()
            }
        );

        let err = io::Error::new(io::ErrorKind::AlreadyExists, "exists");
        assert!(matches!(
            FileError::from_io(&err, "b.txt"),
            FileError::AlreadyExists { .. }
        ));

        let err = io::Error::new(io::ErrorKind::Other, "disk on fire");
        match FileError::from_io(&err, "c.txt") {
            FileError::Io { message } => assert!(message.contains("c.txt")),
            other => panic!("Expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn test_recoverable_levels() {
        let not_found = LineditError::File(FileError::NotFound {
            path: "x".to_string(),
        });
        assert!(not_found.is_recoverable());

        let io = LineditError::File(FileError::Io {
            message: "boom".to_string(),
        });
        assert_eq!(io.level(), ErrorLevel::Error);

        let closed = LineditError::Input(InputError::Closed);
        assert_eq!(closed.level(), ErrorLevel::Error);
        assert!(!closed.is_recoverable());
    }

    #[test]
    fn test_status_message_mentions_path() {
        let error = LineditError::File(FileError::AlreadyExists {
            path: "notes.txt".to_string(),
        });
        let message = status_message(&error);
        assert!(message.contains("notes.txt"));
        assert!(message.contains("already exists"));
    }
}
