//! セッション設定
//!
//! 既定値 → 設定ファイル → 環境変数 → コマンドライン の順に上書きして決定する

use crate::error::{ConfigError, LineditError, Result};
use crate::file::DEFAULT_HISTORY_FILE;
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 履歴ファイルの場所を上書きする環境変数
pub const HISTORY_ENV: &str = "LINEDIT_HISTORY";
/// 設定されていればデバッグログを有効にする環境変数
pub const DEBUG_ENV: &str = "LINEDIT_DEBUG";

/// セッション全体の設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// 終了時に編集履歴を書き出すファイル
    pub history_path: PathBuf,
    /// 上書き保存の前にタイムスタンプ付きバックアップを作るか
    pub backups: bool,
    /// stderr に加えてログを書き出すファイル
    pub log_path: Option<PathBuf>,
    pub log_level: LogLevel,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(DEFAULT_HISTORY_FILE),
            backups: true,
            log_path: None,
            log_level: LogLevel::default(),
        }
    }
}

/// 部分的な上書き設定（環境変数・コマンドライン由来）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub history_path: Option<PathBuf>,
    pub backups: Option<bool>,
    pub log_path: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
}

impl OptionOverrides {
    /// プロセス環境変数から読み取る
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の参照関数から読み取る
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            history_path: lookup(HISTORY_ENV)
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            backups: None,
            log_path: None,
            log_level: lookup(DEBUG_ENV).map(|_| LogLevel::Debug),
        }
    }
}

impl SessionOptions {
    /// JSON 設定ファイルを読み込む（省略した項目は既定値）
    pub fn load_file(path: &Path) -> Result<Self> {
        let invalid = |message: String| {
            LineditError::Config(ConfigError::InvalidFile {
                path: path.display().to_string(),
                message,
            })
        };
        let raw = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| invalid(e.to_string()))
    }

    /// 既定の設定ファイル位置（`~/.linedit/config.json`）
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".linedit").join("config.json"))
    }

    pub fn merged_with(&self, overrides: &OptionOverrides) -> SessionOptions {
        SessionOptions {
            history_path: overrides
                .history_path
                .clone()
                .unwrap_or_else(|| self.history_path.clone()),
            backups: overrides.backups.unwrap_or(self.backups),
            log_path: overrides
                .log_path
                .clone()
                .or_else(|| self.log_path.clone()),
            log_level: overrides.log_level.unwrap_or(self.log_level),
        }
    }

    /// 設定を確定する
    ///
    /// `config` が明示されていれば必ず読み込み、なければ既定位置に存在する場合のみ読む。
    pub fn resolve(config: Option<&Path>, cli: &OptionOverrides) -> Result<Self> {
        let base = match config {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_config_path() {
                Some(path) if path.is_file() => Self::load_file(&path)?,
                _ => Self::default(),
            },
        };

        let resolved = base
            .merged_with(&OptionOverrides::from_env())
            .merged_with(cli);
        resolved.validate()?;
        Ok(resolved)
    }

    fn validate(&self) -> Result<()> {
        if self.history_path.as_os_str().is_empty() {
            return Err(LineditError::Config(ConfigError::InvalidValue {
                key: "history_path".to_string(),
                value: String::new(),
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let options = SessionOptions::default();
        assert_eq!(options.history_path, PathBuf::from("edit_history.json"));
        assert!(options.backups);
        assert_eq!(options.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "backups": false, "log_level": "info" }"#).unwrap();

        let options = SessionOptions::load_file(&path).unwrap();
        assert!(!options.backups);
        assert_eq!(options.log_level, LogLevel::Info);
        assert_eq!(options.history_path, PathBuf::from("edit_history.json"));
    }

    #[test]
    fn test_invalid_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "backups = false").unwrap();

        assert!(matches!(
            SessionOptions::load_file(&path),
            Err(LineditError::Config(ConfigError::InvalidFile { .. }))
        ));
    }

    #[test]
    fn test_overrides_take_precedence() {
        let base = SessionOptions {
            log_path: Some(PathBuf::from("base.log")),
            ..SessionOptions::default()
        };
        let overrides = OptionOverrides {
            history_path: Some(PathBuf::from("custom.json")),
            backups: Some(false),
            ..OptionOverrides::default()
        };

        let merged = base.merged_with(&overrides);
        assert_eq!(merged.history_path, PathBuf::from("custom.json"));
        assert!(!merged.backups);
        assert_eq!(merged.log_path, Some(PathBuf::from("base.log")));
    }

    #[test]
    fn test_env_lookup() {
        let overrides = OptionOverrides::from_lookup(|key| match key {
            HISTORY_ENV => Some("/tmp/h.json".to_string()),
            DEBUG_ENV => Some("1".to_string()),
            _ => None,
        });
        assert_eq!(overrides.history_path, Some(PathBuf::from("/tmp/h.json")));
        assert_eq!(overrides.log_level, Some(LogLevel::Debug));

        let empty = OptionOverrides::from_lookup(|_| None);
        assert_eq!(empty, OptionOverrides::default());
    }

    #[test]
    fn test_resolve_with_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "history_path": "from_file.json" }"#).unwrap();

        let cli = OptionOverrides {
            backups: Some(false),
            ..OptionOverrides::default()
        };
        let options = SessionOptions::resolve(Some(&path), &cli).unwrap();
        assert!(!options.backups);
        if std::env::var(HISTORY_ENV).is_err() {
            assert_eq!(options.history_path, PathBuf::from("from_file.json"));
        }
    }
}
