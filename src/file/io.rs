//! ファイルI/O操作
//!
//! セッションが利用するストレージ境界と、そのファイルシステム実装

use crate::error::{FileError, LineditError, Result};
use chrono::{DateTime, Local};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// バックアップファイル名に付与するタイムスタンプ形式
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// ストレージ操作のトレイト
pub trait Storage {
    /// パスが存在するかチェック
    fn exists(&self, path: &Path) -> bool;

    /// ファイル全体をテキストとして読み込み
    fn read_text(&self, path: &Path) -> Result<String>;

    /// テキストを書き込み（`append` が真なら末尾に連結）
    fn write_text(&self, path: &Path, text: &str, append: bool) -> Result<()>;

    /// 空ファイルを新規作成（既存なら `AlreadyExists`）
    fn create_empty(&self, path: &Path) -> Result<()>;

    /// 上書き前のバックアップを作成し、そのパスを返す
    fn backup(&self, path: &Path) -> Result<PathBuf>;

    /// ファイルを削除
    fn remove(&self, path: &Path) -> Result<()>;
}

/// ファイルシステム上のストレージ
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

fn file_error(error: &std::io::Error, path: &Path) -> LineditError {
    LineditError::File(FileError::from_io(error, &path.display().to_string()))
}

fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| file_error(&e, parent))?;
        }
    }
    Ok(())
}

impl Storage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        // ディレクトリではないことを確認
        if path.is_dir() {
            return Err(LineditError::File(FileError::InvalidPath {
                path: path.display().to_string(),
            }));
        }

        fs::read_to_string(path).map_err(|e| file_error(&e, path))
    }

    fn write_text(&self, path: &Path, text: &str, append: bool) -> Result<()> {
        create_parent_dirs(path)?;

        if append {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| file_error(&e, path))?;
            file.write_all(text.as_bytes())
                .map_err(|e| file_error(&e, path))?;
            return Ok(());
        }

        // 一時ファイルに書き込んでからアトミックに移動
        let temp_path = temp_path_for(path)?;
        fs::write(&temp_path, text).map_err(|e| file_error(&e, &temp_path))?;
        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            file_error(&e, path)
        })?;

        Ok(())
    }

    fn create_empty(&self, path: &Path) -> Result<()> {
        create_parent_dirs(path)?;
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| file_error(&e, path))?;
        Ok(())
    }

    fn backup(&self, path: &Path) -> Result<PathBuf> {
        if !path.is_file() {
            return Err(LineditError::File(FileError::NotFound {
                path: path.display().to_string(),
            }));
        }

        let backup_path = backup_path_for(path, Local::now());
        fs::copy(path, &backup_path).map_err(|e| file_error(&e, &backup_path))?;

        Ok(backup_path)
    }

    fn remove(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|e| file_error(&e, path))
    }
}

/// バックアップファイルパスを生成（`notes.txt` → `notes.txt.20240101120000.bak`）
pub fn backup_path_for(path: &Path, now: DateTime<Local>) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let backup_name = format!("{}.{}.bak", file_name, now.format(BACKUP_TIMESTAMP_FORMAT));
    path.with_file_name(backup_name)
}

fn temp_path_for(original: &Path) -> Result<PathBuf> {
    let filename = original.file_name().ok_or_else(|| {
        LineditError::File(FileError::InvalidPath {
            path: original.display().to_string(),
        })
    })?;

    // 一意な一時ファイル名生成
    let temp_name = format!(".{}_{}", filename.to_string_lossy(), std::process::id());

    Ok(original.with_file_name(temp_name))
}
