//! バッファモジュール
//!
//! 編集中ファイルの識別情報と内容を保持し、ストレージとの読み書きを担う

use crate::error::Result;
use crate::file::Storage;
use crate::search::{replace_all, ReplaceOutcome};
use std::path::{Path, PathBuf};

/// 保存方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveMode {
    /// ファイル全体を置き換える
    Overwrite,
    /// 末尾に連結する
    Append,
}

impl SaveMode {
    pub fn is_append(self) -> bool {
        matches!(self, SaveMode::Append)
    }
}

/// 編集中のファイルと内容
#[derive(Debug, Clone, Default)]
pub struct BufferStore {
    filename: Option<PathBuf>,
    content: String,
    backup_on_overwrite: bool,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 上書き保存の前にバックアップを取るかを設定
    pub fn with_backups(mut self, enabled: bool) -> Self {
        self.backup_on_overwrite = enabled;
        self
    }

    pub fn backups_enabled(&self) -> bool {
        self.backup_on_overwrite
    }

    /// 開いているファイル（一度も開いていなければ `None`）
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn set_content(&mut self, content: String) {
        self.content = content;
    }

    /// 既存ファイルを読み込み、アクティブにする
    pub fn open<S: Storage>(&mut self, storage: &S, path: &Path) -> Result<(&Path, &str)> {
        let content = storage.read_text(path)?;
        log::debug!("opened {} ({} bytes)", path.display(), content.len());
        Ok(self.activate(path.to_path_buf(), content))
    }

    /// 空ファイルを作成し、アクティブにする
    pub fn create<S: Storage>(&mut self, storage: &S, path: &Path) -> Result<(&Path, &str)> {
        storage.create_empty(path)?;
        log::debug!("created {}", path.display());
        Ok(self.activate(path.to_path_buf(), String::new()))
    }

    fn activate(&mut self, path: PathBuf, content: String) -> (&Path, &str) {
        self.content = content;
        let filename = self.filename.insert(path);
        (filename.as_path(), self.content.as_str())
    }

    /// `text` を保存する。上書き時に作成したバックアップのパスを返す
    ///
    /// 失敗時はバッファの内容を変更しない。
    pub fn save<S: Storage>(
        &self,
        storage: &S,
        path: &Path,
        text: &str,
        mode: SaveMode,
    ) -> Result<Option<PathBuf>> {
        self.save_with_backup(storage, path, text, mode, self.backup_on_overwrite)
    }

    /// バックアップ方針を呼び出し側で指定して保存する
    pub fn save_with_backup<S: Storage>(
        &self,
        storage: &S,
        path: &Path,
        text: &str,
        mode: SaveMode,
        backup: bool,
    ) -> Result<Option<PathBuf>> {
        let backup = if mode == SaveMode::Overwrite && backup && storage.exists(path) {
            let backup = storage.backup(path)?;
            log::info!("backup created: {}", backup.display());
            Some(backup)
        } else {
            None
        };

        storage.write_text(path, text, mode.is_append())?;
        log::debug!("saved {} ({:?}, {} bytes)", path.display(), mode, text.len());
        Ok(backup)
    }

    /// リテラル文字列の一括置換
    pub fn search_replace(content: &str, search: &str, replacement: &str) -> (String, bool) {
        let ReplaceOutcome { content, replaced } = replace_all(content, search, replacement);
        (content, replaced > 0)
    }

    /// 既存内容の末尾に入力テキストを連結した内容
    pub fn append_text(&self, text: &str) -> String {
        let mut combined = String::with_capacity(self.content.len() + text.len());
        combined.push_str(&self.content);
        combined.push_str(text);
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FileError, LineditError};
    use crate::file::FsStorage;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_open_missing_file_keeps_buffer() {
        let dir = tempdir().unwrap();
        let mut buffer = BufferStore::new();

        let result = buffer.open(&FsStorage, &dir.path().join("missing.txt"));
        assert!(matches!(
            result,
            Err(LineditError::File(FileError::NotFound { .. }))
        ));
        assert!(buffer.filename().is_none());
        assert_eq!(buffer.content(), "");
    }

    #[test]
    fn test_create_then_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let mut buffer = BufferStore::new();

        let (name, content) = buffer.create(&FsStorage, &path).unwrap();
        assert_eq!(name, path.as_path());
        assert_eq!(content, "");

        let (_, content) = buffer.open(&FsStorage, &path).unwrap();
        assert_eq!(content, "");
        assert_eq!(buffer.filename(), Some(path.as_path()));
    }

    #[test]
    fn test_create_existing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("exists.txt");
        fs::write(&path, "data").unwrap();

        let mut buffer = BufferStore::new();
        assert!(matches!(
            buffer.create(&FsStorage, &path),
            Err(LineditError::File(FileError::AlreadyExists { .. }))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn test_overwrite_with_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "old\n").unwrap();

        let buffer = BufferStore::new().with_backups(true);
        let backup = buffer
            .save(&FsStorage, &path, "new\n", SaveMode::Overwrite)
            .unwrap()
            .expect("backup path");

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "old\n");
    }

    #[test]
    fn test_append_never_backs_up() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "old\n").unwrap();

        let buffer = BufferStore::new().with_backups(true);
        let backup = buffer
            .save(&FsStorage, &path, "more\n", SaveMode::Append)
            .unwrap();

        assert!(backup.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), "old\nmore\n");
    }

    #[test]
    fn test_search_replace_contract() {
        assert_eq!(
            BufferStore::search_replace("hello world", "world", "there"),
            ("hello there".to_string(), true)
        );
        assert_eq!(
            BufferStore::search_replace("hello world", "moon", "there"),
            ("hello world".to_string(), false)
        );
    }

    #[test]
    fn test_append_text() {
        let mut buffer = BufferStore::new();
        buffer.set_content("line1\n".to_string());
        assert_eq!(buffer.append_text("line2\n"), "line1\nline2\n");
    }
}
