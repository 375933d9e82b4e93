//! コマンドセッション
//!
//! ユーザーの1操作をバッファ・編集履歴・ストレージへの一連の処理に対応付ける

use crate::buffer::{BufferStore, SaveMode};
use crate::editor::history::{EditHistory, Step};
use crate::error::{self, FileError, LineditError, Result};
use crate::file::{HistoryRecord, HistoryStore, Storage};
use crate::options::SessionOptions;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

/// ユーザーの操作意図
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// 既存ファイルを開き、入力テキストで置き換える
    OpenOverwrite(PathBuf),
    /// 既存ファイルを開き、入力テキストを末尾に追加する
    OpenAppend(PathBuf),
    /// 新規ファイルを作成し、入力テキストを書き込む
    Create(PathBuf),
    /// 既存ファイルを開き、リテラル文字列を一括置換する
    SearchReplace(PathBuf),
    Undo,
    Redo,
    Exit,
}

impl Intent {
    /// バッファ内容を変更しうる操作か
    pub fn is_content_changing(&self) -> bool {
        matches!(
            self,
            Intent::OpenOverwrite(_)
                | Intent::OpenAppend(_)
                | Intent::Create(_)
                | Intent::SearchReplace(_)
        )
    }
}

/// 編集テキストの入力元
///
/// 対象ファイルを開けた後にだけ呼ばれる。
pub trait EditInput {
    /// SAVE までの複数行テキストを読む
    fn read_text(&mut self, mode: SaveMode) -> Result<String>;

    /// 検索語と置換語を読む
    fn read_replace_terms(&mut self) -> Result<(String, String)>;
}

/// コマンド実行の結果
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// 実行が成功したか
    pub success: bool,
    /// 表示するステータスメッセージ（表示順）
    pub messages: Vec<String>,
    /// 失敗の原因
    pub error: Option<LineditError>,
    /// アプリケーションを終了するか
    pub should_quit: bool,
}

impl CommandResult {
    /// メッセージ付き成功結果を作成
    pub fn success(messages: Vec<String>) -> Self {
        Self {
            success: true,
            messages,
            error: None,
            should_quit: false,
        }
    }

    /// 処理は行われなかったがエラーではない結果（undo/redo の行き止まり）
    pub fn soft(message: impl Into<String>) -> Self {
        Self {
            success: false,
            messages: vec![message.into()],
            error: None,
            should_quit: false,
        }
    }

    /// エラー結果を作成
    pub fn failure(error: LineditError) -> Self {
        Self {
            success: false,
            messages: vec![error::status_message(&error)],
            error: Some(error),
            should_quit: false,
        }
    }

    /// 終了結果を作成
    pub fn quit(success: bool, messages: Vec<String>) -> Self {
        Self {
            success,
            messages,
            error: None,
            should_quit: true,
        }
    }

    /// ファイル名の再入力で回復できる失敗か
    pub fn is_recoverable(&self) -> bool {
        self.error
            .as_ref()
            .map(LineditError::is_recoverable)
            .unwrap_or(false)
    }

    pub fn message(&self) -> String {
        self.messages.join("\n")
    }
}

/// 単一ユーザーの編集セッション
///
/// バッファと編集履歴はこのセッションだけが所有する。
pub struct CommandSession<S: Storage> {
    storage: S,
    buffer: BufferStore,
    history: EditHistory,
    history_store: Option<HistoryStore>,
    started: DateTime<Local>,
}

impl<S: Storage> CommandSession<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            buffer: BufferStore::new(),
            history: EditHistory::new(),
            history_store: None,
            started: Local::now(),
        }
    }

    /// 設定からセッションを構築
    pub fn with_options(storage: S, options: &SessionOptions) -> Self {
        let mut session = Self::new(storage);
        session.buffer = BufferStore::new().with_backups(options.backups);
        session.history_store = Some(HistoryStore::new(options.history_path.clone()));
        session
    }

    pub fn with_history_store(mut self, store: HistoryStore) -> Self {
        self.history_store = Some(store);
        self
    }

    pub fn buffer(&self) -> &BufferStore {
        &self.buffer
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// 開く前の存在確認（読み込みは `execute` で行う）
    pub fn check_exists(&self, path: &Path) -> Result<()> {
        if self.storage.exists(path) {
            Ok(())
        } else {
            Err(LineditError::File(FileError::NotFound {
                path: path.display().to_string(),
            }))
        }
    }

    /// 操作を1つ実行する
    pub fn execute<I>(&mut self, intent: Intent, input: &mut I) -> CommandResult
    where
        I: EditInput + ?Sized,
    {
        log::info!("executing {:?}", intent);
        match intent {
            Intent::Undo => self.undo(),
            Intent::Redo => self.redo(),
            Intent::Exit => self.exit(),
            intent => {
                let previous = self.buffer.clone();
                match self.apply_edit(intent, input) {
                    Ok(messages) => CommandResult::success(messages),
                    Err(err) => {
                        log::warn!("edit abandoned: {}", err);
                        // 失敗した操作はバッファも履歴も変更しない
                        self.buffer = previous;
                        CommandResult::failure(err)
                    }
                }
            }
        }
    }

    fn apply_edit<I>(&mut self, intent: Intent, input: &mut I) -> Result<Vec<String>>
    where
        I: EditInput + ?Sized,
    {
        match intent {
            Intent::OpenOverwrite(path) => {
                let mut messages = vec![self.open_message(&path)?];
                let text = input.read_text(SaveMode::Overwrite)?;
                let saved = self.commit(&path, text.clone(), &text, SaveMode::Overwrite, true)?;
                messages.extend(saved);
                Ok(messages)
            }
            Intent::OpenAppend(path) => {
                let mut messages = vec![self.open_message(&path)?];
                let text = input.read_text(SaveMode::Append)?;
                let combined = self.buffer.append_text(&text);
                let saved = self.commit(&path, combined, &text, SaveMode::Append, false)?;
                messages.extend(saved);
                Ok(messages)
            }
            Intent::Create(path) => {
                self.buffer.create(&self.storage, &path)?;
                let filled = self.fill_created(&path, input);
                if filled.is_err() {
                    // 中断した新規作成は空ファイルを残さない
                    if let Err(err) = self.storage.remove(&path) {
                        log::warn!("could not remove {}: {}", path.display(), err);
                    }
                }
                filled
            }
            Intent::SearchReplace(path) => {
                let mut messages = vec![self.open_message(&path)?];
                let (search, replacement) = input.read_replace_terms()?;
                let (content, matched) =
                    BufferStore::search_replace(self.buffer.content(), &search, &replacement);

                if matched {
                    messages.push(format!(
                        "Replaced all occurrences of '{}' with '{}'.",
                        search, replacement
                    ));
                    let saved =
                        self.commit(&path, content.clone(), &content, SaveMode::Overwrite, true)?;
                    messages.extend(saved);
                } else {
                    // ファイルは変わらないので保存せず、開いた内容だけ履歴に残す
                    messages.push(format!("'{}' not found in the content.", search));
                    self.history.record(content);
                }
                Ok(messages)
            }
            Intent::Undo | Intent::Redo | Intent::Exit => Ok(Vec::new()),
        }
    }

    fn fill_created<I>(&mut self, path: &Path, input: &mut I) -> Result<Vec<String>>
    where
        I: EditInput + ?Sized,
    {
        let mut messages = vec![format!("Created new file '{}'.", path.display())];
        let text = input.read_text(SaveMode::Overwrite)?;
        // 作成直後の空ファイルはバックアップしない
        let saved = self.commit(path, text.clone(), &text, SaveMode::Overwrite, false)?;
        messages.extend(saved);
        Ok(messages)
    }

    fn open_message(&mut self, path: &Path) -> Result<String> {
        self.buffer.open(&self.storage, path)?;
        Ok(format!("Opened file '{}'.", path.display()))
    }

    /// 保存してからバッファと履歴を更新する
    fn commit(
        &mut self,
        path: &Path,
        content: String,
        written: &str,
        mode: SaveMode,
        allow_backup: bool,
    ) -> Result<Vec<String>> {
        let backup = self.buffer.save_with_backup(
            &self.storage,
            path,
            written,
            mode,
            allow_backup && self.buffer.backups_enabled(),
        )?;

        let mut messages = Vec::new();
        if let Some(backup) = backup {
            messages.push(format!("Backup created: {}", backup.display()));
        }
        messages.push(format!("Saved file '{}'.", path.display()));

        self.buffer.set_content(content.clone());
        self.history.record(content);
        Ok(messages)
    }

    fn undo(&mut self) -> CommandResult {
        let had_snapshot = self.history.can_undo();
        let step = self.history.undo();
        let exhausted = step.is_exhausted();
        self.buffer.set_content(step.into_content());

        match (exhausted, had_snapshot) {
            (false, _) => CommandResult::success(vec!["Undo successful.".to_string()]),
            (true, true) => CommandResult::soft("Nothing to undo. Reverting to empty content."),
            (true, false) => CommandResult::soft("Nothing to undo."),
        }
    }

    fn redo(&mut self) -> CommandResult {
        match self.history.redo() {
            Step::Moved(content) => {
                self.buffer.set_content(content);
                CommandResult::success(vec!["Redo successful.".to_string()])
            }
            step => {
                self.buffer.set_content(step.into_content());
                CommandResult::soft("Nothing to redo.")
            }
        }
    }

    /// 最終保存と履歴の書き出し。どちらが失敗しても終了する
    fn exit(&mut self) -> CommandResult {
        let mut messages = Vec::new();
        let mut success = true;

        match self.buffer.filename().map(Path::to_path_buf) {
            Some(path) => {
                match self
                    .buffer
                    .save(&self.storage, &path, self.buffer.content(), SaveMode::Overwrite)
                {
                    Ok(backup) => {
                        if let Some(backup) = backup {
                            messages.push(format!("Backup created: {}", backup.display()));
                        }
                        messages.push(format!("Saved file '{}'.", path.display()));
                    }
                    Err(err) => {
                        log::error!("final save failed: {}", err);
                        messages.push(format!("Error saving file '{}': {}", path.display(), err));
                        success = false;
                    }
                }
            }
            None => log::debug!("no active file, skipping final save"),
        }

        if let Some(store) = &self.history_store {
            let record = HistoryRecord::new(
                self.started,
                self.buffer.filename().map(Path::to_path_buf),
                self.history.past().to_vec(),
            );
            match store.save(&record) {
                Ok(()) => messages.push(format!(
                    "Edit history saved to {}.",
                    store.path().display()
                )),
                Err(err) => {
                    log::error!("history flush failed: {}", err);
                    messages.push(error::status_message(&err));
                    success = false;
                }
            }
        }

        messages.push("Exiting the Simple Text Editor. Goodbye!".to_string());
        CommandResult::quit(success, messages)
    }
}
