//! メインアプリケーション構造体
//!
//! メニュー表示、入力の検証、セッションへの操作の受け渡しを行う対話ループ

use crate::buffer::SaveMode;
use crate::error::{self, InputError, LineditError, Result};
use crate::file::{expand_path, Storage};
use crate::input::{parse_save_mode, read_line, read_text_block, render_menu, MenuChoice};
use crate::session::{CommandResult, CommandSession, EditInput, Intent};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// 端末とのやり取り
pub struct Prompter<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// メッセージを1行表示
    pub fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.writer, "{}", message)?;
        Ok(())
    }

    /// プロンプトを表示して1行読む。入力終端なら `None`
    pub fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;
        read_line(&mut self.reader).map_err(|e| {
            LineditError::Input(InputError::Io {
                message: e.to_string(),
            })
        })
    }

    fn ask_required(&mut self, prompt: &str) -> Result<String> {
        self.ask(prompt)?
            .ok_or(LineditError::Input(InputError::Closed))
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<R: BufRead, W: Write> EditInput for Prompter<R, W> {
    fn read_text(&mut self, mode: SaveMode) -> Result<String> {
        let banner = match mode {
            SaveMode::Append => {
                "Appending to the file. Enter your text (type 'SAVE' to save and exit):"
            }
            SaveMode::Overwrite => {
                "Overwriting the file. Enter your text (type 'SAVE' to save and exit):"
            }
        };
        self.say(banner)?;
        self.writer.flush()?;
        read_text_block(&mut self.reader).map_err(|e| {
            LineditError::Input(InputError::Io {
                message: e.to_string(),
            })
        })
    }

    fn read_replace_terms(&mut self) -> Result<(String, String)> {
        let search = self.ask_required("Enter the word or phrase to search for: ")?;
        let replacement = self.ask_required("Enter the new word or phrase to replace with: ")?;
        Ok((search.trim().to_string(), replacement.trim().to_string()))
    }
}

/// 対話型エディタ
pub struct App<S: Storage, R: BufRead, W: Write> {
    session: CommandSession<S>,
    prompter: Prompter<R, W>,
    running: bool,
}

impl<S: Storage, R: BufRead, W: Write> App<S, R, W> {
    /// 新しいアプリケーションインスタンスを作成
    pub fn new(session: CommandSession<S>, reader: R, writer: W) -> Self {
        Self {
            session,
            prompter: Prompter::new(reader, writer),
            running: true,
        }
    }

    /// アプリケーションが実行中かどうかを確認
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn session(&self) -> &CommandSession<S> {
        &self.session
    }

    pub fn writer(&self) -> &W {
        self.prompter.writer()
    }

    /// メインループを実行（Exit を選ぶか入力が尽きるまで）
    ///
    /// 入力の読み取りに失敗した場合も終了処理（保存と履歴の書き出し）を行う。
    pub fn run(&mut self) -> Result<()> {
        while self.running {
            self.prompter.say(render_menu().trim_end())?;
            let result = match self.step() {
                Ok(result) => result,
                Err(err @ LineditError::Input(_)) => {
                    log::error!("input failed: {}", err);
                    self.prompter.say(&error::status_message(&err))?;
                    self.execute(Intent::Exit)?
                }
                Err(err) => return Err(err),
            };
            if result.should_quit {
                self.running = false;
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<CommandResult> {
        match self.read_choice()? {
            Some(choice) => self.dispatch(choice),
            None => {
                log::info!("input closed, exiting");
                self.execute(Intent::Exit)
            }
        }
    }

    /// 1〜6 が入力されるまで繰り返す
    fn read_choice(&mut self) -> Result<Option<MenuChoice>> {
        loop {
            let Some(line) = self.prompter.ask("Enter your choice (1-6): ")? else {
                return Ok(None);
            };
            if let Some(choice) = MenuChoice::parse(&line) {
                return Ok(Some(choice));
            }
            self.prompter
                .say("Invalid choice. Please enter a number from 1 to 6.")?;
        }
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<CommandResult> {
        match choice {
            MenuChoice::Open => self.open(),
            MenuChoice::Create => {
                self.with_path_retry("Enter the filename to create: ", Intent::Create)
            }
            MenuChoice::SearchReplace => self.with_path_retry(
                "Enter the filename to open: ",
                Intent::SearchReplace,
            ),
            MenuChoice::Undo => self.execute(Intent::Undo),
            MenuChoice::Redo => self.execute(Intent::Redo),
            MenuChoice::Exit => self.execute(Intent::Exit),
        }
    }

    /// 存在しない、または開く直前に消えたファイルは名前から入力し直す
    fn open(&mut self) -> Result<CommandResult> {
        loop {
            let Some(path) = self.ask_path("Enter the filename to open: ")? else {
                return self.execute(Intent::Exit);
            };
            if let Err(err) = self.session.check_exists(&path) {
                self.prompter.say(&error::status_message(&err))?;
                continue;
            }

            let Some(mode) = self.ask_save_mode()? else {
                return self.execute(Intent::Exit);
            };
            let intent = match mode {
                SaveMode::Overwrite => Intent::OpenOverwrite(path),
                SaveMode::Append => Intent::OpenAppend(path),
            };
            let result = self.execute(intent)?;
            if !result.is_recoverable() {
                return Ok(result);
            }
        }
    }

    /// O/A が入力されるまで繰り返す
    fn ask_save_mode(&mut self) -> Result<Option<SaveMode>> {
        loop {
            let Some(answer) = self
                .prompter
                .ask("Do you want to overwrite (O) or append (A) the file? ")?
            else {
                return Ok(None);
            };
            if let Some(mode) = parse_save_mode(&answer) {
                return Ok(Some(mode));
            }
            self.prompter
                .say("Invalid choice. Please enter 'O' for overwrite or 'A' for append.")?;
        }
    }

    /// ファイル名の入力からやり直せる失敗なら再入力を求める
    fn with_path_retry<F>(&mut self, prompt: &str, make_intent: F) -> Result<CommandResult>
    where
        F: Fn(PathBuf) -> Intent,
    {
        loop {
            let Some(path) = self.ask_path(prompt)? else {
                return self.execute(Intent::Exit);
            };
            let result = self.execute(make_intent(path))?;
            if !result.is_recoverable() {
                return Ok(result);
            }
        }
    }

    /// パスを展開できるまで繰り返す
    fn ask_path(&mut self, prompt: &str) -> Result<Option<PathBuf>> {
        loop {
            let Some(raw) = self.prompter.ask(prompt)? else {
                return Ok(None);
            };
            match expand_path(&raw) {
                Ok(path) => return Ok(Some(path)),
                Err(err) => self.prompter.say(&error::status_message(&err))?,
            }
        }
    }

    fn execute(&mut self, intent: Intent) -> Result<CommandResult> {
        let changing = intent.is_content_changing();
        let result = self.session.execute(intent, &mut self.prompter);
        if changing && result.success {
            log::debug!(
                "buffer now {} bytes, {} snapshots",
                self.session.buffer().content().len(),
                self.session.history().past().len()
            );
        }
        self.report(&result)?;
        Ok(result)
    }

    fn report(&mut self, result: &CommandResult) -> Result<()> {
        for message in &result.messages {
            self.prompter.say(message)?;
        }
        Ok(())
    }
}
