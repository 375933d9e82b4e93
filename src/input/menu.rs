//! メニュー定義

use crate::buffer::SaveMode;

/// メインメニューの選択肢
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Open,
    Create,
    SearchReplace,
    Undo,
    Redo,
    Exit,
}

impl MenuChoice {
    /// 表示順の全選択肢
    pub const ALL: [MenuChoice; 6] = [
        MenuChoice::Open,
        MenuChoice::Create,
        MenuChoice::SearchReplace,
        MenuChoice::Undo,
        MenuChoice::Redo,
        MenuChoice::Exit,
    ];

    /// 1〜6 の番号を解釈（前後の空白は無視）
    pub fn parse(input: &str) -> Option<Self> {
        let number: usize = input.trim().parse().ok()?;
        number
            .checked_sub(1)
            .and_then(|index| Self::ALL.get(index))
            .copied()
    }

    pub fn number(self) -> usize {
        Self::ALL
            .iter()
            .position(|choice| *choice == self)
            .map(|index| index + 1)
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Open => "Open an existing file",
            MenuChoice::Create => "Create a new file",
            MenuChoice::SearchReplace => "Search and replace",
            MenuChoice::Undo => "Undo last change",
            MenuChoice::Redo => "Redo last undone change",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// メニュー表示用テキスト
pub fn render_menu() -> String {
    let mut menu = String::from("\nSimple Text Editor\n");
    for choice in MenuChoice::ALL {
        menu.push_str(&format!("{}. {}\n", choice.number(), choice.label()));
    }
    menu
}

/// 上書き(O)/追記(A) の選択を解釈
pub fn parse_save_mode(input: &str) -> Option<SaveMode> {
    match input.trim().to_ascii_uppercase().as_str() {
        "O" => Some(SaveMode::Overwrite),
        "A" => Some(SaveMode::Append),
        _ => None,
    }
}
