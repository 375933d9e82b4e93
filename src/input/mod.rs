//! 入力処理モジュール
//!
//! メニュー選択の解釈と、SAVE で終わる複数行入力の読み取りを提供

pub mod menu;
pub mod text_block;

// 公開API
pub use menu::{parse_save_mode, render_menu, MenuChoice};
pub use text_block::{is_sentinel, read_line, read_text_block, TextBlockLines, SAVE_SENTINEL};
