//! 検索・置換モジュール
//!
//! リテラル文字列の一括置換のみを提供する

pub mod replace;

pub use replace::{replace_all, ReplaceOutcome};
