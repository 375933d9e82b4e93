//! パス処理ユーティリティ
//!
//! ユーザーが入力したファイル名の展開

use crate::error::{LineditError, Result};
use std::path::PathBuf;

/// 入力されたパスを展開する（`~` → ホームディレクトリ、`$VAR` → 値）
///
/// 前後の空白は取り除く。相対パスは相対のまま返す。
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LineditError::Path("file name is empty".to_string()));
    }

    match shellexpand::full(trimmed) {
        Ok(expanded) => Ok(PathBuf::from(expanded.into_owned())),
        Err(e) => Err(LineditError::Path(format!("cannot expand {}: {}", trimmed, e))),
    }
}
