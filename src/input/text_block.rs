//! SAVE で終わる複数行入力

use std::io::{self, BufRead};

/// 入力終了を示す行
pub const SAVE_SENTINEL: &str = "SAVE";

/// 行が終了記号かどうか（前後の空白を除き、大文字小文字を区別しない）
pub fn is_sentinel(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(SAVE_SENTINEL)
}

/// 1行読み取り、改行を取り除いて返す。入力終端なら `None`
pub fn read_line<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

/// 終了記号までの行を改行付きで返すイテレータ
///
/// 入力終端も終了記号と同じ扱い。
pub struct TextBlockLines<'a, R: BufRead + ?Sized> {
    reader: &'a mut R,
    finished: bool,
}

impl<'a, R: BufRead + ?Sized> TextBlockLines<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Self {
            reader,
            finished: false,
        }
    }
}

impl<R: BufRead + ?Sized> Iterator for TextBlockLines<'_, R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match read_line(&mut *self.reader) {
            Ok(Some(line)) if !is_sentinel(&line) => Some(Ok(line + "\n")),
            Ok(_) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// 終了記号までの入力を1つのテキストにまとめる
pub fn read_text_block<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<String> {
    TextBlockLines::new(reader).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_lines_until_sentinel() {
        let mut input = Cursor::new("first line\nsecond\nSAVE\nafter\n");
        assert_eq!(read_text_block(&mut input).unwrap(), "first line\nsecond\n");

        // 終了記号の後の行は読み残される
        assert_eq!(read_line(&mut input).unwrap(), Some("after".to_string()));
    }

    #[test]
    fn test_sentinel_is_case_insensitive_and_trimmed() {
        assert!(is_sentinel("save"));
        assert!(is_sentinel("  Save \t"));
        assert!(!is_sentinel("SAVE ME"));
        assert!(!is_sentinel("saved"));
    }

    #[test]
    fn test_immediate_sentinel_gives_empty_text() {
        let mut input = Cursor::new("save\n");
        assert_eq!(read_text_block(&mut input).unwrap(), "");
    }

    #[test]
    fn test_end_of_input_terminates_block() {
        let mut input = Cursor::new("no sentinel\nlast without newline");
        assert_eq!(
            read_text_block(&mut input).unwrap(),
            "no sentinel\nlast without newline\n"
        );
    }

    #[test]
    fn test_crlf_lines_are_normalized() {
        let mut input = Cursor::new("a\r\nb\r\nSAVE\r\n");
        let lines: Vec<String> = TextBlockLines::new(&mut input)
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["a\n".to_string(), "b\n".to_string()]);
    }

    #[test]
    fn test_blank_lines_are_kept() {
        let mut input = Cursor::new("\n\nSAVE\n");
        assert_eq!(read_text_block(&mut input).unwrap(), "\n\n");
    }
}
