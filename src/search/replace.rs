/// 一括置換の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// 置換後の内容（マッチしなければ元のまま）
    pub content: String,
    /// 置換した箇所の数
    pub replaced: usize,
}

impl ReplaceOutcome {
    pub fn matched(&self) -> bool {
        self.replaced > 0
    }
}

/// `search` の重ならない出現をすべて `replacement` に置き換える
///
/// 空の検索語は「見つからない」として扱い、内容を変更しない。
pub fn replace_all(content: &str, search: &str, replacement: &str) -> ReplaceOutcome {
    if search.is_empty() {
        return ReplaceOutcome {
            content: content.to_string(),
            replaced: 0,
        };
    }

    let replaced = content.matches(search).count();
    if replaced == 0 {
        return ReplaceOutcome {
            content: content.to_string(),
            replaced,
        };
    }

    ReplaceOutcome {
        content: content.replace(search, replacement),
        replaced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_single_occurrence() {
        let outcome = replace_all("hello world", "world", "there");
        assert_eq!(outcome.content, "hello there");
        assert!(outcome.matched());
    }

    #[test]
    fn replaces_every_occurrence() {
        let outcome = replace_all("foo bar foo\nfoo", "foo", "baz");
        assert_eq!(outcome.content, "baz bar baz\nbaz");
        assert_eq!(outcome.replaced, 3);
    }

    #[test]
    fn occurrences_do_not_overlap() {
        let outcome = replace_all("aaaa", "aa", "b");
        assert_eq!(outcome.content, "bb");
        assert_eq!(outcome.replaced, 2);

        let outcome = replace_all("aaa", "aa", "b");
        assert_eq!(outcome.content, "ba");
        assert_eq!(outcome.replaced, 1);
    }

    #[test]
    fn missing_term_leaves_content_untouched() {
        let outcome = replace_all("hello world", "moon", "sun");
        assert_eq!(outcome.content, "hello world");
        assert!(!outcome.matched());
    }

    #[test]
    fn empty_term_is_not_found() {
        let outcome = replace_all("abc", "", "x");
        assert_eq!(outcome.content, "abc");
        assert_eq!(outcome.replaced, 0);
    }

    #[test]
    fn replacement_may_contain_search_term() {
        let outcome = replace_all("cat", "cat", "catcat");
        assert_eq!(outcome.content, "catcat");
        assert_eq!(outcome.replaced, 1);
    }

    #[test]
    fn multibyte_terms_are_replaced() {
        let outcome = replace_all("こんにちは世界、世界", "世界", "みなさん");
        assert_eq!(outcome.content, "こんにちはみなさん、みなさん");
        assert_eq!(outcome.replaced, 2);
    }
}
