//! トライ構造による高速文字列検索
//!
//! ダブル配列トライ（crawdad）をラップし、単語IDの共通接頭辞検索と完全一致検索を提供します。

use crate::errors::{HansegError, Result};

/// トライが内部で予約している終端コードポイント
///
/// このコードポイントを含む単語は登録できません。
pub const RESERVED_CHAR: char = crawdad::END_MARKER;

/// ダブル配列トライ
pub struct Trie {
    da: crawdad::Trie,
}

impl Trie {
    /// レコードからトライを構築します。
    ///
    /// # 引数
    ///
    /// * `records` - 単語とその値のペア。キーの重複は許されません。
    ///
    /// # エラー
    ///
    /// レコードが空、空のキーを含む、キーが重複している場合にエラーを返します。
    pub fn from_records<K>(records: &[(K, u32)]) -> Result<Self>
    where
        K: AsRef<str>,
    {
        Ok(Self {
            da: crawdad::Trie::from_records(records.iter().map(|(k, v)| (k, *v)))
                .map_err(|e| HansegError::invalid_argument("records", e.to_string()))?,
        })
    }

    /// 入力の接頭辞に一致するすべてのキーを、短い順に列挙します。
    #[inline(always)]
    pub fn common_prefix_iterator<'a>(
        &'a self,
        input: &'a [char],
    ) -> impl Iterator<Item = TrieMatch> + 'a {
        self.da
            .common_prefix_search(input.iter().copied().take_while(|&c| c != RESERVED_CHAR))
            .map(move |(value, end_char)| TrieMatch::new(value, end_char))
    }

    /// 入力と完全に一致するキーの値を返します。
    #[inline(always)]
    pub fn exact_match<I>(&self, input: I) -> Option<u32>
    where
        I: IntoIterator<Item = char>,
    {
        let mut reserved = false;
        let value = self.da.exact_match(input.into_iter().inspect(|&c| {
            reserved |= c == RESERVED_CHAR;
        }));
        if reserved { None } else { value }
    }
}

/// トライマッチング結果
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct TrieMatch {
    pub value: u32,
    pub end_char: usize,
}

impl TrieMatch {
    /// 新しいマッチング結果を作成します。
    #[inline(always)]
    pub const fn new(value: u32, end_char: usize) -> Self {
        Self { value, end_char }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_prefix() {
        let trie = Trie::from_records(&[("北京", 0), ("北京大学", 1), ("大学", 2)]).unwrap();
        let input: Vec<char> = "北京大学生".chars().collect();
        let matches: Vec<_> = trie.common_prefix_iterator(&input).collect();
        assert_eq!(matches, vec![TrieMatch::new(0, 2), TrieMatch::new(1, 4)]);
    }

    #[test]
    fn test_exact_match() {
        let trie = Trie::from_records(&[("北京", 0), ("北京大学", 1)]).unwrap();
        assert_eq!(trie.exact_match("北京".chars()), Some(0));
        assert_eq!(trie.exact_match("北京大".chars()), None);
        assert_eq!(trie.exact_match("南京".chars()), None);
    }

    #[test]
    fn test_reserved_char_in_input() {
        let trie = Trie::from_records(&[("北", 0), ("北京", 1)]).unwrap();
        let input = vec!['北', RESERVED_CHAR, '京'];
        let matches: Vec<_> = trie.common_prefix_iterator(&input).collect();
        assert_eq!(matches, vec![TrieMatch::new(0, 1)]);
        assert_eq!(trie.exact_match(input), None);
    }

    #[test]
    fn test_duplicate_keys() {
        assert!(Trie::from_records(&[("北京", 0), ("北京", 1)]).is_err());
    }
}
