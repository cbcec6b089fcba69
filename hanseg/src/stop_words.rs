//! ストップワードの集合
//!
//! 分割結果から除外する語の集合です。分割処理自体はこの集合を参照しません。

use std::io::Read;

use hashbrown::HashSet;

use crate::errors::Result;
use crate::token::TokenBuf;

/// ストップワードの集合
#[derive(Clone, Debug, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// 1行1語のテキストから読み込みます。
    ///
    /// 行末の空白は取り除かれ、空行は無視されます。空白や句読点そのものを
    /// ストップワードにする場合は、行頭に置いてください。
    ///
    /// # エラー
    ///
    /// 読み込みに失敗した場合、または入力がUTF-8として不正な場合にエラーを返します。
    pub fn from_reader<R>(mut rdr: R) -> Result<Self>
    where
        R: Read,
    {
        let mut buf = String::new();
        rdr.read_to_string(&mut buf)?;
        let words: HashSet<String> = buf
            .lines()
            .map(|l| l.strip_prefix('\u{feff}').unwrap_or(l))
            .map(|l| l.trim_end_matches(['\r', '\n', '\t', ' ']))
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        log::debug!("[hanseg] Loaded {} stop words", words.len());
        Ok(Self { words })
    }

    /// 語がストップワードかどうかを返します。
    #[inline(always)]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// ストップワードの数を返します。
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// 集合が空かどうかを返します。
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// ストップワードを除いたトークン列を返します。
    pub fn filter<I>(&self, tokens: I) -> Vec<TokenBuf>
    where
        I: IntoIterator<Item = TokenBuf>,
    {
        tokens
            .into_iter()
            .filter(|t| !self.contains(&t.surface))
            .collect()
    }
}

impl<S> FromIterator<S> for StopWords
where
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}
